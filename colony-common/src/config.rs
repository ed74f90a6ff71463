use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::SimParams;
use std::path::Path;

// Timing of the host loop and of diagnostics
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_total_steps")]
    pub total_steps: u32,
    /// Ticks between aggregate count log lines.
    #[serde(default = "default_report_interval")]
    pub report_interval: u32,
    /// Ticks between recorded snapshots.
    #[serde(default = "default_record_interval")]
    pub record_interval: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            dt: default_dt(),
            total_steps: default_total_steps(),
            report_interval: default_report_interval(),
            record_interval: default_record_interval(),
        }
    }
}

fn default_dt() -> f32 { 0.025 }
fn default_total_steps() -> u32 { 1000 }
fn default_report_interval() -> u32 { 100 }
fn default_record_interval() -> u32 { 10 }

/// Activity level of a toxin/inhibitor producing cell.
/// Ordered from least to most active; quorum promotion only ever moves up.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProducerState {
    /// No secretion.
    Silent,
    /// Inhibitor secretion only.
    Partial,
    /// Toxin and inhibitor secretion.
    Active,
}

// Initial population placement, consumed by the seeding routine
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SeedingConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_susceptible_count")]
    pub susceptible_count: u32,
    #[serde(default = "default_producer_count")]
    pub producer_count: u32,
    /// Half-width of the square around the origin that susceptible cells are
    /// seeded in. Producers use half of this.
    #[serde(default = "default_spread")]
    pub spread: f32,
    #[serde(default = "default_initial_producer_state")]
    pub initial_producer_state: ProducerState,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        SeedingConfig {
            seed: default_seed(),
            susceptible_count: default_susceptible_count(),
            producer_count: default_producer_count(),
            spread: default_spread(),
            initial_producer_state: default_initial_producer_state(),
        }
    }
}

fn default_seed() -> u64 { 1 }
fn default_susceptible_count() -> u32 { 3 }
fn default_producer_count() -> u32 { 1 }
fn default_spread() -> f32 { 25.0 }
fn default_initial_producer_state() -> ProducerState { ProducerState::Active }

/// Per-species constants. Growth rate and color are the defaults a freshly
/// created cell of that species gets; target volume is redrawn per cell as
/// `mean + U[0, jitter]`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SpeciesProfile {
    pub growth_rate: f32,
    pub target_volume_mean: f32,
    pub target_volume_jitter: f32,
    pub color: [f32; 3],
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SpeciesTable {
    #[serde(default = "default_susceptible_profile")]
    pub susceptible: SpeciesProfile,
    #[serde(default = "default_producer_profile")]
    pub producer: SpeciesProfile,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        SpeciesTable {
            susceptible: default_susceptible_profile(),
            producer: default_producer_profile(),
        }
    }
}

fn default_susceptible_profile() -> SpeciesProfile {
    SpeciesProfile {
        growth_rate: 1.8,
        target_volume_mean: 1.0,
        target_volume_jitter: 0.15,
        color: [0.0, 1.0, 0.0],
    }
}

fn default_producer_profile() -> SpeciesProfile {
    SpeciesProfile {
        growth_rate: 0.6,
        target_volume_mean: 3.5,
        target_volume_jitter: 0.5,
        color: [0.0, 0.0, 1.0],
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    /// Crowding factor is `max(0, 1 - n / carrying_capacity)`; a value <= 0
    /// disables crowding.
    #[serde(default = "default_carrying_capacity")]
    pub carrying_capacity: f32,
    /// Ticks a dead cell lingers before it is removed.
    #[serde(default = "default_dead_lifetime")]
    pub dead_lifetime: u32,
    /// Hard cap on population size honoured by the mechanics stand-in.
    #[serde(default = "default_max_cells")]
    pub max_cells: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            carrying_capacity: default_carrying_capacity(),
            dead_lifetime: default_dead_lifetime(),
            max_cells: default_max_cells(),
        }
    }
}

fn default_carrying_capacity() -> f32 { 10_000.0 }
fn default_dead_lifetime() -> u32 { 20 }
fn default_max_cells() -> u32 { 10_000 }

/// Which concentration the diffusive kill rule compares against the threshold.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToxinReadout {
    /// Local extracellular toxin signal.
    Extracellular,
    /// Intracellular toxin pool (membrane-exchange models).
    Intracellular,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct KillingConfig {
    /// Producers kill susceptible cells within `kill_radius`.
    #[serde(default)]
    pub contact: bool,
    #[serde(default = "default_kill_radius")]
    pub kill_radius: f32,
    /// Spatial hash cell side. Never smaller than `kill_radius`.
    #[serde(default)]
    pub grid_cell_size: Option<f32>,
    /// Susceptible cells die when the toxin reading reaches `toxin_threshold`.
    #[serde(default)]
    pub diffusive: bool,
    #[serde(default = "default_toxin_threshold")]
    pub toxin_threshold: f32,
    #[serde(default = "default_toxin_readout")]
    pub toxin_readout: ToxinReadout,
}

impl Default for KillingConfig {
    fn default() -> Self {
        KillingConfig {
            contact: false,
            kill_radius: default_kill_radius(),
            grid_cell_size: None,
            diffusive: false,
            toxin_threshold: default_toxin_threshold(),
            toxin_readout: default_toxin_readout(),
        }
    }
}

fn default_kill_radius() -> f32 { 2.0 }
fn default_toxin_threshold() -> f32 { 1.0 }
fn default_toxin_readout() -> ToxinReadout { ToxinReadout::Extracellular }

/// When the inhibitor starts slowing susceptible growth.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InhibitionGating {
    /// Respond to whatever inhibitor is present.
    Always,
    /// Respond only once the gate quorum channel has fired.
    AfterQuorum,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InhibitionConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Growth factor is `max(0, 1 - strength * inhibitor)`.
    #[serde(default = "default_inhibition_strength")]
    pub strength: f32,
    #[serde(default = "default_inhibition_gating")]
    pub gating: InhibitionGating,
    /// Quorum channel name used by `AfterQuorum`. Defaults to the first channel.
    #[serde(default)]
    pub gate_channel: Option<String>,
}

impl Default for InhibitionConfig {
    fn default() -> Self {
        InhibitionConfig {
            enabled: false,
            strength: default_inhibition_strength(),
            gating: default_inhibition_gating(),
            gate_channel: None,
        }
    }
}

fn default_inhibition_strength() -> f32 { 0.5 }
fn default_inhibition_gating() -> InhibitionGating { InhibitionGating::Always }

/// Fixed growth penalties paid by secreting producers.
/// Partial pays `partial`; active pays `partial + active_extra`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct MetabolicCostConfig {
    #[serde(default)]
    pub partial: f32,
    #[serde(default)]
    pub active_extra: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QuorumChannelConfig {
    pub name: String,
    /// Live producer count at which the channel fires.
    pub threshold: u32,
    /// Producers below this state are promoted to it when the channel fires.
    pub promotes_to: ProducerState,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool { true }

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct QuorumConfig {
    #[serde(default)]
    pub channels: Vec<QuorumChannelConfig>,
}

/// Slots of the toxin and inhibitor in `species[]`/`signals[]`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignalsConfig {
    #[serde(default = "default_toxin_index")]
    pub toxin_index: usize,
    #[serde(default = "default_inhibitor_index")]
    pub inhibitor_index: usize,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        SignalsConfig {
            toxin_index: default_toxin_index(),
            inhibitor_index: default_inhibitor_index(),
        }
    }
}

fn default_toxin_index() -> usize { 0 }
fn default_inhibitor_index() -> usize { 1 }

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReactionMode {
    /// Intracellular pools exchange with the medium across the membrane;
    /// producers secrete into their own pool.
    Membrane,
    /// No intracellular pools; producers secrete straight into the medium.
    Direct,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChannelKinetics {
    /// Membrane permeability (exchange coefficient).
    #[serde(default)]
    pub membrane_rate: f32,
    /// Secretion rate of a producer that secretes this channel.
    #[serde(default)]
    pub production_rate: f32,
    /// First-order decay of the extracellular signal.
    #[serde(default)]
    pub decay_out: f32,
    /// First-order decay of the intracellular pool.
    #[serde(default)]
    pub decay_in: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ReactionsConfig {
    #[serde(default = "default_reaction_mode")]
    pub mode: ReactionMode,
    #[serde(default = "default_toxin_kinetics")]
    pub toxin: ChannelKinetics,
    #[serde(default = "default_inhibitor_kinetics")]
    pub inhibitor: ChannelKinetics,
    /// Membrane area over grid volume, normally supplied by the solver.
    #[serde(default = "default_area_factor")]
    pub area_factor: f32,
    /// Volume of the well-mixed medium in grid-cell units (stand-in solver only).
    #[serde(default = "default_medium_cells")]
    pub medium_cells: f32,
    /// Forward Euler sub-steps per tick (stand-in solver only).
    #[serde(default = "default_substeps")]
    pub substeps: u32,
}

impl Default for ReactionsConfig {
    fn default() -> Self {
        ReactionsConfig {
            mode: default_reaction_mode(),
            toxin: default_toxin_kinetics(),
            inhibitor: default_inhibitor_kinetics(),
            area_factor: default_area_factor(),
            medium_cells: default_medium_cells(),
            substeps: default_substeps(),
        }
    }
}

fn default_reaction_mode() -> ReactionMode { ReactionMode::Membrane }
fn default_toxin_kinetics() -> ChannelKinetics {
    ChannelKinetics { membrane_rate: 10.0, production_rate: 5.0, decay_out: 0.0, decay_in: 0.0 }
}
fn default_inhibitor_kinetics() -> ChannelKinetics {
    ChannelKinetics { membrane_rate: 40.0, production_rate: 10.0, decay_out: 0.01, decay_in: 0.0 }
}
fn default_area_factor() -> f32 { 0.01 }
fn default_medium_cells() -> f32 { 1000.0 }
fn default_substeps() -> u32 { 4 }

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Plain per-state colors.
    Species,
    /// Susceptible cells shade green to yellow with their inhibition.
    ByInhibitor,
    /// Live cells fade toward white as toxin approaches the kill threshold.
    ByToxin,
}

/// Display palette. Species base colors live in the species table; this
/// holds the producer sub-state and dead colors.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ColorConfig {
    #[serde(default = "default_color_mode")]
    pub mode: ColorMode,
    #[serde(default = "default_partial_color")]
    pub producer_partial: [f32; 3],
    #[serde(default = "default_active_color")]
    pub producer_active: [f32; 3],
    #[serde(default = "default_dead_color")]
    pub dead: [f32; 3],
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            mode: default_color_mode(),
            producer_partial: default_partial_color(),
            producer_active: default_active_color(),
            dead: default_dead_color(),
        }
    }
}

fn default_color_mode() -> ColorMode { ColorMode::Species }
fn default_partial_color() -> [f32; 3] { [1.0, 0.5, 0.0] }
fn default_active_color() -> [f32; 3] { [1.0, 0.0, 0.0] }
fn default_dead_color() -> [f32; 3] { [0.6, 0.6, 0.6] }

// Output settings for recorded diagnostics
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default)]
    pub save_stats: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default)]
    pub save_final_population: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            save_stats: false,
            format: None,
            save_final_population: false,
        }
    }
}

fn default_base_filename() -> String { "colony".to_string() }

/// Scenario configuration, loaded from a TOML file. Every section may be
/// omitted; the defaults describe a two-species colony without killing.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub seeding: SeedingConfig,
    #[serde(default)]
    pub species: SpeciesTable,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub killing: KillingConfig,
    #[serde(default)]
    pub inhibition: InhibitionConfig,
    #[serde(default)]
    pub metabolic_cost: MetabolicCostConfig,
    #[serde(default)]
    pub quorum: QuorumConfig,
    #[serde(default)]
    pub signals: SignalsConfig,
    #[serde(default)]
    pub reactions: ReactionsConfig,
    #[serde(default)]
    pub color: ColorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the scenario configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the update engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.timing.dt > 0.0) {
            anyhow::bail!("timing.dt must be positive.");
        }
        for (name, profile) in [("susceptible", &self.species.susceptible), ("producer", &self.species.producer)] {
            if profile.growth_rate < 0.0 {
                anyhow::bail!("species.{}.growth_rate must not be negative.", name);
            }
            if !(profile.target_volume_mean > 0.0) {
                anyhow::bail!("species.{}.target_volume_mean must be positive.", name);
            }
            if profile.target_volume_jitter < 0.0 {
                anyhow::bail!("species.{}.target_volume_jitter must not be negative.", name);
            }
        }
        if self.population.dead_lifetime == 0 {
            anyhow::bail!("population.dead_lifetime must be at least 1.");
        }
        if self.killing.contact && !(self.killing.kill_radius > 0.0) {
            anyhow::bail!("killing.kill_radius must be positive when contact killing is enabled.");
        }
        if let Some(size) = self.killing.grid_cell_size {
            if !(size > 0.0) {
                anyhow::bail!("killing.grid_cell_size must be positive.");
            }
        }
        if self.killing.toxin_threshold < 0.0 {
            anyhow::bail!("killing.toxin_threshold must not be negative.");
        }
        if self.inhibition.strength < 0.0 {
            anyhow::bail!("inhibition.strength must not be negative.");
        }
        if self.metabolic_cost.partial < 0.0 || self.metabolic_cost.active_extra < 0.0 {
            anyhow::bail!("metabolic_cost entries must not be negative.");
        }
        for channel in &self.quorum.channels {
            if channel.promotes_to == ProducerState::Silent {
                anyhow::bail!("quorum channel '{}' cannot promote to silent.", channel.name);
            }
        }
        self.resolve_inhibition_gate()?;
        if !(self.reactions.medium_cells > 0.0) {
            anyhow::bail!("reactions.medium_cells must be positive.");
        }
        if self.reactions.substeps == 0 {
            anyhow::bail!("reactions.substeps must be at least 1.");
        }
        if self.signals.toxin_index == self.signals.inhibitor_index {
            anyhow::bail!("signals.toxin_index and signals.inhibitor_index must differ.");
        }
        Ok(())
    }

    /// Index of the quorum channel that gates inhibition, if any.
    fn inhibition_gate_index(&self) -> Option<usize> {
        match &self.inhibition.gate_channel {
            Some(name) => self.quorum.channels.iter().position(|c| &c.name == name),
            None if !self.quorum.channels.is_empty() => Some(0),
            None => None,
        }
    }

    /// `None` means inhibition is not gated. An `after_quorum` policy whose
    /// channel cannot be found is an error, never a fallback to ungated.
    fn resolve_inhibition_gate(&self) -> Result<Option<usize>> {
        match self.inhibition.gating {
            InhibitionGating::Always => Ok(None),
            InhibitionGating::AfterQuorum => match self.inhibition_gate_index() {
                Some(index) => Ok(Some(index)),
                None if !self.inhibition.enabled => Ok(None),
                None => match &self.inhibition.gate_channel {
                    Some(name) => anyhow::bail!(
                        "inhibition.gate_channel '{}' does not name a quorum channel.",
                        name
                    ),
                    None => anyhow::bail!("inhibition.gating = \"after_quorum\" needs a matching quorum channel."),
                },
            },
        }
    }

    /// First enabled channel that promotes producers to active, i.e. the
    /// one that switches toxin secretion on.
    fn toxin_channel_index(&self) -> Option<usize> {
        self.quorum
            .channels
            .iter()
            .position(|c| c.enabled && c.promotes_to == ProducerState::Active)
    }

    /// Converts the configuration into the constants read on the hot path.
    pub fn sim_params(&self) -> Result<SimParams> {
        let kill_radius = self.killing.kill_radius;
        // A neighbor within the kill radius must fall in the 3x3 block.
        let grid_cell_size = self.killing.grid_cell_size.unwrap_or(kill_radius).max(kill_radius);

        let partial_cost = self.metabolic_cost.partial;
        let active_cost = partial_cost + self.metabolic_cost.active_extra;

        let inhibition_gate = self.resolve_inhibition_gate()?;

        Ok(SimParams {
            dt: self.timing.dt,
            carrying_capacity: self.population.carrying_capacity,
            dead_lifetime: self.population.dead_lifetime,
            contact_killing: self.killing.contact,
            kill_radius,
            kill_radius_sq: kill_radius * kill_radius,
            grid_cell_size,
            diffusive_killing: self.killing.diffusive,
            toxin_threshold: self.killing.toxin_threshold,
            toxin_readout: self.killing.toxin_readout,
            inhibition_enabled: self.inhibition.enabled,
            inhibition_strength: self.inhibition.strength,
            inhibition_gate,
            silent_cost_factor: 1.0,
            partial_cost_factor: (1.0 - partial_cost).max(0.0),
            active_cost_factor: (1.0 - active_cost).max(0.0),
            toxin_index: self.signals.toxin_index,
            inhibitor_index: self.signals.inhibitor_index,
            color_mode: self.color.mode,
            toxin_shading_gate: self.toxin_channel_index(),
            report_interval: self.timing.report_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config.population.dead_lifetime, 20);
        assert_eq!(config.species.susceptible.growth_rate, 1.8);
        assert!(!config.killing.contact);
        assert!(config.quorum.channels.is_empty());
    }

    #[test]
    fn grid_cell_never_smaller_than_kill_radius() {
        let config = SimulationConfig::from_toml_str(
            "[killing]\ncontact = true\nkill_radius = 2.0\ngrid_cell_size = 0.5\n",
        )
        .unwrap();
        let params = config.sim_params().unwrap();
        assert_eq!(params.grid_cell_size, 2.0);
        assert_eq!(params.kill_radius_sq, 4.0);
    }

    #[test]
    fn cost_factors_are_cumulative_and_floored() {
        let config = SimulationConfig::from_toml_str(
            "[metabolic_cost]\npartial = 0.7\nactive_extra = 0.6\n",
        )
        .unwrap();
        let params = config.sim_params().unwrap();
        assert!((params.partial_cost_factor - 0.3).abs() < 1e-6);
        assert_eq!(params.active_cost_factor, 0.0);
        assert_eq!(params.silent_cost_factor, 1.0);
    }

    #[test]
    fn quorum_channels_parse() {
        let text = r#"
            [[quorum.channels]]
            name = "inhibitor"
            threshold = 30
            promotes_to = "partial"

            [[quorum.channels]]
            name = "toxin"
            threshold = 150
            promotes_to = "active"

            [inhibition]
            enabled = true
            gating = "after_quorum"
            gate_channel = "inhibitor"
        "#;
        let config = SimulationConfig::from_toml_str(text).unwrap();
        assert_eq!(config.quorum.channels.len(), 2);
        assert_eq!(config.quorum.channels[1].promotes_to, ProducerState::Active);
        assert_eq!(config.sim_params().unwrap().inhibition_gate, Some(0));
    }

    #[test]
    fn after_quorum_gating_without_channel_is_rejected() {
        let text = "[inhibition]\nenabled = true\ngating = \"after_quorum\"\n";
        assert!(SimulationConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn misspelled_gate_channel_is_rejected_without_validate() {
        let mut config = SimulationConfig::default();
        config.inhibition.enabled = true;
        config.inhibition.gating = InhibitionGating::AfterQuorum;
        config.inhibition.gate_channel = Some("inhibitr".into());
        config.quorum.channels.push(QuorumChannelConfig {
            name: "inhibitor".into(),
            threshold: 1000,
            promotes_to: ProducerState::Partial,
            enabled: true,
        });
        assert!(config.validate().is_err());
        let err = config.sim_params().unwrap_err();
        assert!(err.to_string().contains("inhibitr"));

        config.inhibition.enabled = false;
        assert_eq!(config.sim_params().unwrap().inhibition_gate, None);
    }

    #[test]
    fn toxin_shading_follows_the_active_promotion_channel() {
        let text = r#"
            [[quorum.channels]]
            name = "inhibitor"
            threshold = 30
            promotes_to = "partial"

            [[quorum.channels]]
            name = "toxin"
            threshold = 150
            promotes_to = "active"
        "#;
        let config = SimulationConfig::from_toml_str(text).unwrap();
        assert_eq!(config.sim_params().unwrap().toxin_shading_gate, Some(1));
        assert_eq!(SimulationConfig::default().sim_params().unwrap().toxin_shading_gate, None);
    }

    #[test]
    fn promotion_to_silent_is_rejected() {
        let text = "[[quorum.channels]]\nname = \"x\"\nthreshold = 1\npromotes_to = \"silent\"\n";
        assert!(SimulationConfig::from_toml_str(text).is_err());
    }
}
