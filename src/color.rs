use crate::agent::CellType;
use crate::species::SpeciesCatalog;
use colony_common::{clamp, ColorMode, SimParams};

/// Display color of an agent for the renderer.
///
/// `toxin` is the toxin reading the kill rule used (0 if none) and
/// `inhibition` the growth factor applied this tick (1 means uninhibited).
/// Toxin shading waits for the channel that switches secretion on, when
/// one is configured.
/// Pure: the result is written to `Agent::color` and never read back by the
/// rules.
pub fn display_color(
    cell_type: CellType,
    toxin: f32,
    inhibition: f32,
    quorum_flags: &[bool],
    params: &SimParams,
    catalog: &SpeciesCatalog,
) -> [f32; 3] {
    let base = catalog.base_color(cell_type);
    match params.color_mode {
        ColorMode::Species => base,
        ColorMode::ByInhibitor => match cell_type {
            CellType::Susceptible => {
                let f = clamp(inhibition, 0.0, 1.0);
                [1.0 - f, 1.0, 0.0]
            }
            _ => base,
        },
        ColorMode::ByToxin => {
            if cell_type.is_dead() || !params.diffusive_killing || params.toxin_threshold <= 0.0 {
                return base;
            }
            if let Some(gate) = params.toxin_shading_gate {
                if !quorum_flags.get(gate).copied().unwrap_or(false) {
                    return base;
                }
            }
            let t = clamp(toxin / params.toxin_threshold, 0.0, 1.0);
            blend_toward_white(base, t)
        }
    }
}

fn blend_toward_white(color: [f32; 3], t: f32) -> [f32; 3] {
    color.map(|c| c + (1.0 - c) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_common::{ProducerState, QuorumChannelConfig, SimulationConfig};

    fn params_with(mode: ColorMode) -> SimParams {
        let mut config = SimulationConfig::default();
        config.color.mode = mode;
        config.killing.diffusive = true;
        config.killing.toxin_threshold = 2.0;
        config.sim_params().unwrap()
    }

    #[test]
    fn species_mode_ignores_readings() {
        let params = params_with(ColorMode::Species);
        let catalog = SpeciesCatalog::default();
        let c = display_color(CellType::Susceptible, 5.0, 0.1, &[], &params, &catalog);
        assert_eq!(c, [0.0, 1.0, 0.0]);
        let active = CellType::Producer(ProducerState::Active);
        assert_eq!(display_color(active, 0.0, 1.0, &[], &params, &catalog), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn inhibitor_shading_runs_green_to_yellow() {
        let params = params_with(ColorMode::ByInhibitor);
        let catalog = SpeciesCatalog::default();
        assert_eq!(display_color(CellType::Susceptible, 0.0, 1.0, &[], &params, &catalog), [0.0, 1.0, 0.0]);
        assert_eq!(display_color(CellType::Susceptible, 0.0, 0.0, &[], &params, &catalog), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn toxin_shading_saturates_at_threshold() {
        let params = params_with(ColorMode::ByToxin);
        let catalog = SpeciesCatalog::default();
        let half = display_color(CellType::Susceptible, 1.0, 1.0, &[], &params, &catalog);
        assert_eq!(half, [0.5, 1.0, 0.5]);
        let full = display_color(CellType::Susceptible, 10.0, 1.0, &[], &params, &catalog);
        assert_eq!(full, [1.0, 1.0, 1.0]);
        assert_eq!(display_color(CellType::Dead, 10.0, 1.0, &[], &params, &catalog), [0.6, 0.6, 0.6]);
    }

    #[test]
    fn toxin_shading_waits_for_the_toxin_quorum() {
        let mut config = SimulationConfig::default();
        config.color.mode = ColorMode::ByToxin;
        config.killing.diffusive = true;
        config.killing.toxin_threshold = 2.0;
        for (name, promotes_to) in [("inhibitor", ProducerState::Partial), ("toxin", ProducerState::Active)] {
            config.quorum.channels.push(QuorumChannelConfig {
                name: name.into(),
                threshold: 10,
                promotes_to,
                enabled: true,
            });
        }
        let params = config.sim_params().unwrap();
        let catalog = SpeciesCatalog::default();

        let before = display_color(CellType::Susceptible, 1.0, 1.0, &[true, false], &params, &catalog);
        assert_eq!(before, [0.0, 1.0, 0.0]);
        let after = display_color(CellType::Susceptible, 1.0, 1.0, &[true, true], &params, &catalog);
        assert_eq!(after, [0.5, 1.0, 0.5]);
    }
}
