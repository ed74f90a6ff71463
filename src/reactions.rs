use crate::agent::CellType;
use colony_common::{ChannelKinetics, ReactionMode, ReactionsConfig, SimulationConfig};

/// Local state an external solver hands to the rate functions.
#[derive(Debug, Clone, Copy)]
pub struct RateInput<'a> {
    pub cell_type: CellType,
    /// Intracellular concentrations (may be empty in direct mode).
    pub species: &'a [f32],
    /// Extracellular concentrations at the cell.
    pub signals: &'a [f32],
    /// Membrane area over grid-cell volume, supplied by the solver.
    pub area_factor: f32,
}

impl RateInput<'_> {
    fn species_at(&self, i: usize) -> f32 {
        self.species.get(i).copied().unwrap_or(0.0)
    }

    fn signal_at(&self, i: usize) -> f32 {
        self.signals.get(i).copied().unwrap_or(0.0)
    }
}

/// Rate functions registered with an external reaction-diffusion solver.
///
/// Implementations must be pure: the solver calls them at every
/// integration sub-step, possibly from several threads.
pub trait RateKernel: Send + Sync {
    /// Number of intracellular species the kernel tracks.
    fn species_count(&self) -> usize;

    /// Number of extracellular signal channels.
    fn signal_count(&self) -> usize;

    /// d(species)/dt. `out` has `species_count()` entries.
    fn intracellular_rates(&self, input: &RateInput<'_>, out: &mut [f32]);

    /// d(signals)/dt at the cell. `out` has `signal_count()` entries.
    fn extracellular_rates(&self, input: &RateInput<'_>, out: &mut [f32]);
}

/// Two-channel toxin/inhibitor kinetics.
///
/// In membrane mode each channel has an intracellular pool that exchanges
/// with the medium at `membrane_rate * (out - in) * area`; secreting
/// producers add `production_rate` to their own pool. In direct mode there
/// are no pools and secretion goes straight into the medium.
#[derive(Debug, Clone)]
pub struct ToxinInhibitorKinetics {
    mode: ReactionMode,
    toxin: ChannelKinetics,
    inhibitor: ChannelKinetics,
    toxin_index: usize,
    inhibitor_index: usize,
}

impl ToxinInhibitorKinetics {
    pub fn new(reactions: &ReactionsConfig, toxin_index: usize, inhibitor_index: usize) -> Self {
        Self {
            mode: reactions.mode,
            toxin: reactions.toxin.clone(),
            inhibitor: reactions.inhibitor.clone(),
            toxin_index,
            inhibitor_index,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(&config.reactions, config.signals.toxin_index, config.signals.inhibitor_index)
    }

    fn channels(&self) -> [(usize, &ChannelKinetics, bool); 2] {
        [(self.toxin_index, &self.toxin, true), (self.inhibitor_index, &self.inhibitor, false)]
    }

    fn secretes(cell_type: CellType, is_toxin: bool) -> bool {
        if is_toxin {
            cell_type.secretes_toxin()
        } else {
            cell_type.secretes_inhibitor()
        }
    }

    fn channel_count(&self) -> usize {
        self.toxin_index.max(self.inhibitor_index) + 1
    }
}

impl RateKernel for ToxinInhibitorKinetics {
    fn species_count(&self) -> usize {
        match self.mode {
            ReactionMode::Membrane => self.channel_count(),
            ReactionMode::Direct => 0,
        }
    }

    fn signal_count(&self) -> usize {
        self.channel_count()
    }

    fn intracellular_rates(&self, input: &RateInput<'_>, out: &mut [f32]) {
        out.iter_mut().for_each(|r| *r = 0.0);
        if self.mode == ReactionMode::Direct {
            return;
        }
        for (idx, kinetics, is_toxin) in self.channels() {
            let Some(rate) = out.get_mut(idx) else { continue };
            let inside = input.species_at(idx);
            let exchange = kinetics.membrane_rate * (input.signal_at(idx) - inside) * input.area_factor;
            let production = if Self::secretes(input.cell_type, is_toxin) { kinetics.production_rate } else { 0.0 };
            *rate = production + exchange - kinetics.decay_in * inside;
        }
    }

    fn extracellular_rates(&self, input: &RateInput<'_>, out: &mut [f32]) {
        out.iter_mut().for_each(|r| *r = 0.0);
        for (idx, kinetics, is_toxin) in self.channels() {
            let Some(rate) = out.get_mut(idx) else { continue };
            let outside = input.signal_at(idx);
            *rate = match self.mode {
                ReactionMode::Membrane => {
                    -kinetics.membrane_rate * (outside - input.species_at(idx)) * input.area_factor
                        - kinetics.decay_out * outside
                }
                ReactionMode::Direct => {
                    let production =
                        if Self::secretes(input.cell_type, is_toxin) { kinetics.production_rate } else { 0.0 };
                    production - kinetics.decay_out * outside
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_common::ProducerState;

    fn kernel(mode: ReactionMode) -> ToxinInhibitorKinetics {
        let mut config = ReactionsConfig::default();
        config.mode = mode;
        config.toxin.decay_out = 0.0;
        config.inhibitor.decay_out = 0.0;
        ToxinInhibitorKinetics::new(&config, 0, 1)
    }

    fn rates(k: &ToxinInhibitorKinetics, cell_type: CellType, species: &[f32], signals: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let input = RateInput { cell_type, species, signals, area_factor: 0.01 };
        let mut intra = vec![0.0; k.species_count()];
        let mut extra = vec![0.0; k.signal_count()];
        k.intracellular_rates(&input, &mut intra);
        k.extracellular_rates(&input, &mut extra);
        (intra, extra)
    }

    #[test]
    fn membrane_exchange_is_conservative_without_production() {
        let k = kernel(ReactionMode::Membrane);
        let (intra, extra) = rates(&k, CellType::Susceptible, &[0.2, 1.0], &[1.0, 0.5]);
        for i in 0..2 {
            assert!((intra[i] + extra[i]).abs() < 1e-6);
        }
        // toxin flows in, inhibitor flows out
        assert!(intra[0] > 0.0);
        assert!(intra[1] < 0.0);
    }

    #[test]
    fn secretion_is_gated_on_producer_state() {
        let k = kernel(ReactionMode::Membrane);
        let zeros = [0.0, 0.0];
        let (silent, _) = rates(&k, CellType::Producer(ProducerState::Silent), &zeros, &zeros);
        let (partial, _) = rates(&k, CellType::Producer(ProducerState::Partial), &zeros, &zeros);
        let (active, _) = rates(&k, CellType::Producer(ProducerState::Active), &zeros, &zeros);
        assert_eq!(silent, vec![0.0, 0.0]);
        assert_eq!(partial, vec![0.0, 10.0]);
        assert_eq!(active, vec![5.0, 10.0]);
    }

    #[test]
    fn direct_mode_secretes_into_medium() {
        let mut config = ReactionsConfig::default();
        config.mode = ReactionMode::Direct;
        let k = ToxinInhibitorKinetics::new(&config, 0, 1);
        assert_eq!(k.species_count(), 0);
        let (intra, extra) = rates(&k, CellType::Producer(ProducerState::Active), &[], &[0.0, 2.0]);
        assert!(intra.is_empty());
        assert_eq!(extra[0], 5.0);
        assert!((extra[1] - (10.0 - 0.01 * 2.0)).abs() < 1e-6);

        let (_, dead) = rates(&k, CellType::Dead, &[], &[1.0, 2.0]);
        assert_eq!(dead[0], 0.0);
        assert!((dead[1] + 0.02).abs() < 1e-6);
    }

    #[test]
    fn short_output_buffers_are_tolerated() {
        let k = kernel(ReactionMode::Membrane);
        let input = RateInput {
            cell_type: CellType::Producer(ProducerState::Active),
            species: &[],
            signals: &[],
            area_factor: 0.01,
        };
        let mut out = [0.0; 1];
        k.intracellular_rates(&input, &mut out);
        assert_eq!(out, [5.0]);
    }
}
