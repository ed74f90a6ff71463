use serde::{Deserialize, Serialize};
use crate::config::{ColorMode, ToxinReadout};

/// Runtime constants derived from the configuration, read on every tick.
/// Fixed for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    pub dt: f32,

    // Growth (base rates live in the species table)
    pub carrying_capacity: f32,
    pub dead_lifetime: u32,

    // Contact killing
    pub contact_killing: bool,
    pub kill_radius: f32,
    pub kill_radius_sq: f32,
    pub grid_cell_size: f32, // >= kill_radius

    // Diffusive killing
    pub diffusive_killing: bool,
    pub toxin_threshold: f32,
    pub toxin_readout: ToxinReadout,

    // Growth inhibition
    pub inhibition_enabled: bool,
    pub inhibition_strength: f32,
    pub inhibition_gate: Option<usize>, // Quorum channel index, None = always on

    // Metabolic cost multipliers per producer state, already floored at 0
    pub silent_cost_factor: f32,
    pub partial_cost_factor: f32,
    pub active_cost_factor: f32,

    // Signal slots
    pub toxin_index: usize,
    pub inhibitor_index: usize,

    pub color_mode: ColorMode,
    pub toxin_shading_gate: Option<usize>, // Quorum channel index, None = always shade
    pub report_interval: u32,
}

impl SimParams {
    /// Population-wide growth multiplier for a tick, from the pre-tick size.
    /// Includes dead cells that have not been removed yet.
    pub fn crowding_factor(&self, population_size: usize) -> f32 {
        if self.carrying_capacity > 0.0 {
            (1.0 - population_size as f32 / self.carrying_capacity).max(0.0)
        } else {
            1.0
        }
    }
}
