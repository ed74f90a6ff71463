use serde::{Serialize, Deserialize};

/// Number of agents in each lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub susceptible: u32,
    pub producer_silent: u32,
    pub producer_partial: u32,
    pub producer_active: u32,
    pub dead: u32,
    /// Agents carrying a cell type tag the rules do not know.
    pub unrecognized: u32,
}

impl StateCounts {
    /// Live producers in any sub-state. This is the quorum population.
    pub fn producers(&self) -> u32 {
        self.producer_silent + self.producer_partial + self.producer_active
    }

    pub fn total(&self) -> u32 {
        self.susceptible + self.producers() + self.dead + self.unrecognized
    }
}

/// Aggregate diagnostics of the population at a specific tick.
#[derive(Debug, Clone, Serialize, Deserialize)] // Derive traits for easy saving/loading
pub struct PopulationSnapshot {
    /// Tick number after which the snapshot was taken.
    pub tick: u64,
    /// Simulated time (tick * dt).
    pub time: f32,
    pub counts: StateCounts,
    /// Agents removed at the end of this tick (aged-out dead cells).
    pub removed_this_tick: u32,
    /// Quorum flags in channel order.
    pub quorum_flags: Vec<bool>,
    /// Highest toxin reading over live susceptible cells (extracellular).
    pub max_susceptible_toxin: f32,
    /// Highest inhibitor reading over live susceptible cells (extracellular).
    pub max_susceptible_inhibitor: f32,
}
