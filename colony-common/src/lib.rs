pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    ChannelKinetics, ColorConfig, ColorMode, InhibitionConfig, InhibitionGating, KillingConfig,
    MetabolicCostConfig, OutputConfig, PopulationConfig, ProducerState, QuorumChannelConfig,
    QuorumConfig, ReactionMode, ReactionsConfig, SeedingConfig, SignalsConfig, SimulationConfig,
    SpeciesProfile, SpeciesTable, TimingConfig, ToxinReadout,
};
pub use sim_params::SimParams;
pub use snapshot::{PopulationSnapshot, StateCounts};
pub use vecmath::{clamp, planar_direction, Vec2, Vec3};
