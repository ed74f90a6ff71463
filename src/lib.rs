//! Per-tick population update engine for an agent-based microbial colony.
//!
//! The [`controller::PopulationController`] advances a [`population::Population`]
//! one tick at a time: quorum sensing, lethal interactions, growth assignment
//! and dead-cell removal. Mechanics and the reaction-diffusion solver are
//! external; [`host`] provides minimal stand-ins for both.

pub mod agent;
pub mod color;
pub mod controller;
pub mod division;
pub mod grid;
pub mod host;
pub mod lifecycle;
pub mod population;
pub mod quorum;
pub mod reactions;
pub mod simulation;
pub mod species;

pub use agent::{Agent, AgentKey, Body, CellType};
pub use controller::{PopulationController, SimulationContext, TickReport};
pub use division::{divide, DivisionError};
pub use grid::HazardGrid;
pub use population::Population;
pub use quorum::QuorumState;
pub use reactions::{RateInput, RateKernel, ToxinInhibitorKinetics};
pub use simulation::ColonySimulation;
pub use species::SpeciesCatalog;
