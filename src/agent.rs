use colony_common::{ProducerState, Vec3};
use serde::{Deserialize, Serialize};

/// Stable handle of an agent. Allocated monotonically by the population
/// arena and never handed out twice within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentKey(pub u64);

/// Lifecycle/species tag of an agent.
///
/// The numeric codes (see [`CellType::code`]) are the tags an external
/// reaction solver gates on:
/// 0 susceptible, 1 producer active, 2 dead, 3 producer silent,
/// 4 producer partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Susceptible,
    Producer(ProducerState),
    Dead,
    /// A tag the rules do not know, e.g. from malformed external setup.
    /// The core never transitions an agent into this state.
    Unrecognized(u8),
}

impl CellType {
    pub const SUSCEPTIBLE_CODE: u8 = 0;
    pub const PRODUCER_ACTIVE_CODE: u8 = 1;
    pub const DEAD_CODE: u8 = 2;
    pub const PRODUCER_SILENT_CODE: u8 = 3;
    pub const PRODUCER_PARTIAL_CODE: u8 = 4;

    pub fn code(self) -> u8 {
        match self {
            CellType::Susceptible => Self::SUSCEPTIBLE_CODE,
            CellType::Producer(ProducerState::Active) => Self::PRODUCER_ACTIVE_CODE,
            CellType::Dead => Self::DEAD_CODE,
            CellType::Producer(ProducerState::Silent) => Self::PRODUCER_SILENT_CODE,
            CellType::Producer(ProducerState::Partial) => Self::PRODUCER_PARTIAL_CODE,
            CellType::Unrecognized(code) => code,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            Self::SUSCEPTIBLE_CODE => CellType::Susceptible,
            Self::PRODUCER_ACTIVE_CODE => CellType::Producer(ProducerState::Active),
            Self::DEAD_CODE => CellType::Dead,
            Self::PRODUCER_SILENT_CODE => CellType::Producer(ProducerState::Silent),
            Self::PRODUCER_PARTIAL_CODE => CellType::Producer(ProducerState::Partial),
            other => CellType::Unrecognized(other),
        }
    }

    pub fn is_dead(self) -> bool {
        matches!(self, CellType::Dead)
    }

    /// Live producer in any sub-state. Producers are the contact hazard.
    pub fn is_producer(self) -> bool {
        matches!(self, CellType::Producer(_))
    }

    pub fn secretes_toxin(self) -> bool {
        matches!(self, CellType::Producer(ProducerState::Active))
    }

    pub fn secretes_inhibitor(self) -> bool {
        matches!(
            self,
            CellType::Producer(ProducerState::Partial) | CellType::Producer(ProducerState::Active)
        )
    }
}

impl From<u8> for CellType {
    fn from(code: u8) -> Self {
        CellType::from_code(code)
    }
}

/// Rod geometry. Owned by the mechanics engine; the update engine only
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub direction: Vec3,
    pub length: f32,
    pub radius: f32,
    pub volume: f32,
}

impl Body {
    pub fn new(position: Vec3, direction: Vec3, length: f32, radius: f32) -> Self {
        Body { position, direction, length, radius, volume: length }
    }
}

/// One cell of the colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub key: AgentKey,
    pub body: Body,
    pub cell_type: CellType,
    pub growth_rate: f32,
    /// Volume above which the cell asks to divide.
    pub target_volume: f32,
    pub divide_flag: bool,
    /// Display only.
    pub color: [f32; 3],
    /// Ticks since death; 0 while alive.
    pub dead_counter: u32,
    /// Intracellular concentrations, owned by the external integrator.
    pub species: Vec<f32>,
    /// Extracellular concentrations at the cell, supplied by the solver.
    pub signals: Vec<f32>,
}

impl Agent {
    /// Extracellular reading for a signal slot; a missing slot reads as zero.
    pub fn signal(&self, index: usize) -> f32 {
        self.signals.get(index).copied().unwrap_or(0.0)
    }

    pub fn is_dead(&self) -> bool {
        self.cell_type.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_known_tags() {
        for code in 0u8..=4 {
            assert_eq!(CellType::from_code(code).code(), code);
        }
        assert_eq!(CellType::from_code(1), CellType::Producer(ProducerState::Active));
        assert_eq!(CellType::from_code(3), CellType::Producer(ProducerState::Silent));
    }

    #[test]
    fn unknown_code_is_preserved() {
        let tag = CellType::from(9);
        assert_eq!(tag, CellType::Unrecognized(9));
        assert_eq!(tag.code(), 9);
        assert!(!tag.is_producer());
        assert!(!tag.is_dead());
    }

    #[test]
    fn secretion_follows_producer_state() {
        let silent = CellType::Producer(ProducerState::Silent);
        let partial = CellType::Producer(ProducerState::Partial);
        let active = CellType::Producer(ProducerState::Active);
        assert!(!silent.secretes_inhibitor() && !silent.secretes_toxin());
        assert!(partial.secretes_inhibitor() && !partial.secretes_toxin());
        assert!(active.secretes_inhibitor() && active.secretes_toxin());
        assert!(!CellType::Susceptible.secretes_inhibitor());
    }

    #[test]
    fn missing_readings_are_zero() {
        let agent = Agent {
            key: AgentKey(0),
            body: Body::new(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0), 1.0, 0.5),
            cell_type: CellType::Susceptible,
            growth_rate: 0.0,
            target_volume: 1.0,
            divide_flag: false,
            color: [0.0; 3],
            dead_counter: 0,
            species: Vec::new(),
            signals: vec![0.4],
        };
        assert_eq!(agent.signal(0), 0.4);
        assert_eq!(agent.signal(1), 0.0);
    }
}
