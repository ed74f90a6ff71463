#![allow(dead_code)]

use colony_common::{SimulationConfig, Vec3};
use colony_engine::{Agent, AgentKey, Body, CellType, PopulationController, SimulationContext};

/// A unit rod at `(x, y)` that is not ready to divide.
pub fn agent(x: f32, y: f32, cell_type: CellType) -> Agent {
    Agent {
        key: AgentKey(0),
        body: Body::new(Vec3::new(x, y, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0, 0.5),
        cell_type,
        growth_rate: 0.0,
        target_volume: 2.0,
        divide_flag: false,
        color: [0.0; 3],
        dead_counter: 0,
        species: Vec::new(),
        signals: Vec::new(),
    }
}

/// Same as [`agent`] but with a fixed key, for `Population::from_agents`.
pub fn keyed(key: u64, x: f32, y: f32, cell_type: CellType) -> Agent {
    Agent { key: AgentKey(key), ..agent(x, y, cell_type) }
}

pub fn controller(edit: impl FnOnce(&mut SimulationConfig)) -> (PopulationController, SimulationContext) {
    let mut config = SimulationConfig::default();
    edit(&mut config);
    config.validate().expect("test config must be valid");
    let ctl = PopulationController::from_config(&config).expect("test config must resolve");
    (ctl, SimulationContext::from_config(&config))
}
