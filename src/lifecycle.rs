//! Per-agent rules evaluated once per tick.
//!
//! Rules run in a fixed priority order: dead decay, lethal exposure
//! (diffusive then contact), growth assignment with producer cost and
//! inhibitor factors, then color. Every input besides the agent itself is
//! a read-only snapshot in [`TickContext`], so evaluating agents in any
//! order (or in parallel) gives the same result.

use crate::agent::{Agent, AgentKey, CellType};
use crate::color::display_color;
use crate::grid::HazardGrid;
use crate::species::SpeciesCatalog;
use colony_common::{ProducerState, SimParams, ToxinReadout};

/// Tick-wide inputs shared by every agent evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub params: &'a SimParams,
    pub catalog: &'a SpeciesCatalog,
    /// Crowding factor from the pre-tick population size.
    pub crowding: f32,
    pub quorum_flags: &'a [bool],
    /// Hazard index, present only when contact killing is enabled.
    pub hazards: Option<&'a HazardGrid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillCause {
    Toxin,
    Contact,
}

/// What happened to one agent during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Live cell with its growth rate and divide flag assigned.
    Grown,
    /// Susceptible cell killed this tick.
    Killed(KillCause),
    /// Dead cell, counter advanced, still within its lifetime.
    Aging,
    /// Dead cell that reached its lifetime; remove after the scan.
    Expired,
    /// Unrecognized cell type: zero growth, no division.
    Inert,
}

impl Outcome {
    pub fn should_remove(self) -> bool {
        matches!(self, Outcome::Expired)
    }
}

/// Applies the lifecycle rules to `agent`. Writes only the agent's own
/// fields and never touches its geometry.
pub fn evaluate(agent: &mut Agent, ctx: &TickContext<'_>) -> Outcome {
    match agent.cell_type {
        CellType::Dead => decay(agent, ctx),
        // Malformed setup should not halt a long run: treat unknown tags as
        // inert instead of failing.
        CellType::Unrecognized(_) => {
            agent.growth_rate = 0.0;
            agent.divide_flag = false;
            agent.color = ctx.catalog.base_color(agent.cell_type);
            Outcome::Inert
        }
        CellType::Susceptible => {
            if let Some(cause) = lethal_exposure(agent, ctx) {
                kill(agent, ctx);
                return Outcome::Killed(cause);
            }
            let inhibition = inhibition_factor(agent, ctx.params, ctx.quorum_flags);
            assign_growth(agent, ctx, inhibition);
            let toxin = toxin_reading(agent, ctx.params).unwrap_or(0.0);
            agent.color = display_color(agent.cell_type, toxin, inhibition, ctx.quorum_flags, ctx.params, ctx.catalog);
            Outcome::Grown
        }
        CellType::Producer(state) => {
            assign_growth(agent, ctx, cost_factor(state, ctx.params));
            let toxin = toxin_reading(agent, ctx.params).unwrap_or(0.0);
            agent.color = display_color(agent.cell_type, toxin, 1.0, ctx.quorum_flags, ctx.params, ctx.catalog);
            Outcome::Grown
        }
    }
}

fn decay(agent: &mut Agent, ctx: &TickContext<'_>) -> Outcome {
    agent.growth_rate = 0.0;
    agent.divide_flag = false;
    agent.dead_counter = agent.dead_counter.saturating_add(1);
    agent.color = ctx.catalog.dead_color();
    if agent.dead_counter >= ctx.params.dead_lifetime {
        Outcome::Expired
    } else {
        Outcome::Aging
    }
}

fn kill(agent: &mut Agent, ctx: &TickContext<'_>) {
    agent.cell_type = CellType::Dead;
    agent.growth_rate = 0.0;
    agent.divide_flag = false;
    agent.dead_counter = 0;
    agent.color = ctx.catalog.dead_color();
}

/// Diffusive check first, then contact. `None` means the cell survives.
fn lethal_exposure(agent: &Agent, ctx: &TickContext<'_>) -> Option<KillCause> {
    let params = ctx.params;
    if params.diffusive_killing {
        if let Some(toxin) = toxin_reading(agent, params) {
            if toxin >= params.toxin_threshold {
                return Some(KillCause::Toxin);
            }
        }
    }
    if params.contact_killing {
        if let Some(grid) = ctx.hazards {
            let me = agent.key;
            let pos = agent.body.position.xy();
            if first_contact(grid, pos, params.kill_radius_sq, me).is_some() {
                return Some(KillCause::Contact);
            }
        }
    }
    None
}

fn first_contact(grid: &HazardGrid, pos: colony_common::Vec2, radius_sq: f32, me: AgentKey) -> Option<AgentKey> {
    grid.find_first_within(pos, radius_sq, |key| key != me)
}

fn assign_growth(agent: &mut Agent, ctx: &TickContext<'_>, modifier: f32) {
    let base = ctx.catalog.base_growth_rate(agent.cell_type);
    agent.growth_rate = (base * ctx.crowding * modifier).max(0.0);
    agent.divide_flag = agent.body.volume > agent.target_volume;
}

/// Growth multiplier paid by a producer for its secretion state.
pub fn cost_factor(state: ProducerState, params: &SimParams) -> f32 {
    match state {
        ProducerState::Silent => params.silent_cost_factor,
        ProducerState::Partial => params.partial_cost_factor,
        ProducerState::Active => params.active_cost_factor,
    }
}

/// Growth multiplier `max(0, 1 - strength * inhibitor)` for a susceptible
/// cell. 1 when inhibition is off, gated shut, or no inhibitor reading is
/// attached.
pub fn inhibition_factor(agent: &Agent, params: &SimParams, quorum_flags: &[bool]) -> f32 {
    if !params.inhibition_enabled {
        return 1.0;
    }
    if let Some(gate) = params.inhibition_gate {
        if !quorum_flags.get(gate).copied().unwrap_or(false) {
            return 1.0;
        }
    }
    match agent.signals.get(params.inhibitor_index) {
        Some(&inhibitor) => (1.0 - params.inhibition_strength * inhibitor).max(0.0),
        None => 1.0,
    }
}

/// Toxin concentration the diffusive kill rule compares against its
/// threshold, or `None` if the relevant reading is not attached.
pub fn toxin_reading(agent: &Agent, params: &SimParams) -> Option<f32> {
    let slots = match params.toxin_readout {
        ToxinReadout::Extracellular => &agent.signals,
        ToxinReadout::Intracellular => &agent.species,
    };
    slots.get(params.toxin_index).copied()
}
