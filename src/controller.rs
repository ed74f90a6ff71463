use crate::agent::{AgentKey, CellType};
use crate::grid::HazardGrid;
use crate::lifecycle::{evaluate, KillCause, Outcome, TickContext};
use crate::population::Population;
use crate::quorum::QuorumState;
use crate::species::SpeciesCatalog;
use anyhow::Result;
use colony_common::{PopulationSnapshot, SimParams, SimulationConfig, StateCounts};
use log::{debug, info, warn};
use rayon::prelude::*;

/// Run-wide mutable state threaded through every tick.
#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    /// Number of completed ticks.
    pub tick: u64,
    pub quorum: QuorumState,
}

impl SimulationContext {
    pub fn new(quorum: QuorumState) -> Self {
        Self { tick: 0, quorum }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(QuorumState::from_config(&config.quorum))
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    /// Counts before any rule ran.
    pub pre_tick: StateCounts,
    pub crowding: f32,
    /// Quorum channels that fired this tick.
    pub fired_channels: Vec<usize>,
    pub killed_by_toxin: u32,
    pub killed_by_contact: u32,
    pub removed: Vec<AgentKey>,
}

impl TickReport {
    pub fn killed(&self) -> u32 {
        self.killed_by_toxin + self.killed_by_contact
    }
}

/// Orchestrates one discrete tick over the whole population.
#[derive(Debug, Clone)]
pub struct PopulationController {
    params: SimParams,
    catalog: SpeciesCatalog,
}

impl PopulationController {
    pub fn new(params: SimParams, catalog: SpeciesCatalog) -> Self {
        Self { params, catalog }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Ok(Self::new(config.sim_params()?, SpeciesCatalog::from_config(config)))
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Advances `population` by one tick.
    ///
    /// Aggregates are taken from the pre-tick population, quorum channels
    /// are latched and applied, every agent is evaluated against the same
    /// snapshot, and aged-out dead agents are removed last.
    pub fn step(&self, population: &mut Population, ctx: &mut SimulationContext) -> Result<TickReport> {
        let params = &self.params;
        if let Some(gate) = params.inhibition_gate {
            if gate >= ctx.quorum.flags().len() {
                anyhow::bail!(
                    "Inhibition is gated on quorum channel {} but only {} channels are configured.",
                    gate,
                    ctx.quorum.flags().len()
                );
            }
        }

        let tick = ctx.tick + 1;

        // 1. Aggregates from the pre-tick population, dead agents included
        let pre_tick = population.counts();
        let crowding = params.crowding_factor(population.len());

        // 2. Quorum sensing
        let fired_channels = ctx.quorum.update(population, pre_tick.producers(), tick);

        // 3. Hazard index
        let hazards = if params.contact_killing {
            Some(HazardGrid::build(population.iter(), params.grid_cell_size))
        } else {
            None
        };

        // 4. Lifecycle rules, agent-local so the scan may run in parallel
        let tick_ctx = TickContext {
            params,
            catalog: &self.catalog,
            crowding,
            quorum_flags: ctx.quorum.flags(),
            hazards: hazards.as_ref(),
        };
        let outcomes: Vec<(AgentKey, Outcome)> = population
            .par_iter_mut()
            .map(|agent| (agent.key, evaluate(agent, &tick_ctx)))
            .collect();

        let mut report = TickReport { tick, pre_tick, crowding, fired_channels, ..Default::default() };
        for &(key, outcome) in &outcomes {
            match outcome {
                Outcome::Killed(KillCause::Toxin) => report.killed_by_toxin += 1,
                Outcome::Killed(KillCause::Contact) => report.killed_by_contact += 1,
                Outcome::Expired => report.removed.push(key),
                Outcome::Grown | Outcome::Aging | Outcome::Inert => {}
            }
        }

        // 5. Removals, only after every agent has been evaluated
        let removed = population.remove_batch(&report.removed);
        if removed > 0 {
            debug!("Tick {}: removed {} expired dead agents.", tick, removed);
        }

        ctx.tick = tick;

        // 6. Diagnostics
        if params.report_interval > 0 && tick % params.report_interval as u64 == 0 {
            self.log_counts(population, ctx);
        }

        Ok(report)
    }

    fn log_counts(&self, population: &Population, ctx: &SimulationContext) {
        let counts = population.counts();
        info!(
            "Tick [{}] | Susceptible: {} | Producers (silent/partial/active): {}/{}/{} | Dead: {} | Total: {} | QS: {:?}",
            ctx.tick,
            counts.susceptible,
            counts.producer_silent,
            counts.producer_partial,
            counts.producer_active,
            counts.dead,
            counts.total(),
            ctx.quorum.flags()
        );
        if counts.unrecognized > 0 {
            warn!(
                "Tick [{}] | {} agents carry an unrecognized cell type and are kept inert.",
                ctx.tick, counts.unrecognized
            );
        }
    }

    /// Aggregate diagnostics of the population after the last tick.
    pub fn snapshot(&self, population: &Population, ctx: &SimulationContext, removed_this_tick: u32) -> PopulationSnapshot {
        let mut max_toxin = 0.0f32;
        let mut max_inhibitor = 0.0f32;
        for agent in population.iter().filter(|a| a.cell_type == CellType::Susceptible) {
            max_toxin = max_toxin.max(agent.signal(self.params.toxin_index));
            max_inhibitor = max_inhibitor.max(agent.signal(self.params.inhibitor_index));
        }
        PopulationSnapshot {
            tick: ctx.tick,
            time: ctx.tick as f32 * self.params.dt,
            counts: population.counts(),
            removed_this_tick,
            quorum_flags: ctx.quorum.flags().to_vec(),
            max_susceptible_toxin: max_toxin,
            max_susceptible_inhibitor: max_inhibitor,
        }
    }
}
