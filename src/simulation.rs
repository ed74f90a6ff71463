use crate::controller::{PopulationController, SimulationContext, TickReport};
use crate::host::{seed_population, KinematicGrowth, Mechanics, SignalSolver, WellMixedMedium};
use crate::population::Population;
use crate::reactions::{RateKernel, ToxinInhibitorKinetics};
use anyhow::Result;
use colony_common::{PopulationSnapshot, SimParams, SimulationConfig};
use log::{debug, info};
use rand::prelude::*;

/// Host loop around the population controller: one tick runs the
/// controller, then the mechanics, then the signal solver.
pub struct ColonySimulation {
    config: SimulationConfig,
    controller: PopulationController,
    context: SimulationContext,
    population: Population,
    mechanics: Box<dyn Mechanics>,
    solver: Box<dyn SignalSolver>,
    kernel: Box<dyn RateKernel>,
    rng: StdRng,
    last_report: TickReport,
    recorded_snapshots: Vec<PopulationSnapshot>,
}

impl ColonySimulation {
    /// Seeds the colony from the configuration and wires up the stand-in
    /// mechanics and solver.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let controller = PopulationController::from_config(&config)?;

        // The seed for this RNG is taken from the seeding section in the config.
        let mut rng = StdRng::seed_from_u64(config.seeding.seed);
        let population = seed_population(&config, controller.catalog(), &mut rng)?;
        info!(
            "Seeded {} agents ({} susceptible, {} producers).",
            population.len(),
            config.seeding.susceptible_count,
            config.seeding.producer_count
        );

        let mechanics = Box::new(KinematicGrowth::from_config(&config));
        let solver = Box::new(WellMixedMedium::from_config(&config.reactions));
        let kernel = Box::new(ToxinInhibitorKinetics::from_config(&config));
        Self::with_parts(config, population, mechanics, solver, kernel, rng)
    }

    /// Builds a simulation around an existing population and collaborators.
    pub fn with_parts(
        config: SimulationConfig,
        mut population: Population,
        mechanics: Box<dyn Mechanics>,
        mut solver: Box<dyn SignalSolver>,
        kernel: Box<dyn RateKernel>,
        rng: StdRng,
    ) -> Result<Self> {
        let controller = PopulationController::from_config(&config)?;
        let context = SimulationContext::from_config(&config);
        // Attach signal slots so the first tick sees zero concentrations.
        solver.integrate(&mut population, kernel.as_ref(), 0.0)?;
        Ok(Self {
            config,
            controller,
            context,
            population,
            mechanics,
            solver,
            kernel,
            rng,
            last_report: TickReport::default(),
            recorded_snapshots: Vec::new(),
        })
    }

    /// Runs one full tick.
    pub fn step(&mut self) -> Result<&TickReport> {
        let report = self.controller.step(&mut self.population, &mut self.context)?;
        if report.killed() > 0 {
            debug!(
                "Tick {}: {} killed by toxin, {} by contact.",
                report.tick, report.killed_by_toxin, report.killed_by_contact
            );
        }

        let dt = self.controller.params().dt;
        let divided = self.mechanics.advance(&mut self.population, self.controller.catalog(), dt, &mut self.rng)?;
        if divided > 0 {
            debug!("Tick {}: {} divisions.", report.tick, divided);
        }
        self.solver.integrate(&mut self.population, self.kernel.as_ref(), dt)?;

        self.last_report = report;
        Ok(&self.last_report)
    }

    /// Stores aggregate diagnostics for the current tick.
    pub fn record_snapshot(&mut self) -> Result<()> {
        let removed = self.last_report.removed.len() as u32;
        let snapshot = self.controller.snapshot(&self.population, &self.context, removed);
        debug!("Recording snapshot at tick {} ({:.2} time units)...", snapshot.tick, snapshot.time);
        self.recorded_snapshots.push(snapshot);
        Ok(())
    }

    pub fn get_recorded_snapshots(&self) -> &Vec<PopulationSnapshot> {
        &self.recorded_snapshots
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn current_agent_count(&self) -> usize {
        self.population.len()
    }

    pub fn params(&self) -> &SimParams {
        self.controller.params()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
