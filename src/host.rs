//! Minimal stand-ins for the collaborators that drive the update engine:
//! rod mechanics, the signal solver and initial seeding. They exist so a
//! scenario can run end to end; none of them models physics faithfully.

use crate::agent::{Agent, AgentKey, Body, CellType};
use crate::division::{divide, DivisionError};
use crate::population::Population;
use crate::reactions::{RateInput, RateKernel};
use crate::species::SpeciesCatalog;
use anyhow::Result;
use colony_common::{planar_direction, ProducerState, ReactionsConfig, SimulationConfig, Vec3};
use log::{debug, warn};
use rand::distr::Uniform;
use rand::{Rng, RngCore};
use rayon::prelude::*;

/// Moves and elongates cells, and splits the ones that asked to divide.
pub trait Mechanics {
    /// Advances geometry by `dt` and performs flagged divisions. Returns the
    /// number of divisions carried out.
    fn advance(
        &mut self,
        population: &mut Population,
        catalog: &SpeciesCatalog,
        dt: f32,
        rng: &mut dyn RngCore,
    ) -> Result<usize>;
}

/// Integrates the registered rate kernel and refreshes each agent's
/// `signals` snapshot.
pub trait SignalSolver {
    fn integrate(&mut self, population: &mut Population, kernel: &dyn RateKernel, dt: f32) -> Result<()>;
}

/// Exponential elongation along the rod axis with no collision handling.
#[derive(Debug, Clone)]
pub struct KinematicGrowth {
    max_cells: usize,
}

impl KinematicGrowth {
    pub fn new(max_cells: usize) -> Self {
        Self { max_cells }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.population.max_cells as usize)
    }

    /// Two half-length rods placed end to end along the parent's axis.
    pub fn split_body(body: &Body) -> [Body; 2] {
        let axis = body.direction.normalize_or_x();
        let half = body.length * 0.5;
        let offset = axis * (half * 0.5);
        [
            Body::new(body.position - offset, axis, half, body.radius),
            Body::new(body.position + offset, axis, half, body.radius),
        ]
    }
}

impl Mechanics for KinematicGrowth {
    fn advance(
        &mut self,
        population: &mut Population,
        catalog: &SpeciesCatalog,
        dt: f32,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        population.par_iter_mut().for_each(|agent| {
            if agent.growth_rate > 0.0 {
                agent.body.length *= (agent.growth_rate * dt).exp();
                agent.body.volume = agent.body.length;
            }
        });

        let parents: Vec<AgentKey> = population
            .iter()
            .filter(|a| a.divide_flag && !a.is_dead())
            .map(|a| a.key)
            .collect();
        if parents.is_empty() {
            return Ok(0);
        }
        population.ensure_capacity((population.len() + parents.len()).min(self.max_cells));

        let mut divided = 0;
        for key in parents {
            if population.len() >= self.max_cells {
                debug!("Population cap of {} reached; deferring remaining divisions.", self.max_cells);
                break;
            }
            let Some(parent) = population.get(key) else { continue };
            let bodies = Self::split_body(&parent.body);
            match divide(population, key, bodies, catalog, rng) {
                Ok(_) => divided += 1,
                Err(DivisionError::Distribution(e)) => return Err(e.into()),
                Err(_) => {} // already logged, population untouched
            }
        }
        Ok(divided)
    }
}

/// One well-mixed extracellular compartment per signal channel.
///
/// Every agent sees the same bulk concentration. Each sub-step integrates
/// the kernel with forward Euler: intracellular pools per agent, and the
/// bulk from the sum of all agents' extracellular rates spread over the
/// medium volume. Agent contributions are summed in population order so a
/// run is reproducible.
#[derive(Debug, Clone)]
pub struct WellMixedMedium {
    bulk: Vec<f32>,
    area_factor: f32,
    medium_cells: f32,
    substeps: u32,
}

impl WellMixedMedium {
    pub fn new(area_factor: f32, medium_cells: f32, substeps: u32) -> Self {
        Self { bulk: Vec::new(), area_factor, medium_cells, substeps: substeps.max(1) }
    }

    pub fn from_config(reactions: &ReactionsConfig) -> Self {
        Self::new(reactions.area_factor, reactions.medium_cells, reactions.substeps)
    }

    pub fn bulk(&self) -> &[f32] {
        &self.bulk
    }

    fn attach(&mut self, population: &mut Population, kernel: &dyn RateKernel) {
        let n_species = kernel.species_count();
        let n_signals = kernel.signal_count();
        self.bulk.resize(n_signals, 0.0);
        let bulk = &self.bulk;
        population.par_iter_mut().for_each(|agent| {
            agent.species.resize(n_species, 0.0);
            agent.signals.clear();
            agent.signals.extend_from_slice(bulk);
        });
    }
}

impl SignalSolver for WellMixedMedium {
    fn integrate(&mut self, population: &mut Population, kernel: &dyn RateKernel, dt: f32) -> Result<()> {
        self.attach(population, kernel);
        if dt <= 0.0 || population.is_empty() {
            return Ok(());
        }
        let h = dt / self.substeps as f32;
        let area_factor = self.area_factor;

        for _ in 0..self.substeps {
            let contributions: Vec<Vec<f32>> = population
                .par_iter_mut()
                .map(|agent| {
                    let input = RateInput {
                        cell_type: agent.cell_type,
                        species: &agent.species,
                        signals: &agent.signals,
                        area_factor,
                    };
                    let mut intra = vec![0.0; kernel.species_count()];
                    let mut extra = vec![0.0; kernel.signal_count()];
                    kernel.intracellular_rates(&input, &mut intra);
                    kernel.extracellular_rates(&input, &mut extra);
                    for (level, rate) in agent.species.iter_mut().zip(&intra) {
                        *level = (*level + h * rate).max(0.0);
                    }
                    extra
                })
                .collect();

            let mut totals = vec![0.0f32; self.bulk.len()];
            for extra in &contributions {
                for (total, rate) in totals.iter_mut().zip(extra) {
                    *total += rate;
                }
            }
            for (level, total) in self.bulk.iter_mut().zip(&totals) {
                *level = (*level + h * total / self.medium_cells).max(0.0);
            }
            if self.bulk.iter().any(|v| !v.is_finite()) {
                anyhow::bail!("Signal concentrations diverged; reduce timing.dt or raise reactions.substeps.");
            }
            let bulk = &self.bulk;
            population.par_iter_mut().for_each(|agent| {
                agent.signals.clear();
                agent.signals.extend_from_slice(bulk);
            });
        }
        Ok(())
    }
}

/// Places the initial colony: susceptible cells uniformly in
/// `[-spread, spread]^2`, producers in half that square, each with a random
/// in-plane direction and its type defaults.
pub fn seed_population<R: Rng + ?Sized>(config: &SimulationConfig, catalog: &SpeciesCatalog, rng: &mut R) -> Result<Population> {
    let seeding = &config.seeding;
    if !(seeding.spread > 0.0) {
        anyhow::bail!("seeding.spread must be positive.");
    }
    let total = (seeding.susceptible_count + seeding.producer_count) as usize;
    let mut population = Population::with_capacity(total);

    let groups = [
        (CellType::Susceptible, seeding.susceptible_count, seeding.spread),
        (CellType::Producer(seeding.initial_producer_state), seeding.producer_count, seeding.spread * 0.5),
    ];
    let unit = Uniform::new_inclusive(-1.0f32, 1.0)?;
    let angle_dist = Uniform::new(0.0f32, 2.0 * std::f32::consts::PI)?;
    for (cell_type, count, spread) in groups {
        for _ in 0..count {
            let position = Vec3::new(rng.sample(unit) * spread, rng.sample(unit) * spread, 0.0);
            let direction = planar_direction(rng.sample(angle_dist));
            let length = catalog.profile(cell_type).map_or(1.0, |p| p.target_volume_mean * 0.5);
            let mut agent = Agent {
                key: AgentKey(0),
                body: Body::new(position, direction, length, 0.5),
                cell_type,
                growth_rate: 0.0,
                target_volume: 0.0,
                divide_flag: false,
                color: [0.0; 3],
                dead_counter: 0,
                species: Vec::new(),
                signals: Vec::new(),
            };
            catalog.initialize(&mut agent, rng)?;
            population.insert(agent);
        }
    }
    if seeding.initial_producer_state != ProducerState::Active && config.quorum.channels.is_empty() {
        warn!(
            "Producers start {:?} and no quorum channel is configured; they will never secrete toxin.",
            seeding.initial_producer_state
        );
    }
    Ok(population)
}
