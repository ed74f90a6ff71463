use crate::agent::{Agent, AgentKey, Body, CellType};
use crate::population::Population;
use crate::species::SpeciesCatalog;
use log::{debug, warn};
use rand::distr::uniform;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DivisionError {
    #[error("Agent {0:?} is not in the population")]
    UnknownParent(AgentKey),

    #[error("Agent {0:?} is dead and cannot divide")]
    DeadParent(AgentKey),

    #[error("Agent {key:?} has cell type code {code}, which cannot divide")]
    IneligibleParent { key: AgentKey, code: u8 },

    #[error("Invalid target volume distribution: {0}")]
    Distribution(#[from] uniform::Error),
}

/// Builds the two daughters of `parent` from the bodies the mechanics
/// engine produced.
///
/// Daughters keep the parent's cell type and chemical state. Growth rate
/// and color go back to the type defaults, each daughter draws its own
/// target volume, and the divide flag and dead counter are cleared.
pub fn daughters<R: Rng + ?Sized>(
    parent: &Agent,
    bodies: [Body; 2],
    catalog: &SpeciesCatalog,
    rng: &mut R,
) -> Result<[Agent; 2], DivisionError> {
    match parent.cell_type {
        CellType::Dead => return Err(DivisionError::DeadParent(parent.key)),
        CellType::Unrecognized(code) => {
            return Err(DivisionError::IneligibleParent { key: parent.key, code })
        }
        CellType::Susceptible | CellType::Producer(_) => {}
    }

    let [first, second] = bodies;
    Ok([daughter(parent, first, catalog, rng)?, daughter(parent, second, catalog, rng)?])
}

fn daughter<R: Rng + ?Sized>(
    parent: &Agent,
    body: Body,
    catalog: &SpeciesCatalog,
    rng: &mut R,
) -> Result<Agent, DivisionError> {
    let cell_type = parent.cell_type;
    let target_volume = catalog
        .draw_target_volume(cell_type, rng)?
        .ok_or(DivisionError::IneligibleParent { key: parent.key, code: cell_type.code() })?;
    Ok(Agent {
        key: parent.key, // replaced on insertion
        body,
        cell_type,
        growth_rate: catalog.base_growth_rate(cell_type),
        target_volume,
        divide_flag: false,
        color: catalog.base_color(cell_type),
        dead_counter: 0,
        species: parent.species.clone(),
        signals: parent.signals.clone(),
    })
}

/// Replaces the agent `key` by two daughters with the given bodies.
///
/// On error the population is left untouched: either both daughters are
/// inserted and the parent removed, or nothing changes.
pub fn divide<R: Rng + ?Sized>(
    population: &mut Population,
    key: AgentKey,
    bodies: [Body; 2],
    catalog: &SpeciesCatalog,
    rng: &mut R,
) -> Result<[AgentKey; 2], DivisionError> {
    let parent = population.get(key).ok_or(DivisionError::UnknownParent(key))?;
    let pair = match daughters(parent, bodies, catalog, rng) {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Refusing to divide agent {:?}: {}", key, e);
            return Err(e);
        }
    };
    let keys = population.apply_division(key, pair).ok_or(DivisionError::UnknownParent(key))?;
    debug!("Agent {:?} divided into {:?} and {:?}.", key, keys[0], keys[1]);
    Ok(keys)
}
