use crate::agent::{Agent, CellType};
use colony_common::{ColorConfig, ProducerState, SimulationConfig, SpeciesProfile, SpeciesTable};
use rand::distr::uniform::Error as UniformError;
use rand::distr::Uniform;
use rand::Rng;

const UNRECOGNIZED_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Per-state defaults keyed by `CellType`: base growth rate, display color
/// and target-volume distribution. All species-specific branching in the
/// engine goes through this table.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    table: SpeciesTable,
    palette: ColorConfig,
}

impl SpeciesCatalog {
    pub fn new(table: SpeciesTable, palette: ColorConfig) -> Self {
        Self { table, palette }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.species.clone(), config.color.clone())
    }

    /// Species profile for a live tag; `None` for dead and unrecognized.
    pub fn profile(&self, cell_type: CellType) -> Option<&SpeciesProfile> {
        match cell_type {
            CellType::Susceptible => Some(&self.table.susceptible),
            CellType::Producer(_) => Some(&self.table.producer),
            CellType::Dead | CellType::Unrecognized(_) => None,
        }
    }

    /// Default growth rate a fresh cell of this type starts with.
    pub fn base_growth_rate(&self, cell_type: CellType) -> f32 {
        self.profile(cell_type).map_or(0.0, |p| p.growth_rate)
    }

    pub fn base_color(&self, cell_type: CellType) -> [f32; 3] {
        match cell_type {
            CellType::Susceptible => self.table.susceptible.color,
            CellType::Producer(ProducerState::Silent) => self.table.producer.color,
            CellType::Producer(ProducerState::Partial) => self.palette.producer_partial,
            CellType::Producer(ProducerState::Active) => self.palette.producer_active,
            CellType::Dead => self.palette.dead,
            CellType::Unrecognized(_) => UNRECOGNIZED_COLOR,
        }
    }

    pub fn dead_color(&self) -> [f32; 3] {
        self.palette.dead
    }

    /// Draws `mean + U[0, jitter]` for the species. Dead and unrecognized
    /// cells never divide, so they get `None`.
    pub fn draw_target_volume<R: Rng + ?Sized>(
        &self,
        cell_type: CellType,
        rng: &mut R,
    ) -> Result<Option<f32>, UniformError> {
        let Some(profile) = self.profile(cell_type) else {
            return Ok(None);
        };
        let jitter = Uniform::new_inclusive(0.0f32, profile.target_volume_jitter)?;
        Ok(Some(profile.target_volume_mean + rng.sample(jitter)))
    }

    /// Resets an agent to the defaults of its current type, as done when a
    /// cell is first added to the colony.
    pub fn initialize<R: Rng + ?Sized>(&self, agent: &mut Agent, rng: &mut R) -> Result<(), UniformError> {
        agent.growth_rate = self.base_growth_rate(agent.cell_type);
        agent.color = self.base_color(agent.cell_type);
        if let Some(target) = self.draw_target_volume(agent.cell_type, rng)? {
            agent.target_volume = target;
        }
        agent.divide_flag = false;
        agent.dead_counter = 0;
        Ok(())
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::new(SpeciesTable::default(), ColorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn target_volume_stays_in_jitter_band() {
        let catalog = SpeciesCatalog::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = catalog.draw_target_volume(CellType::Susceptible, &mut rng).unwrap().unwrap();
            assert!((1.0..=1.15).contains(&v), "target volume {} out of band", v);
            let p = catalog
                .draw_target_volume(CellType::Producer(ProducerState::Silent), &mut rng)
                .unwrap()
                .unwrap();
            assert!((3.5..=4.0).contains(&p), "target volume {} out of band", p);
        }
    }

    #[test]
    fn zero_jitter_gives_the_mean() {
        let mut table = SpeciesTable::default();
        table.susceptible.target_volume_jitter = 0.0;
        let catalog = SpeciesCatalog::new(table, ColorConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let v = catalog.draw_target_volume(CellType::Susceptible, &mut rng).unwrap();
        assert_eq!(v, Some(1.0));
    }

    #[test]
    fn non_living_types_have_no_growth() {
        let catalog = SpeciesCatalog::default();
        assert_eq!(catalog.base_growth_rate(CellType::Dead), 0.0);
        assert_eq!(catalog.base_growth_rate(CellType::Unrecognized(42)), 0.0);
        assert_eq!(catalog.base_color(CellType::Dead), [0.6, 0.6, 0.6]);
    }

    #[test]
    fn producer_states_share_growth_but_not_color() {
        let catalog = SpeciesCatalog::default();
        let silent = CellType::Producer(ProducerState::Silent);
        let active = CellType::Producer(ProducerState::Active);
        assert_eq!(catalog.base_growth_rate(silent), catalog.base_growth_rate(active));
        assert_ne!(catalog.base_color(silent), catalog.base_color(active));
    }
}
