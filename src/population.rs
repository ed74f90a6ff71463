use crate::agent::{Agent, AgentKey, CellType};
use anyhow::Result;
use colony_common::{ProducerState, StateCounts};
use rayon::prelude::*;
use std::collections::HashMap;

/// Arena of agents addressed by stable keys.
///
/// Agents live in a dense vector so a tick can scan them in parallel;
/// `slots` maps each key to its current position. Structural changes
/// (insert, remove, split) are only made between scans.
#[derive(Debug, Default)]
pub struct Population {
    agents: Vec<Agent>,
    slots: HashMap<AgentKey, usize>,
    next_key: u64,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            agents: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            next_key: 0,
        }
    }

    /// Builds a population from agents that already carry keys, e.g. from an
    /// external setup routine. Keys must be unique.
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self> {
        let mut slots = HashMap::with_capacity(agents.len());
        let mut next_key = 0;
        for (idx, agent) in agents.iter().enumerate() {
            if slots.insert(agent.key, idx).is_some() {
                anyhow::bail!("Duplicate agent key {:?} in initial population.", agent.key);
            }
            next_key = next_key.max(agent.key.0 + 1);
        }
        Ok(Self { agents, slots, next_key })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn allocate_key(&mut self) -> AgentKey {
        let key = AgentKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// Ensures room for `required` agents without reallocating mid-tick.
    pub fn ensure_capacity(&mut self, required: usize) {
        if required > self.agents.capacity() {
            let new_capacity = (required as f32 * 1.2).ceil() as usize; // Grow by 20%
            log::info!(
                "Resizing population storage from {} to {} capacity.",
                self.agents.capacity(),
                new_capacity
            );
            self.agents.reserve(new_capacity - self.agents.len());
            self.slots.reserve(new_capacity - self.slots.len());
        }
    }

    /// Adds an agent, assigning it a fresh key (any key it carries is replaced).
    pub fn insert(&mut self, mut agent: Agent) -> AgentKey {
        let key = self.allocate_key();
        agent.key = key;
        self.slots.insert(key, self.agents.len());
        self.agents.push(agent);
        key
    }

    pub fn contains(&self, key: AgentKey) -> bool {
        self.slots.contains_key(&key)
    }

    pub fn get(&self, key: AgentKey) -> Option<&Agent> {
        self.slots.get(&key).map(|&idx| &self.agents[idx])
    }

    pub fn get_mut(&mut self, key: AgentKey) -> Option<&mut Agent> {
        match self.slots.get(&key) {
            Some(&idx) => Some(&mut self.agents[idx]),
            None => None,
        }
    }

    /// Mutable access to agent fields. The slice cannot change length, so
    /// keys stay valid.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn par_iter_mut(&mut self) -> rayon::slice::IterMut<'_, Agent> {
        self.agents.par_iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = AgentKey> + '_ {
        self.agents.iter().map(|a| a.key)
    }

    /// Removes every listed agent. Unknown keys are ignored. Returns the
    /// number actually removed.
    pub fn remove_batch(&mut self, keys: &[AgentKey]) -> usize {
        if keys.is_empty() {
            return 0;
        }
        let before = self.agents.len();
        let doomed: std::collections::HashSet<AgentKey> = keys.iter().copied().collect();
        self.agents.retain(|a| !doomed.contains(&a.key));
        self.reindex();
        before - self.agents.len()
    }

    /// Replaces `parent` by two daughters in one step: either both
    /// daughters are inserted and the parent is gone, or nothing changes.
    pub fn apply_division(&mut self, parent: AgentKey, daughters: [Agent; 2]) -> Option<[AgentKey; 2]> {
        let idx = *self.slots.get(&parent)?;
        self.agents.swap_remove(idx);
        self.slots.remove(&parent);
        if let Some(moved) = self.agents.get(idx) {
            self.slots.insert(moved.key, idx);
        }
        let [first, second] = daughters;
        Some([self.insert(first), self.insert(second)])
    }

    fn reindex(&mut self) {
        self.slots.clear();
        for (idx, agent) in self.agents.iter().enumerate() {
            self.slots.insert(agent.key, idx);
        }
    }

    /// Number of agents per lifecycle state.
    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for agent in &self.agents {
            match agent.cell_type {
                CellType::Susceptible => counts.susceptible += 1,
                CellType::Producer(ProducerState::Silent) => counts.producer_silent += 1,
                CellType::Producer(ProducerState::Partial) => counts.producer_partial += 1,
                CellType::Producer(ProducerState::Active) => counts.producer_active += 1,
                CellType::Dead => counts.dead += 1,
                CellType::Unrecognized(_) => counts.unrecognized += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::Body;
    use colony_common::Vec3;

    pub(crate) fn agent_at(x: f32, y: f32, cell_type: CellType) -> Agent {
        Agent {
            key: AgentKey(u64::MAX),
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

    #[test]
    fn keys_are_never_reused() {
        let mut pop = Population::new();
        let a = pop.insert(agent_at(0.0, 0.0, CellType::Susceptible));
        let b = pop.insert(agent_at(1.0, 0.0, CellType::Susceptible));
        assert_eq!(pop.remove_batch(&[a]), 1);
        let c = pop.insert(agent_at(2.0, 0.0, CellType::Susceptible));
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert!(pop.get(a).is_none());
        assert_eq!(pop.get(b).unwrap().body.position.x, 1.0);
        assert_eq!(pop.get(c).unwrap().body.position.x, 2.0);
    }

    #[test]
    fn remove_batch_ignores_unknown_keys() {
        let mut pop = Population::new();
        let a = pop.insert(agent_at(0.0, 0.0, CellType::Dead));
        assert_eq!(pop.remove_batch(&[AgentKey(999)]), 0);
        assert_eq!(pop.len(), 1);
        assert!(pop.contains(a));
    }

    #[test]
    fn apply_division_replaces_parent_and_keeps_lookup_consistent() {
        let mut pop = Population::new();
        let first = pop.insert(agent_at(0.0, 0.0, CellType::Susceptible));
        let parent = pop.insert(agent_at(5.0, 0.0, CellType::Susceptible));
        let last = pop.insert(agent_at(9.0, 0.0, CellType::Susceptible));

        let daughters = [agent_at(4.5, 0.0, CellType::Susceptible), agent_at(5.5, 0.0, CellType::Susceptible)];
        let [d1, d2] = pop.apply_division(parent, daughters).unwrap();

        assert_eq!(pop.len(), 4);
        assert!(!pop.contains(parent));
        assert_eq!(pop.get(first).unwrap().body.position.x, 0.0);
        assert_eq!(pop.get(last).unwrap().body.position.x, 9.0);
        assert_eq!(pop.get(d1).unwrap().body.position.x, 4.5);
        assert_eq!(pop.get(d2).unwrap().body.position.x, 5.5);
    }

    #[test]
    fn apply_division_of_missing_parent_changes_nothing() {
        let mut pop = Population::new();
        pop.insert(agent_at(0.0, 0.0, CellType::Susceptible));
        let daughters = [agent_at(1.0, 0.0, CellType::Susceptible), agent_at(2.0, 0.0, CellType::Susceptible)];
        assert!(pop.apply_division(AgentKey(77), daughters).is_none());
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn from_agents_rejects_duplicate_keys() {
        let mut a = agent_at(0.0, 0.0, CellType::Susceptible);
        a.key = AgentKey(3);
        let mut b = agent_at(1.0, 0.0, CellType::Susceptible);
        b.key = AgentKey(3);
        assert!(Population::from_agents(vec![a.clone(), b]).is_err());

        let mut pop = Population::from_agents(vec![a]).unwrap();
        let fresh = pop.insert(agent_at(2.0, 0.0, CellType::Susceptible));
        assert_eq!(fresh, AgentKey(4));
    }

    #[test]
    fn counts_cover_every_state() {
        let mut pop = Population::new();
        pop.insert(agent_at(0.0, 0.0, CellType::Susceptible));
        pop.insert(agent_at(0.0, 0.0, CellType::Producer(ProducerState::Silent)));
        pop.insert(agent_at(0.0, 0.0, CellType::Producer(ProducerState::Partial)));
        pop.insert(agent_at(0.0, 0.0, CellType::Producer(ProducerState::Active)));
        pop.insert(agent_at(0.0, 0.0, CellType::Dead));
        pop.insert(agent_at(0.0, 0.0, CellType::Unrecognized(8)));
        let counts = pop.counts();
        assert_eq!(counts.producers(), 3);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.unrecognized, 1);
    }
}
