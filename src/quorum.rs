use crate::agent::CellType;
use crate::population::Population;
use colony_common::{ProducerState, QuorumChannelConfig, QuorumConfig};
use log::info;

/// Quorum-sensing channels and their latched flags.
///
/// A flag starts false and flips to true the first tick the live producer
/// count reaches the channel threshold. It is never reset.
#[derive(Debug, Clone, Default)]
pub struct QuorumState {
    channels: Vec<QuorumChannelConfig>,
    flags: Vec<bool>,
}

impl QuorumState {
    pub fn new(channels: Vec<QuorumChannelConfig>) -> Self {
        let flags = vec![false; channels.len()];
        Self { channels, flags }
    }

    pub fn from_config(config: &QuorumConfig) -> Self {
        Self::new(config.channels.clone())
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Latches every enabled channel whose threshold `producer_count` meets.
    /// Returns the indices that flipped on this call.
    pub fn evaluate(&mut self, producer_count: u32) -> Vec<usize> {
        let mut fired = Vec::new();
        for (idx, channel) in self.channels.iter().enumerate() {
            if !channel.enabled || self.flags[idx] {
                continue;
            }
            if producer_count >= channel.threshold {
                self.flags[idx] = true;
                fired.push(idx);
            }
        }
        fired
    }

    /// Evaluates the channels and promotes producers for each one that just
    /// fired. Returns the indices that fired.
    pub fn update(&mut self, population: &mut Population, producer_count: u32, tick: u64) -> Vec<usize> {
        let fired = self.evaluate(producer_count);
        for &idx in &fired {
            let channel = &self.channels[idx];
            let promoted = promote(population, channel.promotes_to);
            info!(
                "Tick {}: quorum channel '{}' active ({} producers >= {}); promoted {} producers to {:?}.",
                tick, channel.name, producer_count, channel.threshold, promoted, channel.promotes_to
            );
        }
        fired
    }
}

/// Moves every live producer below `target` up to `target`. Producers
/// already at or above it are left alone. Returns the number promoted.
pub fn promote(population: &mut Population, target: ProducerState) -> usize {
    let mut promoted = 0;
    for agent in population.agents_mut() {
        if let CellType::Producer(state) = agent.cell_type {
            if state < target {
                agent.cell_type = CellType::Producer(target);
                promoted += 1;
            }
        }
    }
    promoted
}
