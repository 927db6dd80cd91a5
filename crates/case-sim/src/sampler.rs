//! Weighted reward sampling over a cumulative weight table.

use crate::SimError;
use case_core::{Container, RewardDefinition, RewardId};
use case_econ::estimate;
use rand::Rng;

/// A reward paired with the running weight up to and including it.
#[derive(Clone, Copy, Debug)]
pub struct CumulativeEntry<'a> {
    pub reward: &'a RewardDefinition,
    pub cumulative: f64,
    /// Point estimate of the reward's value, parsed once per table.
    pub value: f64,
}

/// Inverse-CDF table built once per simulation call.
#[derive(Clone, Debug)]
pub struct CumulativeTable<'a> {
    entries: Vec<CumulativeEntry<'a>>,
    total_weight: f64,
    /// Index of the last positive-weight entry.
    last_positive: usize,
}

impl<'a> CumulativeTable<'a> {
    /// Accumulate weights in list order.
    ///
    /// Containers without rewards or with a non-positive total weight cannot
    /// be sampled and are rejected rather than normalized against a
    /// substitute total.
    pub fn prepare(container: &'a Container) -> Result<Self, SimError> {
        if container.rewards.is_empty() {
            return Err(SimError::EmptyContainer(container.id.clone()));
        }
        let mut running = 0.0;
        let mut last_positive = None;
        let mut entries = Vec::with_capacity(container.rewards.len());
        for (i, reward) in container.rewards.iter().enumerate() {
            running += reward.weight;
            if reward.weight > 0.0 {
                last_positive = Some(i);
            }
            entries.push(CumulativeEntry {
                reward,
                cumulative: running,
                value: estimate(&reward.value),
            });
        }
        match last_positive {
            Some(last_positive) if running.is_finite() && running > 0.0 => Ok(Self {
                entries,
                total_weight: running,
                last_positive,
            }),
            _ => Err(SimError::DegenerateWeights(container.id.clone())),
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn entries(&self) -> &[CumulativeEntry<'a>] {
        &self.entries
    }

    /// Draw one reward with a uniform roll in `[0, total_weight)`.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &CumulativeEntry<'a> {
        let roll = rng.gen::<f64>() * self.total_weight;
        self.pick(roll)
    }

    /// First reward, in list order, whose cumulative weight reaches `roll`.
    ///
    /// Zero-weight rewards are never selected, even for a roll of exactly 0.
    pub fn pick(&self, roll: f64) -> &CumulativeEntry<'a> {
        let mut idx = self.entries.partition_point(|e| e.cumulative < roll);
        while idx < self.entries.len() && self.entries[idx].reward.weight <= 0.0 {
            idx += 1;
        }
        match self.entries.get(idx) {
            Some(entry) => entry,
            None => &self.entries[self.last_positive],
        }
    }

    /// Normalized chance of each reward, in list order.
    pub fn probabilities(&self) -> Vec<(&'a RewardId, f64)> {
        self.entries
            .iter()
            .map(|e| (&e.reward.id, e.reward.weight / self.total_weight))
            .collect()
    }
}
