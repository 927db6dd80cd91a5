//! Simulation modes built on the weighted sampler.
//!
//! Every mode is a pure function of a container, a currency book and (for
//! the stochastic ones) a caller-supplied random source.

use crate::sampler::CumulativeTable;
use crate::SimError;
use case_core::{Container, ContainerId, Currency, RewardDefinition, RewardId};
use case_econ::{total_cost, CurrencyBook};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Totals shared by every mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub container_id: ContainerId,
    /// Number of openings the totals cover.
    pub quantity: u64,
    pub total_cost: f64,
    pub total_value_gained: f64,
    /// `total_value_gained - total_cost`.
    pub result: f64,
}

impl SimulationResult {
    fn new(container: &Container, quantity: u64, value: f64, book: &CurrencyBook) -> Self {
        let cost = total_cost(container, quantity, book);
        Self {
            container_id: container.id.clone(),
            quantity,
            total_cost: cost,
            total_value_gained: value,
            result: value - cost,
        }
    }
}

/// Monte Carlo outcome with a tally of won rewards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RealisticResult {
    #[serde(flatten)]
    pub totals: SimulationResult,
    pub won_items: BTreeMap<RewardId, u64>,
}

/// Outcome of hunting the rarest reward.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UntilBestResult {
    /// Totals over `trials_used` openings.
    #[serde(flatten)]
    pub totals: SimulationResult,
    pub found: bool,
    pub trials_used: u64,
    pub target: RewardDefinition,
    pub max_attempts: u64,
}

/// Longest profit series one call will simulate.
pub const MAX_SERIES_TRIALS: u64 = 10_000_000;

/// One sample of the profit graph.
///
/// `value` is a percentage return when `is_percentage` is set, otherwise the
/// raw net value (containers whose cost so far is zero).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProfitPoint {
    pub trial_count: u64,
    pub value: f64,
    pub is_percentage: bool,
}

/// Distribution of net results over independent realistic runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnsembleStats {
    pub container_id: ContainerId,
    pub quantity: u64,
    pub runs: u32,
    pub mean_result: f64,
    pub std_dev_result: f64,
    pub min_result: f64,
    pub max_result: f64,
    pub percentile_10: f64,
    pub percentile_50: f64,
    pub percentile_90: f64,
    /// Share of runs that ended with a positive result.
    pub profitable_fraction: f64,
}

fn require_quantity(quantity: u64) -> Result<(), SimError> {
    if quantity == 0 {
        return Err(SimError::InvalidQuantity);
    }
    Ok(())
}

/// Expected value of `quantity` openings, without randomness.
///
/// Each reward with a positive value contributes `value * weight / total`.
pub fn theoretical(
    container: &Container,
    quantity: u64,
    book: &CurrencyBook,
) -> Result<SimulationResult, SimError> {
    require_quantity(quantity)?;
    let table = CumulativeTable::prepare(container)?;
    let total = table.total_weight();
    let per_trial: f64 = table
        .entries()
        .iter()
        .filter(|e| e.value > 0.0)
        .map(|e| e.value * e.reward.weight / total)
        .sum();
    Ok(SimulationResult::new(
        container,
        quantity,
        per_trial * quantity as f64,
        book,
    ))
}

/// Open the container `quantity` times and tally what was won.
pub fn realistic<R: Rng>(
    container: &Container,
    quantity: u64,
    book: &CurrencyBook,
    rng: &mut R,
) -> Result<RealisticResult, SimError> {
    require_quantity(quantity)?;
    let table = CumulativeTable::prepare(container)?;
    let mut value = 0.0;
    let mut won_items: BTreeMap<RewardId, u64> = BTreeMap::new();
    for _ in 0..quantity {
        let entry = table.draw(rng);
        value += entry.value;
        *won_items.entry(entry.reward.id.clone()).or_default() += 1;
    }
    Ok(RealisticResult {
        totals: SimulationResult::new(container, quantity, value, book),
        won_items,
    })
}

/// The reward with the strictly lowest weight; the first one on ties.
pub fn rarest(container: &Container) -> Option<&RewardDefinition> {
    let mut best: Option<&RewardDefinition> = None;
    for r in &container.rewards {
        if best.map_or(true, |b| r.weight < b.weight) {
            best = Some(r);
        }
    }
    best
}

/// Open until the rarest reward drops or `max_attempts` openings are spent.
///
/// Hitting the cap is a valid "not found" outcome, not an error.
pub fn until_best<R: Rng>(
    container: &Container,
    max_attempts: u64,
    book: &CurrencyBook,
    rng: &mut R,
) -> Result<UntilBestResult, SimError> {
    let table = CumulativeTable::prepare(container)?;
    let target = rarest(container).ok_or_else(|| SimError::EmptyContainer(container.id.clone()))?;
    let mut value = 0.0;
    let mut trials = 0u64;
    let mut found = false;
    while trials < max_attempts {
        trials += 1;
        let entry = table.draw(rng);
        value += entry.value;
        if entry.reward.id == target.id {
            found = true;
            break;
        }
    }
    if found {
        info!(container = %container.id, target = %target.id, trials, "rarest reward found");
    } else {
        warn!(container = %container.id, target = %target.id, max_attempts, "until-best cap exhausted");
    }
    Ok(UntilBestResult {
        totals: SimulationResult::new(container, trials, value, book),
        found,
        trials_used: trials,
        target: target.clone(),
        max_attempts,
    })
}

/// Run `max` openings and sample the running return every `step` openings
/// and at `max`.
///
/// Cooldown containers are paid in waiting time, so their points carry the
/// raw value gained, like free containers.
pub fn profit_series<R: Rng>(
    container: &Container,
    step: u64,
    max: u64,
    book: &CurrencyBook,
    rng: &mut R,
) -> Result<Vec<ProfitPoint>, SimError> {
    if step == 0 || max == 0 || max > MAX_SERIES_TRIALS {
        return Err(SimError::InvalidSeries { step, max });
    }
    let table = CumulativeTable::prepare(container)?;
    let mut points = Vec::with_capacity((max / step + 1) as usize);
    let mut value = 0.0;
    for trial in 1..=max {
        value += table.draw(rng).value;
        if trial % step == 0 || trial == max {
            let cost = match container.currency {
                Currency::Cooldown => 0.0,
                _ => total_cost(container, trial, book),
            };
            let point = if cost > 0.0 {
                ProfitPoint {
                    trial_count: trial,
                    value: (value - cost) / cost * 100.0,
                    is_percentage: true,
                }
            } else {
                ProfitPoint {
                    trial_count: trial,
                    value: value - cost,
                    is_percentage: false,
                }
            };
            points.push(point);
        }
    }
    Ok(points)
}

/// Run `runs` realistic simulations on independent ChaCha streams of `seed`.
pub fn realistic_ensemble(
    container: &Container,
    quantity: u64,
    runs: u32,
    seed: u64,
    book: &CurrencyBook,
) -> Result<EnsembleStats, SimError> {
    if runs == 0 {
        return Err(SimError::InvalidRuns);
    }
    let mut results = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(u64::from(run));
        results.push(realistic(container, quantity, book, &mut rng)?.totals.result);
    }
    results.sort_by(|a, b| a.total_cmp(b));

    let n = results.len() as f64;
    let mean = results.iter().sum::<f64>() / n;
    let variance = results.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let percentile = |p: f64| {
        let index = ((p / 100.0) * (n - 1.0)).round() as usize;
        results[index.min(results.len() - 1)]
    };
    let profitable = results.iter().filter(|r| **r > 0.0).count() as f64;

    let stats = EnsembleStats {
        container_id: container.id.clone(),
        quantity,
        runs,
        mean_result: mean,
        std_dev_result: variance.sqrt(),
        min_result: results[0],
        max_result: results[results.len() - 1],
        percentile_10: percentile(10.0),
        percentile_50: percentile(50.0),
        percentile_90: percentile(90.0),
        profitable_fraction: profitable / n,
    };
    info!(container = %container.id, runs, mean = stats.mean_result, "ensemble complete");
    Ok(stats)
}
