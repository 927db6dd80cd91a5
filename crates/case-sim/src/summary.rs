//! Derived figures for any simulation result.

use crate::modes::SimulationResult;
use serde::Serialize;

/// Sign of the net result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Profit,
    Loss,
    BreakEven,
}

/// Return on cost as a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum PercentReturn {
    Finite(f64),
    /// Nothing was spent, so the return has no finite percentage.
    Unbounded,
}

impl PercentReturn {
    pub fn as_finite(&self) -> Option<f64> {
        match *self {
            PercentReturn::Finite(v) => Some(v),
            PercentReturn::Unbounded => None,
        }
    }
}

/// Renderer-facing totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_cost: f64,
    pub total_value_gained: f64,
    pub result: f64,
    /// Openings the per-trial figure is divided by.
    pub quantity: u64,
    pub outcome: Outcome,
    pub per_trial: f64,
    pub percent_return: PercentReturn,
}

/// Summarize a result, optionally over a different trial count than the one
/// the result recorded.
pub fn summarize(r: &SimulationResult, trials_override: Option<u64>) -> Summary {
    let quantity = trials_override.unwrap_or(r.quantity);
    let outcome = if r.result > 0.0 {
        Outcome::Profit
    } else if r.result < 0.0 {
        Outcome::Loss
    } else {
        Outcome::BreakEven
    };
    let per_trial = if quantity > 0 {
        r.result / quantity as f64
    } else {
        0.0
    };
    let percent_return = if r.total_cost > 0.0 {
        PercentReturn::Finite(r.result / r.total_cost * 100.0)
    } else {
        PercentReturn::Unbounded
    };
    Summary {
        total_cost: r.total_cost,
        total_value_gained: r.total_value_gained,
        result: r.result,
        quantity,
        outcome,
        per_trial,
        percent_return,
    }
}

impl SimulationResult {
    pub fn summary(&self) -> Summary {
        summarize(self, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_core::ContainerId;

    fn result(cost: f64, value: f64, quantity: u64) -> SimulationResult {
        SimulationResult {
            container_id: ContainerId("c".to_string()),
            quantity,
            total_cost: cost,
            total_value_gained: value,
            result: value - cost,
        }
    }

    #[test]
    fn loss_summary() {
        let s = result(2_000.0, 620.0, 10).summary();
        assert_eq!(s.outcome, Outcome::Loss);
        assert_eq!(s.per_trial, -138.0);
        let pct = s.percent_return.as_finite().unwrap();
        assert!((pct + 69.0).abs() < 1e-9);
    }

    #[test]
    fn profit_and_break_even() {
        assert_eq!(result(100.0, 150.0, 1).summary().outcome, Outcome::Profit);
        assert_eq!(
            result(100.0, 100.0, 1).summary().outcome,
            Outcome::BreakEven
        );
    }

    #[test]
    fn free_containers_have_unbounded_return() {
        let s = result(0.0, 50.0, 5).summary();
        assert_eq!(s.percent_return, PercentReturn::Unbounded);
        assert_eq!(s.percent_return.as_finite(), None);
        assert_eq!(s.per_trial, 10.0);
    }

    #[test]
    fn trial_override_drives_per_trial() {
        let r = result(1_000.0, 0.0, 10);
        let s = summarize(&r, Some(40));
        assert_eq!(s.quantity, 40);
        assert_eq!(s.per_trial, -25.0);
        assert_eq!(summarize(&r, Some(0)).per_trial, 0.0);
    }
}
