#![deny(warnings)]

//! Probabilistic valuation engine for containers ("cases").
//!
//! Builds a cumulative weight table per container and runs one of several
//! modes over it: analytic expectation, Monte Carlo openings, a hunt for the
//! rarest reward, and a stepped profit series. Every mode takes an explicit
//! random source so seeded runs are reproducible.

use case_core::ContainerId;
use thiserror::Error;

pub mod config;
pub mod engine;
pub mod modes;
pub mod sampler;
pub mod summary;

pub use config::{ConfigError, EngineConfig, DEFAULT_UNTIL_BEST_CAP};
pub use engine::Engine;
pub use modes::{
    rarest, EnsembleStats, ProfitPoint, RealisticResult, SimulationResult, UntilBestResult,
    MAX_SERIES_TRIALS,
};
pub use sampler::{CumulativeEntry, CumulativeTable};
pub use summary::{summarize, Outcome, PercentReturn, Summary};

/// Reasons a calculation cannot produce a result.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("unknown container: {0}")]
    UnknownContainer(ContainerId),
    #[error("quantity must be > 0")]
    InvalidQuantity,
    /// Both step and max must be > 0, and max at most [`MAX_SERIES_TRIALS`].
    #[error("invalid profit series: step {step}, max {max}")]
    InvalidSeries { step: u64, max: u64 },
    #[error("container {0} has no rewards")]
    EmptyContainer(ContainerId),
    /// All weights are zero; nothing can be drawn.
    #[error("container {0} has no positive reward weight")]
    DegenerateWeights(ContainerId),
    #[error("ensemble needs at least one run")]
    InvalidRuns,
}
