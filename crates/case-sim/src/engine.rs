//! Catalog-facing entry points.
//!
//! The engine resolves a container id through the catalog and hands the
//! container to the pure simulation modes. A missing container is reported
//! as [`SimError::UnknownContainer`], never a panic.

use crate::config::{ConfigError, EngineConfig};
use crate::modes::{
    self, EnsembleStats, ProfitPoint, RealisticResult, SimulationResult, UntilBestResult,
};
use crate::SimError;
use case_core::{CatalogProvider, Container, ContainerId, Currency};
use rand::Rng;
use tracing::debug;

/// Valuation engine over a read-only catalog.
pub struct Engine<'a, C: CatalogProvider + ?Sized> {
    catalog: &'a C,
    config: EngineConfig,
}

impl<'a, C: CatalogProvider + ?Sized> Engine<'a, C> {
    /// Fails when `config` breaks its invariants (e.g. a zero until-best cap),
    /// which a config built in code has not been checked for.
    pub fn new(catalog: &'a C, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn container(&self, id: &ContainerId) -> Result<&'a Container, SimError> {
        self.catalog
            .get_container(id)
            .ok_or_else(|| SimError::UnknownContainer(id.clone()))
    }

    pub fn compute_theoretical(
        &self,
        quantity: u64,
        container_id: &ContainerId,
    ) -> Result<SimulationResult, SimError> {
        debug!(container = %container_id, quantity, "theoretical");
        let c = self.container(container_id)?;
        modes::theoretical(c, quantity, &self.config.currencies)
    }

    pub fn compute_realistic<R: Rng>(
        &self,
        quantity: u64,
        container_id: &ContainerId,
        rng: &mut R,
    ) -> Result<RealisticResult, SimError> {
        debug!(container = %container_id, quantity, "realistic");
        let c = self.container(container_id)?;
        modes::realistic(c, quantity, &self.config.currencies, rng)
    }

    pub fn compute_until_best<R: Rng>(
        &self,
        container_id: &ContainerId,
        rng: &mut R,
    ) -> Result<UntilBestResult, SimError> {
        debug!(container = %container_id, cap = self.config.until_best_cap, "until best");
        let c = self.container(container_id)?;
        modes::until_best(c, self.config.until_best_cap, &self.config.currencies, rng)
    }

    pub fn compute_profit_series<R: Rng>(
        &self,
        step: u64,
        max: u64,
        container_id: &ContainerId,
        rng: &mut R,
    ) -> Result<Vec<ProfitPoint>, SimError> {
        debug!(container = %container_id, step, max, "profit series");
        let c = self.container(container_id)?;
        modes::profit_series(c, step, max, &self.config.currencies, rng)
    }

    pub fn compute_realistic_ensemble(
        &self,
        quantity: u64,
        runs: u32,
        container_id: &ContainerId,
        seed: u64,
    ) -> Result<EnsembleStats, SimError> {
        debug!(container = %container_id, quantity, runs, seed, "realistic ensemble");
        let c = self.container(container_id)?;
        modes::realistic_ensemble(c, quantity, runs, seed, &self.config.currencies)
    }

    /// Express a base value in units of `target` using the configured tiers.
    pub fn convert_base_value_to_currency(&self, base_value: f64, target: &Currency) -> f64 {
        self.config
            .currencies
            .convert_base_value_to_currency(base_value, target)
    }
}
