//! Volume-priced currencies.
//!
//! A tiered currency is worth more base value per unit the more units a
//! single purchase involves. Each currency owns a table of
//! `(threshold, value)` bands; the first band whose threshold does not exceed
//! the purchase size applies.

use case_core::Currency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One price band: purchases of at least `threshold` units are worth `value`
/// base value per unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: u64,
    pub value: f64,
}

/// Errors raised when building a tier table.
#[derive(Debug, Error, PartialEq)]
pub enum TierError {
    #[error("tier table is empty")]
    Empty,
    /// Every table must cover a purchase of zero units.
    #[error("tier table has no threshold-0 tier")]
    MissingZeroTier,
    #[error("tier {0}: value must be finite and >= 0")]
    InvalidValue(u64),
    #[error("duplicate tier threshold {0}")]
    DuplicateThreshold(u64),
}

/// Tier bands sorted by descending threshold, always ending at threshold 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Validate and sort a set of tiers.
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self, TierError> {
        if tiers.is_empty() {
            return Err(TierError::Empty);
        }
        for t in &tiers {
            if !t.value.is_finite() || t.value < 0.0 {
                return Err(TierError::InvalidValue(t.threshold));
            }
        }
        tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        for pair in tiers.windows(2) {
            if pair[0].threshold == pair[1].threshold {
                return Err(TierError::DuplicateThreshold(pair[0].threshold));
            }
        }
        if tiers.last().map(|t| t.threshold) != Some(0) {
            return Err(TierError::MissingZeroTier);
        }
        Ok(Self { tiers })
    }

    /// Default table for the "diamonds" currency.
    pub fn diamonds() -> Self {
        Self {
            tiers: vec![
                Tier { threshold: 50_000, value: 3e9 },
                Tier { threshold: 25_000, value: 2.5e9 },
                Tier { threshold: 10_000, value: 2e9 },
                Tier { threshold: 5_000, value: 1.75e9 },
                Tier { threshold: 0, value: 1.5e9 },
            ],
        }
    }

    /// Bands in descending threshold order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Base value per unit for a purchase of `units` units.
    ///
    /// Negative or NaN input falls through to the threshold-0 band.
    pub fn value_for(&self, units: f64) -> f64 {
        self.tiers
            .iter()
            .find(|t| t.threshold as f64 <= units)
            .or(self.tiers.last())
            .map_or(0.0, |t| t.value)
    }

    /// Approximate number of units worth `base_value`.
    ///
    /// Picks the first band (descending) whose quotient reaches its own
    /// threshold, falling back to the lowest band. Bands are defined on
    /// purchase size, not on value, so this is not an exact inverse of
    /// `value_for`: base values between two bands' images map to a quantity
    /// whose own cost is different from `base_value`.
    pub fn to_units(&self, base_value: f64) -> f64 {
        for t in &self.tiers {
            if t.value <= 0.0 {
                continue;
            }
            let units = base_value / t.value;
            if units >= t.threshold as f64 {
                return units;
            }
        }
        self.tiers
            .last()
            .filter(|t| t.value > 0.0)
            .map_or(0.0, |t| base_value / t.value)
    }
}

impl TryFrom<Vec<Tier>> for TierTable {
    type Error = TierError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        TierTable::new(tiers)
    }
}

impl From<TierTable> for Vec<Tier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

/// Tier tables for every tiered currency, keyed by lowercase name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyBook {
    tables: BTreeMap<String, TierTable>,
}

impl Default for CurrencyBook {
    fn default() -> Self {
        Self::empty().with_table("diamonds", TierTable::diamonds())
    }
}

impl CurrencyBook {
    /// A book with no tiered currencies.
    pub fn empty() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    pub fn with_table(mut self, name: &str, table: TierTable) -> Self {
        self.tables.insert(name.trim().to_ascii_lowercase(), table);
        self
    }

    /// Tier table for a currency, if it is tiered and known.
    pub fn table(&self, currency: &Currency) -> Option<&TierTable> {
        match currency {
            Currency::Tiered(name) => self.tables.get(name),
            Currency::Time | Currency::Cooldown => None,
        }
    }

    /// Base value of one unit of `currency` within a purchase of
    /// `total_units` units.
    ///
    /// `time` is always 1. Currencies without a tier table (including
    /// `cooldown` and unknown names) are worth 0.
    pub fn unit_value(&self, currency: &Currency, total_units: f64) -> f64 {
        match currency {
            Currency::Time => 1.0,
            other => self.table(other).map_or(0.0, |t| t.value_for(total_units)),
        }
    }

    /// Express `base_value` in units of `target`. See [`TierTable::to_units`]
    /// for the approximation used by tiered currencies.
    pub fn convert_base_value_to_currency(&self, base_value: f64, target: &Currency) -> f64 {
        match target {
            Currency::Time => base_value,
            other => self.table(other).map_or(0.0, |t| t.to_units(base_value)),
        }
    }
}
