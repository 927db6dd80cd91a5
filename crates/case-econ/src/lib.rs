#![deny(warnings)]

//! Valuation helpers for the case calculator.
//!
//! This crate provides:
//! - Reward value parsing (plain, suffixed, ranged and owner's-choice text)
//! - Tiered currency resolution and its approximate inverse
//! - Container acquisition cost in base value

pub mod cost;
pub mod tiers;
pub mod value;

pub use cost::{cost_of_units, total_cost};
pub use tiers::{CurrencyBook, Tier, TierError, TierTable};
pub use value::{estimate, format_value, parse_text, parse_value, ParsedValue};
