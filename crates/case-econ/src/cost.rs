//! Acquisition cost of opening containers, expressed in base value.

use crate::tiers::CurrencyBook;
use case_core::{Container, Currency};

/// Base value of `units` units of `currency` bought in one purchase.
///
/// Linear currencies cost their face value; `cooldown` cost reads downstream
/// as elapsed time rather than spent value. Tiered currencies are priced at
/// the unit value of the band the whole purchase falls in.
pub fn cost_of_units(currency: &Currency, units: f64, book: &CurrencyBook) -> f64 {
    if currency.is_linear() {
        units
    } else {
        units * book.unit_value(currency, units)
    }
}

/// Total cost of opening `container` `quantity` times.
///
/// Example:
/// // price 200 time, 5 openings
/// assert_eq!(total_cost(&case, 5, &CurrencyBook::default()), 1000.0);
pub fn total_cost(container: &Container, quantity: u64, book: &CurrencyBook) -> f64 {
    if quantity == 0 {
        return 0.0;
    }
    let units = container.price * quantity as f64;
    cost_of_units(&container.currency, units, book)
}
