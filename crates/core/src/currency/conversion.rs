//! Restating postings in a presentation currency.
//!
//! Converted debits and credits are rounded half to even at
//! [`CONVERTED_DECIMAL_PLACES`] so period sums do not drift.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::exchange::{ExchangeRateLookup, MissingExchangeRate};
use crate::ledger::Posting;

/// Decimal places kept on converted posting amounts.
pub const CONVERTED_DECIMAL_PLACES: u32 = 4;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Restates postings from `from` into `to` at each posting date's rate.
///
/// # Errors
///
/// Returns [`MissingExchangeRate`] for the first posting without a rate.
pub fn convert_postings<L: ExchangeRateLookup + ?Sized>(
    postings: Vec<Posting>,
    from: &str,
    to: &str,
    rates: &L,
) -> Result<Vec<Posting>, MissingExchangeRate> {
    if from == to {
        return Ok(postings);
    }
    postings
        .into_iter()
        .map(|mut posting| {
            let rate = rates
                .rate(from, to, posting.posting_date)
                .ok_or_else(|| MissingExchangeRate {
                    from: from.to_string(),
                    to: to.to_string(),
                    date: posting.posting_date,
                })?;
            posting.debit = convert_amount(posting.debit, rate, CONVERTED_DECIMAL_PLACES);
            posting.credit = convert_amount(posting.credit, rate, CONVERTED_DECIMAL_PLACES);
            Ok(posting)
        })
        .collect()
}
