//! Exchange rate types and lookup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
            effective_date,
        }
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        Decimal::ONE.checked_div(self.rate).map(|rate| Self {
            from_currency: self.to_currency.clone(),
            to_currency: self.from_currency.clone(),
            rate,
            effective_date: self.effective_date,
        })
    }
}

/// No rate is known for a currency pair on a date.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("No exchange rate found for {from} to {to} on {date}")]
pub struct MissingExchangeRate {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Date for which the rate was requested.
    pub date: NaiveDate,
}

/// Looks up the rate to convert one currency into another on a date.
pub trait ExchangeRateLookup {
    /// Returns the rate effective on `date`, if any.
    fn rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal>;
}

/// Rate table using the latest rate effective on or before the requested date.
///
/// Inverse pairs are used when only the opposite direction is stored.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateTable {
    rates: Vec<ExchangeRate>,
}

impl ExchangeRateTable {
    /// Creates a table from a list of rates.
    #[must_use]
    pub fn new(mut rates: Vec<ExchangeRate>) -> Self {
        rates.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self { rates }
    }

    fn latest(&self, from: &str, to: &str, date: NaiveDate) -> Option<&ExchangeRate> {
        self.rates
            .iter()
            .rev()
            .find(|r| r.from_currency == from && r.to_currency == to && r.effective_date <= date)
    }
}

impl ExchangeRateLookup for ExchangeRateTable {
    fn rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        self.latest(from, to, date).map(|r| r.rate).or_else(|| {
            self.latest(to, from, date)
                .and_then(ExchangeRate::inverse)
                .map(|r| r.rate)
        })
    }
}
