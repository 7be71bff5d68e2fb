//! Presentation currency handling.

pub mod conversion;
pub mod exchange;

pub use conversion::{convert_amount, convert_postings};
pub use exchange::{ExchangeRate, ExchangeRateLookup, ExchangeRateTable, MissingExchangeRate};
