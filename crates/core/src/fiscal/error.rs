//! Period generation errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building a period list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Fiscal year not found.
    #[error("Fiscal year not found: {0}")]
    UnknownFiscalYear(String),

    /// Periodicity name not recognised.
    #[error("Unknown periodicity: {0}")]
    UnknownPeriodicity(String),

    /// Date arithmetic left the supported calendar range.
    #[error("Date out of range after {0}")]
    DateOverflow(NaiveDate),
}
