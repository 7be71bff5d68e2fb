//! Report error types.

use ledgerview_shared::AppError;
use thiserror::Error;

use crate::currency::MissingExchangeRate;
use crate::fiscal::PeriodError;
use crate::ledger::{FinanceBookConflict, SourceError};

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Requested finance book conflicts with the company default.
    #[error(transparent)]
    FinanceBookConflict(#[from] FinanceBookConflict),

    /// No periods were requested.
    #[error("At least one report period is required")]
    EmptyPeriodList,

    /// A period key clashes with a fixed row field.
    #[error("Period key '{0}' is reserved for a row field")]
    ReservedPeriodKey(String),

    /// Presentation currency conversion had no rate.
    #[error(transparent)]
    NoExchangeRate(#[from] MissingExchangeRate),

    /// Period list could not be built.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// The ledger source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::FinanceBookConflict(_) | ReportError::NoExchangeRate(_) => {
                Self::BusinessRule(err.to_string())
            }
            ReportError::EmptyPeriodList
            | ReportError::ReservedPeriodKey(_)
            | ReportError::Period(_) => {
                Self::Validation(err.to_string())
            }
            ReportError::Source(_) => Self::DataSource(err.to_string()),
        }
    }
}
