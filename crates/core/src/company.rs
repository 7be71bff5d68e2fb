//! Company settings consumed by reports.

use serde::{Deserialize, Serialize};

/// The reporting company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company identifier.
    pub name: String,
    /// Functional currency (ISO 4217).
    pub default_currency: String,
    /// Finance book used when none is requested.
    #[serde(default)]
    pub default_finance_book: Option<String>,
}

impl Company {
    /// Creates a company without a default finance book.
    #[must_use]
    pub fn new(name: impl Into<String>, default_currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_currency: default_currency.into(),
            default_finance_book: None,
        }
    }
}
