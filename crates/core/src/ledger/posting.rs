//! General ledger postings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single general ledger entry.
///
/// Amounts are in the company currency. Postings are read, never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Owning company.
    pub company: String,
    /// Account posted to.
    pub account: String,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Fiscal year the posting was booked in.
    #[serde(default)]
    pub fiscal_year: Option<String>,
    /// Opening entry flag.
    #[serde(default)]
    pub is_opening: bool,
    /// Cancelled entries are never visible to reports.
    #[serde(default)]
    pub is_cancelled: bool,
    /// Posted by a period closing voucher.
    #[serde(default)]
    pub is_period_closing: bool,
    /// Project tag.
    #[serde(default)]
    pub project: Option<String>,
    /// Cost center tag.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Finance book tag.
    #[serde(default)]
    pub finance_book: Option<String>,
    /// Custom accounting dimensions (dimension name to value).
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

impl Posting {
    /// Signed amount, `debit - credit`.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.debit - self.credit
    }
}
