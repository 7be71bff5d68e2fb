//! Period bucketing and roll-up.
//!
//! Sums are raw `debit - credit` amounts. Sign flips and rounding happen when
//! rows are formatted.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::fiscal::Period;
use crate::hierarchy::AccountTree;
use crate::ledger::Posting;

/// Running sums for one tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedTotals {
    /// One sum per period, aligned with the period list.
    pub values: Vec<Decimal>,
    /// Net movement before the start of the report.
    pub opening_balance: Decimal,
}

impl AccumulatedTotals {
    /// Creates zeroed totals for `periods` columns.
    #[must_use]
    pub fn zeroed(periods: usize) -> Self {
        Self {
            values: vec![Decimal::ZERO; periods],
            opening_balance: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, child: &Self) {
        for (value, child_value) in self.values.iter_mut().zip(&child.values) {
            *value += *child_value;
        }
        self.opening_balance += child.opening_balance;
    }
}

/// Switches that change which postings count toward a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Ignore period start dates, so each period is a running total.
    pub accumulated_values: bool,
    /// Only count postings from the fiscal year of each period's end date.
    pub ignore_accumulated_values_for_fy: bool,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            accumulated_values: true,
            ignore_accumulated_values_for_fy: false,
        }
    }
}

/// Non-fatal problem found in the ledger data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// A posting referenced an account outside the hierarchy.
    MissingAccount {
        /// The referenced account.
        account: String,
    },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAccount { account } => {
                write!(f, "posting references unknown account {account}")
            }
        }
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Totals per tree position.
    pub totals: Vec<AccumulatedTotals>,
    /// Problems found while bucketing. One per unknown account.
    pub warnings: Vec<DataQualityWarning>,
}

/// Buckets postings into per-account period sums.
///
/// Postings for accounts outside `tree` are skipped with a warning.
#[must_use]
pub fn aggregate(
    tree: &AccountTree,
    postings: &[Posting],
    periods: &[Period],
    options: AggregationOptions,
) -> Aggregation {
    let mut totals = vec![AccumulatedTotals::zeroed(periods.len()); tree.len()];
    let mut warnings: Vec<DataQualityWarning> = Vec::new();
    let opening_cutoff = periods.first().map(|p| p.year_start_date);

    for posting in postings {
        let Some(position) = tree.position(&posting.account) else {
            let warning = DataQualityWarning::MissingAccount {
                account: posting.account.clone(),
            };
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
            continue;
        };

        let delta = posting.delta();
        let entry = &mut totals[position];
        for (value, period) in entry.values.iter_mut().zip(periods) {
            if period.includes(
                posting.posting_date,
                posting.fiscal_year.as_deref(),
                options.accumulated_values,
                options.ignore_accumulated_values_for_fy,
            ) {
                *value += delta;
            }
        }
        if opening_cutoff.is_some_and(|cutoff| posting.posting_date < cutoff) {
            entry.opening_balance += delta;
        }
    }

    Aggregation { totals, warnings }
}

/// Adds every node's sums into its parent, deepest nodes first.
///
/// `totals` must be aligned with the tree's pre-order positions.
pub fn roll_up(tree: &AccountTree, totals: &mut [AccumulatedTotals]) {
    for position in (0..tree.len().min(totals.len())).rev() {
        let Some(parent) = tree.nodes()[position].parent else {
            continue;
        };
        let (head, tail) = totals.split_at_mut(position);
        if let Some(parent_totals) = head.get_mut(parent) {
            parent_totals.absorb(&tail[0]);
        }
    }
}
