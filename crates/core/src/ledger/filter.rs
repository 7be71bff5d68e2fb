//! Ledger filters and source queries.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::posting::Posting;
use crate::account::AccountSelection;
use crate::company::Company;

/// Dimensional filter applied to every posting query of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFilter {
    /// Only postings tagged with one of these projects.
    #[serde(default)]
    pub project: Vec<String>,
    /// Only postings tagged with one of these cost centers.
    #[serde(default)]
    pub cost_center: Vec<String>,
    /// Requested finance book.
    #[serde(default)]
    pub finance_book: Option<String>,
    /// Also include postings in the company's default finance book.
    #[serde(default)]
    pub include_default_book_entries: bool,
    /// Custom dimension name to accepted values.
    #[serde(default)]
    pub dimensions: BTreeMap<String, Vec<String>>,
}

impl LedgerFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project to the filter.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project.push(project.into());
        self
    }

    /// Adds a cost center to the filter.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center: impl Into<String>) -> Self {
        self.cost_center.push(cost_center.into());
        self
    }

    /// Adds an accepted value for a custom dimension.
    #[must_use]
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Sets the requested finance book.
    #[must_use]
    pub fn with_finance_book(mut self, finance_book: impl Into<String>) -> Self {
        self.finance_book = Some(finance_book.into());
        self
    }

    /// Sets whether default finance book entries are included.
    #[must_use]
    pub const fn include_default_book_entries(mut self, include: bool) -> Self {
        self.include_default_book_entries = include;
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project.is_empty()
            && self.cost_center.is_empty()
            && self.finance_book.is_none()
            && self.dimensions.values().all(Vec::is_empty)
    }

    /// Resolves which finance books are visible for a company.
    ///
    /// Untagged postings are always visible.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceBookConflict`] when default book entries are requested
    /// together with a book other than the company default.
    pub fn finance_book_scope(&self, company: &Company) -> Result<FinanceBookScope, FinanceBookConflict> {
        let requested = self.finance_book.as_deref().filter(|b| !b.is_empty());
        let mut books = BTreeSet::new();
        books.extend(requested.map(str::to_string));

        if self.include_default_book_entries {
            let default = company
                .default_finance_book
                .as_deref()
                .filter(|b| !b.is_empty());
            if let (Some(requested), Some(default)) = (requested, default)
                && requested != default
            {
                return Err(FinanceBookConflict {
                    requested: requested.to_string(),
                    default: default.to_string(),
                });
            }
            books.extend(default.map(str::to_string));
        }

        Ok(FinanceBookScope { books })
    }
}

/// A different finance book was requested while including default book entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "To use finance book {requested}, uncheck 'Include Default FB Entries' (company default is {default})"
)]
pub struct FinanceBookConflict {
    /// Requested finance book.
    pub requested: String,
    /// Company default finance book.
    pub default: String,
}

/// Finance books whose postings are visible to a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceBookScope {
    /// Named books in scope.
    pub books: BTreeSet<String>,
}

impl FinanceBookScope {
    /// Returns true if a posting in `book` is visible.
    #[must_use]
    pub fn allows(&self, book: Option<&str>) -> bool {
        match book {
            None | Some("") => true,
            Some(book) => self.books.contains(book),
        }
    }
}

/// Account lookup for one report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    /// Company whose chart of accounts is read.
    pub company: String,
    /// Which accounts to return.
    pub selection: AccountSelection,
}

/// Posting lookup for one report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingQuery {
    /// Company whose ledger is read.
    pub company: String,
    /// Leaf accounts to read postings for.
    pub accounts: BTreeSet<String>,
    /// Inclusive lower bound, if any.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to_date: NaiveDate,
    /// Dimensional filter.
    pub filter: LedgerFilter,
    /// Resolved finance book scope.
    pub finance_books: FinanceBookScope,
    /// Skip period closing voucher postings.
    pub ignore_closing_entries: bool,
}

impl PostingQuery {
    /// Returns true if the posting satisfies every constraint of this query.
    ///
    /// Cancelled postings never match.
    #[must_use]
    pub fn matches(&self, posting: &Posting) -> bool {
        if posting.is_cancelled
            || posting.company != self.company
            || !self.accounts.contains(&posting.account)
            || posting.posting_date > self.to_date
            || self.from_date.is_some_and(|from| posting.posting_date < from)
        {
            return false;
        }
        if self.ignore_closing_entries && posting.is_period_closing {
            return false;
        }
        if !tag_matches(&self.filter.project, posting.project.as_deref())
            || !tag_matches(&self.filter.cost_center, posting.cost_center.as_deref())
        {
            return false;
        }
        if !self.finance_books.allows(posting.finance_book.as_deref()) {
            return false;
        }
        self.filter.dimensions.iter().all(|(name, accepted)| {
            tag_matches(accepted, posting.dimensions.get(name).map(String::as_str))
        })
    }
}

fn tag_matches(accepted: &[String], tag: Option<&str>) -> bool {
    accepted.is_empty() || tag.is_some_and(|tag| accepted.iter().any(|a| a == tag))
}
