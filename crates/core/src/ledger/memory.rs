//! In-memory ledger source backed by a JSON snapshot.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::filter::{AccountQuery, PostingQuery};
use super::posting::Posting;
use super::source::{LedgerSource, SourceError};
use crate::account::Account;
use crate::company::Company;
use crate::currency::ExchangeRate;
use crate::fiscal::FiscalYear;

/// Everything a report server needs, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Companies.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Fiscal years used for period generation.
    #[serde(default)]
    pub fiscal_years: Vec<FiscalYear>,
    /// Chart of accounts for all companies.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// General ledger postings for all companies.
    #[serde(default)]
    pub postings: Vec<Posting>,
    /// Exchange rates for presentation currencies.
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRate>,
}

impl LedgerSnapshot {
    /// Parses a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Ledger source over accounts and postings held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    accounts: Vec<Account>,
    postings: Vec<Posting>,
}

impl InMemoryLedger {
    /// Creates a source from accounts and postings.
    #[must_use]
    pub const fn new(accounts: Vec<Account>, postings: Vec<Posting>) -> Self {
        Self { accounts, postings }
    }

    /// Creates a source from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        Self::new(snapshot.accounts.clone(), snapshot.postings.clone())
    }

    /// Number of postings held, cancelled ones included.
    #[must_use]
    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }
}

impl LedgerSource for InMemoryLedger {
    fn accounts(&self, query: &AccountQuery) -> Result<Vec<Account>, SourceError> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.company == query.company && query.selection.matches(a))
            .cloned()
            .collect())
    }

    fn postings(&self, query: &PostingQuery) -> Result<Vec<Posting>, SourceError> {
        Ok(self
            .postings
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }
}
