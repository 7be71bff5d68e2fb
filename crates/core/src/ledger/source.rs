//! Ledger source contract.

use thiserror::Error;

use super::filter::{AccountQuery, PostingQuery};
use super::posting::Posting;
use crate::account::Account;

/// Errors raised by a ledger source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Snapshot file could not be read.
    #[error("Failed to read ledger snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents are not valid.
    #[error("Invalid ledger snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only access to a company's chart of accounts and general ledger.
///
/// Reports receive a source by reference and never write through it.
pub trait LedgerSource {
    /// Returns the accounts matching a selection.
    fn accounts(&self, query: &AccountQuery) -> Result<Vec<Account>, SourceError>;

    /// Returns the non-cancelled postings matching a query.
    fn postings(&self, query: &PostingQuery) -> Result<Vec<Posting>, SourceError>;
}
