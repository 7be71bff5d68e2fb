//! General ledger access.
//!
//! This module defines what reports read from the ledger:
//! - Posting records
//! - Dimensional filters and the queries built from them
//! - The `LedgerSource` repository contract
//! - An in-memory source backed by a JSON snapshot

pub mod filter;
pub mod memory;
pub mod posting;
pub mod source;

pub use filter::{AccountQuery, FinanceBookConflict, FinanceBookScope, LedgerFilter, PostingQuery};
pub use memory::{InMemoryLedger, LedgerSnapshot};
pub use posting::Posting;
pub use source::{LedgerSource, SourceError};
