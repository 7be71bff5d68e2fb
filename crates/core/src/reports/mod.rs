//! Profit and loss statement.
//!
//! This module turns aggregated ledger data into the statement:
//! - Row formatting and zero-row pruning
//! - Section totals
//! - Gross profit, operating profit and net profit
//! - Columns and the headline summary

pub mod error;
pub mod rows;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ProfitAndLossService;
pub use types::*;
