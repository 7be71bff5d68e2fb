//! Profit and loss aggregation engine for Ledgerview.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Ledger storage is reached through the [`ledger::LedgerSource`] trait.
//!
//! # Modules
//!
//! - `account` - Chart of accounts records and selections
//! - `company` - Company settings consumed by reports
//! - `hierarchy` - Account forest reconstruction and ordering
//! - `fiscal` - Fiscal years, report periods and period generation
//! - `ledger` - Postings, ledger filters and the ledger source contract
//! - `currency` - Presentation currency conversion
//! - `aggregate` - Period bucketing and roll-up into parent accounts
//! - `reports` - Row formatting, pruning and the profit and loss statement

pub mod account;
pub mod aggregate;
pub mod company;
pub mod currency;
pub mod fiscal;
pub mod hierarchy;
pub mod ledger;
pub mod reports;

#[cfg(test)]
pub(crate) mod fixtures;
