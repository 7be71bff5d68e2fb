//! Chart of accounts records.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account subtype tag for cost of goods sold accounts.
pub const COST_OF_GOODS_SOLD: &str = "Cost of Goods Sold";
/// Account subtype tag for tax accounts.
pub const TAX: &str = "Tax";

/// Top-level accounting classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RootType {
    /// Asset accounts.
    Asset,
    /// Liability accounts.
    Liability,
    /// Equity accounts.
    Equity,
    /// Income accounts.
    Income,
    /// Expense accounts.
    Expense,
}

impl RootType {
    /// Display priority among root-level siblings.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Asset => 0,
            Self::Liability => 1,
            Self::Equity => 2,
            Self::Income => 3,
            Self::Expense => 4,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for RootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which financial statement an account reports into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    /// Balance sheet accounts.
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    /// Profit and loss accounts.
    #[serde(rename = "Profit and Loss")]
    ProfitAndLoss,
}

/// Natural balance side of a report section.
///
/// Accumulation is always `debit - credit`; credit-natured sections flip the
/// sign before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceMustBe {
    /// Debit-normal (expenses).
    Debit,
    /// Credit-normal (income).
    Credit,
}

impl BalanceMustBe {
    /// Multiplier applied to raw `debit - credit` values.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Debit => Decimal::ONE,
            Self::Credit => Decimal::NEGATIVE_ONE,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }
}

impl fmt::Display for BalanceMustBe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, also the sort key (e.g. "4100 - Sales - AC").
    pub name: String,
    /// Human readable name.
    pub account_name: String,
    /// Optional account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Parent account identifier; `None` for roots.
    #[serde(default)]
    pub parent_account: Option<String>,
    /// Root classification.
    pub root_type: RootType,
    /// Statement classification.
    pub report_type: ReportType,
    /// Free-form subtype tag (e.g. "Cost of Goods Sold").
    #[serde(default)]
    pub account_type: Option<String>,
    /// Whether this is a group (internal) account.
    #[serde(default)]
    pub is_group: bool,
    /// Whether this account is part of gross profit.
    #[serde(default)]
    pub include_in_gross: bool,
    /// Owning company.
    pub company: String,
}

impl Account {
    /// Label shown in reports: "number - name" when numbered.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.account_number.as_deref() {
            Some(number) if !number.is_empty() => format!("{number} - {}", self.account_name),
            _ => self.account_name.clone(),
        }
    }
}

/// Which accounts a report section covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSelection {
    /// Restrict to a root type.
    pub root_type: Option<RootType>,
    /// Restrict to a subtype.
    pub account_type: Option<String>,
    /// Drop these subtypes.
    pub exclude_account_types: Vec<String>,
}

impl AccountSelection {
    /// Selects every account of a root type.
    #[must_use]
    pub fn root(root_type: RootType) -> Self {
        Self {
            root_type: Some(root_type),
            ..Self::default()
        }
    }

    /// Restricts the selection to a subtype.
    #[must_use]
    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    /// Excludes a subtype from the selection.
    #[must_use]
    pub fn excluding(mut self, account_type: impl Into<String>) -> Self {
        self.exclude_account_types.push(account_type.into());
        self
    }

    /// Returns true if the account belongs to this selection.
    ///
    /// Accounts without a subtype are never excluded.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        if self.root_type.is_some_and(|root| root != account.root_type) {
            return false;
        }
        if let Some(wanted) = &self.account_type
            && account.account_type.as_deref() != Some(wanted.as_str())
        {
            return false;
        }
        match account.account_type.as_deref() {
            Some(tag) => !self.exclude_account_types.iter().any(|ex| ex == tag),
            None => true,
        }
    }
}
