//! Report types.

use chrono::NaiveDate;
use ledgerview_shared::ReportConfig;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{AccountSelection, BalanceMustBe, COST_OF_GOODS_SOLD, RootType, TAX};
use crate::aggregate::DataQualityWarning;
use crate::company::Company;
use crate::fiscal::{Period, PeriodValues, Periodicity};
use crate::hierarchy::DEFAULT_DEPTH_CAP;
use crate::ledger::LedgerFilter;

/// What a report row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// An account from the chart of accounts.
    Account,
    /// "Total <root type> (<balance>)" closing a section.
    Total,
    /// Caption introducing a block.
    Header,
    /// Final-period block total (Total COGS, Total OPEX, Taxes and Zakat).
    Subtotal,
    /// Income less cost of goods sold.
    GrossProfit,
    /// Gross profit less operating expenses.
    OperatingProfit,
    /// Net profit for the year.
    NetProfit,
}

/// One line of the statement.
///
/// Period values are flattened into the row, keyed by period key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// What the row represents.
    pub kind: RowKind,
    /// Account identifier or synthetic row identifier.
    pub account: String,
    /// Display label.
    pub account_name: String,
    /// Parent account, for account rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_account: Option<String>,
    /// Depth in the hierarchy.
    pub indent: usize,
    /// Rounded period values in period order.
    #[serde(flatten)]
    pub values: PeriodValues,
    /// Sum of the period values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// Net movement before the report start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,
    /// Currency of the amounts.
    pub currency: String,
    /// Whether any period value is material.
    pub has_value: bool,
    /// Group account flag.
    pub is_group: bool,
    /// Account subtype.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    /// Gross profit membership flag.
    pub include_in_gross: bool,
    /// Highlight negative values.
    pub warn_if_negative: bool,
    /// Start of the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_start_date: Option<NaiveDate>,
    /// End of the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_end_date: Option<NaiveDate>,
}

impl ReportRow {
    /// Serialized names of the fixed fields. Period keys share the row
    /// object with them and must not reuse any.
    pub const FIELDS: [&'static str; 15] = [
        "kind",
        "account",
        "account_name",
        "parent_account",
        "indent",
        "total",
        "opening_balance",
        "currency",
        "has_value",
        "is_group",
        "account_type",
        "include_in_gross",
        "warn_if_negative",
        "year_start_date",
        "year_end_date",
    ];

    /// Creates a synthetic row where the label doubles as the identifier.
    #[must_use]
    pub fn synthetic(
        kind: RowKind,
        label: impl Into<String>,
        values: PeriodValues,
        currency: impl Into<String>,
    ) -> Self {
        let label = label.into();
        Self {
            kind,
            account: label.clone(),
            account_name: label,
            parent_account: None,
            indent: 0,
            values,
            total: None,
            opening_balance: None,
            currency: currency.into(),
            has_value: false,
            is_group: false,
            account_type: None,
            include_in_gross: false,
            warn_if_negative: false,
            year_start_date: None,
            year_end_date: None,
        }
    }

    /// Sets the row total.
    #[must_use]
    pub const fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    /// Marks the row for negative value highlighting.
    #[must_use]
    pub const fn warn_if_negative(mut self) -> Self {
        self.warn_if_negative = true;
        self
    }

    /// Period value, zero when absent.
    #[must_use]
    pub fn value(&self, key: &str) -> Decimal {
        self.values.value(key)
    }

    /// Returns true if this row is at the top level.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.indent == 0
    }
}

/// The four account blocks of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Income accounts.
    Income,
    /// Expense accounts tagged "Cost of Goods Sold".
    CostOfGoodsSold,
    /// Expense accounts other than cost of goods sold and tax.
    OperatingExpenses,
    /// Expense accounts tagged "Tax".
    Taxes,
}

impl SectionKind {
    /// Root type the section reads.
    #[must_use]
    pub const fn root_type(self) -> RootType {
        match self {
            Self::Income => RootType::Income,
            Self::CostOfGoodsSold | Self::OperatingExpenses | Self::Taxes => RootType::Expense,
        }
    }

    /// Natural balance side.
    #[must_use]
    pub const fn balance_must_be(self) -> BalanceMustBe {
        match self {
            Self::Income => BalanceMustBe::Credit,
            Self::CostOfGoodsSold | Self::OperatingExpenses | Self::Taxes => BalanceMustBe::Debit,
        }
    }

    /// Accounts covered by the section.
    #[must_use]
    pub fn selection(self) -> AccountSelection {
        let selection = AccountSelection::root(self.root_type());
        match self {
            Self::Income => selection,
            Self::CostOfGoodsSold => selection.with_account_type(COST_OF_GOODS_SOLD),
            Self::OperatingExpenses => selection.excluding(COST_OF_GOODS_SOLD).excluding(TAX),
            Self::Taxes => selection.with_account_type(TAX),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::CostOfGoodsSold => "cogs",
            Self::OperatingExpenses => "opex",
            Self::Taxes => "taxes",
        }
    }
}

/// Formatted rows of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Kept account rows in pre-order.
    pub rows: Vec<ReportRow>,
    /// Section total row, when enabled and there are rows.
    pub total_row: Option<ReportRow>,
    /// Data-quality problems found while aggregating.
    pub warnings: Vec<DataQualityWarning>,
}

impl Section {
    /// Returns true if the section has no account rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of top-level account rows for one period.
    #[must_use]
    pub fn top_level_value(&self, key: &str) -> Decimal {
        self.rows
            .iter()
            .filter(|r| r.is_top_level())
            .map(|r| r.value(key))
            .sum()
    }

    /// Sum of every emitted row for one period: account rows at any depth
    /// plus the section total row when there is one.
    #[must_use]
    pub fn all_rows_value(&self, key: &str) -> Decimal {
        self.rows
            .iter()
            .chain(self.total_row.as_ref())
            .map(|r| r.value(key))
            .sum()
    }

    /// Account rows followed by the total row.
    pub fn into_rows(self) -> impl Iterator<Item = ReportRow> {
        self.rows.into_iter().chain(self.total_row)
    }
}

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    /// Link to an account.
    Link,
    /// Currency amount.
    Currency,
}

/// A report column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportColumn {
    /// Row field shown in the column.
    pub fieldname: String,
    /// Column header.
    pub label: String,
    /// Data type.
    pub fieldtype: ColumnType,
    /// Link target or currency field.
    pub options: String,
    /// Display width in pixels.
    pub width: u32,
}

impl ReportColumn {
    /// Leading account column.
    #[must_use]
    pub fn account() -> Self {
        Self {
            fieldname: "account".to_string(),
            label: "Account".to_string(),
            fieldtype: ColumnType::Link,
            options: "Account".to_string(),
            width: 300,
        }
    }

    /// Currency column for a period.
    #[must_use]
    pub fn period(period: &Period) -> Self {
        Self::currency(&period.key, &period.label)
    }

    /// Trailing total column.
    #[must_use]
    pub fn total() -> Self {
        Self::currency("total", "Total")
    }

    fn currency(fieldname: &str, label: &str) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            label: label.to_string(),
            fieldtype: ColumnType::Currency,
            options: "currency".to_string(),
            width: 150,
        }
    }
}

/// Summary indicator color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Indicator {
    /// Profitable.
    Green,
    /// Loss or break-even.
    Red,
}

/// An entry of the headline summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryItem {
    /// Labelled amount.
    Value {
        /// Caption.
        label: String,
        /// Amount.
        value: Decimal,
        /// Currency of the amount.
        currency: String,
        /// Color hint.
        #[serde(skip_serializing_if = "Option::is_none")]
        indicator: Option<Indicator>,
    },
    /// Operator between amounts.
    Separator {
        /// Operator symbol.
        value: String,
    },
}

impl SummaryItem {
    /// Creates a value item without an indicator.
    #[must_use]
    pub fn value(label: impl Into<String>, value: Decimal, currency: impl Into<String>) -> Self {
        Self::Value {
            label: label.into(),
            value,
            currency: currency.into(),
            indicator: None,
        }
    }

    /// Creates a separator.
    #[must_use]
    pub fn separator(value: impl Into<String>) -> Self {
        Self::Separator {
            value: value.into(),
        }
    }
}

/// The composed profit and loss statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitAndLossReport {
    /// Currency of every amount.
    pub currency: String,
    /// Periods covered, in column order.
    pub periods: Vec<Period>,
    /// Column layout.
    pub columns: Vec<ReportColumn>,
    /// Statement rows in display order.
    pub rows: Vec<ReportRow>,
    /// Headline figures.
    pub summary: Vec<SummaryItem>,
    /// Data-quality problems found while aggregating.
    pub warnings: Vec<DataQualityWarning>,
}

impl ProfitAndLossReport {
    /// Finds the first row of a kind.
    #[must_use]
    pub fn row(&self, kind: RowKind) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }

    /// Finds a row by identifier.
    #[must_use]
    pub fn row_by_account(&self, account: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.account == account)
    }
}

/// Input to one statement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitAndLossRequest {
    /// Reporting company.
    pub company: Company,
    /// Report columns, in order. Must not be empty.
    pub periods: Vec<Period>,
    /// Periodicity the periods were generated with.
    pub periodicity: Periodicity,
    /// Dimensional filter.
    pub filter: LedgerFilter,
    /// Currency to restate amounts in, when different from the company's.
    pub presentation_currency: Option<String>,
    /// Overrides the configured accumulated values mode.
    pub accumulated_values: Option<bool>,
}

impl ProfitAndLossRequest {
    /// Creates a request with no filter and the configured defaults.
    #[must_use]
    pub fn new(company: Company, periods: Vec<Period>, periodicity: Periodicity) -> Self {
        Self {
            company,
            periods,
            periodicity,
            filter: LedgerFilter::default(),
            presentation_currency: None,
            accumulated_values: None,
        }
    }

    /// Currency the statement is presented in.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.presentation_currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.company.default_currency)
    }
}

/// Engine switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct StatementOptions {
    /// Maximum hierarchy depth rendered.
    pub depth_cap: usize,
    /// Running totals from the report start.
    pub accumulated_values: bool,
    /// Fetch postings from the first period's year start only.
    pub only_current_fiscal_year: bool,
    /// Skip period closing voucher postings.
    pub ignore_closing_entries: bool,
    /// Only count postings from each period's fiscal year.
    pub ignore_accumulated_values_for_fy: bool,
    /// Keep zero rows.
    pub show_zero_values: bool,
    /// Append section total rows.
    pub include_total_rows: bool,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self {
            depth_cap: DEFAULT_DEPTH_CAP,
            accumulated_values: true,
            only_current_fiscal_year: true,
            ignore_closing_entries: false,
            ignore_accumulated_values_for_fy: false,
            show_zero_values: false,
            include_total_rows: true,
        }
    }
}

impl From<&ReportConfig> for StatementOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            depth_cap: config.depth_cap,
            accumulated_values: config.accumulated_values,
            only_current_fiscal_year: config.only_current_fiscal_year,
            ignore_closing_entries: config.ignore_closing_entries,
            ignore_accumulated_values_for_fy: config.ignore_accumulated_values_for_fy,
            show_zero_values: config.show_zero_values,
            include_total_rows: config.include_total_rows,
        }
    }
}
