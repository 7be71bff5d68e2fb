//! Profit and loss statement generation.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::ReportError;
use super::rows::{prepare_rows, prune_zero_rows, total_row};
use super::types::{
    Indicator, ProfitAndLossReport, ProfitAndLossRequest, ReportColumn, ReportRow, RowKind,
    Section, SectionKind, StatementOptions, SummaryItem,
};
use crate::aggregate::{AggregationOptions, DataQualityWarning, aggregate, roll_up};
use crate::currency::{ExchangeRateLookup, ExchangeRateTable, convert_postings};
use crate::fiscal::{Period, PeriodValues, Periodicity};
use crate::hierarchy::AccountTree;
use crate::ledger::{AccountQuery, FinanceBookScope, LedgerSource, PostingQuery};

/// Builds profit and loss statements from a ledger source.
pub struct ProfitAndLossService<'a, S: LedgerSource + ?Sized> {
    source: &'a S,
    rates: Option<&'a dyn ExchangeRateLookup>,
    options: StatementOptions,
}

impl<'a, S: LedgerSource + ?Sized> ProfitAndLossService<'a, S> {
    /// Creates a service reading from `source`.
    pub const fn new(source: &'a S, options: StatementOptions) -> Self {
        Self {
            source,
            rates: None,
            options,
        }
    }

    /// Sets the rates used for presentation currency conversion.
    #[must_use]
    pub fn with_exchange_rates(mut self, rates: &'a dyn ExchangeRateLookup) -> Self {
        self.rates = Some(rates);
        self
    }

    /// Generates the statement.
    ///
    /// # Errors
    ///
    /// Fails on an empty period list, a period key that clashes with a row
    /// field, a finance book conflict, a missing exchange rate or a ledger
    /// source failure. Postings for unknown accounts
    /// are reported as warnings instead.
    pub fn generate(&self, request: &ProfitAndLossRequest) -> Result<ProfitAndLossReport, ReportError> {
        let Some(last) = request.periods.last() else {
            return Err(ReportError::EmptyPeriodList);
        };
        if let Some(period) = request
            .periods
            .iter()
            .find(|p| ReportRow::FIELDS.contains(&p.key.as_str()))
        {
            return Err(ReportError::ReservedPeriodKey(period.key.clone()));
        }
        let finance_books = request.filter.finance_book_scope(&request.company)?;
        let currency = request.currency().to_string();

        let income = self.section(request, SectionKind::Income, &finance_books)?;
        let cogs = self.section(request, SectionKind::CostOfGoodsSold, &finance_books)?;
        let opex = self.section(request, SectionKind::OperatingExpenses, &finance_books)?;
        let taxes = self.section(request, SectionKind::Taxes, &finance_books)?;

        let mut warnings: Vec<DataQualityWarning> = Vec::new();
        for warning in [&income, &cogs, &opex, &taxes]
            .into_iter()
            .flat_map(|s| s.warnings.iter())
        {
            if !warnings.contains(warning) {
                warn!(company = %request.company.name, %warning, "Skipped posting");
                warnings.push(warning.clone());
            }
        }

        let periods = &request.periods;
        let last_key = last.key.as_str();

        let gross_profit = per_period(
            RowKind::GrossProfit,
            "Gross Profit",
            periods,
            &currency,
            |key| income.top_level_value(key) - cogs.top_level_value(key),
        );
        let net_profit = per_period(
            RowKind::NetProfit,
            "Net Profit for the year",
            periods,
            &currency,
            |key| gross_profit.value(key) - opex.all_rows_value(key),
        );

        let summary = summary(
            periods,
            request.periodicity,
            &income,
            &opex,
            &net_profit,
            &currency,
        );

        let mut rows = Vec::new();
        rows.extend(income.into_rows());

        if !cogs.is_empty() {
            rows.push(ReportRow {
                account: "COGS Total".to_string(),
                ..ReportRow::synthetic(
                    RowKind::Header,
                    "Cost of Goods Sold (COGS)",
                    PeriodValues::new(),
                    &currency,
                )
            });
            let total_cogs = final_period(
                "Total COGS",
                last_key,
                cogs.top_level_value(last_key),
                &currency,
            );
            rows.extend(cogs.into_rows());
            rows.push(total_cogs);
        }

        rows.push(gross_profit.clone());

        let has_opex = opex.rows.iter().any(|r| r.total.is_some_and(|t| t > Decimal::ZERO));
        if has_opex {
            let total_opex = opex.top_level_value(last_key);
            rows.extend(opex.into_rows());
            rows.push(final_period("Total OPEX", last_key, total_opex, &currency));

            let mut operating = PeriodValues::new();
            operating.insert(last_key, gross_profit.value(last_key) - total_opex);
            rows.push(
                ReportRow::synthetic(
                    RowKind::OperatingProfit,
                    "Profit from Operations",
                    operating,
                    &currency,
                )
                .warn_if_negative(),
            );
        }

        if !taxes.is_empty() {
            rows.push(final_period(
                "Taxes and Zakat",
                last_key,
                taxes.top_level_value(last_key),
                &currency,
            ));
            rows.extend(taxes.into_rows());
        }

        if net_profit.total.is_some_and(|t| t > Decimal::ZERO) {
            rows.push(net_profit);
        }

        let columns = std::iter::once(ReportColumn::account())
            .chain(periods.iter().map(ReportColumn::period))
            .chain(std::iter::once(ReportColumn::total()))
            .collect();

        debug!(
            company = %request.company.name,
            periods = periods.len(),
            rows = rows.len(),
            warnings = warnings.len(),
            "Profit and loss statement composed"
        );

        Ok(ProfitAndLossReport {
            currency,
            periods: periods.clone(),
            columns,
            rows,
            summary,
            warnings,
        })
    }

    /// Runs the account pipeline for one section.
    ///
    /// An empty account selection yields an empty section.
    pub fn section(
        &self,
        request: &ProfitAndLossRequest,
        kind: SectionKind,
        finance_books: &FinanceBookScope,
    ) -> Result<Section, ReportError> {
        let (Some(first), Some(last)) = (request.periods.first(), request.periods.last()) else {
            return Err(ReportError::EmptyPeriodList);
        };

        let accounts = self.source.accounts(&AccountQuery {
            company: request.company.name.clone(),
            selection: kind.selection(),
        })?;
        if accounts.is_empty() {
            debug!(section = kind.as_str(), "No accounts selected");
            return Ok(Section::default());
        }

        let tree = AccountTree::build_with_depth(accounts, self.options.depth_cap);
        let leaves = tree.leaf_accounts();
        let postings = if leaves.is_empty() {
            Vec::new()
        } else {
            self.source.postings(&PostingQuery {
                company: request.company.name.clone(),
                accounts: leaves,
                from_date: self
                    .options
                    .only_current_fiscal_year
                    .then_some(first.year_start_date),
                to_date: last.to_date,
                filter: request.filter.clone(),
                finance_books: finance_books.clone(),
                ignore_closing_entries: self.options.ignore_closing_entries,
            })?
        };
        let posting_count = postings.len();

        let currency = request.currency();
        let postings = if currency == request.company.default_currency {
            postings
        } else {
            let empty = ExchangeRateTable::default();
            let rates: &dyn ExchangeRateLookup = match self.rates {
                Some(rates) => rates,
                None => &empty,
            };
            convert_postings(postings, &request.company.default_currency, currency, rates)?
        };

        let options = AggregationOptions {
            accumulated_values: request
                .accumulated_values
                .unwrap_or(self.options.accumulated_values),
            ignore_accumulated_values_for_fy: self.options.ignore_accumulated_values_for_fy,
        };
        let mut aggregation = aggregate(&tree, &postings, &request.periods, options);
        roll_up(&tree, &mut aggregation.totals);

        let balance_must_be = kind.balance_must_be();
        let rows = prepare_rows(
            &tree,
            &aggregation.totals,
            &request.periods,
            balance_must_be,
            currency,
        );
        let rows = prune_zero_rows(&tree, rows, self.options.show_zero_values);
        let total_row = if self.options.include_total_rows {
            total_row(&rows, kind.root_type(), balance_must_be, &request.periods, currency)
        } else {
            None
        };

        debug!(
            section = kind.as_str(),
            accounts = tree.len(),
            postings = posting_count,
            rows = rows.len(),
            "Section aggregated"
        );

        Ok(Section {
            rows,
            total_row,
            warnings: aggregation.warnings,
        })
    }
}

fn per_period<F>(kind: RowKind, label: &str, periods: &[Period], currency: &str, value: F) -> ReportRow
where
    F: Fn(&str) -> Decimal,
{
    let values: PeriodValues = periods
        .iter()
        .map(|p| (p.key.clone(), value(&p.key)))
        .collect();
    let total = values.total();
    ReportRow::synthetic(kind, label, values, currency)
        .with_total(total)
        .warn_if_negative()
}

fn final_period(label: &str, last_key: &str, value: Decimal, currency: &str) -> ReportRow {
    let mut values = PeriodValues::new();
    values.insert(last_key, value);
    ReportRow::synthetic(RowKind::Subtotal, label, values, currency)
}

fn summary(
    periods: &[Period],
    periodicity: Periodicity,
    income: &Section,
    opex: &Section,
    net_profit: &ReportRow,
    currency: &str,
) -> Vec<SummaryItem> {
    let total_income: Decimal = periods.iter().map(|p| income.top_level_value(&p.key)).sum();
    let total_expense: Decimal = periods.iter().map(|p| opex.top_level_value(&p.key)).sum();
    let profit = net_profit.values.total();

    let (income_label, expense_label, profit_label) =
        if periods.len() == 1 && periodicity == Periodicity::Yearly {
            ("Total Income This Year", "Total Expense This Year", "Profit This Year")
        } else {
            ("Total Income", "Total Expense", "Net Profit")
        };

    vec![
        SummaryItem::value(income_label, total_income, currency),
        SummaryItem::separator("-"),
        SummaryItem::value(expense_label, total_expense, currency),
        SummaryItem::separator("="),
        SummaryItem::Value {
            label: profit_label.to_string(),
            value: profit,
            currency: currency.to_string(),
            indicator: Some(if profit > Decimal::ZERO {
                Indicator::Green
            } else {
                Indicator::Red
            }),
        },
    ]
}
