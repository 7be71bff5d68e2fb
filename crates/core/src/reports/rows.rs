//! Turning rolled-up totals into display rows.

use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{ReportRow, RowKind};
use crate::account::{BalanceMustBe, RootType};
use crate::aggregate::AccumulatedTotals;
use crate::fiscal::{Period, PeriodValues};
use crate::hierarchy::AccountTree;

/// Decimal places shown for period values.
pub const DISPLAY_DECIMAL_PLACES: u32 = 3;

/// Smallest magnitude counted as a value (0.005).
pub const VALUE_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Rounds a value for display, half away from zero.
#[must_use]
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Builds one row per tree node, in pre-order.
///
/// Credit sections are negated so their natural balance shows positive.
#[must_use]
pub fn prepare_rows(
    tree: &AccountTree,
    totals: &[AccumulatedTotals],
    periods: &[Period],
    balance_must_be: BalanceMustBe,
    currency: &str,
) -> Vec<ReportRow> {
    let sign = balance_must_be.sign();
    let year_start_date = periods.first().map(|p| p.year_start_date);
    let year_end_date = periods.last().map(|p| p.year_end_date);

    tree.nodes()
        .iter()
        .zip(totals)
        .map(|(node, accumulated)| {
            let mut values = PeriodValues::new();
            let mut total = Decimal::ZERO;
            let mut has_value = false;
            for (period, raw) in periods.iter().zip(&accumulated.values) {
                let value = round_display(*raw * sign);
                has_value |= value.abs() >= VALUE_THRESHOLD;
                total += value;
                values.insert(period.key.clone(), value);
            }

            let account = &node.account;
            ReportRow {
                kind: RowKind::Account,
                account: account.name.clone(),
                account_name: account.display_name(),
                parent_account: account.parent_account.clone(),
                indent: node.indent,
                values,
                total: Some(total),
                opening_balance: Some(accumulated.opening_balance * sign),
                currency: currency.to_string(),
                has_value,
                is_group: account.is_group,
                account_type: account.account_type.clone(),
                include_in_gross: account.include_in_gross,
                warn_if_negative: false,
                year_start_date,
                year_end_date,
            }
        })
        .collect()
}

/// Drops rows whose whole subtree has no value.
///
/// `rows` must be aligned with the tree's pre-order positions, as returned by
/// [`prepare_rows`]. Kept rows stay in pre-order.
#[must_use]
pub fn prune_zero_rows(
    tree: &AccountTree,
    rows: Vec<ReportRow>,
    show_zero_values: bool,
) -> Vec<ReportRow> {
    if show_zero_values {
        return rows;
    }

    let mut keep: Vec<bool> = rows.iter().map(|r| r.has_value).collect();
    for position in (0..keep.len()).rev() {
        if keep[position]
            && let Some(parent) = tree.nodes().get(position).and_then(|n| n.parent)
            && let Some(flag) = keep.get_mut(parent)
        {
            *flag = true;
        }
    }

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

/// Builds the "Total <root type> (<balance>)" row over top-level rows.
///
/// Returns `None` when there are no rows.
#[must_use]
pub fn total_row(
    rows: &[ReportRow],
    root_type: RootType,
    balance_must_be: BalanceMustBe,
    periods: &[Period],
    currency: &str,
) -> Option<ReportRow> {
    if rows.is_empty() {
        return None;
    }

    let mut values = PeriodValues::zeroed(periods);
    let mut total = Decimal::ZERO;
    let mut opening_balance = Decimal::ZERO;
    for row in rows.iter().filter(|r| r.is_top_level()) {
        for period in periods {
            values.add(&period.key, row.value(&period.key));
        }
        total += row.total.unwrap_or_default();
        opening_balance += row.opening_balance.unwrap_or_default();
    }

    let mut row = ReportRow::synthetic(
        RowKind::Total,
        format!("Total {root_type} ({balance_must_be})"),
        values,
        currency,
    )
    .with_total(total);
    row.opening_balance = Some(opening_balance);
    Some(row)
}
