//! Report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use super::error_response;
use crate::AppState;
use ledgerview_core::fiscal::{PeriodGenerator, Periodicity};
use ledgerview_core::ledger::LedgerFilter;
use ledgerview_core::reports::{
    ProfitAndLossReport, ProfitAndLossRequest, ProfitAndLossService, ReportError, StatementOptions,
};
use ledgerview_shared::{AppError, AppResult};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company}/reports/profit-and-loss",
        get(get_profit_and_loss),
    )
}

/// Query parameters for the profit and loss statement.
#[derive(Debug, Deserialize)]
pub struct ProfitAndLossQuery {
    /// First day of the report.
    pub from_date: NaiveDate,
    /// Last day of the report.
    pub to_date: NaiveDate,
    /// Column length (defaults to Monthly).
    pub periodicity: Option<String>,
    /// Running totals instead of per-period movement.
    pub accumulated_values: Option<bool>,
    /// Currency to present amounts in.
    pub presentation_currency: Option<String>,
    /// Finance book.
    pub finance_book: Option<String>,
    /// Also include the company's default finance book.
    pub include_default_book_entries: Option<bool>,
    /// Projects (comma-separated).
    pub project: Option<String>,
    /// Cost centers (comma-separated).
    pub cost_center: Option<String>,
}

/// Parses a comma-separated list, dropping empty items.
fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_filter(query: &ProfitAndLossQuery) -> LedgerFilter {
    LedgerFilter {
        project: query.project.as_deref().map(parse_list).unwrap_or_default(),
        cost_center: query
            .cost_center
            .as_deref()
            .map(parse_list)
            .unwrap_or_default(),
        finance_book: query
            .finance_book
            .clone()
            .filter(|book| !book.is_empty()),
        include_default_book_entries: query.include_default_book_entries.unwrap_or(false),
        ..LedgerFilter::default()
    }
}

/// GET /companies/{company}/reports/profit-and-loss
async fn get_profit_and_loss(
    State(state): State<AppState>,
    Path(company): Path<String>,
    Query(query): Query<ProfitAndLossQuery>,
) -> impl IntoResponse {
    match build_report(&state, &company, &query) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            if err.status_code() >= 500 {
                error!(error = %err, "Failed to generate profit and loss statement");
            }
            error_response(&err)
        }
    }
}

fn build_report(
    state: &AppState,
    company: &str,
    query: &ProfitAndLossQuery,
) -> AppResult<ProfitAndLossReport> {
    let company = state
        .company(company)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Company {company}")))?;

    let periodicity = match query.periodicity.as_deref() {
        None | Some("") => Periodicity::Monthly,
        Some(name) => name.parse::<Periodicity>().map_err(ReportError::from)?,
    };

    let periods = PeriodGenerator::new(&state.fiscal_years)
        .generate(query.from_date, query.to_date, periodicity)
        .map_err(ReportError::from)?;

    info!(
        company = %company.name,
        periods = periods.len(),
        periodicity = %periodicity,
        "Generating profit and loss statement"
    );

    let request = ProfitAndLossRequest {
        filter: build_filter(query),
        presentation_currency: query
            .presentation_currency
            .clone()
            .filter(|c| !c.is_empty()),
        accumulated_values: query.accumulated_values,
        ..ProfitAndLossRequest::new(company, periods, periodicity)
    };

    let report = ProfitAndLossService::new(
        state.ledger.as_ref(),
        StatementOptions::from(&state.report),
    )
    .with_exchange_rates(state.exchange_rates.as_ref())
    .generate(&request)?;
    Ok(report)
}
