//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - Shared application state over an immutable ledger snapshot
//! - JSON error responses

pub mod routes;

use std::sync::Arc;

use axum::Router;
use ledgerview_core::company::Company;
use ledgerview_core::currency::ExchangeRateTable;
use ledgerview_core::fiscal::FiscalYear;
use ledgerview_core::ledger::{InMemoryLedger, LedgerSnapshot};
use ledgerview_shared::ReportConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
///
/// Everything is read-only; each request builds its own report state.
#[derive(Clone)]
pub struct AppState {
    /// Ledger source for accounts and postings.
    pub ledger: Arc<InMemoryLedger>,
    /// Known companies.
    pub companies: Arc<Vec<Company>>,
    /// Fiscal years used for period generation.
    pub fiscal_years: Arc<Vec<FiscalYear>>,
    /// Rates for presentation currency conversion.
    pub exchange_rates: Arc<ExchangeRateTable>,
    /// Report engine defaults.
    pub report: ReportConfig,
}

impl AppState {
    /// Builds state from a loaded snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot, report: ReportConfig) -> Self {
        let ledger = InMemoryLedger::from_snapshot(&snapshot);
        Self {
            ledger: Arc::new(ledger),
            companies: Arc::new(snapshot.companies),
            fiscal_years: Arc::new(snapshot.fiscal_years),
            exchange_rates: Arc::new(ExchangeRateTable::new(snapshot.exchange_rates)),
            report,
        }
    }

    /// Finds a company by name.
    #[must_use]
    pub fn company(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.name == name)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
