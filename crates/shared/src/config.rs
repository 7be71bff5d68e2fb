//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger snapshot configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Report engine defaults.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Where the ledger snapshot is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Path to the JSON ledger snapshot.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "data/ledger.json".to_string()
}

/// Defaults for the profit and loss engine.
///
/// Every request starts from these values; request parameters may override
/// `accumulated_values`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Maximum hierarchy depth rendered. Deeper accounts are omitted.
    #[serde(default = "default_depth_cap")]
    pub depth_cap: usize,
    /// Cumulative period values (each period runs from the report start).
    #[serde(default = "default_true")]
    pub accumulated_values: bool,
    /// Only fetch postings from the first period's fiscal year start.
    #[serde(default = "default_true")]
    pub only_current_fiscal_year: bool,
    /// Skip period closing voucher postings.
    #[serde(default)]
    pub ignore_closing_entries: bool,
    /// Only count postings whose fiscal year matches the period's.
    #[serde(default)]
    pub ignore_accumulated_values_for_fy: bool,
    /// Keep rows even when the whole subtree is zero.
    #[serde(default)]
    pub show_zero_values: bool,
    /// Append a "Total <root type>" row to every section.
    #[serde(default = "default_true")]
    pub include_total_rows: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            depth_cap: default_depth_cap(),
            accumulated_values: true,
            only_current_fiscal_year: true,
            ignore_closing_entries: false,
            ignore_accumulated_values_for_fy: false,
            show_zero_values: false,
            include_total_rows: true,
        }
    }
}

fn default_depth_cap() -> usize {
    20
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGERVIEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
