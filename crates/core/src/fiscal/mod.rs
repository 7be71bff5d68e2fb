//! Fiscal years, report periods and period generation.

pub mod error;
pub mod generator;
pub mod period;

pub use error::PeriodError;
pub use generator::PeriodGenerator;
pub use period::{FiscalYear, Period, PeriodValues, Periodicity};
