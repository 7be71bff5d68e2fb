//! Fiscal year and report period types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::error::PeriodError;

/// Fiscal year definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Year name (e.g., "FY2026").
    pub name: String,
    /// Start date of the fiscal year.
    pub start_date: NaiveDate,
    /// End date of the fiscal year.
    pub end_date: NaiveDate,
}

impl FiscalYear {
    /// Returns true if the given date falls within this fiscal year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Length of each report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Periodicity {
    /// One month per period.
    Monthly,
    /// Three months per period.
    Quarterly,
    /// Six months per period.
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
    /// Twelve months per period.
    Yearly,
}

impl Periodicity {
    /// Number of calendar months per period.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::HalfYearly => 6,
            Self::Yearly => 12,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::HalfYearly => "Half-Yearly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "halfyearly" => Ok(Self::HalfYearly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(PeriodError::UnknownPeriodicity(s.to_string())),
        }
    }
}

/// One report column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Unique key within a run (e.g. "jan_2026").
    pub key: String,
    /// Column label.
    pub label: String,
    /// First day covered by the period.
    pub from_date: NaiveDate,
    /// Last day covered by the period.
    pub to_date: NaiveDate,
    /// Start of the whole report.
    pub year_start_date: NaiveDate,
    /// End of the whole report.
    pub year_end_date: NaiveDate,
    /// Fiscal year containing `to_date`.
    #[serde(default)]
    pub to_date_fiscal_year: Option<String>,
}

impl Period {
    /// Returns true if a posting counts toward this period.
    ///
    /// The end date is inclusive. In accumulated mode the start date is
    /// ignored, so every period runs from the beginning of the fetched data.
    #[must_use]
    pub fn includes(
        &self,
        posting_date: NaiveDate,
        fiscal_year: Option<&str>,
        accumulated_values: bool,
        ignore_accumulated_values_for_fy: bool,
    ) -> bool {
        posting_date <= self.to_date
            && (accumulated_values || posting_date >= self.from_date)
            && (!ignore_accumulated_values_for_fy
                || fiscal_year == self.to_date_fiscal_year.as_deref())
    }
}

/// Ordered period key to amount mapping.
///
/// Entries keep the order of the period list they were built from.
/// Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodValues {
    entries: Vec<(String, Decimal)>,
}

impl PeriodValues {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a mapping with a zero for every period.
    #[must_use]
    pub fn zeroed(periods: &[Period]) -> Self {
        periods
            .iter()
            .map(|p| (p.key.clone(), Decimal::ZERO))
            .collect()
    }

    /// Returns the value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Returns the value for a key, zero when absent.
    #[must_use]
    pub fn value(&self, key: &str) -> Decimal {
        self.get(key).unwrap_or(Decimal::ZERO)
    }

    /// Sets the value for a key, appending new keys at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: Decimal) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Adds to the value for a key.
    pub fn add(&mut self, key: &str, delta: Decimal) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 += delta,
            None => self.entries.push((key.to_string(), delta)),
        }
    }

    /// Iterates entries in period order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, v)| *v).sum()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for PeriodValues {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

impl Serialize for PeriodValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
