//! Report period generation.

use std::collections::HashSet;

use chrono::{Datelike, Days, Months, NaiveDate};

use super::error::PeriodError;
use super::period::{FiscalYear, Period, Periodicity};

/// Builds ordered period lists from a company's fiscal years.
pub struct PeriodGenerator<'a> {
    fiscal_years: &'a [FiscalYear],
}

impl<'a> PeriodGenerator<'a> {
    /// Creates a generator over the given fiscal years.
    #[must_use]
    pub const fn new(fiscal_years: &'a [FiscalYear]) -> Self {
        Self { fiscal_years }
    }

    /// Finds the fiscal year containing a date.
    #[must_use]
    pub fn fiscal_year_for(&self, date: NaiveDate) -> Option<&'a FiscalYear> {
        self.fiscal_years.iter().find(|fy| fy.contains_date(date))
    }

    /// Builds periods spanning whole fiscal years, from `from_year` through `to_year`.
    pub fn for_fiscal_years(
        &self,
        from_year: &str,
        to_year: &str,
        periodicity: Periodicity,
    ) -> Result<Vec<Period>, PeriodError> {
        let start = self.named(from_year)?.start_date;
        let end = self.named(to_year)?.end_date;
        self.generate(start, end, periodicity)
    }

    /// Builds periods covering `start..=end`.
    ///
    /// Each period starts where the previous one ended and is clipped to `end`.
    pub fn generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        periodicity: Periodicity,
    ) -> Result<Vec<Period>, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidDateRange { start, end });
        }

        let mut periods = Vec::new();
        let mut used_keys = HashSet::new();
        let mut from_date = start;

        while from_date <= end {
            let next_start = from_date
                .checked_add_months(Months::new(periodicity.months()))
                .ok_or(PeriodError::DateOverflow(from_date))?;
            let to_date = next_start
                .checked_sub_days(Days::new(1))
                .ok_or(PeriodError::DateOverflow(next_start))?
                .min(end);

            let mut key = format!(
                "{}_{}",
                to_date.format("%b").to_string().to_lowercase(),
                to_date.year()
            );
            if !used_keys.insert(key.clone()) {
                key = to_date.format("%Y_%m_%d").to_string();
                used_keys.insert(key.clone());
            }

            periods.push(Period {
                key,
                label: self.label(from_date, to_date, periodicity),
                from_date,
                to_date,
                year_start_date: start,
                year_end_date: end,
                to_date_fiscal_year: self.fiscal_year_for(to_date).map(|fy| fy.name.clone()),
            });

            from_date = next_start;
        }

        Ok(periods)
    }

    fn named(&self, name: &str) -> Result<&'a FiscalYear, PeriodError> {
        self.fiscal_years
            .iter()
            .find(|fy| fy.name == name)
            .ok_or_else(|| PeriodError::UnknownFiscalYear(name.to_string()))
    }

    fn label(&self, from_date: NaiveDate, to_date: NaiveDate, periodicity: Periodicity) -> String {
        match periodicity {
            Periodicity::Monthly => to_date.format("%b %Y").to_string(),
            Periodicity::Yearly => self
                .fiscal_years
                .iter()
                .find(|fy| fy.start_date == from_date && fy.end_date == to_date)
                .map_or_else(
                    || format!("{}-{}", from_date.format("%b %Y"), to_date.format("%b %Y")),
                    |fy| fy.name.clone(),
                ),
            Periodicity::Quarterly | Periodicity::HalfYearly => {
                format!("{}-{}", from_date.format("%b %Y"), to_date.format("%b %Y"))
            }
        }
    }
}
