//! Builders shared by unit tests.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::account::{Account, ReportType, RootType};
use crate::company::Company;
use crate::fiscal::{Period, PeriodGenerator, Periodicity};
use crate::ledger::Posting;

pub const COMPANY: &str = "ACME";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn company() -> Company {
    Company::new(COMPANY, "USD")
}

pub fn account(name: &str, parent: Option<&str>, root_type: RootType, is_group: bool) -> Account {
    let report_type = match root_type {
        RootType::Income | RootType::Expense => ReportType::ProfitAndLoss,
        _ => ReportType::BalanceSheet,
    };
    Account {
        name: name.to_string(),
        account_name: name.to_string(),
        account_number: None,
        parent_account: parent.map(str::to_string),
        root_type,
        report_type,
        account_type: None,
        is_group,
        include_in_gross: false,
        company: COMPANY.to_string(),
    }
}

pub fn typed_account(
    name: &str,
    parent: Option<&str>,
    is_group: bool,
    account_type: &str,
) -> Account {
    Account {
        account_type: Some(account_type.to_string()),
        ..account(name, parent, RootType::Expense, is_group)
    }
}

pub fn posting(account: &str, posting_date: NaiveDate, debit: Decimal, credit: Decimal) -> Posting {
    Posting {
        company: COMPANY.to_string(),
        account: account.to_string(),
        debit,
        credit,
        posting_date,
        fiscal_year: Some(format!("FY{}", posting_date.year())),
        is_opening: false,
        is_cancelled: false,
        is_period_closing: false,
        project: None,
        cost_center: None,
        finance_book: None,
        dimensions: Default::default(),
    }
}

/// Single calendar month; the report year is the calendar year.
pub fn monthly_period(year: i32, month: u32) -> Period {
    let from_date = date(year, month, 1);
    let to_date = from_date
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap();
    Period {
        key: format!("{}_{year}", from_date.format("%b").to_string().to_lowercase()),
        label: from_date.format("%b %Y").to_string(),
        from_date,
        to_date,
        year_start_date: date(year, 1, 1),
        year_end_date: date(year, 12, 31),
        to_date_fiscal_year: Some(format!("FY{year}")),
    }
}

/// Consecutive months `first..=last` of one year, report starting at `first`.
pub fn months(year: i32, first: u32, last: u32) -> Vec<Period> {
    PeriodGenerator::new(&[])
        .generate(
            date(year, first, 1),
            monthly_period(year, last).to_date,
            Periodicity::Monthly,
        )
        .unwrap()
}
