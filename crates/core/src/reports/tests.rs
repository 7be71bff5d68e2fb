//! Statement tests.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ProfitAndLossService;
use super::types::{
    Indicator, ProfitAndLossReport, ProfitAndLossRequest, RowKind, SectionKind, StatementOptions,
    SummaryItem,
};
use crate::account::{Account, COST_OF_GOODS_SOLD, RootType, TAX};
use crate::company::Company;
use crate::currency::{ExchangeRate, ExchangeRateTable};
use crate::fiscal::{PeriodGenerator, Periodicity};
use crate::fixtures::{account, company, date, monthly_period, months, posting, typed_account};
use crate::ledger::{
    AccountQuery, FinanceBookScope, InMemoryLedger, LedgerFilter, LedgerSource, Posting,
    PostingQuery, SourceError,
};

fn chart() -> Vec<Account> {
    vec![
        account("Income", None, RootType::Income, true),
        account("Sales", Some("Income"), RootType::Income, false),
        account("Service Income", Some("Income"), RootType::Income, false),
        account("Expenses", None, RootType::Expense, true),
        typed_account("Cost of Sales", Some("Expenses"), false, COST_OF_GOODS_SOLD),
        account("Indirect", Some("Expenses"), RootType::Expense, true),
        account("Rent", Some("Indirect"), RootType::Expense, false),
        account("Travel", Some("Indirect"), RootType::Expense, false),
        typed_account("Income Tax", Some("Expenses"), false, TAX),
    ]
}

fn january() -> ProfitAndLossRequest {
    ProfitAndLossRequest::new(company(), vec![monthly_period(2026, 1)], Periodicity::Monthly)
}

fn run(accounts: Vec<Account>, postings: Vec<Posting>, request: &ProfitAndLossRequest) -> ProfitAndLossReport {
    let ledger = InMemoryLedger::new(accounts, postings);
    ProfitAndLossService::new(&ledger, StatementOptions::default())
        .generate(request)
        .unwrap()
}

fn summary_value(report: &ProfitAndLossReport, index: usize) -> Decimal {
    match &report.summary[index] {
        SummaryItem::Value { value, .. } => *value,
        SummaryItem::Separator { .. } => panic!("expected a value at {index}"),
    }
}

#[test]
fn test_income_credits_display_positive() {
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(100)),
            posting("Sales", date(2026, 1, 20), dec!(0), dec!(50)),
        ],
        &january(),
    );

    let sales = report.row_by_account("Sales").unwrap();
    assert_eq!(sales.value("jan_2026"), dec!(150));
    assert_eq!(report.row_by_account("Income").unwrap().value("jan_2026"), dec!(150));
    assert_eq!(
        report.row_by_account("Total Income (Credit)").unwrap().value("jan_2026"),
        dec!(150)
    );
    assert!(report.row_by_account("Service Income").is_none());
}

#[test]
fn test_gross_profit_is_income_less_cogs() {
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Cost of Sales", date(2026, 1, 6), dec!(400), dec!(0)),
        ],
        &january(),
    );

    let gross = report.row(RowKind::GrossProfit).unwrap();
    assert_eq!(gross.value("jan_2026"), dec!(600));
    assert_eq!(gross.total, Some(dec!(600)));
    assert!(gross.warn_if_negative);

    let total_cogs = report.row_by_account("Total COGS").unwrap();
    assert_eq!(total_cogs.value("jan_2026"), dec!(400));
    let header = report.row(RowKind::Header).unwrap();
    assert_eq!(header.account_name, "Cost of Goods Sold (COGS)");
    assert_eq!(header.account, "COGS Total");
}

#[test]
fn test_no_operating_expenses_omits_block() {
    let accounts = vec![
        account("Income", None, RootType::Income, true),
        account("Sales", Some("Income"), RootType::Income, false),
        typed_account("Cost of Sales", None, false, COST_OF_GOODS_SOLD),
    ];
    let report = run(
        accounts,
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Cost of Sales", date(2026, 1, 6), dec!(400), dec!(0)),
        ],
        &january(),
    );

    assert!(report.row_by_account("Total OPEX").is_none());
    assert!(report.row(RowKind::OperatingProfit).is_none());
    assert!(report.row_by_account("Taxes and Zakat").is_none());
    assert_eq!(report.row(RowKind::GrossProfit).unwrap().value("jan_2026"), dec!(600));
    assert_eq!(summary_value(&report, 2), dec!(0));
}

#[test]
fn test_zero_net_profit_row_is_omitted() {
    let accounts = vec![
        account("Sales", None, RootType::Income, false),
        account("Rent", None, RootType::Expense, false),
    ];
    // Rent row and the expense total row each carry 500.
    let report = run(
        accounts,
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Rent", date(2026, 1, 6), dec!(500), dec!(0)),
        ],
        &january(),
    );

    assert!(report.row(RowKind::NetProfit).is_none());
    assert_eq!(summary_value(&report, 4), dec!(0));
    assert!(matches!(
        report.summary[4],
        SummaryItem::Value {
            indicator: Some(Indicator::Red),
            ..
        }
    ));
}

#[test]
fn test_full_statement_layout() {
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Cost of Sales", date(2026, 1, 6), dec!(400), dec!(0)),
            posting("Rent", date(2026, 1, 7), dec!(100), dec!(0)),
            posting("Income Tax", date(2026, 1, 8), dec!(50), dec!(0)),
        ],
        &january(),
    );

    let kinds: Vec<RowKind> = report.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Account,
            RowKind::Account,
            RowKind::Total,
            RowKind::Header,
            RowKind::Account,
            RowKind::Total,
            RowKind::Subtotal,
            RowKind::GrossProfit,
            RowKind::Account,
            RowKind::Account,
            RowKind::Account,
            RowKind::Total,
            RowKind::Subtotal,
            RowKind::OperatingProfit,
            RowKind::Subtotal,
            RowKind::Account,
            RowKind::Total,
            RowKind::NetProfit,
        ]
    );

    let labels: Vec<&str> = report.rows.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(labels[8..11], ["Expenses", "Indirect", "Rent"]);
    assert_eq!(labels[14], "Taxes and Zakat");
    assert_eq!(report.row_by_account("Taxes and Zakat").unwrap().value("jan_2026"), dec!(50));
    assert_eq!(report.row_by_account("Total OPEX").unwrap().value("jan_2026"), dec!(100));
    assert_eq!(
        report.row(RowKind::OperatingProfit).unwrap().value("jan_2026"),
        dec!(500)
    );
    assert_eq!(report.currency, "USD");
    assert!(report.warnings.is_empty());
}

#[test]
fn test_net_profit_counts_every_opex_row() {
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Rent", date(2026, 1, 7), dec!(100), dec!(0)),
        ],
        &january(),
    );

    // Expenses, Indirect, Rent and the expense total row each carry 100.
    assert_eq!(report.row(RowKind::NetProfit).unwrap().value("jan_2026"), dec!(600));
    assert_eq!(
        report.row(RowKind::OperatingProfit).unwrap().value("jan_2026"),
        dec!(900)
    );
    assert_eq!(summary_value(&report, 0), dec!(1000));
    assert_eq!(summary_value(&report, 2), dec!(100));
    assert_eq!(summary_value(&report, 4), dec!(600));
}

#[test]
fn test_net_profit_without_total_rows_counts_account_rows_only() {
    let ledger = InMemoryLedger::new(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(1000)),
            posting("Rent", date(2026, 1, 7), dec!(100), dec!(0)),
        ],
    );
    let options = StatementOptions {
        include_total_rows: false,
        ..StatementOptions::default()
    };
    let report = ProfitAndLossService::new(&ledger, options)
        .generate(&january())
        .unwrap();

    assert_eq!(report.row(RowKind::NetProfit).unwrap().value("jan_2026"), dec!(700));
}

#[test]
fn test_final_period_rows_carry_last_key_only() {
    let mut request = ProfitAndLossRequest::new(company(), months(2026, 1, 3), Periodicity::Monthly);
    request.accumulated_values = Some(false);
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 5), dec!(0), dec!(300)),
            posting("Rent", date(2026, 2, 7), dec!(40), dec!(0)),
            posting("Rent", date(2026, 3, 7), dec!(60), dec!(0)),
        ],
        &request,
    );

    let total_opex = report.row_by_account("Total OPEX").unwrap();
    assert_eq!(total_opex.values.len(), 1);
    assert_eq!(total_opex.value("mar_2026"), dec!(60));
    let operating = report.row(RowKind::OperatingProfit).unwrap();
    assert_eq!(operating.values.len(), 1);
    assert_eq!(operating.value("mar_2026"), dec!(-60));

    let gross = report.row(RowKind::GrossProfit).unwrap();
    assert_eq!(gross.values.len(), 3);
    assert_eq!(gross.value("jan_2026"), dec!(300));
    assert_eq!(gross.total, Some(dec!(300)));

    assert_eq!(report.columns.len(), 5);
    assert_eq!(report.columns[0].fieldname, "account");
    assert_eq!(report.columns[1].fieldname, "jan_2026");
    assert_eq!(report.columns[4].fieldname, "total");
}

#[test]
fn test_accumulated_values_from_request() {
    let mut request = ProfitAndLossRequest::new(company(), months(2026, 1, 2), Periodicity::Monthly);
    let postings = vec![
        posting("Sales", date(2026, 1, 5), dec!(0), dec!(100)),
        posting("Sales", date(2026, 2, 5), dec!(0), dec!(10)),
    ];

    let accumulated = run(chart(), postings.clone(), &request);
    assert_eq!(accumulated.row_by_account("Sales").unwrap().value("feb_2026"), dec!(110));

    request.accumulated_values = Some(false);
    let discrete = run(chart(), postings, &request);
    assert_eq!(discrete.row_by_account("Sales").unwrap().value("feb_2026"), dec!(10));
}

#[test]
fn test_posting_after_last_period_is_excluded() {
    let report = run(
        chart(),
        vec![
            posting("Sales", date(2026, 1, 31), dec!(0), dec!(100)),
            posting("Sales", date(2026, 2, 1), dec!(0), dec!(999)),
        ],
        &january(),
    );
    assert_eq!(report.row_by_account("Sales").unwrap().value("jan_2026"), dec!(100));
}

#[test]
fn test_yearly_summary_labels() {
    let periods = PeriodGenerator::new(&[])
        .generate(date(2026, 1, 1), date(2026, 12, 31), Periodicity::Yearly)
        .unwrap();
    let request = ProfitAndLossRequest::new(company(), periods, Periodicity::Yearly);
    let report = run(
        chart(),
        vec![posting("Sales", date(2026, 6, 5), dec!(0), dec!(100))],
        &request,
    );

    let labels: Vec<&str> = report
        .summary
        .iter()
        .map(|item| match item {
            SummaryItem::Value { label, .. } => label.as_str(),
            SummaryItem::Separator { value } => value.as_str(),
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            "Total Income This Year",
            "-",
            "Total Expense This Year",
            "=",
            "Profit This Year"
        ]
    );
    assert!(matches!(
        report.summary[4],
        SummaryItem::Value {
            indicator: Some(Indicator::Green),
            ..
        }
    ));
}

#[test]
fn test_empty_period_list() {
    let ledger = InMemoryLedger::default();
    let request = ProfitAndLossRequest::new(company(), Vec::new(), Periodicity::Monthly);
    let err = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .generate(&request)
        .unwrap_err();
    assert!(matches!(err, ReportError::EmptyPeriodList));
}

#[test]
fn test_period_key_clashing_with_row_field() {
    let mut period = monthly_period(2026, 1);
    period.key = "total".to_string();
    let request = ProfitAndLossRequest::new(company(), vec![period], Periodicity::Monthly);
    let ledger = InMemoryLedger::new(chart(), Vec::new());
    let err = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .generate(&request)
        .unwrap_err();
    assert!(matches!(err, ReportError::ReservedPeriodKey(ref key) if key == "total"));
}

struct BrokenLedger;

impl LedgerSource for BrokenLedger {
    fn accounts(&self, _query: &AccountQuery) -> Result<Vec<Account>, SourceError> {
        Ok(chart())
    }

    fn postings(&self, _query: &PostingQuery) -> Result<Vec<Posting>, SourceError> {
        Err(SourceError::Io(std::io::Error::other("ledger offline")))
    }
}

#[test]
fn test_source_failure_propagates() {
    let err = ProfitAndLossService::new(&BrokenLedger, StatementOptions::default())
        .generate(&january())
        .unwrap_err();
    assert!(matches!(err, ReportError::Source(SourceError::Io(_))));
}

#[test]
fn test_finance_book_conflict_is_fatal() {
    let ledger = InMemoryLedger::new(chart(), Vec::new());
    let mut request = january();
    request.company = Company {
        default_finance_book: Some("Main Book".to_string()),
        ..company()
    };
    request.filter = LedgerFilter::new()
        .with_finance_book("Tax Book")
        .include_default_book_entries(true);

    let err = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .generate(&request)
        .unwrap_err();
    assert!(matches!(err, ReportError::FinanceBookConflict(_)));
}

#[test]
fn test_presentation_currency_conversion() {
    let ledger = InMemoryLedger::new(
        chart(),
        vec![posting("Sales", date(2026, 1, 5), dec!(0), dec!(100))],
    );
    let rates = ExchangeRateTable::new(vec![ExchangeRate::new("USD", "EUR", dec!(0.9), date(2026, 1, 1))]);
    let mut request = january();
    request.presentation_currency = Some("EUR".to_string());

    let report = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .with_exchange_rates(&rates)
        .generate(&request)
        .unwrap();
    assert_eq!(report.currency, "EUR");
    let sales = report.row_by_account("Sales").unwrap();
    assert_eq!(sales.value("jan_2026"), dec!(90));
    assert_eq!(sales.currency, "EUR");
}

#[test]
fn test_missing_exchange_rate() {
    let ledger = InMemoryLedger::new(
        chart(),
        vec![posting("Sales", date(2026, 1, 5), dec!(0), dec!(100))],
    );
    let mut request = january();
    request.presentation_currency = Some("JPY".to_string());

    let err = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .generate(&request)
        .unwrap_err();
    assert!(matches!(err, ReportError::NoExchangeRate(_)));
}

#[test]
fn test_total_rows_can_be_disabled() {
    let ledger = InMemoryLedger::new(
        chart(),
        vec![posting("Sales", date(2026, 1, 5), dec!(0), dec!(100))],
    );
    let options = StatementOptions {
        include_total_rows: false,
        ..StatementOptions::default()
    };
    let report = ProfitAndLossService::new(&ledger, options)
        .generate(&january())
        .unwrap();
    assert!(report.row(RowKind::Total).is_none());
    assert_eq!(summary_value(&report, 0), dec!(100));
}

#[test]
fn test_empty_selection_is_empty_section() {
    let ledger = InMemoryLedger::new(chart(), Vec::new());
    let section = ProfitAndLossService::new(&ledger, StatementOptions::default())
        .section(&january(), SectionKind::Taxes, &FinanceBookScope::default())
        .unwrap();
    assert!(section.is_empty());
    assert!(section.total_row.is_none());

    let no_accounts = InMemoryLedger::default();
    let section = ProfitAndLossService::new(&no_accounts, StatementOptions::default())
        .section(&january(), SectionKind::Income, &FinanceBookScope::default())
        .unwrap();
    assert!(section.is_empty());
}

proptest! {
    /// Income shows credits as positive and every row total is the sum of its values.
    #[test]
    fn prop_sign_and_totals(credits in prop::collection::vec(1i64..10_000_000, 1..20)) {
        let postings: Vec<Posting> = credits
            .iter()
            .map(|c| posting("Sales", date(2026, 1, 10), dec!(0), Decimal::new(*c, 2)))
            .collect();
        let expected: Decimal = postings.iter().map(|p| p.credit).sum();

        let report = run(chart(), postings, &january());
        let sales = report.row_by_account("Sales").unwrap();
        prop_assert_eq!(sales.value("jan_2026"), expected);
        prop_assert!(sales.value("jan_2026") > Decimal::ZERO);
        for row in report.rows.iter().filter(|r| r.kind == RowKind::Account) {
            prop_assert_eq!(row.total, Some(row.values.total()));
        }
    }

    /// A kept account row has a value or sits above one; a valued row is never dropped.
    #[test]
    fn prop_pruning_law(
        amounts in prop::collection::vec((0usize..3, 0i64..3), 0..10)
    ) {
        let leaves = ["Rent", "Travel", "Cost of Sales"];
        let postings: Vec<Posting> = amounts
            .iter()
            .map(|(leaf, cents)| posting(leaves[*leaf], date(2026, 1, 10), Decimal::new(*cents, 0), dec!(0)))
            .collect();
        let report = run(chart(), postings.clone(), &january());

        for leaf in leaves {
            let net: Decimal = postings.iter().filter(|p| p.account == leaf).map(Posting::delta).sum();
            prop_assert_eq!(report.row_by_account(leaf).is_some(), net != Decimal::ZERO);
        }
        let indirect_has_value = ["Rent", "Travel"]
            .iter()
            .any(|leaf| report.row_by_account(leaf).is_some());
        prop_assert_eq!(report.row_by_account("Indirect").is_some(), indirect_has_value);
        prop_assert_eq!(report.row_by_account("Expenses").is_some(), indirect_has_value);
    }

    /// Generating twice from the same inputs yields the same statement.
    #[test]
    fn prop_idempotent(
        amounts in prop::collection::vec((0usize..4, 1i64..1_000_000, 1u32..=3), 0..15)
    ) {
        let accounts = ["Sales", "Cost of Sales", "Rent", "Income Tax"];
        let postings: Vec<Posting> = amounts
            .iter()
            .map(|(acc, cents, month)| {
                let amount = Decimal::new(*cents, 2);
                if *acc == 0 {
                    posting(accounts[*acc], date(2026, *month, 3), dec!(0), amount)
                } else {
                    posting(accounts[*acc], date(2026, *month, 3), amount, dec!(0))
                }
            })
            .collect();
        let request = ProfitAndLossRequest::new(company(), months(2026, 1, 3), Periodicity::Monthly);

        let first = run(chart(), postings.clone(), &request);
        let second = run(chart(), postings, &request);
        prop_assert_eq!(first, second);
    }
}
