use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use tally_core::{FixedClock, InMemoryLedger, MetricRequest, MetricSelector, SummaryService};
use tally_domain::{Budget, DateRange, Transaction};
use tokio::runtime::Runtime;

const CATEGORIES: [&str; 4] = ["rent", "groceries", "salary", "travel"];

fn populated_ledger(count: i64) -> (Budget, Arc<InMemoryLedger>) {
    let budget = Budget::new("Bench").with_start_balance(Decimal::new(100_000, 2));
    let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let transactions = (0..count)
        .map(|i| {
            let date = start + Duration::hours(i * 7);
            let amount = Decimal::new(1_000 + (i % 977) * 13, 2);
            let txn = if i % 3 == 0 {
                Transaction::income(budget.id, amount, date)
            } else {
                Transaction::expense(budget.id, amount, date)
            };
            txn.with_category(CATEGORIES[(i % 4) as usize])
        })
        .collect();
    (budget, Arc::new(InMemoryLedger::new(transactions)))
}

fn selector_benchmarks(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let (budget, ledger) = populated_ledger(20_000);
    let clock = Arc::new(FixedClock::on(
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    ));
    let selector = MetricSelector::new(ledger.clone(), clock);

    c.bench_function("select_all_metrics", |b| {
        b.iter(|| {
            runtime
                .block_on(selector.select(black_box(&budget), &MetricRequest::All))
                .expect("metrics")
        })
    });

    let single = MetricRequest::One("totalBalance".into());
    c.bench_function("select_total_balance", |b| {
        b.iter(|| {
            runtime
                .block_on(selector.select(black_box(&budget), &single))
                .expect("metrics")
        })
    });

    let summaries = SummaryService::new(ledger);
    let range = DateRange::new(NaiveDate::from_ymd_opt(2023, 1, 1), None);
    c.bench_function("summarize_since_2023", |b| {
        b.iter(|| {
            runtime
                .block_on(summaries.summarize(black_box(budget.id), range))
                .expect("summary")
        })
    });
}

criterion_group!(benches, selector_benchmarks);
criterion_main!(benches);
