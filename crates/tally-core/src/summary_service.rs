//! Transaction summary for one budget over an optional date range.

use std::{collections::BTreeMap, sync::Arc};

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use tally_domain::{
    Amounted, CategoryTotals, DateRange, TransactionKind, TransactionSummary,
    RECENT_TRANSACTION_LIMIT, UNCATEGORIZED,
};

use crate::{error::OrOverflow, query::LedgerQuery, CoreResult};

#[derive(Clone)]
pub struct SummaryService {
    ledger: Arc<dyn LedgerQuery>,
}

impl SummaryService {
    pub fn new(ledger: Arc<dyn LedgerQuery>) -> Self {
        Self { ledger }
    }

    /// Totals, per-category breakdown and the latest transactions inside `range`.
    pub async fn summarize(
        &self,
        budget_id: Uuid,
        range: DateRange,
    ) -> CoreResult<TransactionSummary> {
        let mut transactions = self.ledger.transactions_in_range(budget_id, range).await?;

        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut by_category: BTreeMap<String, CategoryTotals> = BTreeMap::new();
        for txn in &transactions {
            let key = txn.category.as_deref().unwrap_or(UNCATEGORIZED);
            let totals = by_category.entry(key.to_string()).or_default();
            totals.count += 1;
            match txn.kind {
                TransactionKind::Income => {
                    total_income = total_income
                        .checked_add(txn.amount())
                        .or_overflow("summary income")?;
                    totals.income = totals
                        .income
                        .checked_add(txn.amount())
                        .or_overflow("category income")?;
                }
                TransactionKind::Expense => {
                    total_expenses = total_expenses
                        .checked_add(txn.amount())
                        .or_overflow("summary expenses")?;
                    totals.expenses = totals
                        .expenses
                        .checked_add(txn.amount())
                        .or_overflow("category expenses")?;
                }
            }
        }
        let net_amount = total_income
            .checked_sub(total_expenses)
            .or_overflow("summary net amount")?;

        let total_transactions = transactions.len();
        transactions.truncate(RECENT_TRANSACTION_LIMIT);
        debug!(%budget_id, total_transactions, categories = by_category.len(), "transaction summary");

        Ok(TransactionSummary {
            total_transactions,
            total_income,
            total_expenses,
            net_amount,
            transactions_by_category: by_category,
            recent_transactions: transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_domain::Transaction;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap()
    }

    fn service(transactions: Vec<Transaction>) -> (Arc<InMemoryLedger>, SummaryService) {
        let ledger = Arc::new(InMemoryLedger::new(transactions));
        (ledger.clone(), SummaryService::new(ledger))
    }

    #[tokio::test]
    async fn groups_by_category_and_lists_newest_first() {
        let budget = Uuid::new_v4();
        let (ledger, summaries) = service(vec![
            Transaction::income(budget, dec!(3000), at(1, 1)).with_category("salary"),
            Transaction::expense(budget, dec!(120), at(1, 5)).with_category("groceries"),
            Transaction::expense(budget, dec!(80), at(2, 5)).with_category("groceries"),
            Transaction::income(budget, dec!(15), at(2, 9)).with_category("groceries"),
            Transaction::expense(budget, dec!(40), at(3, 1)).with_description("cash"),
            Transaction::expense(Uuid::new_v4(), dec!(999), at(3, 2)),
        ]);

        let summary = summaries.summarize(budget, DateRange::default()).await.unwrap();
        assert_eq!(summary.total_transactions, 5);
        assert_eq!(summary.total_income, dec!(3015));
        assert_eq!(summary.total_expenses, dec!(240));
        assert_eq!(summary.net_amount, dec!(2775));

        let groceries = summary.transactions_by_category["groceries"];
        assert_eq!(groceries.count, 3);
        assert_eq!(groceries.income, dec!(15));
        assert_eq!(groceries.expenses, dec!(200));
        assert_eq!(summary.transactions_by_category[UNCATEGORIZED].count, 1);

        assert_eq!(summary.recent_transactions[0].date, at(3, 1));
        assert_eq!(summary.recent_transactions[4].date, at(1, 1));
        assert_eq!(ledger.stats().transactions_in_range, 1);
    }

    #[tokio::test]
    async fn date_range_filters_and_recent_list_is_capped() {
        let budget = Uuid::new_v4();
        let transactions = (1..=20)
            .map(|day| Transaction::expense(budget, dec!(1), at(4, day)))
            .collect();
        let (_, summaries) = service(transactions);

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 4, 3),
            NaiveDate::from_ymd_opt(2024, 4, 17),
        );
        let summary = summaries.summarize(budget, range).await.unwrap();
        assert_eq!(summary.total_transactions, 15);
        assert_eq!(summary.total_expenses, dec!(15));
        assert_eq!(summary.net_amount, dec!(-15));
        assert_eq!(summary.recent_transactions.len(), RECENT_TRANSACTION_LIMIT);
        assert_eq!(summary.recent_transactions[0].date, at(4, 17));
    }

    #[tokio::test]
    async fn empty_budget_has_empty_summary() {
        let (_, summaries) = service(Vec::new());
        let summary = summaries
            .summarize(Uuid::new_v4(), DateRange::default())
            .await
            .unwrap();
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.net_amount, Decimal::ZERO);
        assert!(summary.transactions_by_category.is_empty());
        assert!(summary.recent_transactions.is_empty());
    }
}
