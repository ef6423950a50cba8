//! In-memory [`LedgerQuery`] implementation over a transaction snapshot.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_domain::{
    Amounted, DateRange, IncomeExpense, MonthlyBucket, Transaction, TransactionKind, YearMonth,
};

use crate::{error::OrOverflow, query::LedgerQuery, CoreError, CoreResult};

/// Number of times each query operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub sum_by_type: usize,
    pub sum_income_and_expense: usize,
    pub monthly_buckets: usize,
    pub transactions_in_range: usize,
}

impl QueryStats {
    pub fn total(&self) -> usize {
        self.sum_by_type
            + self.sum_income_and_expense
            + self.monthly_buckets
            + self.transactions_in_range
    }
}

#[derive(Debug, Default)]
struct Counters {
    sum_by_type: AtomicUsize,
    sum_income_and_expense: AtomicUsize,
    monthly_buckets: AtomicUsize,
    transactions_in_range: AtomicUsize,
}

/// Holds a read-only transaction snapshot and answers ledger queries from it.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    transactions: Vec<Transaction>,
    counters: Counters,
    unavailable: AtomicBool,
}

impl InMemoryLedger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn stats(&self) -> QueryStats {
        QueryStats {
            sum_by_type: self.counters.sum_by_type.load(Ordering::SeqCst),
            sum_income_and_expense: self.counters.sum_income_and_expense.load(Ordering::SeqCst),
            monthly_buckets: self.counters.monthly_buckets.load(Ordering::SeqCst),
            transactions_in_range: self.counters.transactions_in_range.load(Ordering::SeqCst),
        }
    }

    /// Makes every subsequent query fail with [`CoreError::Storage`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> CoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("ledger store unavailable".into()));
        }
        Ok(())
    }

    fn matching(
        &self,
        budget_id: Uuid,
        kind: TransactionKind,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |txn| txn.budget_id == budget_id && txn.is_kind(kind))
    }
}

#[async_trait]
impl LedgerQuery for InMemoryLedger {
    async fn sum_by_type(&self, budget_id: Uuid, kind: TransactionKind) -> CoreResult<Decimal> {
        self.counters.sum_by_type.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        self.matching(budget_id, kind)
            .map(Amounted::amount)
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
            .or_overflow("transaction sum")
    }

    async fn sum_income_and_expense(&self, budget_id: Uuid) -> CoreResult<IncomeExpense> {
        self.counters
            .sum_income_and_expense
            .fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        self.transactions
            .iter()
            .filter(|txn| txn.budget_id == budget_id)
            .try_fold(IncomeExpense::default(), |mut acc, txn| {
                match txn.kind {
                    TransactionKind::Income => acc.income = acc.income.checked_add(txn.amount())?,
                    TransactionKind::Expense => {
                        acc.expense = acc.expense.checked_add(txn.amount())?
                    }
                }
                Some(acc)
            })
            .or_overflow("income and expense totals")
    }

    async fn monthly_buckets(
        &self,
        budget_id: Uuid,
        kind: TransactionKind,
    ) -> CoreResult<Vec<MonthlyBucket>> {
        self.counters.monthly_buckets.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        let mut by_month: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
        for txn in self.matching(budget_id, kind) {
            let sum = by_month.entry(txn.year_month()).or_default();
            *sum = sum.checked_add(txn.amount()).or_overflow("monthly bucket")?;
        }
        let mut buckets: Vec<MonthlyBucket> = by_month
            .into_iter()
            .map(|(year_month, sum)| MonthlyBucket::new(year_month, sum))
            .collect();
        buckets.sort_by(|a, b| a.sum.cmp(&b.sum));
        Ok(buckets)
    }

    async fn transactions_in_range(
        &self,
        budget_id: Uuid,
        range: DateRange,
    ) -> CoreResult<Vec<Transaction>> {
        self.counters
            .transactions_in_range
            .fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        let mut found: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|txn| txn.budget_id == budget_id && range.contains(txn.date))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }
}
