//! Read-only query contract the metrics engine consumes from a ledger store.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_domain::{DateRange, IncomeExpense, MonthlyBucket, Transaction, TransactionKind};

use crate::CoreResult;

/// Filtered sum, grouped-sum and listing access to the transactions of one budget.
///
/// This is the engine's only point of contact with persistent storage.
/// Implementations must not mutate the ledger; errors are passed through the
/// engine to the caller untouched.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Sum of `amount` over the budget's transactions of `kind`; zero if none match.
    async fn sum_by_type(&self, budget_id: Uuid, kind: TransactionKind) -> CoreResult<Decimal>;

    /// Income and expense sums together. Stores able to compute both in one
    /// pass should override this.
    async fn sum_income_and_expense(&self, budget_id: Uuid) -> CoreResult<IncomeExpense> {
        let (income, expense) = tokio::try_join!(
            self.sum_by_type(budget_id, TransactionKind::Income),
            self.sum_by_type(budget_id, TransactionKind::Expense),
        )?;
        Ok(IncomeExpense { income, expense })
    }

    /// One bucket per calendar month that has at least one transaction of
    /// `kind`, ordered by ascending sum.
    async fn monthly_buckets(
        &self,
        budget_id: Uuid,
        kind: TransactionKind,
    ) -> CoreResult<Vec<MonthlyBucket>>;

    /// The budget's transactions dated inside `range`, newest first.
    async fn transactions_in_range(
        &self,
        budget_id: Uuid,
        range: DateRange,
    ) -> CoreResult<Vec<Transaction>>;
}
