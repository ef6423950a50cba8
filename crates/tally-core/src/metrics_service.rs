//! Balance and monthly cash-flow statistics computed from ledger queries.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use tally_domain::TransactionKind;

use crate::{error::OrOverflow, query::LedgerQuery, stats::median_of_buckets, CoreResult};

/// Stateless metric calculations over an injected [`LedgerQuery`].
///
/// Absence of data never produces an error: an empty ledger yields the start
/// balance and zero-valued sums and medians. Store failures are returned as-is;
/// results that do not fit a `Decimal` fail with [`crate::CoreError::Overflow`].
#[derive(Clone)]
pub struct MetricsService {
    ledger: Arc<dyn LedgerQuery>,
}

impl MetricsService {
    pub fn new(ledger: Arc<dyn LedgerQuery>) -> Self {
        Self { ledger }
    }

    /// `start_balance + income - expenses` over all of the budget's transactions.
    pub async fn total_balance(
        &self,
        budget_id: Uuid,
        start_balance: Option<Decimal>,
    ) -> CoreResult<Decimal> {
        let start = start_balance.unwrap_or(Decimal::ZERO);
        let totals = self.ledger.sum_income_and_expense(budget_id).await?;
        debug!(%budget_id, %start, income = %totals.income, expense = %totals.expense, "total balance");
        totals
            .checked_net()
            .and_then(|net| start.checked_add(net))
            .or_overflow("total balance")
    }

    pub async fn total_income(&self, budget_id: Uuid) -> CoreResult<Decimal> {
        self.ledger
            .sum_by_type(budget_id, TransactionKind::Income)
            .await
    }

    pub async fn total_expenses(&self, budget_id: Uuid) -> CoreResult<Decimal> {
        self.ledger
            .sum_by_type(budget_id, TransactionKind::Expense)
            .await
    }

    /// Income minus expenses; negative when spending exceeds earnings.
    pub async fn net_amount(&self, budget_id: Uuid) -> CoreResult<Decimal> {
        let (income, expenses) =
            tokio::try_join!(self.total_income(budget_id), self.total_expenses(budget_id))?;
        income.checked_sub(expenses).or_overflow("net amount")
    }

    pub async fn monthly_income_median(&self, budget_id: Uuid) -> CoreResult<Decimal> {
        self.monthly_median(budget_id, TransactionKind::Income).await
    }

    pub async fn monthly_expense_median(&self, budget_id: Uuid) -> CoreResult<Decimal> {
        self.monthly_median(budget_id, TransactionKind::Expense)
            .await
    }

    async fn monthly_median(&self, budget_id: Uuid, kind: TransactionKind) -> CoreResult<Decimal> {
        let buckets = self.ledger.monthly_buckets(budget_id, kind).await?;
        let median = median_of_buckets(&buckets);
        debug!(%budget_id, %kind, months = buckets.len(), %median, "monthly median");
        Ok(median)
    }
}
