//! Year-end balance forecast built on the monthly medians.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use tally_domain::YearMonth;

use crate::{error::OrOverflow, metrics_service::MetricsService, time::Clock, CoreResult};

/// Every intermediate value behind a year-end projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionBreakdown {
    pub as_of: NaiveDate,
    pub remaining_months: u32,
    pub current_balance: Decimal,
    /// `None` when no forward projection applies (December).
    pub monthly_income_median: Option<Decimal>,
    pub monthly_expense_median: Option<Decimal>,
    pub monthly_net_flow: Decimal,
    pub projected_year_end_balance: Decimal,
}

/// Projects the balance at the end of the current calendar year by assuming
/// the median monthly net flow repeats for every remaining month.
#[derive(Clone)]
pub struct ProjectionService {
    metrics: MetricsService,
    clock: Arc<dyn Clock>,
}

impl ProjectionService {
    pub fn new(metrics: MetricsService, clock: Arc<dyn Clock>) -> Self {
        Self { metrics, clock }
    }

    pub fn metrics(&self) -> &MetricsService {
        &self.metrics
    }

    /// Resolves an optional as-of date against the injected clock.
    pub fn as_of_or_today(&self, as_of: Option<NaiveDate>) -> NaiveDate {
        as_of.unwrap_or_else(|| self.clock.today())
    }

    pub async fn projected_year_end_balance(
        &self,
        budget_id: Uuid,
        start_balance: Option<Decimal>,
        as_of: Option<NaiveDate>,
    ) -> CoreResult<Decimal> {
        let breakdown = self
            .projection_breakdown(budget_id, start_balance, as_of)
            .await?;
        Ok(breakdown.projected_year_end_balance)
    }

    pub async fn projection_breakdown(
        &self,
        budget_id: Uuid,
        start_balance: Option<Decimal>,
        as_of: Option<NaiveDate>,
    ) -> CoreResult<ProjectionBreakdown> {
        let as_of = self.as_of_or_today(as_of);
        let remaining_months = YearMonth::from_date(as_of).remaining_in_year();

        if remaining_months == 0 {
            let current_balance = self.metrics.total_balance(budget_id, start_balance).await?;
            debug!(%budget_id, %as_of, "final month of the year, no projection applied");
            return Ok(ProjectionBreakdown {
                as_of,
                remaining_months,
                current_balance,
                monthly_income_median: None,
                monthly_expense_median: None,
                monthly_net_flow: Decimal::ZERO,
                projected_year_end_balance: current_balance,
            });
        }

        let (current_balance, income_median, expense_median) = tokio::try_join!(
            self.metrics.total_balance(budget_id, start_balance),
            self.metrics.monthly_income_median(budget_id),
            self.metrics.monthly_expense_median(budget_id),
        )?;
        let monthly_net_flow = income_median
            .checked_sub(expense_median)
            .or_overflow("monthly net flow")?;
        let projected = monthly_net_flow
            .checked_mul(Decimal::from(remaining_months))
            .and_then(|flow| current_balance.checked_add(flow))
            .or_overflow("year-end projection")?;
        debug!(%budget_id, %as_of, remaining_months, %monthly_net_flow, %projected, "year-end projection");

        Ok(ProjectionBreakdown {
            as_of,
            remaining_months,
            current_balance,
            monthly_income_median: Some(income_median),
            monthly_expense_median: Some(expense_median),
            monthly_net_flow,
            projected_year_end_balance: projected,
        })
    }
}
