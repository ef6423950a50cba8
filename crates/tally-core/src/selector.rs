//! On-demand metric selection: only the computations backing the requested
//! names are created and awaited.

use std::{collections::BTreeSet, sync::Arc};

use chrono::NaiveDate;
use futures::future::{try_join_all, BoxFuture};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use tally_domain::{Budget, MetricName, MetricsResult};

use crate::{
    metrics_service::MetricsService, projection_service::ProjectionService, query::LedgerQuery,
    time::Clock, CoreResult,
};

/// Which metrics a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricRequest {
    /// No specific request: every canonical metric.
    #[default]
    All,
    /// A single literal metric name. Commas are not split here; use
    /// [`MetricRequest::from_names`] for query-style input.
    One(String),
    Many(Vec<String>),
}

impl MetricRequest {
    /// Builds a request from query-style input. Each entry may itself be a
    /// comma separated list; blank entries are skipped and no names at all
    /// means [`MetricRequest::All`].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = names
            .into_iter()
            .flat_map(|entry| {
                entry
                    .as_ref()
                    .split(',')
                    .map(|token| token.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|token| !token.is_empty())
            .collect();
        match tokens.len() {
            0 => MetricRequest::All,
            1 => MetricRequest::One(tokens.remove(0)),
            _ => MetricRequest::Many(tokens),
        }
    }

    /// Canonical metrics named by the request. Unknown names are dropped.
    pub fn resolve(&self) -> BTreeSet<MetricName> {
        let names: &[String] = match self {
            MetricRequest::All => return MetricName::ALL.into_iter().collect(),
            MetricRequest::One(name) => std::slice::from_ref(name),
            MetricRequest::Many(names) if names.is_empty() => {
                return MetricName::ALL.into_iter().collect()
            }
            MetricRequest::Many(names) => names,
        };
        names
            .iter()
            .filter_map(|name| {
                let metric = MetricName::lookup(name);
                if metric.is_none() {
                    warn!(metric = %name, "ignoring unknown metric name");
                }
                metric
            })
            .collect()
    }
}

/// Assembles a [`MetricsResult`] for a budget from the requested metric names.
#[derive(Clone)]
pub struct MetricSelector {
    projection: ProjectionService,
}

impl MetricSelector {
    pub fn new(ledger: Arc<dyn LedgerQuery>, clock: Arc<dyn Clock>) -> Self {
        Self::from_projection(ProjectionService::new(MetricsService::new(ledger), clock))
    }

    pub fn from_projection(projection: ProjectionService) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &ProjectionService {
        &self.projection
    }

    pub async fn select(
        &self,
        budget: &Budget,
        requested: &MetricRequest,
    ) -> CoreResult<MetricsResult> {
        self.select_as_of(budget, requested, None).await
    }

    /// Runs the requested computations concurrently. The first failure fails
    /// the whole selection.
    pub async fn select_as_of(
        &self,
        budget: &Budget,
        requested: &MetricRequest,
        as_of: Option<NaiveDate>,
    ) -> CoreResult<MetricsResult> {
        let selected = requested.resolve();
        if selected.is_empty() {
            debug!(budget_id = %budget.id, "no known metrics requested");
            return Ok(MetricsResult::new());
        }
        let as_of = self.projection.as_of_or_today(as_of);
        debug!(budget_id = %budget.id, metrics = selected.len(), %as_of, "selecting metrics");

        let table: Vec<_> = selected
            .into_iter()
            .map(|metric| self.computation(metric, budget, as_of))
            .collect();
        let values = try_join_all(table).await?;
        Ok(values.into_iter().collect())
    }

    fn computation<'a>(
        &'a self,
        metric: MetricName,
        budget: &'a Budget,
        as_of: NaiveDate,
    ) -> BoxFuture<'a, CoreResult<(MetricName, Decimal)>> {
        let metrics = self.projection.metrics();
        let id = budget.id;
        let start = budget.start_balance;
        let pending: BoxFuture<'a, CoreResult<Decimal>> = match metric {
            MetricName::TotalBalance => Box::pin(metrics.total_balance(id, start)),
            MetricName::MonthlyIncomeMedian => Box::pin(metrics.monthly_income_median(id)),
            MetricName::MonthlyExpenseMedian => Box::pin(metrics.monthly_expense_median(id)),
            MetricName::ProjectedYearEndBalance => Box::pin(
                self.projection
                    .projected_year_end_balance(id, start, Some(as_of)),
            ),
            MetricName::TotalIncome => Box::pin(metrics.total_income(id)),
            MetricName::TotalExpenses => Box::pin(metrics.total_expenses(id)),
            MetricName::NetAmount => Box::pin(metrics.net_amount(id)),
        };
        Box::pin(async move { pending.await.map(|value| (metric, value)) })
    }
}
