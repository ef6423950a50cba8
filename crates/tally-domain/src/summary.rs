//! Per-budget transaction summary: totals, per-category breakdown and the
//! most recent activity, optionally restricted to a date range.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::transaction::Transaction;

/// Category key for transactions that carry none.
pub const UNCATEGORIZED: &str = "uncategorized";

/// How many transactions `recent_transactions` keeps.
pub const RECENT_TRANSACTION_LIMIT: usize = 10;

/// Inclusive calendar-day window evaluated in UTC. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        let day = moment.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// Income, expense and count for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_transactions: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_amount: Decimal,
    pub transactions_by_category: BTreeMap<String, CategoryTotals>,
    /// Newest first, at most [`RECENT_TRANSACTION_LIMIT`] entries.
    pub recent_transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn range_bounds_are_inclusive_whole_days() {
        let range = DateRange::new(Some(day(10)), Some(day(20)));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 20, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 21, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap()));
    }

    #[test]
    fn open_range_contains_everything() {
        let moment = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        assert!(DateRange::default().contains(moment));
        assert!(DateRange::new(None, Some(day(1))).contains(moment));
    }
}
