//! Derived, transient metric shapes: monthly buckets, metric names and results.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::YearMonth;

/// Aggregated sum of one transaction kind within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year_month: YearMonth,
    pub sum: Decimal,
}

impl MonthlyBucket {
    pub fn new(year_month: YearMonth, sum: Decimal) -> Self {
        Self { year_month, sum }
    }
}

/// Income and expense totals for one budget, gathered together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeExpense {
    pub income: Decimal,
    pub expense: Decimal,
}

impl IncomeExpense {
    /// `income - expense`, `None` when the difference does not fit a `Decimal`.
    pub fn checked_net(&self) -> Option<Decimal> {
        self.income.checked_sub(self.expense)
    }
}

/// Canonical metric identifiers understood by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricName {
    TotalBalance,
    MonthlyIncomeMedian,
    MonthlyExpenseMedian,
    ProjectedYearEndBalance,
    TotalIncome,
    TotalExpenses,
    NetAmount,
}

impl MetricName {
    pub const ALL: [MetricName; 7] = [
        MetricName::TotalBalance,
        MetricName::MonthlyIncomeMedian,
        MetricName::MonthlyExpenseMedian,
        MetricName::ProjectedYearEndBalance,
        MetricName::TotalIncome,
        MetricName::TotalExpenses,
        MetricName::NetAmount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::TotalBalance => "totalBalance",
            MetricName::MonthlyIncomeMedian => "monthlyIncomeMedian",
            MetricName::MonthlyExpenseMedian => "monthlyExpenseMedian",
            MetricName::ProjectedYearEndBalance => "projectedYearEndBalance",
            MetricName::TotalIncome => "totalIncome",
            MetricName::TotalExpenses => "totalExpenses",
            MetricName::NetAmount => "netAmount",
        }
    }

    /// Exact, case-sensitive lookup of a canonical name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == name.trim())
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::lookup(value).ok_or_else(|| format!("unknown metric `{value}`"))
    }
}

impl Serialize for MetricName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Metric name to value mapping holding only the requested keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsResult(BTreeMap<MetricName, Decimal>);

impl MetricsResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: MetricName, value: Decimal) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: MetricName) -> Option<Decimal> {
        self.0.get(&name).copied()
    }

    pub fn contains(&self, name: MetricName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, Decimal)> + '_ {
        self.0.iter().map(|(name, value)| (*name, *value))
    }
}

impl FromIterator<(MetricName, Decimal)> for MetricsResult {
    fn from_iter<T: IntoIterator<Item = (MetricName, Decimal)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn canonical_names_round_trip_through_lookup() {
        for metric in MetricName::ALL {
            assert_eq!(MetricName::lookup(metric.as_str()), Some(metric));
        }
        assert_eq!(MetricName::lookup("unknownMetric"), None);
        assert_eq!(MetricName::lookup("TOTALBALANCE"), None);
    }

    #[test]
    fn result_serializes_with_canonical_keys() {
        let result: MetricsResult = [
            (MetricName::MonthlyIncomeMedian, dec!(250)),
            (MetricName::TotalBalance, dec!(1000.50)),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&result).expect("serialize result");
        assert_eq!(json["totalBalance"], "1000.50");
        assert_eq!(json["monthlyIncomeMedian"], "250");
        assert_eq!(json.as_object().map(|map| map.len()), Some(2));
    }
}
