//! Plain-text and JSON rendering of metric results for the terminal.

use std::fmt;

use colored::Colorize;
use rust_decimal::Decimal;

use tally_core::ProjectionBreakdown;
use tally_domain::{Budget, MetricsResult, TransactionSummary};

const LABEL_WIDTH: usize = 26;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Label,
    Positive,
    Negative,
    Muted,
}

/// Builds display strings, optionally colored, with amounts suffixed by the
/// configured currency code.
pub struct Formatter {
    color: bool,
    currency: String,
}

/// One line of the budget listing.
pub struct BudgetRow<'a> {
    pub budget: &'a Budget,
    pub transaction_count: usize,
    pub total_balance: Decimal,
}

impl Formatter {
    pub fn new(color: bool, currency: impl Into<String>) -> Self {
        Self {
            color,
            currency: currency.into(),
        }
    }

    pub fn header_text(&self, title: impl fmt::Display) -> String {
        self.apply_style(Style::Header, format!("=== {} ===", title))
    }

    pub fn amount_text(&self, amount: Decimal) -> String {
        let text = format!("{} {}", amount.round_dp(2), self.currency);
        if amount.is_sign_negative() && !amount.is_zero() {
            self.apply_style(Style::Negative, text)
        } else {
            self.apply_style(Style::Positive, text)
        }
    }

    pub fn metrics_text(&self, budget: &Budget, result: &MetricsResult) -> String {
        let mut lines = vec![self.header_text(format!("Metrics for {}", budget.name))];
        if result.is_empty() {
            lines.push(self.apply_style(Style::Muted, "no known metrics requested"));
        }
        for (name, value) in result.iter() {
            lines.push(self.row(name.as_str(), self.amount_text(value)));
        }
        lines.join("\n")
    }

    pub fn projection_text(&self, budget: &Budget, breakdown: &ProjectionBreakdown) -> String {
        let mut lines = vec![self.header_text(format!("Year-end projection for {}", budget.name))];
        lines.push(self.row("asOf", breakdown.as_of.to_string()));
        lines.push(self.row("remainingMonths", breakdown.remaining_months.to_string()));
        lines.push(self.row("currentBalance", self.amount_text(breakdown.current_balance)));
        match (breakdown.monthly_income_median, breakdown.monthly_expense_median) {
            (Some(income), Some(expense)) => {
                lines.push(self.row("monthlyIncomeMedian", self.amount_text(income)));
                lines.push(self.row("monthlyExpenseMedian", self.amount_text(expense)));
                lines.push(self.row("monthlyNetFlow", self.amount_text(breakdown.monthly_net_flow)));
            }
            _ => lines.push(self.apply_style(Style::Muted, "final month of the year: no projection applied")),
        }
        lines.push(self.row(
            "projectedYearEndBalance",
            self.amount_text(breakdown.projected_year_end_balance),
        ));
        lines.join("\n")
    }

    pub fn summary_text(&self, budget: &Budget, summary: &TransactionSummary) -> String {
        let mut lines = vec![self.header_text(format!("Transaction summary for {}", budget.name))];
        lines.push(self.row("totalTransactions", summary.total_transactions));
        lines.push(self.row("totalIncome", self.amount_text(summary.total_income)));
        lines.push(self.row("totalExpenses", self.amount_text(summary.total_expenses)));
        lines.push(self.row("netAmount", self.amount_text(summary.net_amount)));

        if !summary.transactions_by_category.is_empty() {
            lines.push(self.header_text("By category"));
        }
        for (category, totals) in &summary.transactions_by_category {
            lines.push(self.row(
                category,
                format!(
                    "+{}  -{}  ({} transactions)",
                    self.amount_text(totals.income),
                    self.amount_text(totals.expenses),
                    totals.count
                ),
            ));
        }

        if !summary.recent_transactions.is_empty() {
            lines.push(self.header_text("Recent transactions"));
        }
        for txn in &summary.recent_transactions {
            let mut line = format!(
                "{}  {}",
                txn.date.format("%Y-%m-%d"),
                self.amount_text(txn.signed_amount())
            );
            if let Some(category) = &txn.category {
                line.push_str(&format!("  [{category}]"));
            }
            if let Some(description) = &txn.description {
                line.push_str(&format!("  {}", self.apply_style(Style::Muted, description)));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    pub fn budgets_text(&self, rows: &[BudgetRow<'_>]) -> String {
        let mut lines = vec![self.header_text(format!("Budgets ({})", rows.len()))];
        for row in rows {
            let status = if row.budget.is_active { "active" } else { "inactive" };
            lines.push(format!(
                "{}  {}  [{}, {} transactions]  {}",
                self.apply_style(Style::Label, &row.budget.name),
                self.apply_style(Style::Muted, row.budget.id),
                status,
                row.transaction_count,
                self.amount_text(row.total_balance),
            ));
        }
        lines.join("\n")
    }

    fn row(&self, label: &str, value: impl fmt::Display) -> String {
        let padded = format!("{label:<width$}", width = LABEL_WIDTH);
        format!("{}{}", self.apply_style(Style::Label, padded), value)
    }

    fn apply_style(&self, style: Style, message: impl fmt::Display) -> String {
        let text = message.to_string();
        if !self.color {
            return text;
        }
        match style {
            Style::Header => text.bold().to_string(),
            Style::Label => text.cyan().to_string(),
            Style::Positive => text.green().to_string(),
            Style::Negative => text.red().to_string(),
            Style::Muted => text.dimmed().to_string(),
        }
    }
}

/// Pretty JSON for machine consumption.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_domain::MetricName;

    #[test]
    fn metrics_text_lists_only_present_metrics() {
        let formatter = Formatter::new(false, "USD");
        let budget = Budget::new("Household");
        let result: MetricsResult = [(MetricName::TotalBalance, dec!(5000))].into_iter().collect();

        let text = formatter.metrics_text(&budget, &result);
        assert!(text.starts_with("=== Metrics for Household ==="));
        assert!(text.contains("totalBalance"));
        assert!(text.contains("5000 USD"));
        assert!(!text.contains("netAmount"));
    }

    #[test]
    fn december_projection_notes_missing_forecast() {
        let formatter = Formatter::new(false, "EUR");
        let budget = Budget::new("Trip");
        let breakdown = ProjectionBreakdown {
            as_of: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
            remaining_months: 0,
            current_balance: dec!(-12.5),
            monthly_income_median: None,
            monthly_expense_median: None,
            monthly_net_flow: Decimal::ZERO,
            projected_year_end_balance: dec!(-12.5),
        };

        let text = formatter.projection_text(&budget, &breakdown);
        assert!(text.contains("no projection applied"));
        assert!(text.contains("-12.5 EUR"));
    }

    #[test]
    fn summary_text_shows_signed_recent_transactions() {
        use chrono::{TimeZone, Utc};
        use std::collections::BTreeMap;
        use tally_domain::{CategoryTotals, Transaction};

        let formatter = Formatter::new(false, "USD");
        let budget = Budget::new("Household");
        let date = Utc.with_ymd_and_hms(2024, 2, 3, 8, 0, 0).unwrap();
        let spent = Transaction::expense(budget.id, dec!(42), date)
            .with_category("groceries")
            .with_description("weekly shop");
        let mut by_category = BTreeMap::new();
        by_category.insert(
            "groceries".to_string(),
            CategoryTotals {
                income: Decimal::ZERO,
                expenses: dec!(42),
                count: 1,
            },
        );
        let summary = TransactionSummary {
            total_transactions: 1,
            total_income: Decimal::ZERO,
            total_expenses: dec!(42),
            net_amount: dec!(-42),
            transactions_by_category: by_category,
            recent_transactions: vec![spent],
        };

        let text = formatter.summary_text(&budget, &summary);
        assert!(text.contains("=== By category ==="));
        assert!(text.contains("(1 transactions)"));
        assert!(text.contains("2024-02-03  -42 USD  [groceries]  weekly shop"));
    }

    #[test]
    fn plain_formatter_emits_no_escape_codes() {
        let formatter = Formatter::new(false, "USD");
        assert!(!formatter.amount_text(dec!(-3)).contains('\u{1b}'));
    }
}
