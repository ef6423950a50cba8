//! Domain models for ledger transactions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub budget_id: Uuid,
    amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(budget_id: Uuid, kind: TransactionKind, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            budget_id,
            amount: normalize_amount(amount),
            kind,
            date,
            category: None,
            description: None,
        }
    }

    pub fn income(budget_id: Uuid, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self::new(budget_id, TransactionKind::Income, amount, date)
    }

    pub fn expense(budget_id: Uuid, amount: Decimal, date: DateTime<Utc>) -> Self {
        Self::new(budget_id, TransactionKind::Expense, amount, date)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Calendar month the transaction is bucketed into.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_datetime(self.date)
    }

    /// Amount with the sign implied by the transaction kind.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount(),
            TransactionKind::Expense => -self.amount(),
        }
    }

    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.kind == kind
    }
}

impl Amounted for Transaction {
    // Snapshots written by other tools may carry negative amounts.
    fn amount(&self) -> Decimal {
        normalize_amount(self.amount)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Enumerates the direction of money movement for a transaction.
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn deserializes_camel_case_snapshot_record() {
        let raw = r#"{
            "id": "6f1c1b8e-2c1e-4bb0-9d2e-0c1f7c6c1a11",
            "budgetId": "0b0a3c52-8a37-4a8e-9a8e-5d0cf1a6e2b4",
            "amount": 125.5,
            "type": "expense",
            "date": "2024-03-14T09:30:00Z",
            "category": "groceries"
        }"#;
        let txn: Transaction = serde_json::from_str(raw).expect("parse transaction");
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount(), dec!(125.5));
        assert_eq!(txn.year_month().to_string(), "2024-03");
        assert_eq!(txn.category.as_deref(), Some("groceries"));
    }

    #[test]
    fn sign_comes_from_kind_only() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let budget = Uuid::new_v4();
        assert_eq!(Transaction::income(budget, dec!(40), date).signed_amount(), dec!(40));
        assert_eq!(Transaction::expense(budget, dec!(40), date).signed_amount(), dec!(-40));
        assert_eq!(Transaction::expense(budget, dec!(-40), date).signed_amount(), dec!(0));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
