//! Persisted ledger snapshot: the budgets and the transactions attached to them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{budget::Budget, transaction::Transaction};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    /// Resolves a budget by UUID, falling back to a case-insensitive name match.
    pub fn find_budget(&self, key: &str) -> Option<&Budget> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(budget) = self.budget(id) {
                return Some(budget);
            }
        }
        self.budgets
            .iter()
            .find(|budget| budget.name.eq_ignore_ascii_case(key))
    }

    pub fn active_budgets(&self) -> impl Iterator<Item = &Budget> {
        self.budgets.iter().filter(|budget| budget.is_active)
    }

    pub fn transaction_count(&self, budget_id: Uuid) -> usize {
        self.transactions
            .iter()
            .filter(|txn| txn.budget_id == budget_id)
            .count()
    }
}
