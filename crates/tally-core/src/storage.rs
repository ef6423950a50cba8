use std::{collections::HashSet, path::Path, sync::Arc};

use tally_domain::LedgerSnapshot;

use crate::{memory::InMemoryLedger, query::LedgerQuery, CoreError};

/// Abstraction over persistence backends capable of storing ledger snapshots.
///
/// The metrics engine never sees this trait; it only receives the
/// [`LedgerQuery`] returned by [`LedgerStorage::open_query`].
pub trait LedgerStorage: Send + Sync {
    fn save_ledger(&self, name: &str, ledger: &LedgerSnapshot) -> Result<(), CoreError>;
    fn load_ledger(&self, name: &str) -> Result<LedgerSnapshot, CoreError>;
    fn list_ledgers(&self) -> Result<Vec<String>, CoreError>;
    fn delete_ledger(&self, name: &str) -> Result<(), CoreError>;
    fn load_ledger_from_path(&self, path: &Path) -> Result<LedgerSnapshot, CoreError>;

    /// Loads the named ledger and exposes its transactions as a query source.
    fn open_query(&self, name: &str) -> Result<Arc<dyn LedgerQuery>, CoreError> {
        let ledger = self.load_ledger(name)?;
        Ok(snapshot_query(&ledger))
    }
}

/// Query source over an already loaded snapshot.
pub fn snapshot_query(ledger: &LedgerSnapshot) -> Arc<dyn LedgerQuery> {
    Arc::new(InMemoryLedger::new(ledger.transactions.clone()))
}

/// Detects dangling references and other anomalies within a ledger snapshot.
pub fn ledger_warnings(ledger: &LedgerSnapshot) -> Vec<String> {
    let budget_ids: HashSet<_> = ledger.budgets.iter().map(|b| b.id).collect();
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();

    for txn in &ledger.transactions {
        if !budget_ids.contains(&txn.budget_id) {
            warnings.push(format!(
                "transaction {} references unknown budget {}",
                txn.id, txn.budget_id
            ));
        }
        if !seen.insert(txn.id) {
            warnings.push(format!("transaction {} appears more than once", txn.id));
        }
    }
    warnings
}
