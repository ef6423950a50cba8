use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Ledger storage failure: {0}")]
    Storage(String),
    #[error("Ledger not found: {0}")]
    LedgerNotFound(String),
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Amount overflow while computing {0}")]
    Overflow(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Turns the `None` of a `checked_*` decimal operation into [`CoreError::Overflow`].
pub(crate) trait OrOverflow<T> {
    fn or_overflow(self, context: &str) -> CoreResult<T>;
}

impl<T> OrOverflow<T> for Option<T> {
    fn or_overflow(self, context: &str) -> CoreResult<T> {
        self.ok_or_else(|| CoreError::Overflow(context.to_string()))
    }
}
