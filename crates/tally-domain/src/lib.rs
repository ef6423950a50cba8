//! tally-domain
//!
//! Pure domain models (LedgerSnapshot, Budget, Transaction, monthly buckets, metric names,
//! transaction summaries).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod budget;
pub mod common;
pub mod ledger;
pub mod metrics;
pub mod summary;
pub mod transaction;

pub use budget::*;
pub use common::*;
pub use ledger::*;
pub use metrics::*;
pub use summary::*;
pub use transaction::*;
