//! tally-core
//!
//! Metrics, projection and summary services for Tally.
//! Depends on tally-domain. No CLI, no terminal I/O; storage is reached only
//! through the [`LedgerQuery`] contract.

pub mod error;
pub mod memory;
pub mod metrics_service;
pub mod projection_service;
pub mod query;
pub mod selector;
pub mod stats;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use error::{CoreError, CoreResult};
pub use memory::*;
pub use metrics_service::*;
pub use projection_service::*;
pub use query::*;
pub use selector::*;
pub use summary_service::*;
pub use time::*;
