#![doc(test(attr(deny(warnings))))]

//! Tally computes balance, monthly cash-flow medians and a year-end
//! projection for budgets stored in JSON ledger snapshots.

pub mod cli;
pub mod errors;
pub mod output;
pub mod utils;

pub use errors::AppError;

/// Version string including the build metadata captured by `build.rs`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TALLY_BUILD_HASH"),
    ", built ",
    env!("TALLY_BUILD_TIMESTAMP"),
    ")"
);

/// Initializes global tracing with the default filter and emits a startup log.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `directive` over the default filter.
pub fn init_with_filter(directive: Option<&str>) {
    utils::init_tracing(directive.unwrap_or(utils::DEFAULT_LOG_DIRECTIVE));
    tracing::debug!("Tally tracing initialized.");
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_filter(Some("tally=debug"));
    }

    #[test]
    fn long_version_starts_with_package_version() {
        assert!(super::LONG_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    }
}
