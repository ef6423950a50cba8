use std::sync::Once;

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_DIRECTIVE: &str = "tally=info";

/// Initializes the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `directive`.
pub fn init_tracing(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
