//! Tracing setup for the server binary. Tests use
//! `test_bootstrap::logging` instead.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Structured JSON logs to stdout, filtered by `RUST_LOG` when set.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
