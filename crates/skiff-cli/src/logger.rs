//! Logging setup for the Skiff CLI.
//!
//! Structured logging via the `tracing` ecosystem: `--verbose` for debug,
//! `--quiet` for errors only, `RUST_LOG` respected otherwise.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Per-crate filter directives for the requested verbosity.
fn filter_directives(level: &str) -> String {
    ["skiff_preset", "skiff_runtime", "skiff_cli"]
        .map(|target| format!("{target}={level}"))
        .join(",")
}

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(filter_directives("debug"))
    } else if quiet {
        EnvFilter::new(filter_directives("error"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
