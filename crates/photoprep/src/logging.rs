//! Logging setup for the CLI.
//!
//! Logs go to stderr through the `tracing` stack; stdout is reserved
//! for record output. The configured level and format can be overridden
//! per invocation by `--verbose` / `--json-logs`, and `RUST_LOG` beats
//! everything when set.

use photoprep_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber from the loaded configuration.
pub fn init(config: &Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        known_level(&config.logging.level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs || config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Clamp a configured level string to the tracing level set; anything
/// unrecognized falls back to "info".
fn known_level(level: &str) -> &str {
    match level {
        "error" | "warn" | "info" | "debug" | "trace" => level,
        _ => "info",
    }
}
