//! Logging initialization.
//!
//! Structured logging through the `tracing` ecosystem. Output goes to
//! stderr; stdout is reserved for run reports. The `RUST_LOG` environment
//! variable overrides everything else.

use darkroom_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem from config plus CLI overrides.
///
/// Precedence for the level: `RUST_LOG`, then `--verbose` (debug), then
/// `logging.level` from the config file. `--json-logs` or a config format
/// of "json" selects JSON output over the pretty format.
pub fn init(config: &Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_format = json_logs || config.logging.format == "json";
    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
