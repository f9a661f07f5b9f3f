//! Logging and tracing setup.
//!
//! All logs go to **stderr**; stdout carries command output (JSON for the
//! `beverage` CLI) and must stay clean.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`, `beverage_provider=debug`)
//!
//! ```bash
//! # Show request-level logs from the client
//! RUST_LOG=beverage_provider::client=debug beverage list
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn try_init_with(default_level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
}

/// Initialize the default logging subscriber at `info` level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LOG_LEVEL);
}

/// Initialize logging with a custom default level, used if `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    if let Err(err) = try_init_with(default_level) {
        panic!("failed to initialize logging: {}", err);
    }
}

/// Try to initialize logging, returning false if already initialized.
pub fn try_init_logging() -> bool {
    try_init_with(DEFAULT_LOG_LEVEL).is_ok()
}
