//! Logging setup.
//!
//! The provider logs through `tracing`. Every operation runs inside a span
//! named `provider.<operation>`, so a subscriber with span events enabled
//! shows the full request flow. Output goes to **stderr**: stdout belongs to
//! the host handshake.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`, `hemmer_provider_simple=debug`)
//!
//! ```bash
//! # Show plan/apply decisions and synthesized ids
//! RUST_LOG=hemmer_provider_simple=debug ./my-host
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber.
///
/// Filters with `RUST_LOG`, falling back to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Example
///
/// ```no_run
/// hemmer_provider_simple::init_logging();
/// tracing::info!("Provider starting");
/// ```
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LEVEL);
}

/// Initialize logging with a custom default level.
///
/// Like [`init_logging`], but `default_level` (e.g. `"debug"`) is used when
/// `RUST_LOG` is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter_or(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Safe to call from every test or from a host that may embed several
/// providers in one process.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(filter_or(DEFAULT_LEVEL))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only
    // idempotent initialization is exercised here.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("hemmer_provider_simple=debug").is_ok());
        assert!(EnvFilter::try_new("warn,hemmer_provider_simple::simple=trace").is_ok());
    }

    #[test]
    fn test_try_init_is_idempotent() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
    }
}
