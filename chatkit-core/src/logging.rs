//! Logging setup
//!
//! The crate logs through `tracing`. Hosts that do not install their own
//! subscriber can call [`init_logging`].

use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Installs a fmt subscriber filtered by `filter`.
///
/// `RUST_LOG` directives take precedence when set. Returns false if a global
/// subscriber was already installed.
pub fn init_logging(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}
