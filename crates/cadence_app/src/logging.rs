//! Logging bootstrap

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, honoring `RUST_LOG`
///
/// Falls back to `info` when `RUST_LOG` is unset. Calling this more than once
/// is harmless.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`], with a caller-chosen fallback filter
pub fn init_with_default(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
