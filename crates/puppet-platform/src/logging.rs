//! Subscriber setup for hosts that don't install their own.

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or by `default_filter`
/// when the variable is unset. A no-op if a global subscriber already exists.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
