//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to `pyrador=info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyrador=info")),
        )
        .init();
}
