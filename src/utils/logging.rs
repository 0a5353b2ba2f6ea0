// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes tracing output for the migration run.
/// Filter levels come from `RUST_LOG`; "info" when unset.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).init();

    tracing::debug!("Logging setup complete.");
}
