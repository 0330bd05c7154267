use tracing_subscriber::EnvFilter;

/// Initialize logging once for unit tests. Safe to call repeatedly.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}
