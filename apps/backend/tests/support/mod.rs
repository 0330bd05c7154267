//! Shared helpers for integration tests.
// Not every test binary uses every helper.
#![allow(dead_code)]

pub mod factory;

use backend::{build_state, AppState, DbProfile};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Build a fresh application state on the test profile. The default test
/// profile is an in-memory SQLite database, so every call yields an
/// isolated, fully migrated schema.
pub async fn test_state() -> AppState {
    build_state()
        .with_db(DbProfile::Test)
        .build()
        .await
        .expect("build test state with DB")
}
