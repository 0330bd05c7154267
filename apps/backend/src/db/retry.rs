//! Bounded retry for transactions that lose a per-room serialization race
//! or hit transient store trouble.
//!
//! Deterministic business outcomes (RoomFull, Disbanded, Unauthenticated,
//! NotFound) are never retried; only optimistic-lock conflicts and
//! transient infrastructure failures are.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 25;

/// True for the error classes worth re-running the whole transaction for.
pub fn is_transient(err: &AppError) -> bool {
    matches!(
        err,
        AppError::DbUnavailable { .. }
            | AppError::Conflict {
                code: "VERSION_CONFLICT",
                ..
            }
    )
}

/// Run `op` (a closure producing a fresh transaction attempt per call) until
/// it succeeds, fails with a non-transient error, or the attempt budget is
/// spent. Backoff doubles per attempt.
pub async fn run_serialized<R, F, Fut>(mut op: F) -> Result<R, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, AppError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if is_transient(&err) && attempt < MAX_ATTEMPTS => {
                let delay = Duration::from_millis(BASE_BACKOFF_MS << (attempt - 1));
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "transient store failure, retrying transaction");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
