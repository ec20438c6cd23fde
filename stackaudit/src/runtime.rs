//! Optional per-request timeouts.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Runs a future, giving up after `limit` when one is set.
///
/// Returns `None` on timeout. Without a limit the future is simply awaited.
pub async fn run_with_timeout<F>(limit: Option<Duration>, future: F) -> Option<F::Output>
where
    F: Future,
{
    match limit {
        Some(duration) => timeout(duration, future).await.ok(),
        None => Some(future.await),
    }
}
