//! Bounded retry for the one flaky enrichment step.
//!
//! The contract is deliberately narrow: exactly one retry, fixed backoff,
//! triggered by a missing primary signal rather than by an error. Errors
//! and non-critical steps are never retried.

use std::future::Future;
use std::time::Duration;

/// Run `operation`, and re-run it once after `backoff` when `needs_retry`
/// flags the first result. The retry result is kept only when it no longer
/// needs a retry; otherwise the first result stands.
pub(crate) async fn retry_once_when<T, F, Fut, P>(
    backoff: Duration,
    mut operation: F,
    needs_retry: P,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    let first = operation().await;
    if !needs_retry(&first) {
        return first;
    }

    tracing::debug!(backoff_ms = backoff.as_millis(), "primary signal missing — retrying once");
    tokio::time::sleep(backoff).await;

    let second = operation().await;
    if needs_retry(&second) {
        first
    } else {
        second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn does_not_retry_when_signal_present() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once_when(
            Duration::ZERO,
            || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    42_u64
                }
            },
            |v| *v == 0,
        )
        .await;
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_exactly_once_and_keeps_the_better_result() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once_when(
            Duration::ZERO,
            || {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        0_u64
                    } else {
                        7_u64
                    }
                }
            },
            |v| *v == 0,
        )
        .await;
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keeps_first_result_when_retry_is_no_better() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_once_when(
            Duration::ZERO,
            || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    0_u64
                }
            },
            |v| *v == 0,
        )
        .await;
        assert_eq!(result, 0);
        // One retry, never a third attempt.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
