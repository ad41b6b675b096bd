//! Request-scoped deadline and cancellation for store calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::store::{StoreError, StoreResult};

/// Deadline and cancellation token shared by every store call of one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RequestContext {
    /// A context with no deadline and a fresh token
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every store call made through this context by `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Observe `token`; cancelling it aborts pending store calls.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Drive a store call, giving up on deadline or cancellation.
    pub async fn run<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let Some(deadline) = self.deadline else {
            return tokio::select! {
                _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
                result = call => result,
            };
        };

        let budget = deadline.saturating_duration_since(Instant::now());
        if budget.is_zero() {
            return Err(StoreError::Timeout(budget));
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(StoreError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => Err(StoreError::Timeout(budget)),
            result = call => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = RequestContext::new();
        let result = ctx.run(async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(result, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, StoreError>(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_observes_cancellation() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());
        token.cancel();

        let result = ctx.run(async { Ok::<_, StoreError>(()) }).await;
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_pending() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());

        let canceller = async {
            tokio::task::yield_now().await;
            token.cancel();
        };
        let call = ctx.run(std::future::pending::<StoreResult<()>>());

        let (_, result) = tokio::join!(canceller, call);
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_spans_every_call() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));

        let first = ctx
            .run(async {
                tokio::time::sleep(Duration::from_millis(80)).await;
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(first.is_ok());

        let second = ctx
            .run(async {
                tokio::time::sleep(Duration::from_millis(80)).await;
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(second, Err(StoreError::Timeout(_))));
    }
}
