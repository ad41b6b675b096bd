use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Shutdown coordinator for graceful application shutdown.
///
/// Shutdown happens in two steps. A signal starts the drain: the server stops
/// accepting connections and waits for in-flight requests. Work derived from
/// [`token`](Self::token) is only cancelled by [`abort`](Self::abort), once the
/// drain is over or has outlived its timeout.
#[derive(Clone, Default)]
pub struct ShutdownCoordinator {
    drain: CancellationToken,
    abort: CancellationToken,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for request-scoped work; cancelled by [`abort`](Self::abort).
    pub fn token(&self) -> CancellationToken {
        self.abort.clone()
    }

    /// Begin draining. In-flight work keeps running.
    pub fn shutdown(&self) {
        if !self.drain.is_cancelled() {
            info!("Initiating graceful shutdown");
            self.drain.cancel();
        }
    }

    /// Cancel every holder of [`token`](Self::token).
    pub fn abort(&self) {
        if !self.abort.is_cancelled() {
            info!("Cancelling in-flight work");
            self.abort.cancel();
        }
    }

    /// Wait for SIGINT/SIGTERM (or a programmatic [`shutdown`](Self::shutdown)).
    pub async fn wait_for_signal(&self) {
        tokio::select! {
            _ = shutdown_signal() => self.shutdown(),
            _ = self.drain.cancelled() => {},
        }
    }

    /// Abort in-flight work if the drain runs longer than `timeout`.
    ///
    /// Returns early once [`abort`](Self::abort) has been called elsewhere.
    pub async fn abort_after_drain(&self, timeout: Duration) {
        let overdue = async {
            self.drain.cancelled().await;
            tokio::time::sleep(timeout).await;
        };

        tokio::select! {
            _ = overdue => {
                warn!("Drain exceeded {:?}, aborting in-flight requests", timeout);
                self.abort();
            }
            _ = self.abort.cancelled() => {},
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_leaves_work_running_until_abort() {
        let coordinator = ShutdownCoordinator::new();
        let child = coordinator.token().child_token();

        coordinator.shutdown();
        assert!(!child.is_cancelled());

        coordinator.abort();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_wait_for_signal_returns_on_programmatic_shutdown() {
        let coordinator = ShutdownCoordinator::new();
        let waiter = coordinator.clone();
        let handle = tokio::spawn(async move { waiter.wait_for_signal().await });

        coordinator.shutdown();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("wait_for_signal should return after shutdown")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_after_drain_fires_once_timeout_elapses() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();
        let watchdog = coordinator.clone();
        let handle =
            tokio::spawn(async move { watchdog.abort_after_drain(Duration::from_millis(100)).await });

        coordinator.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!token.is_cancelled());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(token.is_cancelled());
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_after_drain_waits_for_a_signal() {
        let coordinator = ShutdownCoordinator::new();
        let result = tokio::time::timeout(
            Duration::from_secs(60),
            coordinator.abort_after_drain(Duration::from_millis(10)),
        )
        .await;

        assert!(result.is_err());
        assert!(!coordinator.token().is_cancelled());
    }
}
