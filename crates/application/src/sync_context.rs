//! Per-call context carrying cooperative cancellation.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use zuper_core::{AppError, AppResult};

/// Context threaded through every syncer, provisioner and client call.
///
/// Cloning shares the underlying cancellation token, so cancelling any clone
/// cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    cancellation: CancellationToken,
}

impl SyncContext {
    /// Creates a context that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every operation using this context.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fails with [`AppError::Cancelled`] when cancellation was requested.
    pub fn ensure_active(&self, operation: &str) -> AppResult<()> {
        if self.is_cancelled() {
            return Err(cancelled(operation));
        }

        Ok(())
    }

    /// Runs `future` until it completes or the context is cancelled.
    ///
    /// Cancellation is checked first, so an already cancelled context never
    /// polls the future.
    pub async fn run<T, F>(&self, operation: &str, future: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(cancelled(operation)),
            result = future => result,
        }
    }
}

fn cancelled(operation: &str) -> AppError {
    AppError::Cancelled(format!("{operation} was cancelled"))
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;

    #[tokio::test]
    async fn run_returns_future_result_when_active() {
        let context = SyncContext::new();
        let result = context.run("list users", async { Ok(7) }).await;

        assert_eq!(result.ok(), Some(7));
    }

    #[tokio::test]
    async fn cancelled_context_abandons_pending_future() {
        let context = SyncContext::new();
        let clone = context.clone();
        clone.cancel();

        let result: AppResult<()> = context.run("list users", pending()).await;

        assert!(matches!(result, Err(AppError::Cancelled(message)) if message.contains("list users")));
        assert!(context.ensure_active("next page").is_err());
    }
}
