//! CallContext - 呼び出し単位のキャンセルと期限
//!
//! Every backend call the core makes goes through `CallContext::run`, so a
//! request that is cancelled or runs out of time stops waiting on the store and
//! reports `Cancelled` / `DeadlineExceeded` instead of hanging.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::ScopeError;

#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// No deadline, never cancelled unless `cancel()` is called.
    pub fn background() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_in(timeout)
    }

    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Tie this context to a token owned by the caller (e.g. a shutdown token).
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail fast if the context is already dead.
    pub fn check(&self) -> Result<(), ScopeError> {
        if self.cancel.is_cancelled() {
            return Err(ScopeError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(ScopeError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run one backend call under this context.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ScopeError>
    where
        F: Future<Output = Result<T, ScopeError>>,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Err(ScopeError::Cancelled),
                    _ = tokio::time::sleep_until(deadline) => Err(ScopeError::DeadlineExceeded),
                    out = call => out,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Err(ScopeError::Cancelled),
                    out = call => out,
                }
            }
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}
