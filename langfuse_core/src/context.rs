/**
 * Per-call execution context: cancellation plus an optional deadline.
 *
 * Every `ingest` call takes a `RequestContext`. When the context's token is
 * cancelled or its deadline passes, the in-flight request future is dropped
 * (which aborts the HTTP exchange) and the call fails with a
 * `TransportError`.
 *
 * Contexts are cheap to clone; clones share the same token.
 */
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Expires `timeout` from now. A timeout too large to represent means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Bound to a token owned by the caller (e.g. a shutdown signal).
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /**
     * Adds or tightens a deadline. An earlier existing deadline wins.
     */
    pub fn and_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn and_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.and_deadline(deadline),
            None => self,
        }
    }

    /**
     * A context cancelled together with `self`, but whose own `cancel()`
     * does not propagate upwards.
     */
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /**
     * Why this context is already done, if it is.
     *
     * Explicit cancellation takes precedence over an expired deadline.
     */
    pub fn err(&self) -> Option<TransportError> {
        if self.token.is_cancelled() {
            return Some(TransportError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportError::DeadlineExceeded),
            _ => None,
        }
    }

    /**
     * Resolves once the context is cancelled or its deadline passes.
     * Pending forever for a background context.
     */
    pub async fn done(&self) -> TransportError {
        match self.deadline {
            Some(deadline) => {
                let deadline = tokio::time::Instant::from_std(deadline);
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => TransportError::Cancelled,
                    () = tokio::time::sleep_until(deadline) => TransportError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                TransportError::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_never_done() {
        let ctx = RequestContext::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let ctx = RequestContext::background();
        let clone = ctx.clone();
        clone.cancel();

        assert!(ctx.is_cancelled());
        assert!(matches!(ctx.err(), Some(TransportError::Cancelled)));
    }

    #[test]
    fn test_child_follows_parent_only() {
        let parent = RequestContext::background();
        let child = parent.child();

        child.cancel();
        assert!(!parent.is_cancelled());

        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = RequestContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(matches!(ctx.err(), Some(TransportError::DeadlineExceeded)));
    }

    #[test]
    fn test_and_deadline_keeps_earliest() {
        let soon = Instant::now() + Duration::from_secs(1);
        let later = soon + Duration::from_secs(60);

        let ctx = RequestContext::with_deadline(soon).and_deadline(later);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    /**
     * An unrepresentable timeout leaves the context without a deadline.
     */
    #[test]
    fn test_huge_timeout_means_no_deadline() {
        let ctx = RequestContext::with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());

        let soon = Instant::now() + Duration::from_secs(1);
        let ctx = RequestContext::with_deadline(soon).and_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), Some(soon));

        let ctx = RequestContext::background().and_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn test_done_fires_on_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(20));
        assert!(matches!(ctx.done().await, TransportError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_done_fires_on_external_token() {
        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(token.clone());

        let waiter = tokio::spawn(async move { ctx.done().await });
        token.cancel();

        let reason = waiter.await.expect("task completes");
        assert!(matches!(reason, TransportError::Cancelled));
    }
}
