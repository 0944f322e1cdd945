//! Per-request cancellation context.
//!
//! Every datastore call receives a [`Context`]. The server derives one per
//! request from its root [`CancellationToken`], so a shutdown that outlives
//! the grace period cancels whatever is still running. This layer never
//! imposes a timeout of its own; it only carries the signal through.

use std::time::Instant;

use tokio_util::sync::CancellationToken;

/// Cancellation and deadline signal for a single request.
///
/// Cloning is cheap and clones observe the same token.
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context driven by `token`.
    pub fn new(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Returns a copy of this context that also expires at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    /// `true` once the token fires or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves when the context is cancelled or its deadline passes.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => {}
                    () = tokio::time::sleep_until(deadline.into()) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}
