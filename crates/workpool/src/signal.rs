//! Deadline-bounded cancellation.
//!
//! A [`CancelSignal`] is a one-shot broadcast built on a
//! [`CancellationToken`]. It fires on its own once the deadline elapses, or
//! earlier when its owner calls [`CancelSignal::release`]. Once fired it stays
//! fired, and every clone observes the same state.

use core::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};

/// A cloneable, idempotent cancellation signal with a deadline.
#[derive(Clone, Debug)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// Creates a signal that fires `timeout` from now.
    ///
    /// A background timer task is armed to fire the signal at the deadline.
    /// The timer exits early if the signal is released first. A zero
    /// `timeout` fires the signal before this function returns, so observers
    /// never see it in the unfired state. A `timeout` too large to represent
    /// as an [`Instant`] arms no timer, and the signal only fires on release.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime and the deadline is
    /// representable.
    pub fn with_timeout(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let deadline = Instant::now().checked_add(timeout);

        if timeout.is_zero() {
            token.cancel();
        } else if let Some(deadline) = deadline {
            let timer = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = timer.cancelled() => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!("Cancel signal released before deadline");
                    }
                    () = sleep_until(deadline) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!("Cancel signal deadline elapsed");
                        timer.cancel();
                    }
                }
            });
        }

        Self { token, deadline }
    }

    /// Fires the signal now. Calling this more than once is a no-op.
    pub fn release(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the signal has fired, by deadline or release.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the signal fires. Resolves immediately if it already has.
    pub fn fired(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// The instant at which the signal fires on its own, or `None` if it
    /// never does.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, saturating at zero. `None` if the
    /// signal has no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns a guard that releases the signal when dropped.
    pub fn guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}
