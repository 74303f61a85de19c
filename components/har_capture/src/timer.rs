//! Cancellable session deadline

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a wait on a [`SessionTimer`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Elapsed,
    Cancelled,
}

/// Deadline shared between a session's branches.
///
/// Without a duration the timer never elapses and only cancellation ends a
/// wait.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    duration: Option<Duration>,
    token: CancellationToken,
}

impl SessionTimer {
    pub fn new(duration: Option<Duration>) -> Self {
        Self {
            duration,
            token: CancellationToken::new(),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Wait until the duration elapses or the timer is cancelled
    pub async fn wait(&self) -> TimerOutcome {
        let Some(duration) = self.duration else {
            self.token.cancelled().await;
            return TimerOutcome::Cancelled;
        };

        tokio::select! {
            _ = self.token.cancelled() => TimerOutcome::Cancelled,
            _ = tokio::time::sleep(duration) => TimerOutcome::Elapsed,
        }
    }

    /// Cancel the timer; pending and future waits return `Cancelled`
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
