//! Cooperative cancellation shared by every wait in the application layer.

use crate::foundation::{MultisigError, Result};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Abort signal checked at each suspension point.
///
/// A signal trips either when [`AbortSignal::abort`] is called on any clone or when its
/// optional deadline passes. Tripping only stops local waiting; remote side effects that
/// were already requested stay in flight.
#[derive(Clone, Debug)]
pub struct AbortSignal {
    token: CancellationToken,
    started: Instant,
    deadline: Option<Instant>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn new() -> Self {
        Self { token: CancellationToken::new(), started: Instant::now(), deadline: None }
    }

    /// Signal that trips by itself once `timeout` has elapsed.
    pub fn timeout(timeout: Duration) -> Self {
        let started = Instant::now();
        Self { token: CancellationToken::new(), started, deadline: Some(started + timeout) }
    }

    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled() || self.deadline_passed()
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// `Err(Cancelled)` after an explicit abort, `Err(Timeout)` after the deadline.
    pub fn throw_if_aborted(&self, operation: &str) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(MultisigError::Cancelled { operation: operation.to_string() });
        }
        if self.deadline_passed() {
            let waited_ms = Instant::now().saturating_duration_since(self.started).as_millis() as u64;
            return Err(MultisigError::Timeout { operation: operation.to_string(), waited_ms });
        }
        Ok(())
    }

    /// Resolves once the signal trips.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Sleep for `duration` unless the signal trips first.
    pub async fn sleep(&self, duration: Duration) {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.cancelled() => {}
        }
    }
}
