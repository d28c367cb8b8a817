//! Minimum spacing between consecutive provider calls.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum interval between call starts.
///
/// Unlike a fixed sleep after every call, time already spent waiting on the
/// previous response counts towards the interval.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_start: Option<Instant>,
}

impl Throttle {
    /// A throttle spacing calls at least `min_interval` apart.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: None,
        }
    }

    /// Wait until the next call may start, then mark it started.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_start {
            if let Some(ready_at) = last.checked_add(self.min_interval) {
                if Instant::now() < ready_at {
                    tokio::time::sleep_until(ready_at).await;
                }
            }
        }
        self.last_start = Some(Instant::now());
    }
}
