use std::time::{Duration, Instant};

/// Cooperative repeating timer polled by the event loop.
///
/// Dropping the ticker cancels it.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn start(interval: Duration) -> Self {
        Self::start_at(interval, Instant::now())
    }

    fn start_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: Some(now + interval),
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// How long the caller may block before the next tick, capped at `max`.
    pub fn timeout(&self, max: Duration) -> Duration {
        self.timeout_at(max, Instant::now())
    }

    fn timeout_at(&self, max: Duration, now: Instant) -> Duration {
        match self.next_due {
            Some(due) => due.saturating_duration_since(now).min(max),
            None => max,
        }
    }

    /// True once per elapsed interval. Missed ticks are not replayed.
    pub fn poll_due(&mut self) -> bool {
        self.poll_due_at(Instant::now())
    }

    fn poll_due_at(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_due = Some(now + self.interval);
        true
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if self.is_active() {
            self.cancel();
            tracing::trace!("progress ticker cancelled");
        }
    }
}
