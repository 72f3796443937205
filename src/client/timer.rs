use std::time::{Duration, Instant};

pub const DEFAULT_ROUND_SECONDS: u64 = 60;

/// Round countdown. Time is always passed in so the controller stays testable.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    started_at: Option<Instant>,
}

impl Countdown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Full duration while stopped.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => self
                .duration
                .saturating_sub(now.saturating_duration_since(start)),
            None => self.duration,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.is_running() && self.remaining(now).is_zero()
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_ROUND_SECONDS))
    }
}
