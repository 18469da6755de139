use crate::error::{CoachError, Result};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Sliding-window request limiter keyed by caller.
///
/// The owner passes `now` on every call, so tests can drive time directly.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    hits: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: HashMap::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request for `key` at `now`, or reject it if `key` already
    /// used its budget inside the window. Rejected requests are not recorded.
    pub fn check(&mut self, key: &str, now: Instant) -> Result<()> {
        let window = self.window;
        let hits = self.hits.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= window)
        {
            hits.pop_front();
        }
        if hits.len() >= self.limit {
            return Err(CoachError::RateLimited {
                key: key.to_string(),
                limit: self.limit,
                window_secs: window.as_secs(),
            });
        }
        hits.push_back(now);
        Ok(())
    }

    /// Drop keys with no requests left inside the window.
    pub fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.hits.retain(|_, hits| {
            hits.back()
                .is_some_and(|t| now.saturating_duration_since(*t) < window)
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.hits.len()
    }
}
