// Sliding-window request limiter keyed by client identity

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-client sliding-window log limiter.
///
/// A client is admitted at most `limit` times within any trailing `window`.
/// Rejected attempts are not recorded, so a throttled client recovers as
/// soon as its oldest admitted request ages out of the window.
///
/// The whole table sits behind one mutex; admit/reject decisions for a
/// client are therefore linearizable.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
    window: Duration,
    limit: usize,
}

impl RateLimiter {
    pub fn new(window: Duration, limit: usize) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window,
            limit,
        }
    }

    /// Admit or reject a request from `client_id` at the current time.
    pub fn check(&self, client_id: &str) -> bool {
        self.check_at(client_id, Instant::now())
    }

    fn check_at(&self, client_id: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        let times = windows.entry(client_id.to_string()).or_default();
        times.retain(|&t| now.duration_since(t) < self.window);
        if times.len() >= self.limit {
            return false;
        }
        times.push(now);
        true
    }

    /// Number of admitted requests currently inside `client_id`'s window.
    pub fn window_len(&self, client_id: &str) -> usize {
        self.windows
            .lock()
            .get(client_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}
