use dashmap::DashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_REQUESTS: u32 = 20;
pub const DEFAULT_WINDOW_SECS: u64 = 60;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by caller.
///
/// Each key gets its own window; a key that exhausts its budget is rejected
/// until the window rolls over. The limiter only tracks state, it never
/// sleeps or queues.
///
/// # Examples
/// ```
/// use srcfetch::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(2, Duration::from_secs(60));
/// assert!(limiter.check("10.0.0.1").is_ok());
/// assert!(limiter.check("10.0.0.1").is_ok());
/// assert!(limiter.check("10.0.0.1").is_err());
/// // Other keys are unaffected
/// assert!(limiter.check("10.0.0.2").is_ok());
/// ```
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    slots: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            slots: DashMap::new(),
        }
    }

    /// Admit or reject one request for `key`.
    ///
    /// On rejection the error carries how long until the key's window resets.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        let mut slot = self.slots.entry(key.to_string()).or_insert_with(|| Window {
            started: Instant::now(),
            count: 0,
        });

        if slot.started.elapsed() >= self.window {
            slot.started = Instant::now();
            slot.count = 0;
        }

        if slot.count >= self.max_requests {
            return Err(self.window.saturating_sub(slot.started.elapsed()));
        }

        slot.count += 1;
        Ok(())
    }

    /// Drop windows that have fully expired.
    ///
    /// `check` resets expired windows on its own; this just reclaims memory
    /// for keys that stopped calling.
    pub fn sweep(&self) {
        self.slots
            .retain(|_, window| window.started.elapsed() < self.window);
    }

    /// Number of keys currently holding a window.
    pub fn tracked_keys(&self) -> usize {
        self.slots.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_REQUESTS,
            Duration::from_secs(DEFAULT_WINDOW_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_the_cap_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(limiter.check("caller").is_ok());
        }

        let retry_after = limiter.check("caller").unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
    }

    #[test]
    fn keys_do_not_interfere() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
        assert!(limiter.check("b").is_ok());
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.check("caller").is_ok());
        assert!(limiter.check("caller").is_err());

        std::thread::sleep(Duration::from_millis(80));
        assert!(limiter.check("caller").is_ok());
    }

    #[test]
    fn sweep_drops_expired_windows() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));

        let _ = limiter.check("a");
        assert_eq!(limiter.tracked_keys(), 1);

        std::thread::sleep(Duration::from_millis(60));
        limiter.sweep();
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
