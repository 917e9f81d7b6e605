//! Rate limiter for preventing login brute force attacks

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of failed attempts allowed
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,       // 5 minutes
            ban_duration_seconds: 900, // 15 minutes
        }
    }
}

/// Rate limiter entry
#[derive(Debug)]
struct RateLimiterEntry {
    /// Number of failed attempts in the current window
    attempts: u32,
    /// First failed attempt of the current window
    window_start: Instant,
    /// Ban expiration time
    ban_expires: Option<Instant>,
}

/// In-memory rate limiter keyed by username
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether a login attempt for this key is currently allowed
    pub async fn check(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            None => return true,
            Some(entry) => {
                if let Some(ban_expires) = entry.ban_expires {
                    if Instant::now() < ban_expires {
                        return false;
                    }
                    // Ban elapsed, start fresh
                    true
                } else if entry.window_start.elapsed()
                    > Duration::from_secs(self.config.window_seconds)
                {
                    true
                } else {
                    return entry.attempts < self.config.max_attempts;
                }
            }
        };

        if expired {
            entries.remove(key);
        }
        true
    }

    /// Record a failed login attempt
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimiterEntry {
                attempts: 0,
                window_start: now,
                ban_expires: None,
            });

        if entry.window_start.elapsed() > Duration::from_secs(self.config.window_seconds) {
            entry.attempts = 0;
            entry.window_start = now;
            entry.ban_expires = None;
        }

        entry.attempts += 1;

        if entry.attempts >= self.config.max_attempts {
            warn!("Login rate limit reached for key: {}", key);
            entry.ban_expires =
                Some(now + Duration::from_secs(self.config.ban_duration_seconds));
        }
    }

    /// Clear the entry after a successful login
    pub async fn reset(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 300,
            ban_duration_seconds: 900,
        })
    }

    #[tokio::test]
    async fn allows_until_max_attempts() {
        let limiter = limiter(3);

        for _ in 0..2 {
            assert!(limiter.check("millenium").await);
            limiter.record_failure("millenium").await;
        }
        assert!(limiter.check("millenium").await);

        limiter.record_failure("millenium").await;
        assert!(!limiter.check("millenium").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = limiter(1);
        limiter.record_failure("alice").await;
        assert!(!limiter.check("alice").await);
        assert!(limiter.check("bob").await);
    }

    #[tokio::test]
    async fn reset_clears_failures() {
        let limiter = limiter(1);
        limiter.record_failure("millenium").await;
        assert!(!limiter.check("millenium").await);

        limiter.reset("millenium").await;
        assert!(limiter.check("millenium").await);
    }
}
