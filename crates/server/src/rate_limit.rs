//! Routing rate limiter.
//!
//! One per session: the router may only run when at least the minimum
//! interval has elapsed since its last invocation. The session loop checks
//! and stamps; the router itself stays pure.

use std::time::{Duration, Instant};

/// Minimum-interval gate over routing decisions.
#[derive(Debug)]
pub struct RateLimiter {
    last_invocation: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_invocation: None,
            min_interval,
        }
    }

    /// Whether enough time has passed for another routing call.
    pub fn ready(&self) -> bool {
        match self.last_invocation {
            None => true,
            Some(last) => last.elapsed() >= self.min_interval,
        }
    }

    /// Seconds since the last invocation, for log lines.
    pub fn elapsed_secs(&self) -> f64 {
        self.last_invocation
            .map(|last| last.elapsed().as_secs_f64())
            .unwrap_or(f64::INFINITY)
    }

    /// Record that a routing call was made.
    pub fn stamp(&mut self) {
        self.last_invocation = Some(Instant::now());
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_always_ready() {
        let limiter = RateLimiter::new(Duration::from_secs(15));
        assert!(limiter.ready());
    }

    #[test]
    fn test_not_ready_within_interval() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.stamp();
        assert!(!limiter.ready());
    }

    #[test]
    fn test_ready_after_interval() {
        let mut limiter = RateLimiter::new(Duration::from_millis(10));
        limiter.stamp();
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.ready());
    }

    #[test]
    fn test_zero_interval_always_ready() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        limiter.stamp();
        assert!(limiter.ready());
    }
}
