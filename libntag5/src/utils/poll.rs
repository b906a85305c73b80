//! Busy-wait helpers used across the crate.
//!
//! The tag and its peripherals signal "not yet" through status bits that
//! have to be re-read. Every such wait goes through [`poll_until`] so the
//! interval and the optional bound live in one place.

use std::time::Duration;

use crate::{Error, Result};

/// Default interval between two status checks in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// How often a pending condition is re-checked, and for how long.
///
/// `max_attempts: None` waits forever; the caller is expected to abort the
/// whole operation from outside if that is not acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Unbounded polling at the default interval.
    pub const fn unbounded() -> Self {
        Self::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS), None)
    }

    /// Give up after `attempts` checks.
    pub const fn bounded(interval: Duration, attempts: u32) -> Self {
        Self::new(interval, Some(attempts))
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Call `done` until it returns `Ok(true)`, sleeping `policy.interval`
/// between calls. Errors from `done` are returned immediately.
///
/// Returns the number of checks performed.
pub fn poll_until<F>(policy: &PollPolicy, what: &'static str, mut done: F) -> Result<u32>
where
    F: FnMut() -> Result<bool>,
{
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        if done()? {
            return Ok(attempts);
        }
        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(Error::PollLimitExceeded { what, attempts });
            }
        }
        log::warn!("{what} still pending, waiting ...");
        if !policy.interval.is_zero() {
            std::thread::sleep(policy.interval);
        }
    }
}
