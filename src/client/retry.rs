//! Retry executor.
//!
//! Runs an operation against a fresh connection per attempt. Transport
//! failures are retried after a fixed backoff until the attempt bound is
//! reached; the final attempt's error is returned as-is. Every other
//! error stops the loop immediately.
//!
//! The daemon is often still starting when the first callers arrive at
//! boot, which is why the default bound is generous (35 × 1 s).

use core::time::Duration;

use log::{error, warn};

use crate::config::{ClientConfig, DEFAULT_ATTEMPTS, DEFAULT_BACKOFF_MS};
use crate::error::Result;

use super::connection::{Connection, Connector};

/// Attempt bound and backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, Duration::from_millis(DEFAULT_BACKOFF_MS))
    }
}

impl RetryPolicy {
    /// `attempts` below 1 is raised to 1.
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.attempts, config.backoff())
    }

    pub fn with_attempts(self, attempts: u32) -> Self {
        Self::new(attempts, self.backoff)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

/// Blocking pause between attempts.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Run `op` with retries on transport failure.
///
/// The connection of a failed attempt is closed before the backoff.
pub fn thrift_try<K, S, F, T>(connector: &K, policy: &RetryPolicy, sleeper: &mut S, mut op: F) -> Result<T>
where
    K: Connector,
    S: Sleeper + ?Sized,
    F: FnMut(&mut Connection<K::Client>) -> Result<T>,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        let outcome = connector.open().and_then(|mut conn| op(&mut conn));
        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!("RETRY | attempt {}/{} failed: {}", attempt, attempts, e);
                sleeper.sleep(policy.backoff());
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    error!("RETRY | giving up after {} attempts: {}", attempts, e);
                }
                return Err(e);
            }
        }
    }
}
