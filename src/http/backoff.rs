//! Retry backoff
//!
//! [`BackoffPolicy`] computes how long to wait after a failed attempt and a
//! [`Sleeper`] performs the wait. Swapping the sleeper lets tests observe
//! the schedule without real time passing.

use crate::config::BackoffConfig;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Policy
// ============================================================================

/// Unjittered exponential backoff: `unit * base^k` after the k-th failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: u32,
    unit: Duration,
    max_delay: Option<Duration>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&BackoffConfig::default())
    }
}

impl BackoffPolicy {
    /// Create an uncapped policy
    pub fn new(base: u32, unit: Duration) -> Self {
        Self {
            base,
            unit,
            max_delay: None,
        }
    }

    /// Build a policy from configuration
    pub fn from_config(config: &BackoffConfig) -> Self {
        Self {
            base: config.base,
            unit: config.unit(),
            max_delay: config.max_delay(),
        }
    }

    /// Cap a single delay
    #[must_use]
    pub fn with_max_delay(mut self, max: Duration) -> Self {
        self.max_delay = Some(max);
        self
    }

    /// Delay after the `failed_attempt`-th failure (1-based).
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let delay = u64::from(self.base)
            .checked_pow(failed_attempt)
            .and_then(|factor| self.unit.as_nanos().checked_mul(u128::from(factor)))
            .and_then(from_nanos)
            .unwrap_or(Duration::MAX);

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

fn from_nanos(nanos: u128) -> Option<Duration> {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).ok()?;
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, subsec))
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

// ============================================================================
// Sleepers
// ============================================================================

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately
///
/// Clones share the same log, so a handle kept by a test sees every delay
/// requested through the copy installed in a client.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Sum of every delay requested so far
    pub fn total(&self) -> Duration {
        self.delays().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}
