//! Randomized delay windows
//!
//! Every pause in the claimer (retry backoff, gas re-checks, pacing between
//! wallets) is a uniform draw from an inclusive `[min, max]` window of whole
//! seconds, slept on the tokio clock.

use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Inclusive window of whole seconds, deserialized from `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(u64, u64)")]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl From<(u64, u64)> for DelayRange {
    fn from((min_secs, max_secs): (u64, u64)) -> Self {
        Self::new(min_secs, max_secs)
    }
}

impl DelayRange {
    /// Bounds given in the wrong order are swapped.
    pub const fn new(min_secs: u64, max_secs: u64) -> Self {
        if min_secs <= max_secs {
            Self { min_secs, max_secs }
        } else {
            Self {
                min_secs: max_secs,
                max_secs: min_secs,
            }
        }
    }

    pub const fn fixed(secs: u64) -> Self {
        Self::new(secs, secs)
    }

    pub fn is_fixed(&self) -> bool {
        self.min_secs == self.max_secs
    }

    /// Draw a delay uniformly from the window
    pub fn sample(&self) -> Duration {
        if self.is_fixed() {
            return Duration::from_secs(self.min_secs);
        }
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }

    /// Sleep for a freshly sampled delay and return it
    pub async fn sleep(&self) -> Duration {
        let delay = self.sample();
        tokio::time::sleep(delay).await;
        delay
    }

    /// Same as [`sleep`](Self::sleep) but announces the pause first
    pub async fn sleep_logged(&self) -> Duration {
        let delay = self.sample();
        info!("Sleeping for {} seconds...", delay.as_secs());
        tokio::time::sleep(delay).await;
        delay
    }
}

impl std::fmt::Display for DelayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fixed() {
            write!(f, "{}s", self.min_secs)
        } else {
            write!(f, "{}-{}s", self.min_secs, self.max_secs)
        }
    }
}
