//! Bounded retry with randomized backoff
//!
//! An attempt either produces a value or fails. Faults inside the attempt are
//! expected to be converted into `Err` at the attempt boundary; values that
//! carry "no answer" (`false`, `None`, empty collections, JSON `null`) are
//! treated as failures through [`Settled`] when using
//! [`RetryPolicy::run_settled`]. After `tries` failed attempts the policy
//! yields [`ClaimerError::RetriesExhausted`] instead of raising anything else.

use std::future::Future;
use tracing::{debug, warn};

use super::delay::DelayRange;
use crate::error::{ClaimerError, Result};

pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_RETRY_DELAY: DelayRange = DelayRange::new(5, 10);

/// Values that can carry an empty answer
pub trait Settled {
    fn is_settled(&self) -> bool;
}

impl Settled for bool {
    fn is_settled(&self) -> bool {
        *self
    }
}

impl<T> Settled for Option<T> {
    fn is_settled(&self) -> bool {
        self.is_some()
    }
}

impl<T> Settled for Vec<T> {
    fn is_settled(&self) -> bool {
        !self.is_empty()
    }
}

impl Settled for serde_json::Value {
    fn is_settled(&self) -> bool {
        !self.is_null()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub tries: u32,
    pub delay: DelayRange,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(tries: u32, delay: DelayRange) -> Self {
        Self { tries, delay }
    }

    /// Run `attempt` until it succeeds or `tries` attempts have failed.
    ///
    /// Sleeps a sampled backoff between failed attempts, never after the last
    /// one.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = String::from("no attempts made");

        for n in 1..=self.tries {
            match attempt().await {
                Ok(value) => {
                    if n > 1 {
                        debug!("{} succeeded on attempt {}/{}", operation, n, self.tries);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!("{} attempt {}/{} failed: {}", operation, n, self.tries, e);
                    last_error = e.to_string();
                    if n < self.tries {
                        self.delay.sleep().await;
                    }
                }
            }
        }

        Err(ClaimerError::RetriesExhausted {
            operation: operation.to_string(),
            attempts: self.tries,
            last_error,
        })
    }

    /// Like [`run`](Self::run), but an unsettled value counts as a failure.
    pub async fn run_settled<T, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        T: Settled,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(operation, || {
            let fut = attempt();
            async move {
                let value = fut.await?;
                if value.is_settled() {
                    Ok(value)
                } else {
                    Err(ClaimerError::EmptyResponse(format!(
                        "{} returned no result",
                        operation
                    )))
                }
            }
        })
        .await
    }
}
