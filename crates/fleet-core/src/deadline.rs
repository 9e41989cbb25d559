//! Per-operation deadlines for request-scoped storage calls.
//!
//! A storage call that does not finish in time fails with
//! [`Error::Timeout`]. Nothing here retries.

use std::future::Future;
use std::time::Duration;

use crate::defaults::STORAGE_TIMEOUT_SECS;
use crate::error::{Error, Result};

/// Deadline applied to each storage call made while serving one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    limit: Duration,
}

impl Default for Deadline {
    fn default() -> Self {
        Self::new(Duration::from_secs(STORAGE_TIMEOUT_SECS))
    }
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Run `fut`, failing with `Error::Timeout(op)` once the limit elapses.
    pub async fn run<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    subsystem = "core",
                    component = "deadline",
                    op,
                    limit_ms = self.limit.as_millis() as u64,
                    "Storage operation timed out"
                );
                Err(Error::Timeout(op.to_string()))
            }
        }
    }
}
