use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{PipenetError, PipenetResult};

/// Per-request scope handed to every query: cancellation plus an optional
/// time budget covering the whole request.
#[derive(Clone, Debug, Default)]
pub struct QueryContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fills in the timeout only if the caller did not set one.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        if self.timeout.is_none() {
            self.timeout = timeout;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn ensure_active(&self) -> PipenetResult<()> {
        if self.cancel.is_cancelled() {
            return Err(PipenetError::Cancelled);
        }
        Ok(())
    }

    /// Drives `fut` to completion unless the request is cancelled or its
    /// budget runs out first; in both cases nothing from `fut` is returned.
    pub async fn scope<F, T>(&self, fut: F) -> PipenetResult<T>
    where
        F: Future<Output = PipenetResult<T>>,
    {
        self.ensure_active()?;
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(PipenetError::Cancelled),
                result = fut => result,
            }
        };
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_| PipenetError::TimedOut {
                    millis: limit.as_millis() as u64,
                })?,
            None => guarded.await,
        }
    }
}
