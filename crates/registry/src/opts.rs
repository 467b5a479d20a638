use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::error::{AvsRegistryError, Result};

/// Per-call options of the registry service.
///
/// An operation runs entirely under its options: when the token is cancelled or the timeout
/// elapses, the in-flight upstream reads are dropped and the call fails. A partially built
/// snapshot is never returned.
#[derive(Debug, Clone, Default)]
pub struct CallOpts {
    pub cancellation: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl CallOpts {
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Drives `call` to completion unless cancellation or the timeout wins first.
    pub async fn run<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let cancellable = async {
            match &self.cancellation {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(AvsRegistryError::Cancelled),
                    result = call => result,
                },
                None => call.await,
            }
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cancellable)
                .await
                .map_err(|_| AvsRegistryError::DeadlineExceeded(timeout))?,
            None => cancellable.await,
        }
    }
}
