use std::time::Duration;

use avs_chainio::ChainReaderError;
use avs_primitives::{BlockNumber, BlockNumberOverflow, OperatorId};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum AvsRegistryError {
    #[error("no data for block {0}")]
    /// The block has no recorded snapshot, or the upstream source cannot serve it
    NoDataForBlock(BlockNumber),
    #[error("chain state read failed: {0}")]
    /// Network or RPC failure of the chain state provider, retry policy is the provider's
    UpstreamReadFailure(#[source] BoxError),
    #[error("checkpoint indices resolved against block {found}, expected block {expected}")]
    InconsistentReferenceBlock { expected: BlockNumber, found: BlockNumber },
    #[error(transparent)]
    BlockNumberOverflow(#[from] BlockNumberOverflow),
    #[error("{array} holds {actual} entries, expected {expected}")]
    IndexLengthMismatch { array: &'static str, expected: usize, actual: usize },
    #[error("no public keys indexed for operator {0:#x}")]
    OperatorInfoNotFound(OperatorId),
    #[error("call cancelled")]
    Cancelled,
    #[error("call did not complete within {0:?}")]
    DeadlineExceeded(Duration),
}

impl AvsRegistryError {
    pub fn upstream<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UpstreamReadFailure(Box::new(error))
    }
}

impl From<ChainReaderError> for AvsRegistryError {
    fn from(error: ChainReaderError) -> Self {
        match error {
            ChainReaderError::BlockNumberOverflow(overflow) => Self::BlockNumberOverflow(overflow),
            other => Self::upstream(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AvsRegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn overflow_keeps_its_kind() {
        let error = AvsRegistryError::from(ChainReaderError::BlockNumberOverflow(
            BlockNumberOverflow(1 << 40),
        ));
        assert!(matches!(
            error,
            AvsRegistryError::BlockNumberOverflow(BlockNumberOverflow(height)) if height == 1 << 40
        ));
    }

    #[test]
    fn read_failures_keep_their_source() {
        let error = AvsRegistryError::from(ChainReaderError::Config(
            avs_chainio::ConfigError::ZeroQueryBlockRange,
        ));

        assert!(matches!(error, AvsRegistryError::UpstreamReadFailure(_)));
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<ChainReaderError>().is_some());
    }
}
