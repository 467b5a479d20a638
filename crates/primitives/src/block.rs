use crate::aliases::BlockNumber;

/// The chain height does not fit the 32-bit block numbers the registry contracts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("block number {0} does not fit in a uint32")]
pub struct BlockNumberOverflow(pub u64);

/// Narrows a chain height to a [BlockNumber], failing instead of truncating.
pub fn block_number_from_u64(height: u64) -> Result<BlockNumber, BlockNumberOverflow> {
    BlockNumber::try_from(height).map_err(|_| BlockNumberOverflow(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits() {
        assert_eq!(block_number_from_u64(0), Ok(0));
        assert_eq!(block_number_from_u64(u32::MAX as u64), Ok(u32::MAX));
    }

    #[test]
    fn overflows() {
        let height = u32::MAX as u64 + 1;
        assert_eq!(block_number_from_u64(height), Err(BlockNumberOverflow(height)));
    }
}
