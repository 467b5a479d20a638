use std::collections::BTreeMap;

use async_trait::async_trait;
use avs_primitives::{
    core::{CheckSignaturesIndices, OperatorInfo},
    BlockNumber, CheckpointIndex, OperatorId, QuorumBitmap, QuorumNumber, StakeAmount,
};

use crate::error::{AvsRegistryError, Result};

/// An operator registered at some block, with its stake in each quorum it is part of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorWithStake {
    pub operator_id: OperatorId,
    pub operator_info: OperatorInfo,
    pub stake_per_quorum: BTreeMap<QuorumNumber, StakeAmount>,
}

/// A value together with the reference block it was resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtBlock<T> {
    pub block_number: BlockNumber,
    pub value: T,
}

impl<T> AtBlock<T> {
    pub fn new(block_number: BlockNumber, value: T) -> Self {
        Self { block_number, value }
    }

    fn expect_block(self, expected: BlockNumber) -> Result<T> {
        if self.block_number != expected {
            return Err(AvsRegistryError::InconsistentReferenceBlock {
                expected,
                found: self.block_number,
            });
        }
        Ok(self.value)
    }
}

/// Raw checkpoint lookups, each array tagged with the reference block it was resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCheckpointIndices {
    pub non_signer_quorum_bitmap_indices: AtBlock<Vec<CheckpointIndex>>,
    pub quorum_apk_indices: AtBlock<Vec<CheckpointIndex>>,
    pub total_stake_indices: AtBlock<Vec<CheckpointIndex>>,
    pub non_signer_stake_indices: AtBlock<Vec<Vec<CheckpointIndex>>>,
}

impl ResolvedCheckpointIndices {
    /// All four arrays resolved in one lookup against `block_number`.
    pub fn at_block(block_number: BlockNumber, indices: CheckSignaturesIndices) -> Self {
        Self {
            non_signer_quorum_bitmap_indices: AtBlock::new(
                block_number,
                indices.non_signer_quorum_bitmap_indices,
            ),
            quorum_apk_indices: AtBlock::new(block_number, indices.quorum_apk_indices),
            total_stake_indices: AtBlock::new(block_number, indices.total_stake_indices),
            non_signer_stake_indices: AtBlock::new(block_number, indices.non_signer_stake_indices),
        }
    }

    /// Strips the block tags, failing if any array was resolved against another block.
    pub fn into_indices(
        self,
        reference_block_number: BlockNumber,
    ) -> Result<CheckSignaturesIndices> {
        Ok(CheckSignaturesIndices {
            non_signer_quorum_bitmap_indices: self
                .non_signer_quorum_bitmap_indices
                .expect_block(reference_block_number)?,
            quorum_apk_indices: self.quorum_apk_indices.expect_block(reference_block_number)?,
            total_stake_indices: self.total_stake_indices.expect_block(reference_block_number)?,
            non_signer_stake_indices: self
                .non_signer_stake_indices
                .expect_block(reference_block_number)?,
        })
    }
}

/// Source of historical registry state the service builds its snapshots from.
///
/// Implementations own their retry policy. Errors surface to the service's caller unchanged.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ChainStateProvider: Send + Sync + 'static {
    /// Operators registered at `block_number` in any of `quorum_numbers`.
    async fn list_operators_with_stake(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<Vec<OperatorWithStake>>;

    async fn get_quorum_membership_bitmap(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<QuorumBitmap>;

    async fn get_checkpoint_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<ResolvedCheckpointIndices>;
}
