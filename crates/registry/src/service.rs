use std::collections::BTreeMap;

use async_trait::async_trait;
use avs_primitives::{
    core::{CheckSignaturesIndices, OperatorAvsState, QuorumAvsState},
    BlockNumber, OperatorId, QuorumNumber,
};

use crate::{error::Result, opts::CallOpts};

/// Block-pinned views of an AVS operator set, and the indices needed to verify aggregate
/// signatures against them.
///
/// Every call either returns a complete snapshot of the requested block or fails. Snapshots are
/// built fresh per call and owned by the caller.
#[async_trait]
pub trait AvsRegistryService: Send + Sync {
    /// Operators registered at `block_number` in any of `quorum_numbers`, each carrying its stake
    /// for the requested quorums it belongs to.
    async fn get_operators_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<OperatorId, OperatorAvsState>>;

    /// Total stake and aggregate G1 key of each requested quorum at `block_number`.
    async fn get_quorums_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<QuorumNumber, QuorumAvsState>>;

    /// Checkpoint indices of the quorums and non-signers of a signing event, all resolved
    /// against `reference_block_number`.
    async fn get_check_signatures_indices(
        &self,
        opts: &CallOpts,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<CheckSignaturesIndices>;

    /// Quorums `operator_id` was registered in at `block_number`, ascending.
    async fn get_operator_quorums_at_block(
        &self,
        opts: &CallOpts,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<Vec<QuorumNumber>>;
}
