//! In-memory registry state for tests of services that consume the registry.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use avs_primitives::{
    bls::BlsKeyPair,
    core::{CheckSignaturesIndices, OperatorAvsState, OperatorInfo, QuorumAvsState},
    quorum_ids_to_bitmap, BlockNumber, OperatorId, QuorumBitmap, QuorumNumber, StakeAmount,
};

use crate::{
    chain_caller::AvsRegistryServiceChainCaller,
    error::{AvsRegistryError, Result},
    opts::CallOpts,
    provider::{ChainStateProvider, OperatorWithStake, ResolvedCheckpointIndices},
    service::AvsRegistryService,
};

/// Socket every fake operator reports.
pub const FAKE_OPERATOR_SOCKET: &str = "localhost:9090";

/// An operator of a fake registry, with the key pair tests sign with.
#[derive(Debug, Clone)]
pub struct TestOperator {
    pub operator_id: OperatorId,
    pub stake_per_quorum: BTreeMap<QuorumNumber, StakeAmount>,
    pub bls_keypair: BlsKeyPair,
}

impl TestOperator {
    fn with_stake(&self) -> OperatorWithStake {
        OperatorWithStake {
            operator_id: self.operator_id,
            operator_info: OperatorInfo {
                socket: FAKE_OPERATOR_SOCKET.to_string(),
                pub_keys: self.bls_keypair.pubkeys(),
            },
            stake_per_quorum: self.stake_per_quorum.clone(),
        }
    }
}

/// [ChainStateProvider] serving a fixed operator set per block.
///
/// The table is set at construction and never changes, so reads are idempotent. Blocks without
/// an entry fail with [AvsRegistryError::NoDataForBlock].
#[derive(Debug, Clone, Default)]
pub struct FakeChainState {
    operators: HashMap<BlockNumber, Vec<OperatorWithStake>>,
}

impl FakeChainState {
    pub fn new(operators: HashMap<BlockNumber, Vec<TestOperator>>) -> Self {
        let operators = operators
            .into_iter()
            .map(|(block, operators)| {
                (block, operators.iter().map(TestOperator::with_stake).collect())
            })
            .collect();

        Self { operators }
    }

    fn operators_at(&self, block_number: BlockNumber) -> Result<&[OperatorWithStake]> {
        self.operators
            .get(&block_number)
            .map(Vec::as_slice)
            .ok_or(AvsRegistryError::NoDataForBlock(block_number))
    }
}

#[async_trait]
impl ChainStateProvider for FakeChainState {
    async fn list_operators_with_stake(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<Vec<OperatorWithStake>> {
        Ok(self
            .operators_at(block_number)?
            .iter()
            .filter(|operator| {
                operator.stake_per_quorum.keys().any(|quorum| quorum_numbers.contains(quorum))
            })
            .cloned()
            .collect())
    }

    async fn get_quorum_membership_bitmap(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<QuorumBitmap> {
        let bitmap = self
            .operators_at(block_number)?
            .iter()
            .find(|operator| operator.operator_id == operator_id)
            .map(|operator| {
                let quorums: Vec<QuorumNumber> =
                    operator.stake_per_quorum.keys().copied().collect();
                quorum_ids_to_bitmap(&quorums)
            })
            .unwrap_or_default();

        Ok(bitmap)
    }

    async fn get_checkpoint_indices(
        &self,
        reference_block_number: BlockNumber,
        _quorum_numbers: &[QuorumNumber],
        _non_signer_operator_ids: &[OperatorId],
    ) -> Result<ResolvedCheckpointIndices> {
        Ok(ResolvedCheckpointIndices::at_block(
            reference_block_number,
            CheckSignaturesIndices::default(),
        ))
    }
}

/// [AvsRegistryService] over a [FakeChainState].
///
/// Snapshots go through the same builder as the chain backed service. Check signature indices
/// are always empty: a fake registry has no checkpoint history.
#[derive(Debug, Clone)]
pub struct FakeAvsRegistryService {
    inner: AvsRegistryServiceChainCaller<FakeChainState>,
}

impl FakeAvsRegistryService {
    pub fn new(operators: HashMap<BlockNumber, Vec<TestOperator>>) -> Self {
        Self { inner: AvsRegistryServiceChainCaller::new(FakeChainState::new(operators)) }
    }

    /// A registry with `operators` at a single block.
    pub fn at_block(block_number: BlockNumber, operators: Vec<TestOperator>) -> Self {
        Self::new(HashMap::from([(block_number, operators)]))
    }
}

#[async_trait]
impl AvsRegistryService for FakeAvsRegistryService {
    async fn get_operators_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<OperatorId, OperatorAvsState>> {
        self.inner.get_operators_avs_state_at_block(opts, quorum_numbers, block_number).await
    }

    async fn get_quorums_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<QuorumNumber, QuorumAvsState>> {
        self.inner.get_quorums_avs_state_at_block(opts, quorum_numbers, block_number).await
    }

    async fn get_check_signatures_indices(
        &self,
        opts: &CallOpts,
        _reference_block_number: BlockNumber,
        _quorum_numbers: &[QuorumNumber],
        _non_signer_operator_ids: &[OperatorId],
    ) -> Result<CheckSignaturesIndices> {
        opts.run(async { Ok(CheckSignaturesIndices::default()) }).await
    }

    async fn get_operator_quorums_at_block(
        &self,
        opts: &CallOpts,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<Vec<QuorumNumber>> {
        self.inner.get_operator_quorums_at_block(opts, operator_id, block_number).await
    }
}
