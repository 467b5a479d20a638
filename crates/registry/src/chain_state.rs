use std::collections::{BTreeMap, HashMap};

use alloy_provider::Provider;
use alloy_transport::Transport;
use async_trait::async_trait;
use avs_chainio::{
    AvsRegistryChainReader, ChainReaderError, OperatorStake, RegisteredOperatorPubkeys,
};
use avs_primitives::{
    consts::UNKNOWN_OPERATOR_SOCKET,
    core::{CheckSignaturesIndices, OperatorInfo, OperatorPubkeys},
    BlockNumber, OperatorId, QuorumBitmap, QuorumNumber,
};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    error::{AvsRegistryError, Result},
    provider::{ChainStateProvider, OperatorWithStake, ResolvedCheckpointIndices},
};

pub type ReaderResult<T> = std::result::Result<T, ChainReaderError>;

/// Public keys and sockets of every operator seen in the registry logs.
#[derive(Debug, Default)]
pub struct OperatorInfoIndex {
    pubkeys: HashMap<OperatorId, OperatorPubkeys>,
    sockets: HashMap<OperatorId, String>,
}

impl OperatorInfoIndex {
    pub fn insert_pubkeys(&mut self, registration: RegisteredOperatorPubkeys) {
        self.pubkeys.insert(registration.operator_id, registration.pubkeys);
    }

    pub fn insert_socket(&mut self, operator_id: OperatorId, socket: String) {
        self.sockets.insert(operator_id, socket);
    }

    /// Info of `operator_id`, or `None` when its keys were never indexed. An operator without a
    /// socket update gets [UNKNOWN_OPERATOR_SOCKET].
    pub fn get(&self, operator_id: &OperatorId) -> Option<OperatorInfo> {
        let pub_keys = *self.pubkeys.get(operator_id)?;
        let socket = self
            .sockets
            .get(operator_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_OPERATOR_SOCKET.to_string());

        Some(OperatorInfo { socket, pub_keys })
    }

    pub fn len(&self) -> usize {
        self.pubkeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pubkeys.is_empty()
    }

    /// Joins per-quorum stake rows into one entry per operator.
    ///
    /// `stakes` follows the order of `quorum_numbers`, as returned by the operator state
    /// retriever.
    fn join_stakes(
        &self,
        quorum_numbers: &[QuorumNumber],
        stakes: Vec<Vec<OperatorStake>>,
    ) -> Result<Vec<OperatorWithStake>> {
        if stakes.len() != quorum_numbers.len() {
            return Err(AvsRegistryError::IndexLengthMismatch {
                array: "operator_state",
                expected: quorum_numbers.len(),
                actual: stakes.len(),
            });
        }

        let mut operators: BTreeMap<OperatorId, OperatorWithStake> = BTreeMap::new();
        for (&quorum, rows) in quorum_numbers.iter().zip(stakes) {
            for row in rows {
                if let Some(operator) = operators.get_mut(&row.operator_id) {
                    operator.stake_per_quorum.insert(quorum, row.stake);
                    continue;
                }

                let operator_info = self
                    .get(&row.operator_id)
                    .ok_or(AvsRegistryError::OperatorInfoNotFound(row.operator_id))?;

                operators.insert(
                    row.operator_id,
                    OperatorWithStake {
                        operator_id: row.operator_id,
                        operator_info,
                        stake_per_quorum: BTreeMap::from([(quorum, row.stake)]),
                    },
                );
            }
        }

        Ok(operators.into_values().collect())
    }
}

/// The registry contract reads [RegistryChainState] is built on.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait RegistryReader: Send + Sync + 'static {
    async fn chain_head(&self) -> ReaderResult<u64>;

    async fn get_operators_stake_in_quorums_at_block(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> ReaderResult<Vec<Vec<OperatorStake>>>;

    async fn get_quorum_bitmap_at_block(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> ReaderResult<QuorumBitmap>;

    async fn get_check_signatures_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> ReaderResult<CheckSignaturesIndices>;

    async fn query_existing_registered_operator_pubkeys(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> ReaderResult<(Vec<RegisteredOperatorPubkeys>, u64)>;

    async fn query_existing_registered_operator_sockets(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> ReaderResult<(HashMap<OperatorId, String>, u64)>;
}

#[async_trait]
impl<T, P> RegistryReader for AvsRegistryChainReader<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone + 'static,
{
    async fn chain_head(&self) -> ReaderResult<u64> {
        AvsRegistryChainReader::chain_head(self).await
    }

    async fn get_operators_stake_in_quorums_at_block(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> ReaderResult<Vec<Vec<OperatorStake>>> {
        AvsRegistryChainReader::get_operators_stake_in_quorums_at_block(
            self,
            quorum_numbers,
            block_number,
        )
        .await
    }

    async fn get_quorum_bitmap_at_block(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> ReaderResult<QuorumBitmap> {
        AvsRegistryChainReader::get_quorum_bitmap_at_block(self, operator_id, block_number).await
    }

    async fn get_check_signatures_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> ReaderResult<CheckSignaturesIndices> {
        AvsRegistryChainReader::get_check_signatures_indices(
            self,
            reference_block_number,
            quorum_numbers,
            non_signer_operator_ids,
        )
        .await
    }

    async fn query_existing_registered_operator_pubkeys(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> ReaderResult<(Vec<RegisteredOperatorPubkeys>, u64)> {
        AvsRegistryChainReader::query_existing_registered_operator_pubkeys(
            self,
            start_block,
            stop_block,
        )
        .await
    }

    async fn query_existing_registered_operator_sockets(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> ReaderResult<(HashMap<OperatorId, String>, u64)> {
        AvsRegistryChainReader::query_existing_registered_operator_sockets(
            self,
            start_block,
            stop_block,
        )
        .await
    }
}

/// Fails with [AvsRegistryError::NoDataForBlock] when `block_number` is past the chain head.
fn ensure_block_available(block_number: BlockNumber, head: u64) -> Result<()> {
    if u64::from(block_number) > head {
        return Err(AvsRegistryError::NoDataForBlock(block_number));
    }
    Ok(())
}

/// [ChainStateProvider] reading the registry contracts over RPC.
///
/// Stake, bitmaps and checkpoint indices are read at the requested block. Operator keys and
/// sockets are only emitted as logs, so they come from an index filled by
/// [RegistryChainState::sync_operator_info].
pub struct RegistryChainState<R> {
    reader: R,
    operator_info: RwLock<OperatorInfoIndex>,
}

impl<R: RegistryReader> RegistryChainState<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, operator_info: RwLock::new(OperatorInfoIndex::default()) }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Indexes pubkey registrations and socket updates emitted between `start_block` and
    /// `stop_block` (the chain head when `None`). Returns the last block scanned.
    pub async fn sync_operator_info(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> Result<u64> {
        let (registrations, last_block) = self
            .reader
            .query_existing_registered_operator_pubkeys(start_block, stop_block)
            .await?;
        // sockets are scanned up to the same block so the index stays consistent
        let (sockets, _) = self
            .reader
            .query_existing_registered_operator_sockets(start_block, Some(last_block))
            .await?;

        let num_registrations = registrations.len();
        let num_sockets = sockets.len();

        let mut index = self.operator_info.write();
        for registration in registrations {
            index.insert_pubkeys(registration);
        }
        for (operator_id, socket) in sockets {
            index.insert_socket(operator_id, socket);
        }

        info!(
            target: "avs::registry::chain_state",
            start_block,
            last_block,
            num_registrations,
            num_sockets,
            num_operators = index.len(),
            "Synced operator info"
        );

        Ok(last_block)
    }

    pub fn operator_info(&self, operator_id: &OperatorId) -> Option<OperatorInfo> {
        self.operator_info.read().get(operator_id)
    }

    async fn check_block(&self, block_number: BlockNumber) -> Result<()> {
        let head = self.reader.chain_head().await?;
        ensure_block_available(block_number, head)
    }
}

#[async_trait]
impl<R: RegistryReader> ChainStateProvider for RegistryChainState<R> {
    async fn list_operators_with_stake(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<Vec<OperatorWithStake>> {
        self.check_block(block_number).await?;

        let stakes = self
            .reader
            .get_operators_stake_in_quorums_at_block(quorum_numbers, block_number)
            .await?;
        let operators = self.operator_info.read().join_stakes(quorum_numbers, stakes)?;

        debug!(
            target: "avs::registry::chain_state",
            block_number,
            num_operators = operators.len(),
            "Listed operators with stake"
        );

        Ok(operators)
    }

    async fn get_quorum_membership_bitmap(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<QuorumBitmap> {
        self.check_block(block_number).await?;
        Ok(self.reader.get_quorum_bitmap_at_block(operator_id, block_number).await?)
    }

    async fn get_checkpoint_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<ResolvedCheckpointIndices> {
        self.check_block(reference_block_number).await?;

        // one contract call resolves all four arrays against the same block
        let indices = self
            .reader
            .get_check_signatures_indices(
                reference_block_number,
                quorum_numbers,
                non_signer_operator_ids,
            )
            .await?;

        Ok(ResolvedCheckpointIndices::at_block(reference_block_number, indices))
    }
}
