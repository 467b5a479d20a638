//! Typed reads against the registry contracts of an AVS.

use std::collections::{BTreeMap, HashMap};

use alloy_eips::BlockId;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_transport::Transport;
use avs_primitives::{
    bitmap_to_quorum_ids, block_number_from_u64,
    core::{CheckSignaturesIndices, OperatorPubkeys},
    quorum_numbers_to_bytes,
    utils::{operator_id_from_b256, operator_id_hex, operator_id_to_b256},
    BlockNumber, OperatorId, QuorumBitmap, QuorumNumber, StakeAmount,
};
use tracing::{debug, trace};

use crate::{
    config::ChainReaderConfig,
    contracts::{
        bls_apk_registry::IBLSApkRegistry::IBLSApkRegistryInstance,
        operator_state_retriever::IOperatorStateRetriever::{
            self, IOperatorStateRetrieverInstance,
        },
        registry_coordinator::IRegistryCoordinator::{self, IRegistryCoordinatorInstance},
        stake_registry::IStakeRegistry::{self, IStakeRegistryInstance},
        IBLSApkRegistry,
    },
    conversions::{
        g1_from_sol, g2_from_sol, indices_from_sol, operator_id_from_g1, operator_stake_from_sol,
    },
    error::ChainReaderError,
    types::{OperatorStake, RegisteredOperatorPubkeys},
};

/// `getOperatorStatus` value of an operator that is currently registered.
const OPERATOR_STATUS_REGISTERED: u8 = 1;

type Result<T> = std::result::Result<T, ChainReaderError>;

/// Splits `[start, stop]` into consecutive windows of at most `range` blocks.
pub(crate) fn block_ranges(start: u64, stop: u64, range: u64) -> impl Iterator<Item = (u64, u64)> {
    let step = range.max(1);
    (start..=stop)
        .step_by(step as usize)
        .map(move |from| (from, from.saturating_add(step - 1).min(stop)))
}

/// Reads operator, stake and checkpoint state from the registry contracts.
pub struct AvsRegistryChainReader<T, P> {
    config: ChainReaderConfig,
    registry_coordinator: IRegistryCoordinatorInstance<T, P>,
    operator_state_retriever: IOperatorStateRetrieverInstance<T, P>,
    bls_apk_registry: IBLSApkRegistryInstance<T, P>,
    stake_registry: IStakeRegistryInstance<T, P>,
}

impl<T, P> AvsRegistryChainReader<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Clone,
{
    pub fn new(config: ChainReaderConfig, provider: P) -> Self {
        Self {
            registry_coordinator: IRegistryCoordinatorInstance::new(
                config.registry_coordinator,
                provider.clone(),
            ),
            operator_state_retriever: IOperatorStateRetrieverInstance::new(
                config.operator_state_retriever,
                provider.clone(),
            ),
            bls_apk_registry: IBLSApkRegistryInstance::new(
                config.bls_apk_registry,
                provider.clone(),
            ),
            stake_registry: IStakeRegistryInstance::new(config.stake_registry, provider),
            config,
        }
    }

    pub fn config(&self) -> &ChainReaderConfig {
        &self.config
    }

    /// Height of the latest block known to the RPC node.
    pub async fn chain_head(&self) -> Result<u64> {
        Ok(self.registry_coordinator.provider().get_block_number().await?)
    }

    /// Current height as a [BlockNumber]. Fails rather than truncating heights above `u32::MAX`.
    pub async fn current_block_number(&self) -> Result<BlockNumber> {
        let head = self.chain_head().await?;
        Ok(block_number_from_u64(head)?)
    }

    pub async fn quorum_count(&self) -> Result<u8> {
        let IRegistryCoordinator::quorumCountReturn { _0: count } =
            self.registry_coordinator.quorumCount().call().await?;

        Ok(count)
    }

    /// For each quorum in `quorum_numbers`, the ordered list of its operators and their stake at
    /// `block_number`. The outer list follows the order of `quorum_numbers`.
    pub async fn get_operators_stake_in_quorums_at_block(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<Vec<Vec<OperatorStake>>> {
        let IOperatorStateRetriever::getOperatorState_0Return { _0: operator_state } = self
            .operator_state_retriever
            .getOperatorState_0(
                self.config.registry_coordinator,
                quorum_numbers_to_bytes(quorum_numbers),
                block_number,
            )
            .call()
            .await?;

        trace!(
            target: "avs::chainio::reader",
            block_number,
            num_quorums = operator_state.len(),
            "Fetched operator state"
        );

        Ok(operator_state
            .iter()
            .map(|quorum| quorum.iter().map(operator_stake_from_sol).collect())
            .collect())
    }

    pub async fn get_operators_stake_in_quorums_at_current_block(
        &self,
        quorum_numbers: &[QuorumNumber],
    ) -> Result<Vec<Vec<OperatorStake>>> {
        let block_number = self.current_block_number().await?;
        self.get_operators_stake_in_quorums_at_block(quorum_numbers, block_number).await
    }

    pub async fn get_operator_addrs_in_quorums_at_current_block(
        &self,
        quorum_numbers: &[QuorumNumber],
    ) -> Result<Vec<Vec<Address>>> {
        let stakes = self.get_operators_stake_in_quorums_at_current_block(quorum_numbers).await?;

        Ok(stakes
            .into_iter()
            .map(|quorum| quorum.into_iter().map(|operator| operator.operator).collect())
            .collect())
    }

    /// The quorums `operator_id` was registered in at `block_number`, ascending, together with
    /// the operator lists of each of those quorums.
    pub async fn get_operators_stake_in_quorums_of_operator_at_block(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<(Vec<QuorumNumber>, Vec<Vec<OperatorStake>>)> {
        let IOperatorStateRetriever::getOperatorState_1Return { _0: bitmap, _1: operator_state } =
            self.operator_state_retriever
                .getOperatorState_1(
                    self.config.registry_coordinator,
                    operator_id_to_b256(operator_id),
                    block_number,
                )
                .call()
                .await?;

        let quorums = bitmap_to_quorum_ids(bitmap);
        let stakes = operator_state
            .iter()
            .map(|quorum| quorum.iter().map(operator_stake_from_sol).collect())
            .collect();

        Ok((quorums, stakes))
    }

    pub async fn get_operators_stake_in_quorums_of_operator_at_current_block(
        &self,
        operator_id: OperatorId,
    ) -> Result<(Vec<QuorumNumber>, Vec<Vec<OperatorStake>>)> {
        let block_number = self.current_block_number().await?;
        self.get_operators_stake_in_quorums_of_operator_at_block(operator_id, block_number)
            .await
    }

    /// Current stake of `operator_id` in every quorum it is registered in.
    pub async fn get_operator_stake_in_quorums_of_operator_at_current_block(
        &self,
        operator_id: OperatorId,
    ) -> Result<BTreeMap<QuorumNumber, StakeAmount>> {
        let IRegistryCoordinator::getCurrentQuorumBitmapReturn { _0: bitmap } = self
            .registry_coordinator
            .getCurrentQuorumBitmap(operator_id_to_b256(operator_id))
            .call()
            .await?;

        let mut quorum_stakes = BTreeMap::new();
        for quorum in bitmap_to_quorum_ids(U256::from(bitmap)) {
            let IStakeRegistry::getCurrentStakeReturn { _0: stake } = self
                .stake_registry
                .getCurrentStake(operator_id_to_b256(operator_id), quorum)
                .call()
                .await?;
            quorum_stakes.insert(quorum, U256::from(stake));
        }

        Ok(quorum_stakes)
    }

    /// Quorum membership bitmap of `operator_id`, read with the chain state of `block_number`.
    pub async fn get_quorum_bitmap_at_block(
        &self,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<QuorumBitmap> {
        let IRegistryCoordinator::getCurrentQuorumBitmapReturn { _0: bitmap } = self
            .registry_coordinator
            .getCurrentQuorumBitmap(operator_id_to_b256(operator_id))
            .block(BlockId::number(u64::from(block_number)))
            .call()
            .await?;

        Ok(U256::from(bitmap))
    }

    pub async fn get_check_signatures_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<CheckSignaturesIndices> {
        let non_signers = non_signer_operator_ids
            .iter()
            .copied()
            .map(operator_id_to_b256)
            .collect();

        let IOperatorStateRetriever::getCheckSignaturesIndicesReturn { _0: indices } = self
            .operator_state_retriever
            .getCheckSignaturesIndices(
                self.config.registry_coordinator,
                reference_block_number,
                quorum_numbers_to_bytes(quorum_numbers),
                non_signers,
            )
            .call()
            .await?;

        Ok(indices_from_sol(indices))
    }

    pub async fn get_operator_id(&self, operator: Address) -> Result<OperatorId> {
        let IRegistryCoordinator::getOperatorIdReturn { _0: operator_id } =
            self.registry_coordinator.getOperatorId(operator).call().await?;

        Ok(operator_id_from_b256(operator_id))
    }

    pub async fn get_operator_from_id(&self, operator_id: OperatorId) -> Result<Address> {
        let IRegistryCoordinator::getOperatorFromIdReturn { _0: operator } = self
            .registry_coordinator
            .getOperatorFromId(operator_id_to_b256(operator_id))
            .call()
            .await?;

        Ok(operator)
    }

    pub async fn is_operator_registered(&self, operator: Address) -> Result<bool> {
        let IRegistryCoordinator::getOperatorStatusReturn { _0: status } =
            self.registry_coordinator.getOperatorStatus(operator).call().await?;

        Ok(status == OPERATOR_STATUS_REGISTERED)
    }

    /// Scans `NewPubkeyRegistration` logs between `start_block` and `stop_block` (the chain head
    /// when `None`). Returns the registrations and the last block scanned.
    pub async fn query_existing_registered_operator_pubkeys(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> Result<(Vec<RegisteredOperatorPubkeys>, u64)> {
        let stop_block = match stop_block {
            Some(block) => block,
            None => self.chain_head().await?,
        };

        let mut registrations = Vec::new();
        let mut to_block = start_block;

        for (from, to) in block_ranges(start_block, stop_block, self.config.query_block_range) {
            to_block = to;

            let logs = self
                .bls_apk_registry
                .NewPubkeyRegistration_filter()
                .from_block(from)
                .to_block(to)
                .query()
                .await?;

            debug!(
                target: "avs::chainio::reader",
                num_transaction_logs = logs.len(),
                from_block = from,
                to_block = to,
                "Queried pubkey registrations"
            );

            for (event, _) in logs {
                registrations.push(pubkeys_from_event(&event)?);
            }
        }

        Ok((registrations, to_block))
    }

    /// Scans `OperatorSocketUpdate` logs between `start_block` and `stop_block` (the chain head
    /// when `None`). Later updates override earlier ones.
    pub async fn query_existing_registered_operator_sockets(
        &self,
        start_block: u64,
        stop_block: Option<u64>,
    ) -> Result<(HashMap<OperatorId, String>, u64)> {
        let stop_block = match stop_block {
            Some(block) => block,
            None => self.chain_head().await?,
        };

        let mut sockets = HashMap::new();
        let mut to_block = start_block;

        for (from, to) in block_ranges(start_block, stop_block, self.config.query_block_range) {
            to_block = to;

            let logs = self
                .registry_coordinator
                .OperatorSocketUpdate_filter()
                .from_block(from)
                .to_block(to)
                .query()
                .await?;

            let num_socket_updates = logs.len();
            for (update, _) in logs {
                let operator_id = operator_id_from_b256(update.operatorId);
                trace!(
                    target: "avs::chainio::reader",
                    operator_id = %operator_id_hex(operator_id),
                    socket = %update.socket,
                    "Socket update"
                );
                sockets.insert(operator_id, update.socket);
            }

            debug!(
                target: "avs::chainio::reader",
                num_transaction_logs = num_socket_updates,
                from_block = from,
                to_block = to,
                "Queried socket updates"
            );
        }

        Ok((sockets, to_block))
    }
}

fn pubkeys_from_event(
    event: &IBLSApkRegistry::NewPubkeyRegistration,
) -> Result<RegisteredOperatorPubkeys> {
    let invalid = |source| ChainReaderError::InvalidPubkey { operator: event.operator, source };

    let g1_pub_key = g1_from_sol(&event.pubkeyG1).map_err(invalid)?;
    let g2_pub_key = g2_from_sol(&event.pubkeyG2).map_err(invalid)?;

    Ok(RegisteredOperatorPubkeys {
        operator: event.operator,
        operator_id: operator_id_from_g1(&g1_pub_key),
        pubkeys: OperatorPubkeys { g1_pub_key, g2_pub_key },
    })
}
