use std::collections::{btree_map::Entry, BTreeMap};

use async_trait::async_trait;
use avs_primitives::{
    bitmap_to_quorum_ids,
    core::{CheckSignaturesIndices, OperatorAvsState, QuorumAvsState},
    utils::operator_id_hex,
    BlockNumber, OperatorId, QuorumNumber,
};
use tracing::{debug, trace};

use crate::{
    error::{AvsRegistryError, Result},
    opts::CallOpts,
    provider::ChainStateProvider,
    service::AvsRegistryService,
};

/// Folds the operators of a snapshot into one [QuorumAvsState] per requested quorum.
///
/// Only operators holding a stake entry for a quorum contribute to it. Stake and point addition
/// are both exact, so the result does not depend on iteration order.
pub fn aggregate_quorum_states<'a, I>(
    quorum_numbers: &[QuorumNumber],
    block_number: BlockNumber,
    operators: I,
) -> BTreeMap<QuorumNumber, QuorumAvsState>
where
    I: IntoIterator<Item = &'a OperatorAvsState>,
{
    let operators: Vec<&OperatorAvsState> = operators.into_iter().collect();

    quorum_numbers
        .iter()
        .map(|&quorum| {
            let mut state = QuorumAvsState::empty(quorum, block_number);
            for operator in &operators {
                if let Some(stake) = operator.stake_in(quorum) {
                    state.include(stake, operator.g1_pub_key());
                }
            }
            (quorum, state)
        })
        .collect()
}

/// [AvsRegistryService] backed by a [ChainStateProvider].
///
/// Holds nothing but the provider handle, so concurrent calls for different blocks or quorum
/// sets need no locking.
#[derive(Debug, Clone)]
pub struct AvsRegistryServiceChainCaller<S> {
    chain_state: S,
}

impl<S: ChainStateProvider> AvsRegistryServiceChainCaller<S> {
    pub fn new(chain_state: S) -> Self {
        Self { chain_state }
    }

    pub fn chain_state(&self) -> &S {
        &self.chain_state
    }

    async fn build_operators_state(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<OperatorId, OperatorAvsState>> {
        let operators =
            self.chain_state.list_operators_with_stake(quorum_numbers, block_number).await?;

        let mut state = BTreeMap::new();
        for operator in operators {
            let stake_per_quorum: BTreeMap<_, _> = operator
                .stake_per_quorum
                .into_iter()
                .filter(|(quorum, _)| quorum_numbers.contains(quorum))
                .collect();

            if stake_per_quorum.is_empty() {
                trace!(
                    target: "avs::registry::service",
                    operator_id = %operator_id_hex(operator.operator_id),
                    "Operator holds no stake in the requested quorums, skipping"
                );
                continue;
            }

            match state.entry(operator.operator_id) {
                // the provider may list an operator once per quorum
                Entry::Occupied(mut entry) => {
                    let existing: &mut OperatorAvsState = entry.get_mut();
                    existing.stake_per_quorum.extend(stake_per_quorum);
                }
                Entry::Vacant(entry) => {
                    entry.insert(OperatorAvsState {
                        operator_id: operator.operator_id,
                        operator_info: operator.operator_info,
                        stake_per_quorum,
                        block_number,
                    });
                }
            }
        }

        debug!(
            target: "avs::registry::service",
            block_number,
            num_quorums = quorum_numbers.len(),
            num_operators = state.len(),
            "Built operators state"
        );

        Ok(state)
    }

    async fn build_quorums_state(
        &self,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<QuorumNumber, QuorumAvsState>> {
        let operators = self.build_operators_state(quorum_numbers, block_number).await?;
        let state = aggregate_quorum_states(quorum_numbers, block_number, operators.values());

        debug!(
            target: "avs::registry::service",
            block_number,
            num_quorums = state.len(),
            "Built quorums state"
        );

        Ok(state)
    }

    async fn build_check_signatures_indices(
        &self,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<CheckSignaturesIndices> {
        let indices = self
            .chain_state
            .get_checkpoint_indices(reference_block_number, quorum_numbers, non_signer_operator_ids)
            .await?
            .into_indices(reference_block_number)?;

        expect_len(
            "non_signer_quorum_bitmap_indices",
            non_signer_operator_ids.len(),
            indices.non_signer_quorum_bitmap_indices.len(),
        )?;
        expect_len("quorum_apk_indices", quorum_numbers.len(), indices.quorum_apk_indices.len())?;
        expect_len("total_stake_indices", quorum_numbers.len(), indices.total_stake_indices.len())?;
        expect_len(
            "non_signer_stake_indices",
            quorum_numbers.len(),
            indices.non_signer_stake_indices.len(),
        )?;

        Ok(indices)
    }
}

fn expect_len(array: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AvsRegistryError::IndexLengthMismatch { array, expected, actual });
    }
    Ok(())
}

#[async_trait]
impl<S: ChainStateProvider> AvsRegistryService for AvsRegistryServiceChainCaller<S> {
    async fn get_operators_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<OperatorId, OperatorAvsState>> {
        opts.run(self.build_operators_state(quorum_numbers, block_number)).await
    }

    async fn get_quorums_avs_state_at_block(
        &self,
        opts: &CallOpts,
        quorum_numbers: &[QuorumNumber],
        block_number: BlockNumber,
    ) -> Result<BTreeMap<QuorumNumber, QuorumAvsState>> {
        opts.run(self.build_quorums_state(quorum_numbers, block_number)).await
    }

    async fn get_check_signatures_indices(
        &self,
        opts: &CallOpts,
        reference_block_number: BlockNumber,
        quorum_numbers: &[QuorumNumber],
        non_signer_operator_ids: &[OperatorId],
    ) -> Result<CheckSignaturesIndices> {
        opts.run(self.build_check_signatures_indices(
            reference_block_number,
            quorum_numbers,
            non_signer_operator_ids,
        ))
        .await
    }

    async fn get_operator_quorums_at_block(
        &self,
        opts: &CallOpts,
        operator_id: OperatorId,
        block_number: BlockNumber,
    ) -> Result<Vec<QuorumNumber>> {
        opts.run(async {
            let bitmap =
                self.chain_state.get_quorum_membership_bitmap(operator_id, block_number).await?;
            Ok(bitmap_to_quorum_ids(bitmap))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockChainStateProvider, OperatorWithStake, ResolvedCheckpointIndices};
    use avs_primitives::{
        alloy_primitives::U256,
        bls::{BlsKeyPair, Fr},
        core::OperatorInfo,
        QuorumBitmap, StakeAmount,
    };
    use quickcheck_macros::quickcheck;
    use std::{io, time::Duration};
    use tokio_util::sync::CancellationToken;

    fn keypair(secret: u64) -> BlsKeyPair {
        BlsKeyPair::from_secret(Fr::from(secret))
    }

    fn operator(id: u64, stakes: &[(QuorumNumber, u64)]) -> OperatorWithStake {
        OperatorWithStake {
            operator_id: U256::from(id),
            operator_info: OperatorInfo {
                socket: format!("operator-{id}:9000"),
                pub_keys: keypair(id).pubkeys(),
            },
            stake_per_quorum: stakes
                .iter()
                .map(|(quorum, stake)| (*quorum, StakeAmount::from(*stake)))
                .collect(),
        }
    }

    fn service_with(
        operators: Vec<OperatorWithStake>,
    ) -> AvsRegistryServiceChainCaller<MockChainStateProvider> {
        let mut chain_state = MockChainStateProvider::new();
        chain_state
            .expect_list_operators_with_stake()
            .returning(move |_, _| Ok(operators.clone()));
        AvsRegistryServiceChainCaller::new(chain_state)
    }

    #[tokio::test]
    async fn operators_state_restricted_to_requested_quorums() {
        let service = service_with(vec![
            operator(1, &[(0, 10), (1, 5)]),
            operator(2, &[(1, 7)]),
            operator(3, &[(0, 20)]),
        ]);

        let state = service
            .get_operators_avs_state_at_block(&CallOpts::default(), &[0], 42)
            .await
            .unwrap();

        assert_eq!(
            state.keys().copied().collect::<Vec<_>>(),
            vec![U256::from(1u64), U256::from(3u64)]
        );

        let first = &state[&U256::from(1u64)];
        assert_eq!(first.block_number, 42);
        assert_eq!(first.stake_per_quorum.len(), 1);
        assert_eq!(first.stake_in(0), Some(StakeAmount::from(10u64)));
        assert_eq!(first.operator_info.socket, "operator-1:9000");
    }

    #[tokio::test]
    async fn operators_listed_per_quorum_are_merged() {
        let service = service_with(vec![operator(1, &[(0, 10)]), operator(1, &[(2, 30)])]);

        let state = service
            .get_operators_avs_state_at_block(&CallOpts::default(), &[0, 2], 7)
            .await
            .unwrap();

        assert_eq!(state.len(), 1);
        let merged = &state[&U256::from(1u64)];
        assert_eq!(merged.stake_in(0), Some(StakeAmount::from(10u64)));
        assert_eq!(merged.stake_in(2), Some(StakeAmount::from(30u64)));
    }

    #[tokio::test]
    async fn quorum_aggregates_only_members() {
        let service = service_with(vec![
            operator(1, &[(0, 10)]),
            operator(2, &[(0, 20), (1, 1)]),
            operator(3, &[(1, 100)]),
        ]);

        let state = service
            .get_quorums_avs_state_at_block(&CallOpts::default(), &[0, 1], 9)
            .await
            .unwrap();

        let quorum_0 = &state[&0];
        assert_eq!(quorum_0.total_stake, StakeAmount::from(30u64));
        assert_eq!(quorum_0.agg_pub_key_g1, keypair(1).pub_g1() + keypair(2).pub_g1());
        assert_eq!(quorum_0.block_number, 9);

        let quorum_1 = &state[&1];
        assert_eq!(quorum_1.total_stake, StakeAmount::from(101u64));
        assert_eq!(quorum_1.agg_pub_key_g1, keypair(2).pub_g1() + keypair(3).pub_g1());
    }

    #[tokio::test]
    async fn quorum_without_operators_is_empty() {
        let service = service_with(vec![operator(1, &[(0, 10)])]);

        let state = service
            .get_quorums_avs_state_at_block(&CallOpts::default(), &[5], 9)
            .await
            .unwrap();

        assert_eq!(state[&5], QuorumAvsState::empty(5, 9));
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state.expect_list_operators_with_stake().times(1).returning(|_, _| {
            Err(AvsRegistryError::upstream(io::Error::new(io::ErrorKind::TimedOut, "rpc timeout")))
        });
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let result = service.get_quorums_avs_state_at_block(&CallOpts::default(), &[0], 1).await;
        assert!(matches!(result, Err(AvsRegistryError::UpstreamReadFailure(_))));
    }

    #[tokio::test]
    async fn no_data_propagates() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state
            .expect_list_operators_with_stake()
            .returning(|_, block| Err(AvsRegistryError::NoDataForBlock(block)));
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let result = service.get_quorums_avs_state_at_block(&CallOpts::default(), &[0], 77).await;
        assert!(matches!(result, Err(AvsRegistryError::NoDataForBlock(77))));
    }

    #[tokio::test]
    async fn cancelled_call_returns_no_state() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state.expect_list_operators_with_stake().never();
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let token = CancellationToken::new();
        token.cancel();
        let opts = CallOpts::default().with_cancellation(token);

        let result = service.get_quorums_avs_state_at_block(&opts, &[0], 1).await;
        assert!(matches!(result, Err(AvsRegistryError::Cancelled)));
    }

    fn indices(quorums: usize, non_signers: usize) -> CheckSignaturesIndices {
        CheckSignaturesIndices {
            non_signer_quorum_bitmap_indices: vec![0; non_signers],
            quorum_apk_indices: vec![1; quorums],
            total_stake_indices: vec![2; quorums],
            non_signer_stake_indices: vec![vec![3; non_signers]; quorums],
        }
    }

    #[tokio::test]
    async fn check_signatures_indices() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state
            .expect_get_checkpoint_indices()
            .withf(|block, quorums, non_signers| {
                *block == 100
                    && quorums.to_vec() == vec![0u8, 1]
                    && non_signers.to_vec() == vec![U256::from(9u64)]
            })
            .returning(|block, _, _| Ok(ResolvedCheckpointIndices::at_block(block, indices(2, 1))));
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let result = service
            .get_check_signatures_indices(&CallOpts::default(), 100, &[0, 1], &[U256::from(9u64)])
            .await
            .unwrap();

        assert_eq!(result, indices(2, 1));
    }

    #[tokio::test]
    async fn mixed_reference_blocks_fail() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state.expect_get_checkpoint_indices().returning(|block, _, _| {
            let mut resolved = ResolvedCheckpointIndices::at_block(block, indices(1, 1));
            resolved.quorum_apk_indices.block_number = block + 1;
            Ok(resolved)
        });
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let result = service
            .get_check_signatures_indices(&CallOpts::default(), 100, &[0], &[U256::from(9u64)])
            .await;

        assert!(matches!(
            result,
            Err(AvsRegistryError::InconsistentReferenceBlock { expected: 100, found: 101 })
        ));
    }

    #[tokio::test]
    async fn index_lengths_are_checked() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state
            .expect_get_checkpoint_indices()
            .returning(|block, _, _| Ok(ResolvedCheckpointIndices::at_block(block, indices(1, 1))));
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let result = service
            .get_check_signatures_indices(
                &CallOpts::default(),
                100,
                &[0],
                &[U256::from(1u64), U256::from(2u64)],
            )
            .await;

        assert!(matches!(
            result,
            Err(AvsRegistryError::IndexLengthMismatch {
                array: "non_signer_quorum_bitmap_indices",
                expected: 2,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn operator_quorums_from_bitmap() {
        let mut chain_state = MockChainStateProvider::new();
        chain_state
            .expect_get_quorum_membership_bitmap()
            .withf(|id, block| *id == U256::from(4u64) && *block == 12)
            .returning(|_, _| Ok(U256::from(0b101u64)));
        let service = AvsRegistryServiceChainCaller::new(chain_state);

        let quorums = service
            .get_operator_quorums_at_block(&CallOpts::default(), U256::from(4u64), 12)
            .await
            .unwrap();

        assert_eq!(quorums, vec![0, 2]);
    }

    /// Provider whose reads never complete.
    struct StalledChainState;

    #[async_trait]
    impl ChainStateProvider for StalledChainState {
        async fn list_operators_with_stake(
            &self,
            _: &[QuorumNumber],
            _: BlockNumber,
        ) -> Result<Vec<OperatorWithStake>> {
            std::future::pending().await
        }

        async fn get_quorum_membership_bitmap(
            &self,
            _: OperatorId,
            _: BlockNumber,
        ) -> Result<QuorumBitmap> {
            std::future::pending().await
        }

        async fn get_checkpoint_indices(
            &self,
            _: BlockNumber,
            _: &[QuorumNumber],
            _: &[OperatorId],
        ) -> Result<ResolvedCheckpointIndices> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn stalled_upstream_hits_deadline() {
        let service = AvsRegistryServiceChainCaller::new(StalledChainState);
        let opts = CallOpts::default().with_timeout(Duration::from_millis(10));

        let result = service.get_quorums_avs_state_at_block(&opts, &[0], 1).await;
        assert!(matches!(result, Err(AvsRegistryError::DeadlineExceeded(_))));

        let result = service.get_check_signatures_indices(&opts, 1, &[0], &[]).await;
        assert!(matches!(result, Err(AvsRegistryError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn stalled_upstream_cancelled_midway() {
        let service = AvsRegistryServiceChainCaller::new(StalledChainState);
        let token = CancellationToken::new();
        let opts = CallOpts::default().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            token.cancel();
        });

        let result = service.get_operators_avs_state_at_block(&opts, &[0], 1).await;
        assert!(matches!(result, Err(AvsRegistryError::Cancelled)));
        canceller.await.unwrap();
    }

    fn avs_state(id: u64, quorum: QuorumNumber, stake: u32) -> OperatorAvsState {
        OperatorAvsState {
            operator_id: U256::from(id),
            operator_info: OperatorInfo {
                socket: String::new(),
                pub_keys: keypair(id).pubkeys(),
            },
            stake_per_quorum: [(quorum, StakeAmount::from(stake))].into_iter().collect(),
            block_number: 1,
        }
    }

    #[quickcheck]
    fn aggregation_is_compositional(operators: Vec<(u32, bool, bool)>) -> bool {
        // (stake, in first set, member of quorum 0 rather than quorum 1)
        let states: Vec<OperatorAvsState> = operators
            .iter()
            .take(8)
            .enumerate()
            .map(|(i, (stake, _, in_zero))| {
                avs_state(i as u64 + 1, if *in_zero { 0 } else { 1 }, *stake)
            })
            .collect();
        let split: Vec<bool> = operators.iter().take(8).map(|(_, first, _)| *first).collect();

        let first = states.iter().zip(&split).filter(|(_, f)| **f).map(|(s, _)| s);
        let second = states.iter().zip(&split).filter(|(_, f)| !**f).map(|(s, _)| s);

        let all = aggregate_quorum_states(&[0, 1], 1, &states);
        let first = aggregate_quorum_states(&[0, 1], 1, first);
        let second = aggregate_quorum_states(&[0, 1], 1, second);

        [0, 1].iter().all(|quorum| {
            all[quorum].total_stake == first[quorum].total_stake + second[quorum].total_stake
                && all[quorum].agg_pub_key_g1
                    == first[quorum].agg_pub_key_g1 + second[quorum].agg_pub_key_g1
        })
    }

    #[quickcheck]
    fn aggregation_is_order_independent(stakes: Vec<u32>) -> bool {
        let states: Vec<OperatorAvsState> = stakes
            .iter()
            .take(8)
            .enumerate()
            .map(|(i, stake)| avs_state(i as u64 + 1, 0, *stake))
            .collect();

        aggregate_quorum_states(&[0], 1, &states)
            == aggregate_quorum_states(&[0], 1, states.iter().rev())
    }
}
