use serde::{Deserialize, Serialize};

use crate::{
    aliases::{BlockNumber, QuorumNumber, StakeAmount},
    bls::G1Point,
};

/// Aggregate state of one quorum at `block_number`.
///
/// `total_stake` is the sum of the included operators' stake in the quorum and
/// `agg_pub_key_g1` the sum of their G1 public keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumAvsState {
    pub quorum_number: QuorumNumber,
    pub total_stake: StakeAmount,
    pub agg_pub_key_g1: G1Point,
    pub block_number: BlockNumber,
}

impl QuorumAvsState {
    /// A quorum with no operators: zero stake and the identity as aggregate key.
    pub fn empty(quorum_number: QuorumNumber, block_number: BlockNumber) -> Self {
        Self {
            quorum_number,
            total_stake: StakeAmount::ZERO,
            agg_pub_key_g1: G1Point::identity(),
            block_number,
        }
    }

    /// Folds one operator's stake and key into the aggregate.
    pub fn include(&mut self, stake: StakeAmount, g1_pub_key: G1Point) {
        self.total_stake += stake;
        self.agg_pub_key_g1 += g1_pub_key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::{BlsKeyPair, Fr};

    #[test]
    fn include_accumulates() {
        let a = BlsKeyPair::from_secret(Fr::from(2u64));
        let b = BlsKeyPair::from_secret(Fr::from(5u64));

        let mut state = QuorumAvsState::empty(0, 10);
        state.include(StakeAmount::from(10u64), a.pub_g1());
        state.include(StakeAmount::from(20u64), b.pub_g1());

        assert_eq!(state.total_stake, StakeAmount::from(30u64));
        assert_eq!(state.agg_pub_key_g1, BlsKeyPair::from_secret(Fr::from(7u64)).pub_g1());
        assert_eq!(state.block_number, 10);
    }
}
