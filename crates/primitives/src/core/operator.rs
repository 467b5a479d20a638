use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    aliases::{BlockNumber, OperatorId, QuorumNumber, StakeAmount},
    bls::{G1Point, G2Point},
};

/// The signing material an operator registered with the BLS public key registry.
///
/// The G1 key is used for cheap on-chain checks through the precompiles, the G2 key for
/// off-chain verification of signatures on G1. The two are only meaningful together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPubkeys {
    pub g1_pub_key: G1Point,
    pub g2_pub_key: G2Point,
}

/// Network reachability and key material of an operator, as read at one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    pub socket: String,
    pub pub_keys: OperatorPubkeys,
}

/// One operator's state at `block_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAvsState {
    pub operator_id: OperatorId,
    pub operator_info: OperatorInfo,
    /// Stake of the operator for each quorum it is registered in.
    pub stake_per_quorum: BTreeMap<QuorumNumber, StakeAmount>,
    pub block_number: BlockNumber,
}

impl OperatorAvsState {
    /// Stake in `quorum`, or `None` when the operator is not part of it.
    pub fn stake_in(&self, quorum: QuorumNumber) -> Option<StakeAmount> {
        self.stake_per_quorum.get(&quorum).copied()
    }

    pub fn g1_pub_key(&self) -> G1Point {
        self.operator_info.pub_keys.g1_pub_key
    }
}
