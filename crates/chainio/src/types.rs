use alloy_primitives::Address;
use avs_primitives::{core::OperatorPubkeys, OperatorId, StakeAmount};

/// One row of the operator state retriever output: an operator's stake in one quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorStake {
    pub operator: Address,
    pub operator_id: OperatorId,
    pub stake: StakeAmount,
}

/// Public keys found in a `NewPubkeyRegistration` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredOperatorPubkeys {
    pub operator: Address,
    pub operator_id: OperatorId,
    pub pubkeys: OperatorPubkeys,
}
