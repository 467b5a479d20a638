use alloy_primitives::{keccak256, U256};
use avs_primitives::{
    bls::{G1Point, G2Point, PointError},
    core::CheckSignaturesIndices,
    utils::operator_id_from_b256,
    OperatorId,
};

use crate::{
    contracts::{IBLSApkRegistry, IOperatorStateRetriever},
    types::OperatorStake,
};

/// The registry derives an operator id as `keccak256(X || Y)` of its G1 public key.
pub fn operator_id_from_g1(pubkey: &G1Point) -> OperatorId {
    let coordinates = pubkey.coordinates();

    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&coordinates.x.to_be_bytes::<32>());
    preimage[32..].copy_from_slice(&coordinates.y.to_be_bytes::<32>());

    operator_id_from_b256(keccak256(preimage))
}

pub fn g1_from_sol(point: &IBLSApkRegistry::G1Point) -> Result<G1Point, PointError> {
    G1Point::from_coordinates(point.X, point.Y)
}

/// Solidity stores the imaginary part first, the point type expects the real part first.
pub fn g2_from_sol(point: &IBLSApkRegistry::G2Point) -> Result<G2Point, PointError> {
    G2Point::from_coordinates([point.X[1], point.X[0]], [point.Y[1], point.Y[0]])
}

pub fn operator_stake_from_sol(operator: &IOperatorStateRetriever::Operator) -> OperatorStake {
    OperatorStake {
        operator: operator.operator,
        operator_id: operator_id_from_b256(operator.operatorId),
        stake: U256::from(operator.stake),
    }
}

pub fn indices_from_sol(
    indices: IOperatorStateRetriever::CheckSignaturesIndices,
) -> CheckSignaturesIndices {
    CheckSignaturesIndices {
        non_signer_quorum_bitmap_indices: indices.nonSignerQuorumBitmapIndices,
        quorum_apk_indices: indices.quorumApkIndices,
        total_stake_indices: indices.totalStakeIndices,
        non_signer_stake_indices: indices.nonSignerStakeIndices,
    }
}
