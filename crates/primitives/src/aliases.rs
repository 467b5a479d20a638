use alloy_primitives::U256;

/// Stable identifier of a registered operator.
///
/// On chain this is the `bytes32` hash of the operator's G1 public key, read as a big-endian
/// integer.
pub type OperatorId = U256;

/// Identifier of a stake quorum. Membership is tracked as one bit of a [QuorumBitmap].
pub type QuorumNumber = u8;

/// Block height as understood by the registry contracts, which store heights as `uint32`.
pub type BlockNumber = u32;

/// Stake weight of an operator in a quorum.
pub type StakeAmount = U256;

/// Bit `i` set means quorum `i` is included.
pub type QuorumBitmap = U256;

/// Position of a checkpoint inside one of the on-chain history arrays.
pub type CheckpointIndex = u32;
