/// Number of quorums addressable through a [crate::aliases::QuorumBitmap].
pub const MAX_QUORUM_COUNT: usize = 256;

/// Socket reported for operators that never emitted a socket update.
pub const UNKNOWN_OPERATOR_SOCKET: &str = "";

/// Number of blocks covered by one `eth_getLogs` page when scanning registry events.
pub const DEFAULT_QUERY_BLOCK_RANGE: u64 = 10_000;
