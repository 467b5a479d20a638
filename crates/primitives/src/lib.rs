pub use alloy_primitives;

pub mod aliases;
pub mod bitmap;
pub mod block;

/// BN254 points and key pairs
pub mod bls;

/// Per-block operator and quorum snapshots
pub mod core;

pub mod consts;
pub mod utils;

pub use self::aliases::*;
pub use self::bitmap::{bitmap_to_quorum_ids, quorum_ids_to_bitmap, quorum_numbers_to_bytes};
pub use self::block::{block_number_from_u64, BlockNumberOverflow};
