use alloy_primitives::{Bytes, U256};

use crate::{
    aliases::{QuorumBitmap, QuorumNumber},
    consts::MAX_QUORUM_COUNT,
};

/// Decodes a quorum membership bitmap into the list of quorums it contains.
///
/// Bits are scanned from position 0 to 255, so the returned list is strictly ascending.
/// Callers iterate stake sums and checkpoint indices in this order.
pub fn bitmap_to_quorum_ids(bitmap: QuorumBitmap) -> Vec<QuorumNumber> {
    (0..MAX_QUORUM_COUNT)
        .filter(|position| bitmap.bit(*position))
        .map(|position| position as QuorumNumber)
        .collect()
}

/// Inverse of [bitmap_to_quorum_ids]. Duplicated quorum numbers collapse into one bit.
pub fn quorum_ids_to_bitmap(quorums: &[QuorumNumber]) -> QuorumBitmap {
    let mut bitmap = U256::ZERO;
    for quorum in quorums {
        bitmap.set_bit(usize::from(*quorum), true);
    }
    bitmap
}

/// Packs quorum numbers one byte each, the `bytes quorumNumbers` layout the registry
/// contracts expect.
pub fn quorum_numbers_to_bytes(quorums: &[QuorumNumber]) -> Bytes {
    Bytes::copy_from_slice(quorums)
}
