use alloy_primitives::{B256, U256};

use crate::aliases::OperatorId;

/// Encode `data` as a 0x-prefixed hex string.
pub fn hex_encode<T: AsRef<[u8]>>(data: T) -> String {
    let hex = hex::encode(data);

    let mut s = "0x".to_string();
    s.push_str(hex.as_str());
    s
}

/// Converts an [OperatorId] to the `bytes32` form used by the registry contracts.
pub fn operator_id_to_b256(operator_id: OperatorId) -> B256 {
    B256::from(operator_id.to_be_bytes::<32>())
}

/// Converts a `bytes32` operator id read from the registry contracts to an [OperatorId].
pub fn operator_id_from_b256(operator_id: B256) -> OperatorId {
    U256::from_be_bytes(operator_id.0)
}

/// Renders an [OperatorId] the way block explorers show `bytes32` values.
pub fn operator_id_hex(operator_id: OperatorId) -> String {
    hex_encode(operator_id.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_id_bytes32_conversion() {
        let id = U256::from(0xdead_beefu64);
        let word = operator_id_to_b256(id);

        assert_eq!(word.0[31], 0xef);
        assert_eq!(word.0[28], 0xde);
        assert!(word.0[..28].iter().all(|b| *b == 0));
        assert_eq!(operator_id_from_b256(word), id);
    }

    #[test]
    fn operator_id_hex_is_padded() {
        let rendered = operator_id_hex(U256::from(1u64));
        assert_eq!(rendered.len(), 66);
        assert!(rendered.starts_with("0x000"));
        assert!(rendered.ends_with('1'));
    }
}
