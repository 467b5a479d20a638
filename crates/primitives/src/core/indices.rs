use serde::{Deserialize, Serialize};

use crate::aliases::CheckpointIndex;

/// Positions, inside the registry's historical checkpoint arrays, of the records a verifier
/// needs to check one signed response against a reference block.
///
/// All four arrays are resolved against the same reference block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSignaturesIndices {
    /// One entry per non-signer: index of its quorum bitmap update.
    pub non_signer_quorum_bitmap_indices: Vec<CheckpointIndex>,
    /// One entry per quorum: index of the aggregate public key update.
    pub quorum_apk_indices: Vec<CheckpointIndex>,
    /// One entry per quorum: index of the total stake update.
    pub total_stake_indices: Vec<CheckpointIndex>,
    /// One array per quorum, holding the stake update index of each non-signer in that quorum.
    pub non_signer_stake_indices: Vec<Vec<CheckpointIndex>>,
}

impl CheckSignaturesIndices {
    pub fn is_empty(&self) -> bool {
        self.non_signer_quorum_bitmap_indices.is_empty()
            && self.quorum_apk_indices.is_empty()
            && self.total_stake_indices.is_empty()
            && self.non_signer_stake_indices.is_empty()
    }
}
