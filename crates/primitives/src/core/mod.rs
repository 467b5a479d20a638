pub mod indices;
pub mod operator;
pub mod quorum;

pub use self::indices::CheckSignaturesIndices;
pub use self::operator::{OperatorAvsState, OperatorInfo, OperatorPubkeys};
pub use self::quorum::QuorumAvsState;
