//! BN254 point arithmetic used to aggregate operator public keys.

mod keypair;
mod point;

pub use ark_bn254::Fr;

pub use self::keypair::*;
pub use self::point::*;
