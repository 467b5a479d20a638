use std::fmt::{self, Debug};

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::{rand::Rng, UniformRand};

use super::{G1Point, G2Point};
use crate::core::OperatorPubkeys;

/// A BLS secret scalar with its G1 and G2 public keys.
///
/// Key management is the wallet's concern; this type exists so fixtures and local tooling can
/// derive consistent key material.
#[derive(Clone)]
pub struct BlsKeyPair {
    secret: Fr,
    pub_g1: G1Point,
    pub_g2: G2Point,
}

impl BlsKeyPair {
    pub fn from_secret(secret: Fr) -> Self {
        let pub_g1 = G1Point::from((G1Affine::generator() * secret).into_affine());
        let pub_g2 = G2Point::from((G2Affine::generator() * secret).into_affine());

        Self { secret, pub_g1, pub_g2 }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_secret(Fr::rand(rng))
    }

    pub fn secret(&self) -> &Fr {
        &self.secret
    }

    pub fn pub_g1(&self) -> G1Point {
        self.pub_g1
    }

    pub fn pub_g2(&self) -> G2Point {
        self.pub_g2
    }

    pub fn pubkeys(&self) -> OperatorPubkeys {
        OperatorPubkeys { g1_pub_key: self.pub_g1, g2_pub_key: self.pub_g2 }
    }
}

impl Debug for BlsKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("pub_g1", &self.pub_g1)
            .field("pub_g2", &self.pub_g2)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_keys_are_homomorphic() {
        let a = BlsKeyPair::from_secret(Fr::from(3u64));
        let b = BlsKeyPair::from_secret(Fr::from(8u64));
        let sum = BlsKeyPair::from_secret(Fr::from(11u64));

        assert_eq!(a.pub_g1() + b.pub_g1(), sum.pub_g1());
        assert_eq!(a.pub_g2() + b.pub_g2(), sum.pub_g2());
    }

    #[test]
    fn debug_hides_secret() {
        let keypair = BlsKeyPair::random(&mut ark_std::test_rng());
        let rendered = format!("{keypair:?}");
        assert!(!rendered.contains("secret"));
    }
}
