use std::{
    fmt::{self, Debug},
    iter::Sum,
    ops::{Add, AddAssign},
};

use alloy_primitives::U256;
use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, PrimeField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PointError {
    #[error("coordinate {0} is not a BN254 base field element")]
    /// The coordinate is not smaller than the field modulus
    InvalidFieldElement(U256),
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime order subgroup")]
    NotInSubgroup,
}

fn fq_from_u256(value: U256) -> Result<Fq, PointError> {
    Fq::from_bigint(BigInt::new(*value.as_limbs())).ok_or(PointError::InvalidFieldElement(value))
}

fn fq_to_u256(value: &Fq) -> U256 {
    U256::from_limbs(value.into_bigint().0)
}

/// A BN254 G1 point, used for operator public keys and their aggregates.
///
/// Only the operations aggregation needs are exposed: identity, addition and equality.
/// Addition is exact group addition, so the aggregate of a set of keys does not depend on the
/// order they are added in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "G1Coordinates", into = "G1Coordinates")]
pub struct G1Point(G1Affine);

/// Affine `(X, Y)` coordinates of a [G1Point]. The identity is encoded as `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1Coordinates {
    pub x: U256,
    pub y: U256,
}

impl G1Point {
    pub fn identity() -> Self {
        Self(G1Affine::zero())
    }

    pub fn generator() -> Self {
        Self(G1Affine::generator())
    }

    pub fn is_identity(&self) -> bool {
        self.0.infinity
    }

    /// Builds a point from its affine coordinates, checking it is a valid group element.
    pub fn from_coordinates(x: U256, y: U256) -> Result<Self, PointError> {
        if x.is_zero() && y.is_zero() {
            return Ok(Self::identity());
        }

        let point = G1Affine::new_unchecked(fq_from_u256(x)?, fq_from_u256(y)?);
        if !point.is_on_curve() {
            return Err(PointError::NotOnCurve);
        }
        if !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PointError::NotInSubgroup);
        }

        Ok(Self(point))
    }

    pub fn coordinates(&self) -> G1Coordinates {
        if self.0.infinity {
            return G1Coordinates { x: U256::ZERO, y: U256::ZERO };
        }

        G1Coordinates { x: fq_to_u256(&self.0.x), y: fq_to_u256(&self.0.y) }
    }

    pub fn as_affine(&self) -> &G1Affine {
        &self.0
    }
}

impl Default for G1Point {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<G1Affine> for G1Point {
    fn from(value: G1Affine) -> Self {
        Self(value)
    }
}

impl From<G1Point> for G1Coordinates {
    fn from(value: G1Point) -> Self {
        value.coordinates()
    }
}

impl TryFrom<G1Coordinates> for G1Point {
    type Error = PointError;

    fn try_from(value: G1Coordinates) -> Result<Self, Self::Error> {
        Self::from_coordinates(value.x, value.y)
    }
}

impl Debug for G1Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let G1Coordinates { x, y } = self.coordinates();
        write!(f, "G1Point({x:#x}, {y:#x})")
    }
}

impl Add for G1Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut sum = self.0.into_group();
        sum += rhs.0;
        Self(sum.into_affine())
    }
}

impl AddAssign for G1Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for G1Point {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), Add::add)
    }
}

impl<'a> Sum<&'a G1Point> for G1Point {
    fn sum<I: Iterator<Item = &'a G1Point>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A BN254 G2 point. Operators register it next to their G1 key for off-chain verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "G2Coordinates", into = "G2Coordinates")]
pub struct G2Point(G2Affine);

/// Affine coordinates of a [G2Point]. Each coordinate is an `Fq2` element stored as
/// `[c0, c1]`, real part first. The identity is encoded as all zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2Coordinates {
    pub x: [U256; 2],
    pub y: [U256; 2],
}

fn fq2_from_u256(value: [U256; 2]) -> Result<Fq2, PointError> {
    Ok(Fq2::new(fq_from_u256(value[0])?, fq_from_u256(value[1])?))
}

fn fq2_to_u256(value: &Fq2) -> [U256; 2] {
    [fq_to_u256(&value.c0), fq_to_u256(&value.c1)]
}

impl G2Point {
    pub fn identity() -> Self {
        Self(G2Affine::zero())
    }

    pub fn generator() -> Self {
        Self(G2Affine::generator())
    }

    pub fn is_identity(&self) -> bool {
        self.0.infinity
    }

    pub fn from_coordinates(x: [U256; 2], y: [U256; 2]) -> Result<Self, PointError> {
        if x.iter().chain(y.iter()).all(U256::is_zero) {
            return Ok(Self::identity());
        }

        let point = G2Affine::new_unchecked(fq2_from_u256(x)?, fq2_from_u256(y)?);
        if !point.is_on_curve() {
            return Err(PointError::NotOnCurve);
        }
        // G2 has a non-trivial cofactor, this check is not a formality
        if !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(PointError::NotInSubgroup);
        }

        Ok(Self(point))
    }

    pub fn coordinates(&self) -> G2Coordinates {
        if self.0.infinity {
            return G2Coordinates { x: [U256::ZERO; 2], y: [U256::ZERO; 2] };
        }

        G2Coordinates { x: fq2_to_u256(&self.0.x), y: fq2_to_u256(&self.0.y) }
    }

    pub fn as_affine(&self) -> &G2Affine {
        &self.0
    }
}

impl Default for G2Point {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<G2Affine> for G2Point {
    fn from(value: G2Affine) -> Self {
        Self(value)
    }
}

impl From<G2Point> for G2Coordinates {
    fn from(value: G2Point) -> Self {
        value.coordinates()
    }
}

impl TryFrom<G2Coordinates> for G2Point {
    type Error = PointError;

    fn try_from(value: G2Coordinates) -> Result<Self, Self::Error> {
        Self::from_coordinates(value.x, value.y)
    }
}

impl Debug for G2Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let G2Coordinates { x, y } = self.coordinates();
        write!(f, "G2Point([{:#x}, {:#x}], [{:#x}, {:#x}])", x[0], x[1], y[0], y[1])
    }
}

impl Add for G2Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut sum = self.0.into_group();
        sum += rhs.0;
        Self(sum.into_affine())
    }
}

impl AddAssign for G2Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
