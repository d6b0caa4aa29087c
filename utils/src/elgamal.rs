//! Elgamal encryption of group elements. Ciphertexts add pointwise, which is what lets a running
//! tally be accumulated without decrypting individual contributions.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Add, rand::RngCore, UniformRand};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
)]
pub struct SecretKey<F: PrimeField>(pub F);

/// Elgamal encryption of a group element `m`
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Ciphertext<G: AffineRepr> {
    /// Ephemeral public key `k * gen`
    pub first: G,
    /// `k * pk + m`
    pub second: G,
}

impl<G: AffineRepr> Ciphertext<G> {
    /// Encryption of the identity under randomness 0, the starting point of a tally.
    pub fn zero() -> Self {
        Self {
            first: G::zero(),
            second: G::zero(),
        }
    }

    /// Returns the ciphertext and randomness created for encryption
    pub fn new<R: RngCore>(
        rng: &mut R,
        msg: &G,
        public_key: &G,
        gen: &G,
    ) -> (Self, G::ScalarField) {
        let k = G::ScalarField::rand(rng);
        (Self::new_with_randomness(msg, public_key, gen, &k), k)
    }

    pub fn new_with_randomness(msg: &G, public_key: &G, gen: &G, k: &G::ScalarField) -> Self {
        let k = k.into_bigint();
        Self {
            first: gen.mul_bigint(k).into_affine(),
            second: (public_key.mul_bigint(k) + *msg).into_affine(),
        }
    }

    /// Encryption of `h - m` given an encryption of `m`, obtained without the randomness:
    /// `(-first, h - second)`. For a bit `m` encoded as `m * h` this is the encryption of `1 - m`.
    pub fn complement(&self, h: &G) -> Self {
        Self {
            first: (-self.first.into_group()).into_affine(),
            second: (-self.second.into_group() + *h).into_affine(),
        }
    }

    /// Full decryption with a single key. Tallies are only ever decrypted from threshold shares.
    #[cfg(test)]
    pub fn decrypt(&self, secret_key: &G::ScalarField) -> G {
        (-self.first.mul_bigint(secret_key.into_bigint()) + self.second).into_affine()
    }
}

impl<G: AffineRepr> Add for Ciphertext<G> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            first: (self.first + rhs.first).into_affine(),
            second: (self.second + rhs.second).into_affine(),
        }
    }
}

impl<'a, G: AffineRepr> Add<&'a Ciphertext<G>> for &'a Ciphertext<G> {
    type Output = Ciphertext<G>;

    fn add(self, rhs: &'a Ciphertext<G>) -> Self::Output {
        *self + *rhs
    }
}
