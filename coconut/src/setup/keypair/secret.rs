use alloc::vec::Vec;

use ark_ff::PrimeField;
use ark_serialize::*;
use ark_std::rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use utils::misc::{n_rand, rand};

/// Signing key of an authority, `x` and one `y` per attribute slot.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Zeroize, ZeroizeOnDrop,
)]
pub struct SecretKey<F: PrimeField> {
    pub(crate) x: F,
    pub(crate) y: Vec<F>,
}

impl<F: PrimeField> SecretKey<F> {
    /// Generates random secret key compatible with `attribute_count` attributes.
    pub fn rand<R: RngCore>(rng: &mut R, attribute_count: usize) -> Self {
        let x = rand(rng);
        let y = n_rand(rng, attribute_count);

        Self { x, y }
    }

    /// Returns max amount of attributes supported by this secret key.
    pub fn supported_attribute_count(&self) -> usize {
        self.y.len()
    }
}
