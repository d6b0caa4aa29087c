//! Fiat-Shamir challenges. Prover and verifier append the same items in the same order and hash
//! the accumulated canonical bytes to a scalar.

use crate::hashing_utils::field_elem_from_try_and_incr;
use alloc::vec::Vec;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalSerialize, SerializationError};
use digest::Digest;

/// Accumulates the compressed encoding of every item that the challenge depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeContribution {
    bytes: Vec<u8>,
}

impl ChallengeContribution {
    /// Starts a transcript with a domain separation label.
    pub fn new(domain: &[u8]) -> Self {
        Self {
            bytes: domain.to_vec(),
        }
    }

    pub fn append<T: CanonicalSerialize + ?Sized>(
        &mut self,
        item: &T,
    ) -> Result<&mut Self, SerializationError> {
        item.serialize_compressed(&mut self.bytes)?;
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn challenge<F: PrimeField, D: Digest>(&self) -> F {
        compute_random_oracle_challenge::<F, D>(&self.bytes)
    }
}

/// Hash bytes to a field element, the random oracle of every proof in this workspace.
pub fn compute_random_oracle_challenge<F: PrimeField, D: Digest>(challenge_bytes: &[u8]) -> F {
    field_elem_from_try_and_incr::<F, D>(challenge_bytes)
}
