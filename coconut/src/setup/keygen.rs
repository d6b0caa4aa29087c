//! Trusted dealer key generation: the dealer samples a signing key and gives each authority a
//! Shamir share of `x` and of every `y[i]`.

use alloc::vec::Vec;

use ark_ff::PrimeField;
use ark_serialize::*;
use ark_std::rand::RngCore;
use utils::shamir::{deal_secret, ParticipantId};

use crate::setup::{KeygenError, SecretKey};

/// Numbers relation `threshold` / `total` where `1 <= threshold <= total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Threshold(
    /// `threshold`
    pub(crate) ParticipantId,
    /// `total`
    pub(crate) ParticipantId,
);

impl Threshold {
    pub fn new(threshold: ParticipantId, total: ParticipantId) -> Option<Self> {
        (threshold >= 1 && threshold <= total).then_some(Self(threshold, total))
    }

    pub fn threshold(&self) -> ParticipantId {
        self.0
    }

    pub fn total(&self) -> ParticipantId {
        self.1
    }
}

/// Produces the master secret key and the secret key of each authority `1..=total`, supporting
/// `attribute_count` attributes.
#[allow(clippy::type_complexity)]
pub fn deal<R: RngCore, F: PrimeField>(
    rng: &mut R,
    attribute_count: usize,
    Threshold(threshold, total): Threshold,
) -> Result<(SecretKey<F>, Vec<(ParticipantId, SecretKey<F>)>), KeygenError> {
    if attribute_count == 0 {
        return Err(KeygenError::NoAttributes);
    }
    let sk = SecretKey::<F>::rand(rng, attribute_count);

    let x_shares = deal_secret(rng, sk.x, threshold, total)?.0;
    let y_shares = sk
        .y
        .iter()
        .map(|y| deal_secret(rng, *y, threshold, total).map(|(shares, _)| shares))
        .collect::<Result<Vec<_>, _>>()?;

    let authorities = x_shares
        .0
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let key = SecretKey {
                x: x.share,
                y: y_shares.iter().map(|shares| shares.0[i].share).collect(),
            };
            (x.id, key)
        })
        .collect();

    Ok((sk, authorities))
}
