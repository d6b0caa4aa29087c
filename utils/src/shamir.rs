//! Shamir secret sharing over a prime field and the Lagrange basis at 0 used to combine shares,
//! partial signatures and partial decryptions of any qualified subset.

use alloc::vec::Vec;
use ark_ff::PrimeField;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, cfg_iter, rand::RngCore};
use zeroize::Zeroize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identifier of a participant, also the `x` coordinate of its share. Never 0.
pub type ParticipantId = u16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareError {
    InvalidThresholdOrTotal(ParticipantId, ParticipantId),
    BelowThreshold(ParticipantId, ParticipantId),
    ZeroParticipantId,
    DuplicateParticipantId(ParticipantId),
    ParticipantNotInSet(ParticipantId),
}

#[derive(Clone, Debug, PartialEq, Eq, Zeroize, CanonicalSerialize, CanonicalDeserialize)]
pub struct Share<F: PrimeField> {
    pub id: ParticipantId,
    pub threshold: ParticipantId,
    pub share: F,
}

/// Shares of one secret, ordered by participant id.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, CanonicalSerialize, CanonicalDeserialize)]
pub struct Shares<F: PrimeField>(pub Vec<Share<F>>);

impl<F: PrimeField> Drop for Share<F> {
    fn drop(&mut self) {
        self.share.zeroize();
    }
}

/// Split `secret` into `total` shares, any `threshold` of which reconstruct it. Also returns the
/// sharing polynomial so that callers can derive public commitments from it.
pub fn deal_secret<R: RngCore, F: PrimeField>(
    rng: &mut R,
    secret: F,
    threshold: ParticipantId,
    total: ParticipantId,
) -> Result<(Shares<F>, DensePolynomial<F>), ShareError> {
    if threshold < 1 || threshold > total {
        return Err(ShareError::InvalidThresholdOrTotal(threshold, total));
    }
    let mut coeffs = Vec::with_capacity(threshold as usize);
    coeffs.push(secret);
    coeffs.extend((1..threshold).map(|_| F::rand(rng)));
    let poly = DensePolynomial::from_coefficients_vec(coeffs);
    let shares = cfg_into_iter!(1..=total)
        .map(|id| Share {
            id,
            threshold,
            share: poly.evaluate(&F::from(id as u64)),
        })
        .collect::<Vec<_>>();
    Ok((Shares(shares), poly))
}

impl<F: PrimeField> Shares<F> {
    pub fn threshold(&self) -> ParticipantId {
        self.0.first().map(|s| s.threshold).unwrap_or(0)
    }

    /// Reconstruct the secret from the first `threshold` shares.
    pub fn reconstruct_secret(&self) -> Result<F, ShareError> {
        let threshold = self.threshold();
        let len = self.0.len() as ParticipantId;
        if threshold == 0 || threshold > len {
            return Err(ShareError::BelowThreshold(threshold, len));
        }
        let shares = &self.0[0..threshold as usize];
        let ids = shares.iter().map(|s| s.id).collect::<Vec<_>>();
        let basis = lagrange_basis_at_0_for_all::<F>(&ids)?;
        Ok(cfg_into_iter!(basis)
            .zip(cfg_iter!(shares))
            .map(|(b, s)| b * s.share)
            .sum::<F>())
    }
}

/// Checks that ids are non-zero and pairwise distinct.
pub fn validate_participant_ids(x_coords: &[ParticipantId]) -> Result<(), ShareError> {
    for (pos, id) in x_coords.iter().enumerate() {
        if *id == 0 {
            return Err(ShareError::ZeroParticipantId);
        }
        if x_coords[..pos].contains(id) {
            return Err(ShareError::DuplicateParticipantId(*id));
        }
    }
    Ok(())
}

/// Return the Lagrange basis polynomial at x = 0 for participant `i` given the `x` coordinates
/// `(x_coords[0]) * (x_coords[1]) * ... / ((x_coords[0] - i) * (x_coords[1] - i) * ...)`
pub fn lagrange_basis_at_0<F: PrimeField>(
    x_coords: &[ParticipantId],
    i: ParticipantId,
) -> Result<F, ShareError> {
    validate_participant_ids(x_coords)?;
    if !x_coords.contains(&i) {
        return Err(ShareError::ParticipantNotInSet(i));
    }
    let mut numerator = F::one();
    let mut denominator = F::one();
    let i_f = F::from(i as u64);
    for x in x_coords {
        if *x == i {
            continue;
        }
        let x = F::from(*x as u64);
        numerator *= x;
        denominator *= x - i_f;
    }
    // Distinct non-zero ids keep the denominator invertible
    let denominator = denominator.inverse().ok_or(ShareError::DuplicateParticipantId(i))?;
    Ok(numerator * denominator)
}

/// Lagrange basis at 0 for each of the given `x` coordinates, in the same order.
pub fn lagrange_basis_at_0_for_all<F: PrimeField>(
    x_coords: &[ParticipantId],
) -> Result<Vec<F>, ShareError> {
    validate_participant_ids(x_coords)?;
    let x = x_coords.iter().map(|x| F::from(*x as u64)).collect::<Vec<_>>();

    // Product of all `x`, i.e. \prod_{i}(x_i}
    let product = x.iter().product::<F>();

    let mut basis = Vec::with_capacity(x.len());
    for i in &x {
        let denominator = x
            .iter()
            .filter(|j| i != *j)
            .map(|j| *j - i)
            .product::<F>();
        let inverses = denominator.inverse().zip(i.inverse());
        let (denominator, i_inv) = inverses.ok_or(ShareError::ZeroParticipantId)?;
        basis.push(product * i_inv * denominator);
    }
    Ok(basis)
}
