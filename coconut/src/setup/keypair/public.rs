use alloc::vec::Vec;

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_serialize::*;
use core::iter::once;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    join,
    serde_utils::ArkObjectBytes,
    shamir::{lagrange_basis_at_0_for_all, ParticipantId},
};

use super::SecretKey;
use crate::setup::{KeygenError, Params};

/// Verification key `(g2, alpha = x * g2, beta[i] = y[i] * g2)`. The aggregate key of a threshold
/// of authorities has the same shape.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct VerificationKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub alpha: E::G2Affine,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub beta: Vec<E::G2Affine>,
}

impl<E: Pairing> VerificationKey<E> {
    /// Derives `VerificationKey` from supplied secret key and params.
    pub fn new(SecretKey { x, y }: &SecretKey<E::ScalarField>, params: &Params<E>) -> Self {
        let g2 = params.g2;
        let (alpha, beta) = join!(
            g2.mul_bigint(x.into_bigint()).into_affine(),
            E::G2::normalize_batch(
                &y.iter()
                    .map(|y_i| g2.mul_bigint(y_i.into_bigint()))
                    .collect::<Vec<_>>()
            )
        );

        Self { g2, alpha, beta }
    }

    /// Combines verification keys of at least `threshold` authorities, given with their unique
    /// participant ids, into the aggregate verification key.
    pub fn aggregate<'a, I>(participant_keys: I) -> Result<Self, KeygenError>
    where
        I: IntoIterator<Item = (ParticipantId, &'a VerificationKey<E>)>,
    {
        let (ids, keys): (Vec<_>, Vec<_>) = participant_keys.into_iter().unzip();
        let first = keys.first().ok_or(KeygenError::NoKeys)?;
        if let Some((id, _)) = ids
            .iter()
            .zip(&keys)
            .find(|(_, key)| key.beta.len() != first.beta.len() || key.g2 != first.g2)
        {
            return Err(KeygenError::IncompatibleKey(*id));
        }
        let l = lagrange_basis_at_0_for_all::<E::ScalarField>(&ids)?;

        let alphas = keys.iter().map(|key| key.alpha).collect::<Vec<_>>();
        let alpha = E::G2::msm_unchecked(&alphas, &l).into_affine();
        let beta = (0..first.beta.len())
            .map(|j| {
                let column = keys.iter().map(|key| key.beta[j]).collect::<Vec<_>>();
                E::G2::msm_unchecked(&column, &l)
            })
            .collect::<Vec<_>>();

        Ok(Self {
            g2: first.g2,
            alpha,
            beta: E::G2::normalize_batch(&beta),
        })
    }

    /// Returns max amount of attributes supported by this key.
    pub fn supported_attribute_count(&self) -> usize {
        self.beta.len()
    }

    /// Returns `true` if no element is the identity and at least one attribute is supported.
    pub fn valid(&self) -> bool {
        !self.beta.is_empty()
            && !once(&self.g2)
                .chain(once(&self.alpha))
                .chain(&self.beta)
                .any(AffineRepr::is_zero)
    }
}
