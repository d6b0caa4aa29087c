use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::*;
use ark_std::{rand::RngCore, UniformRand, Zero};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    hashing_utils::projective_group_elem_from_try_and_incr, multi_pairing,
    serde_utils::ArkObjectBytes,
};

use crate::{
    setup::{SecretKey, VerificationKey},
    signature::CredentialError,
};

type Result<T, E = CredentialError> = core::result::Result<T, E>;

const DETERMINISTIC_H_LABEL: &[u8] = b"coconut-credential-h";

/// Credential `(h, s)` with `s = (x + \sum_{i}(y_{i} * m_{i})) * h` over attributes `m`.
/// Obtained either from a single signer or by aggregating partial credentials of a threshold
/// of authorities which all signed with the same `h`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Credential<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::G1Affine,
}

impl<E: Pairing> Credential<E> {
    /// Signs with a random `h = r * g1`, so two calls over the same attributes give different
    /// credentials. Such credentials can't be aggregated with those of other authorities.
    pub fn new<R: RngCore>(
        rng: &mut R,
        attributes: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
        g1: &E::G1Affine,
    ) -> Result<Self> {
        check_attribute_count(attributes.len(), sk.supported_attribute_count())?;
        let r = E::ScalarField::rand(rng);
        let h = g1.mul_bigint(r.into_bigint());

        Ok(Self::from_h(h, attributes, sk))
    }

    /// Signs with `h` derived by hashing the attributes, so every authority signing the same
    /// attributes uses the same `h` and the partial credentials can be aggregated.
    pub fn new_deterministic<D: Digest>(
        attributes: &[E::ScalarField],
        sk: &SecretKey<E::ScalarField>,
    ) -> Result<Self> {
        check_attribute_count(attributes.len(), sk.supported_attribute_count())?;
        let mut digest = D::new();
        digest.update(DETERMINISTIC_H_LABEL);
        for attribute in attributes {
            digest.update(attribute.into_bigint().to_bytes_be());
        }
        let h = projective_group_elem_from_try_and_incr::<E::G1Affine, D>(&digest.finalize());

        Ok(Self::from_h(h, attributes, sk))
    }

    /// Verifies the credential over `attributes` filling the first slots of the key.
    pub fn verify(&self, attributes: &[E::ScalarField], vk: &VerificationKey<E>) -> Result<()> {
        check_attribute_count(attributes.len(), vk.supported_attribute_count())?;
        let beta_mul_m = E::G2::msm_unchecked(&vk.beta[..attributes.len()], attributes);

        self.verify_pairing(beta_mul_m + vk.alpha, vk.g2)
    }

    /// `(r * h, r * s)` for a fresh random `r`.
    pub fn randomize<R: RngCore>(&self, rng: &mut R) -> Self {
        self.randomize_with(&E::ScalarField::rand(rng))
    }

    pub fn randomize_with(&self, r: &E::ScalarField) -> Self {
        let r = r.into_bigint();
        Self {
            h: self.h.mul_bigint(r).into_affine(),
            s: self.s.mul_bigint(r).into_affine(),
        }
    }

    /// Checks if a credential has zero elements. A valid credential should not have zero elements.
    pub fn is_zero(&self) -> bool {
        self.h.is_zero() || self.s.is_zero()
    }

    /// Ensures that `e(h, p1) == e(s, p2)` and credential isn't zero.
    pub(crate) fn verify_pairing<P1, P2>(&self, p1: P1, p2: P2) -> Result<()>
    where
        P1: Into<E::G2Prepared>,
        P2: Into<E::G2Prepared>,
    {
        if self.is_zero() {
            Err(CredentialError::ZeroCredential)?
        }

        let prod = multi_pairing! {
            self.h, p1;
            -self.s.into_group(), p2
        };

        if prod.is_zero() {
            Ok(())
        } else {
            Err(CredentialError::PairingCheckFailed)
        }
    }

    /// `h * (x + \sum{j}(m_{j} * y_{j}))`
    fn from_h(
        h: E::G1,
        attributes: &[E::ScalarField],
        SecretKey { x, y }: &SecretKey<E::ScalarField>,
    ) -> Self {
        let exponent = attributes
            .iter()
            .zip(y)
            .map(|(m, y)| *m * y)
            .sum::<E::ScalarField>()
            + x;
        let s = h * exponent;
        let points = E::G1::normalize_batch(&[h, s]);

        Self {
            h: points[0],
            s: points[1],
        }
    }
}

fn check_attribute_count(received: usize, supported: usize) -> Result<()> {
    if received == 0 {
        Err(CredentialError::NoAttributes)
    } else if received > supported {
        Err(CredentialError::InvalidAttributeCount {
            received,
            supported,
        })
    } else {
        Ok(())
    }
}
