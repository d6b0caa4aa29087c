use alloc::vec::Vec;

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::*;
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    concat_slices, hashing_utils::affine_group_elem_from_try_and_incr,
    serde_utils::ArkObjectBytes,
};

use crate::setup::Params;

const TAG_BASE_LABEL: &[u8] = b"coconut-tag-base-";

/// Base point of a uniqueness tag: the fixed generator `g1`, or a point hashed from an instance
/// identifier so that tags are only comparable inside that instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagBase {
    Generator,
    Hashed(Vec<u8>),
}

impl TagBase {
    pub fn hashed(id: impl AsRef<[u8]>) -> Self {
        Self::Hashed(id.as_ref().to_vec())
    }

    pub fn point<E: Pairing, D: Digest>(&self, params: &Params<E>) -> E::G1Affine {
        match self {
            Self::Generator => params.g1,
            Self::Hashed(id) => affine_group_elem_from_try_and_incr::<E::G1Affine, D>(
                &concat_slices!(TAG_BASE_LABEL, id),
            ),
        }
    }
}

/// Uniqueness tag `m_0 * Base`. Depends only on the first hidden attribute and the base, never
/// on the randomness of a showing, so a second showing of the same attribute yields the same tag.
#[serde_as]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ZetaTag<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

impl<E: Pairing> ZetaTag<E> {
    pub fn new(base: &E::G1Affine, attribute: &E::ScalarField) -> Self {
        Self(base.mul_bigint(attribute.into_bigint()).into_affine())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

utils::impl_deref! { ZetaTag<E: Pairing>(E::G1Affine) }
