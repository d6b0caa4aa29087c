use alloc::vec::Vec;

use ark_ec::{pairing::Pairing, AffineRepr};
use ark_serialize::*;
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{misc::n_affine_group_elements, serde_utils::ArkObjectBytes};

/// Public parameters shared by issuers, provers and verifiers. Built once and passed to every
/// signing, proving and verification call.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Params<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    /// Hashed bases, `hs[i] = hash_to_G1(label || "-h-" || i)`
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub hs: Vec<E::G1Affine>,
}

impl<E: Pairing> Params<E> {
    pub fn new<D: Digest>(label: &[u8], attribute_count: u32) -> Self {
        Self {
            g1: E::G1Affine::generator(),
            g2: E::G2Affine::generator(),
            hs: n_affine_group_elements::<E::G1Affine, D>(label, b"-h-", attribute_count),
        }
    }

    pub fn supported_attribute_count(&self) -> usize {
        self.hs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use blake2::Blake2b512;

    #[test]
    fn params_depend_on_label_only_through_hs() {
        let a = Params::<Bls12_381>::new::<Blake2b512>(b"petition", 3);
        let b = Params::<Bls12_381>::new::<Blake2b512>(b"petition", 3);
        let c = Params::<Bls12_381>::new::<Blake2b512>(b"auction", 3);
        assert_eq!(a, b);
        assert_eq!(a.g1, c.g1);
        assert_eq!(a.g2, c.g2);
        assert_ne!(a.hs, c.hs);
        assert_eq!(a.supported_attribute_count(), 3);

        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(serde_json::from_str::<Params<Bls12_381>>(&json).unwrap(), a);
    }
}
