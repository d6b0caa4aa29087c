//! Serde adapters for arkworks objects, which only implement the canonical serialization traits.
//! Objects travel as their compressed canonical bytes so that a serde round trip through any
//! format preserves the byte equality checks done on ledger objects.

use alloc::vec::Vec;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

pub type ArkObjectBytes = AsCanonical;

pub struct AsCanonical;

impl AsCanonical {
    pub fn serialize<S, T>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let mut bytes = Vec::with_capacity(x.compressed_size());
        x.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}

impl<T> SerializeAs<T> for AsCanonical
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Self::serialize(x, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for AsCanonical
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine};
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use serde_with::serde_as;

    #[serde_as]
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde_as(as = "ArkObjectBytes")]
        point: G1Affine,
        #[serde_as(as = "Vec<ArkObjectBytes>")]
        scalars: Vec<Fr>,
    }

    #[test]
    fn json_preserves_points_and_scalars() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let holder = Holder {
            point: (G1Affine::generator() * Fr::rand(&mut rng)).into_affine(),
            scalars: (0..3).map(|_| Fr::rand(&mut rng)).collect(),
        };
        let json = serde_json::to_string(&holder).unwrap();
        let decoded: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(holder, decoded);

        assert!(serde_json::from_str::<Holder>(r#"{"point":[],"scalars":[]}"#).is_err());
    }
}
