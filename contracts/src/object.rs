//! Ledger objects. Each object is one case of `LedgerObject` with a fixed set of fields, encoded
//! canonically behind a one byte kind tag so that equal objects have equal encodings.

use ark_ec::pairing::Pairing;
use ark_serialize::*;
use coconut::{VerificationKey, ZetaTag};
use serde::{Deserialize, Serialize};

use crate::{
    auction::Auction,
    error::Precondition,
    issuance::{CredentialInstance, CredentialRequest},
    petition::Petition,
};

/// Tokens are emitted by `init` and consumed and re-emitted by the method creating an instance
/// of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Auction,
    Tumbler,
    Credential,
    Petition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpentListKind {
    Petition,
    Tumbler,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Token(TokenKind),
    Auction,
    Petition,
    SpentTags(SpentListKind),
    CredentialInstance,
    CredentialRequest,
}

/// Append-only list of uniqueness tags already used with a contract instance.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct SpentTagList<E: Pairing> {
    pub kind: SpentListKind,
    /// Identifier of the instance the list belongs to, e.g. the petition UUID.
    pub instance: Vec<u8>,
    /// Key the showings spending into this list are verified with, when not held elsewhere.
    pub verification_key: Option<VerificationKey<E>>,
    pub tags: Vec<ZetaTag<E>>,
}

impl<E: Pairing> SpentTagList<E> {
    pub fn new(
        kind: SpentListKind,
        instance: impl Into<Vec<u8>>,
        verification_key: Option<VerificationKey<E>>,
    ) -> Self {
        Self {
            kind,
            instance: instance.into(),
            verification_key,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(&self, tag: ZetaTag<E>) -> Self {
        let mut list = self.clone();
        list.tags.push(tag);
        list
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum LedgerObject<E: Pairing> {
    Token(TokenKind),
    Auction(Auction<E>),
    Petition(Petition<E>),
    SpentTags(SpentTagList<E>),
    CredentialInstance(CredentialInstance<E>),
    CredentialRequest(CredentialRequest<E>),
}

impl<E: Pairing> LedgerObject<E> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Token(kind) => ObjectKind::Token(*kind),
            Self::Auction(_) => ObjectKind::Auction,
            Self::Petition(_) => ObjectKind::Petition,
            Self::SpentTags(list) => ObjectKind::SpentTags(list.kind),
            Self::CredentialInstance(_) => ObjectKind::CredentialInstance,
            Self::CredentialRequest(_) => ObjectKind::CredentialRequest,
        }
    }

    pub fn expect_token(&self, kind: TokenKind) -> Result<(), Precondition> {
        match self {
            Self::Token(k) if *k == kind => Ok(()),
            other => Err(other.mismatch(ObjectKind::Token(kind))),
        }
    }

    pub fn into_auction(self) -> Result<Auction<E>, Precondition> {
        match self {
            Self::Auction(auction) => Ok(auction),
            other => Err(other.mismatch(ObjectKind::Auction)),
        }
    }

    pub fn into_petition(self) -> Result<Petition<E>, Precondition> {
        match self {
            Self::Petition(petition) => Ok(petition),
            other => Err(other.mismatch(ObjectKind::Petition)),
        }
    }

    pub fn into_spent_tags(self, kind: SpentListKind) -> Result<SpentTagList<E>, Precondition> {
        match self {
            Self::SpentTags(list) if list.kind == kind => Ok(list),
            other => Err(other.mismatch(ObjectKind::SpentTags(kind))),
        }
    }

    pub fn into_credential_instance(self) -> Result<CredentialInstance<E>, Precondition> {
        match self {
            Self::CredentialInstance(instance) => Ok(instance),
            other => Err(other.mismatch(ObjectKind::CredentialInstance)),
        }
    }

    pub fn into_credential_request(self) -> Result<CredentialRequest<E>, Precondition> {
        match self {
            Self::CredentialRequest(request) => Ok(request),
            other => Err(other.mismatch(ObjectKind::CredentialRequest)),
        }
    }

    fn mismatch(&self, expected: ObjectKind) -> Precondition {
        Precondition::UnexpectedKind {
            expected,
            found: self.kind(),
        }
    }
}

impl<E: Pairing> From<Auction<E>> for LedgerObject<E> {
    fn from(auction: Auction<E>) -> Self {
        Self::Auction(auction)
    }
}

impl<E: Pairing> From<Petition<E>> for LedgerObject<E> {
    fn from(petition: Petition<E>) -> Self {
        Self::Petition(petition)
    }
}

impl<E: Pairing> From<SpentTagList<E>> for LedgerObject<E> {
    fn from(list: SpentTagList<E>) -> Self {
        Self::SpentTags(list)
    }
}

impl<E: Pairing> From<CredentialInstance<E>> for LedgerObject<E> {
    fn from(instance: CredentialInstance<E>) -> Self {
        Self::CredentialInstance(instance)
    }
}

impl<E: Pairing> From<CredentialRequest<E>> for LedgerObject<E> {
    fn from(request: CredentialRequest<E>) -> Self {
        Self::CredentialRequest(request)
    }
}

mod serialization {
    use super::*;

    macro_rules! impl_unit_enum_serialization {
        ($name: ident { $($variant: ident = $tag: literal),+ }) => {
            impl Valid for $name {
                fn check(&self) -> Result<(), SerializationError> {
                    Ok(())
                }
            }

            impl CanonicalSerialize for $name {
                fn serialize_with_mode<W: Write>(
                    &self,
                    writer: W,
                    compress: Compress,
                ) -> Result<(), SerializationError> {
                    let tag: u8 = match self {
                        $(Self::$variant => $tag),+
                    };
                    CanonicalSerialize::serialize_with_mode(&tag, writer, compress)
                }

                fn serialized_size(&self, compress: Compress) -> usize {
                    0u8.serialized_size(compress)
                }
            }

            impl CanonicalDeserialize for $name {
                fn deserialize_with_mode<R: Read>(
                    reader: R,
                    compress: Compress,
                    validate: Validate,
                ) -> Result<Self, SerializationError> {
                    let tag: u8 =
                        CanonicalDeserialize::deserialize_with_mode(reader, compress, validate)?;
                    match tag {
                        $($tag => Ok(Self::$variant),)+
                        _ => Err(SerializationError::InvalidData),
                    }
                }
            }
        };
    }

    impl_unit_enum_serialization!(TokenKind {
        Auction = 0,
        Tumbler = 1,
        Credential = 2,
        Petition = 3
    });

    impl_unit_enum_serialization!(SpentListKind {
        Petition = 0,
        Tumbler = 1
    });

    impl<E: Pairing> Valid for LedgerObject<E> {
        fn check(&self) -> Result<(), SerializationError> {
            match self {
                Self::Token(t) => t.check(),
                Self::Auction(a) => a.check(),
                Self::Petition(p) => p.check(),
                Self::SpentTags(l) => l.check(),
                Self::CredentialInstance(i) => i.check(),
                Self::CredentialRequest(r) => r.check(),
            }
        }
    }

    impl<E: Pairing> CanonicalSerialize for LedgerObject<E> {
        fn serialize_with_mode<W: Write>(
            &self,
            mut writer: W,
            compress: Compress,
        ) -> Result<(), SerializationError> {
            match self {
                Self::Token(t) => {
                    CanonicalSerialize::serialize_with_mode(&0u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(t, &mut writer, compress)
                }
                Self::Auction(a) => {
                    CanonicalSerialize::serialize_with_mode(&1u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(a, &mut writer, compress)
                }
                Self::Petition(p) => {
                    CanonicalSerialize::serialize_with_mode(&2u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(p, &mut writer, compress)
                }
                Self::SpentTags(l) => {
                    CanonicalSerialize::serialize_with_mode(&3u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(l, &mut writer, compress)
                }
                Self::CredentialInstance(i) => {
                    CanonicalSerialize::serialize_with_mode(&4u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(i, &mut writer, compress)
                }
                Self::CredentialRequest(r) => {
                    CanonicalSerialize::serialize_with_mode(&5u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(r, &mut writer, compress)
                }
            }
        }

        fn serialized_size(&self, compress: Compress) -> usize {
            0u8.serialized_size(compress)
                + match self {
                    Self::Token(t) => t.serialized_size(compress),
                    Self::Auction(a) => a.serialized_size(compress),
                    Self::Petition(p) => p.serialized_size(compress),
                    Self::SpentTags(l) => l.serialized_size(compress),
                    Self::CredentialInstance(i) => i.serialized_size(compress),
                    Self::CredentialRequest(r) => r.serialized_size(compress),
                }
        }
    }

    impl<E: Pairing> CanonicalDeserialize for LedgerObject<E> {
        fn deserialize_with_mode<R: Read>(
            mut reader: R,
            compress: Compress,
            validate: Validate,
        ) -> Result<Self, SerializationError> {
            let t: u8 =
                CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?;
            match t {
                0u8 => Ok(Self::Token(CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?)),
                1u8 => Ok(Self::Auction(CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?)),
                2u8 => Ok(Self::Petition(CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?)),
                3u8 => Ok(Self::SpentTags(CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?)),
                4u8 => Ok(Self::CredentialInstance(
                    CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?,
                )),
                5u8 => Ok(Self::CredentialRequest(
                    CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?,
                )),
                _ => Err(SerializationError::InvalidData),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use coconut::setup::test_setup;
    use blake2::Blake2b512;
    use utils::wire::{from_bytes, to_bytes, WireError};

    type Object = LedgerObject<Bls12_381>;

    #[test]
    fn kind_tag_leads_the_encoding() {
        let token = Object::Token(TokenKind::Petition);
        assert_eq!(to_bytes(&token).unwrap(), vec![0u8, 3]);
        assert_eq!(from_bytes::<Object>(&[0u8, 3]).unwrap(), token);
        assert!(matches!(from_bytes::<Object>(&[0u8, 4]), Err(WireError::Malformed(_))));
        assert!(matches!(from_bytes::<Object>(&[6u8]), Err(WireError::Malformed(_))));

        let mut rng = StdRng::seed_from_u64(0u64);
        let (_, vk, params, attrs) = test_setup::<Bls12_381, Blake2b512, _>(&mut rng, 1);
        let tag = ZetaTag::<Bls12_381>::new(&params.g1, &attrs[0]);
        let list = SpentTagList::new(SpentListKind::Tumbler, b"mixer".to_vec(), Some(vk)).with_tag(tag);
        let object = Object::from(list.clone());
        assert_eq!(object.kind(), ObjectKind::SpentTags(SpentListKind::Tumbler));

        let bytes = to_bytes(&object).unwrap();
        assert_eq!(bytes[0], 3);
        assert_eq!(from_bytes::<Object>(&bytes).unwrap(), object);
        assert_eq!(
            object.clone().into_spent_tags(SpentListKind::Petition),
            Err(Precondition::UnexpectedKind {
                expected: ObjectKind::SpentTags(SpentListKind::Petition),
                found: ObjectKind::SpentTags(SpentListKind::Tumbler),
            })
        );
        assert_eq!(object.clone().into_spent_tags(SpentListKind::Tumbler).unwrap(), list);
        assert!(object.expect_token(TokenKind::Tumbler).is_err());

        let json = serde_json::to_string(&object).unwrap();
        assert_eq!(serde_json::from_str::<Object>(&json).unwrap(), object);
    }
}
