//! Bookkeeping of threshold credential issuance on the ledger. An instance fixes the shape of
//! the credentials and the aggregate key, a request carries the (opaque) blind request of a user
//! and collects the partial credential of each authority, and `verify` is the generic showing
//! of a credential of the instance.

use core::marker::PhantomData;

use ark_ec::pairing::Pairing;
use ark_serialize::*;
use ark_std::rand::RngCore;
use coconut::{Credential, Params, ShowingError, ShowingProof, TagBase, VerificationKey, ZetaTag};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{serde_utils::ArkObjectBytes, shamir::ParticipantId};

use crate::{
    checker::{check_init, check_token_passthrough, expect_hidden, unchanged, Checker},
    error::{ContractError, Precondition, Rejection, TxField, Violation},
    object::{LedgerObject, TokenKind},
    transaction::{Arity, Transaction},
};

pub const CONTRACT_ID: &str = "credential";

#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct CredentialInstance<E: Pairing> {
    pub attribute_count: u32,
    pub threshold: ParticipantId,
    pub authorities: ParticipantId,
    /// `contract.method` a request must be submitted together with.
    pub callback: String,
    /// Aggregate key of the authorities.
    pub verification_key: VerificationKey<E>,
}

impl<E: Pairing> CredentialInstance<E> {
    fn check_public_count(&self, count: usize) -> Result<(), ShowingError> {
        let supported = self.attribute_count as usize;
        if count > supported {
            return Err(ShowingError::TooManyAttributes {
                received: count,
                supported,
            });
        }
        Ok(())
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct CredentialRequest<E: Pairing> {
    pub instance: CredentialInstance<E>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub public_attributes: Vec<E::ScalarField>,
    /// Blind issuance request, not interpreted by the ledger.
    pub request: Vec<u8>,
    /// Partial credential of authority `i` at position `i - 1`, written once.
    pub issued: Vec<Option<Vec<u8>>>,
}

impl<E: Pairing> CredentialRequest<E> {
    pub fn is_complete(&self) -> bool {
        self.issued
            .iter()
            .filter(|partial| partial.is_some())
            .count()
            >= self.instance.threshold as usize
    }

    fn with_partial(&self, index: usize, partial: &[u8]) -> Result<Self, Violation> {
        match self.issued.get(index) {
            None => Err(Violation::SlotOutOfRange(index)),
            Some(Some(_)) => Err(Violation::SlotAlreadyFilled(index)),
            Some(None) => {
                let mut request = self.clone();
                request.issued[index] = Some(partial.to_vec());
                Ok(request)
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct IssuanceContract<E: Pairing, D> {
    pub params: Params<E>,
    #[serde(skip)]
    _digest: PhantomData<D>,
}

impl<E: Pairing, D: Digest> IssuanceContract<E, D> {
    pub fn new(params: Params<E>) -> Self {
        Self {
            params,
            _digest: PhantomData,
        }
    }

    pub fn init(&self) -> Result<Transaction, ContractError> {
        Ok(Transaction::new(CONTRACT_ID, "init")
            .with_output(&LedgerObject::<E>::Token(TokenKind::Credential))?)
    }

    pub fn create(
        &self,
        attribute_count: u32,
        threshold: ParticipantId,
        authorities: ParticipantId,
        callback: &str,
        verification_key: VerificationKey<E>,
    ) -> Result<(Transaction, CredentialInstance<E>), ContractError> {
        let instance = CredentialInstance {
            attribute_count,
            threshold,
            authorities,
            callback: callback.to_string(),
            verification_key,
        };
        check_shape(&instance)?;
        let token = LedgerObject::<E>::Token(TokenKind::Credential);
        let tx = Transaction::new(CONTRACT_ID, "create")
            .with_input(&token)?
            .with_output(&token)?
            .with_output(&LedgerObject::from(instance.clone()))?;
        Ok((tx, instance))
    }

    /// Posts a blind request, submitted along with `callback` whose identifier must be the
    /// callback of the instance.
    pub fn request(
        &self,
        instance: &CredentialInstance<E>,
        public_attributes: Vec<E::ScalarField>,
        request: Vec<u8>,
        callback: Transaction,
    ) -> Result<(Transaction, CredentialRequest<E>), ContractError> {
        if callback.callback_id() != instance.callback {
            return Err(Violation::CallbackMismatch {
                expected: instance.callback.clone(),
                found: callback.callback_id(),
            }
            .into());
        }
        instance.check_public_count(public_attributes.len())?;
        let pending = CredentialRequest {
            instance: instance.clone(),
            public_attributes,
            request,
            issued: vec![None; instance.authorities as usize],
        };
        let object = LedgerObject::from(instance.clone());
        let tx = Transaction::new(CONTRACT_ID, "request")
            .with_input(&object)?
            .with_output(&object)?
            .with_output(&LedgerObject::from(pending.clone()))?
            .with_dependency(callback);
        Ok((tx, pending))
    }

    /// Records the partial credential of the authority at slot `index`.
    pub fn issue(
        &self,
        request: &CredentialRequest<E>,
        index: u64,
        partial: &[u8],
    ) -> Result<(Transaction, CredentialRequest<E>), ContractError> {
        let new = request.with_partial(index as usize, partial)?;
        let tx = Transaction::new(CONTRACT_ID, "issue")
            .with_input(&LedgerObject::from(request.clone()))?
            .with_parameter(&index)?
            .with_parameter(partial)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    /// Shows a credential of the instance over `hidden` followed by `public` attributes.
    pub fn verify<R: RngCore>(
        &self,
        rng: &mut R,
        instance: &CredentialInstance<E>,
        credential: &Credential<E>,
        hidden: &[E::ScalarField],
        public: &[E::ScalarField],
    ) -> Result<Transaction, ContractError> {
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &instance.verification_key,
            credential,
            hidden,
            &[],
            &TagBase::Generator,
        )?;
        Ok(Transaction::new(CONTRACT_ID, "verify")
            .with_reference_input(&LedgerObject::from(instance.clone()))?
            .with_parameter(public)?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_return(&true)?)
    }

    fn check_create(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 0, 2, 0).check(tx)?;
        check_token_passthrough::<E>(tx, TokenKind::Credential)?;
        let instance = tx.output::<LedgerObject<E>>(1)?.into_credential_instance()?;
        check_shape(&instance)?;
        Ok(())
    }

    fn check_request(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 0, 2, 0).check(tx)?;
        let instance = tx.input::<LedgerObject<E>>(0)?.into_credential_instance()?;
        let kept = tx.output::<LedgerObject<E>>(0)?.into_credential_instance()?;
        let pending = tx.output::<LedgerObject<E>>(1)?.into_credential_request()?;

        unchanged("instance", &instance, &kept)?;
        if pending.instance != instance {
            return Err(Violation::InstanceMismatch.into());
        }
        if pending.issued.len() != instance.authorities as usize
            || pending.issued.iter().any(Option::is_some)
        {
            return Err(Violation::NotInitial("issued").into());
        }
        instance
            .check_public_count(pending.public_attributes.len())
            .map_err(Precondition::Showing)?;

        let callback = tx.dependencies.first().ok_or(Precondition::Arity {
            field: TxField::Dependencies,
            expected: 1,
            received: 0,
        })?;
        if callback.callback_id() != instance.callback {
            return Err(Violation::CallbackMismatch {
                expected: instance.callback,
                found: callback.callback_id(),
            }
            .into());
        }
        Ok(())
    }

    fn check_issue(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 2, 1, 0).check(tx)?;
        let old = tx.input::<LedgerObject<E>>(0)?.into_credential_request()?;
        let new = tx.output::<LedgerObject<E>>(0)?.into_credential_request()?;
        let index = tx.parameter::<u64>(0)?;
        let partial = tx.parameter::<Vec<u8>>(1)?;

        let index = usize::try_from(index).map_err(|_| Violation::SlotOutOfRange(usize::MAX))?;
        let expected = old.with_partial(index, &partial)?;
        unchanged("instance", &old.instance, &new.instance)?;
        unchanged("public_attributes", &old.public_attributes, &new.public_attributes)?;
        unchanged("request", &old.request, &new.request)?;
        if new.issued != expected.issued {
            return Err(Violation::SlotMismatch(index).into());
        }
        Ok(())
    }

    fn check_verify(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(0, 1, 3, 0, 1).check(tx)?;
        let instance = tx
            .reference_input::<LedgerObject<E>>(0)?
            .into_credential_instance()?;
        let public = tx.parameter::<Vec<E::ScalarField>>(0)?;
        let proof = tx.parameter::<ShowingProof<E>>(1)?;
        let zeta = tx.parameter::<ZetaTag<E>>(2)?;
        if !tx.returned::<bool>(0)? {
            return Err(Violation::OutcomeMismatch.into());
        }

        let hidden = (instance.attribute_count as usize)
            .checked_sub(public.len())
            .ok_or(Precondition::Showing(ShowingError::TooManyAttributes {
                received: public.len(),
                supported: instance.attribute_count as usize,
            }))?;
        expect_hidden(&proof, hidden)?;
        proof.verify::<D>(
            &self.params,
            &instance.verification_key,
            &zeta,
            &public,
            &[],
            &TagBase::Generator,
        )?;
        Ok(())
    }
}

/// `q >= 1`, `1 <= t <= n` and a valid key over `q` attributes.
fn check_shape<E: Pairing>(instance: &CredentialInstance<E>) -> Result<(), Rejection> {
    if instance.attribute_count == 0 {
        return Err(Violation::NoAttributes.into());
    }
    let (t, n) = (instance.threshold, instance.authorities);
    if t == 0 || t > n {
        return Err(Violation::InvalidThreshold {
            threshold: t,
            total: n,
        }
        .into());
    }
    let vk = &instance.verification_key;
    if !vk.valid() || vk.supported_attribute_count() != instance.attribute_count as usize {
        return Err(Precondition::Showing(ShowingError::InvalidVerificationKey).into());
    }
    Ok(())
}

impl<E: Pairing, D: Digest> Checker for IssuanceContract<E, D> {
    fn contract_id(&self) -> &str {
        CONTRACT_ID
    }

    fn check(&self, tx: &Transaction) -> Result<(), Rejection> {
        self.check_contract(tx)?;
        match tx.method_id.as_str() {
            "init" => check_init::<E>(tx, TokenKind::Credential),
            "create" => self.check_create(tx),
            "request" => self.check_request(tx),
            "issue" => self.check_issue(tx),
            "verify" => self.check_verify(tx),
            other => Err(Precondition::UnknownMethod(other.to_string()).into()),
        }
    }
}
