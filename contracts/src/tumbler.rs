//! Coin tumbler. A coin is a credential over a secret coin id, redeemed to an address by showing
//! it with the address bound into the proof. The tag of every redeemed coin goes to the list of
//! the tumbler so a coin is redeemed once.

use core::marker::PhantomData;

use ark_ec::pairing::Pairing;
use ark_std::rand::RngCore;
use coconut::{Credential, Params, ShowingError, ShowingProof, TagBase, VerificationKey, ZetaTag};
use digest::Digest;
use serde::{Deserialize, Serialize};
use utils::hashing_utils::field_elem_from_bytes;

use crate::{
    checker::{check_init, check_spend, check_token_passthrough, expect_hidden, Checker, TagIndex},
    error::{ContractError, Precondition, Rejection, Violation},
    object::{LedgerObject, SpentListKind, SpentTagList, TokenKind},
    transaction::{Arity, Transaction},
};

pub const CONTRACT_ID: &str = "tumbler";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TumblerContract<E: Pairing, D> {
    pub params: Params<E>,
    #[serde(skip)]
    _digest: PhantomData<D>,
}

impl<E: Pairing, D: Digest> TumblerContract<E, D> {
    pub fn new(params: Params<E>) -> Self {
        Self {
            params,
            _digest: PhantomData,
        }
    }

    pub fn init(&self) -> Result<Transaction, ContractError> {
        Ok(Transaction::new(CONTRACT_ID, "init")
            .with_output(&LedgerObject::<E>::Token(TokenKind::Tumbler))?)
    }

    /// Opens a tumbler for coins issued under `verification_key`.
    pub fn create_tumbler(
        &self,
        instance: &[u8],
        verification_key: VerificationKey<E>,
    ) -> Result<(Transaction, SpentTagList<E>), ContractError> {
        let list = SpentTagList::new(SpentListKind::Tumbler, instance, Some(verification_key));
        let token = LedgerObject::<E>::Token(TokenKind::Tumbler);
        let tx = Transaction::new(CONTRACT_ID, "create_tumbler")
            .with_input(&token)?
            .with_output(&token)?
            .with_output(&LedgerObject::from(list.clone()))?;
        Ok((tx, list))
    }

    pub fn redeem<R: RngCore>(
        &self,
        rng: &mut R,
        list: &SpentTagList<E>,
        credential: &Credential<E>,
        coin_id: &E::ScalarField,
        address: &[u8],
    ) -> Result<(Transaction, SpentTagList<E>), ContractError> {
        let vk = list
            .verification_key
            .as_ref()
            .ok_or(ShowingError::InvalidVerificationKey)?;
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            vk,
            credential,
            &[*coin_id],
            &[field_elem_from_bytes::<E::ScalarField, D>(address)],
            &TagBase::Generator,
        )?;
        if TagIndex::from(list).contains(&zeta) {
            return Err(Violation::DoubleUse.into());
        }
        let new = list.with_tag(zeta);
        let tx = Transaction::new(CONTRACT_ID, "redeem")
            .with_input(&LedgerObject::from(list.clone()))?
            .with_parameter(address)?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    fn check_create(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 0, 2, 0).check(tx)?;
        check_token_passthrough::<E>(tx, TokenKind::Tumbler)?;
        let list = tx
            .output::<LedgerObject<E>>(1)?
            .into_spent_tags(SpentListKind::Tumbler)?;
        if !list.verification_key.as_ref().is_some_and(|vk| vk.valid()) {
            return Err(Precondition::Showing(ShowingError::InvalidVerificationKey).into());
        }
        if !list.tags.is_empty() {
            return Err(Violation::NotInitial("tags").into());
        }
        Ok(())
    }

    fn check_redeem(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 3, 1, 0).check(tx)?;
        let old = tx
            .input::<LedgerObject<E>>(0)?
            .into_spent_tags(SpentListKind::Tumbler)?;
        let new = tx
            .output::<LedgerObject<E>>(0)?
            .into_spent_tags(SpentListKind::Tumbler)?;
        let address = tx.parameter::<Vec<u8>>(0)?;
        let proof = tx.parameter::<ShowingProof<E>>(1)?;
        let zeta = tx.parameter::<ZetaTag<E>>(2)?;

        check_spend(&old, &new, &zeta)?;
        let vk = new
            .verification_key
            .as_ref()
            .ok_or(Precondition::Showing(ShowingError::InvalidVerificationKey))?;
        expect_hidden(&proof, 1)?;
        proof.verify::<D>(
            &self.params,
            vk,
            &zeta,
            &[],
            &[field_elem_from_bytes::<E::ScalarField, D>(&address)],
            &TagBase::Generator,
        )?;
        Ok(())
    }
}

impl<E: Pairing, D: Digest> Checker for TumblerContract<E, D> {
    fn contract_id(&self) -> &str {
        CONTRACT_ID
    }

    fn check(&self, tx: &Transaction) -> Result<(), Rejection> {
        self.check_contract(tx)?;
        match tx.method_id.as_str() {
            "init" => check_init::<E>(tx, TokenKind::Tumbler),
            "create_tumbler" => self.check_create(tx),
            "redeem" => self.check_redeem(tx),
            other => Err(Precondition::UnknownMethod(other.to_string()).into()),
        }
    }
}
