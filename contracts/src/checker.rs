//! Checkers decide whether a transaction is a valid state transition of a contract. A checker
//! is a total function of the transaction: it decodes every element itself and reports the
//! first problem found as a `Rejection`. It never writes anything.

use std::collections::HashMap;

use ark_ec::pairing::Pairing;
use coconut::{ShowingError, ShowingProof, ZetaTag};
use tracing::debug;

use crate::{
    error::{Precondition, Rejection, Violation},
    object::{LedgerObject, SpentTagList, TokenKind},
    transaction::{Arity, Transaction},
};

pub trait Checker {
    /// Name under which the contract is deployed, matched against `Transaction::contract_id`.
    fn contract_id(&self) -> &str;

    fn check(&self, tx: &Transaction) -> Result<(), Rejection>;

    /// Boolean verdict for the ledger. The reason of a rejection is only logged.
    fn accepts(&self, tx: &Transaction) -> bool {
        match self.check(tx) {
            Ok(()) => true,
            Err(reason) => {
                debug!(
                    contract = %tx.contract_id,
                    method = %tx.method_id,
                    ?reason,
                    "transaction rejected"
                );
                false
            }
        }
    }

    /// Rejects transactions addressed to another contract.
    fn check_contract(&self, tx: &Transaction) -> Result<(), Rejection> {
        if tx.contract_id != self.contract_id() {
            return Err(Precondition::ContractMismatch {
                expected: self.contract_id().to_string(),
                found: tx.contract_id.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Position of each tag in a list of tags, for constant time double use and slot lookups.
#[derive(Clone, Debug)]
pub struct TagIndex<E: Pairing> {
    slots: HashMap<E::G1Affine, usize>,
}

impl<E: Pairing> TagIndex<E> {
    /// Indexes `(slot, tag)` pairs. When a tag repeats the first slot is kept.
    pub fn new<'a>(tags: impl IntoIterator<Item = (usize, &'a ZetaTag<E>)>) -> Self {
        let mut slots = HashMap::new();
        for (slot, tag) in tags {
            slots.entry(tag.0).or_insert(slot);
        }
        Self { slots }
    }

    pub fn slot(&self, tag: &ZetaTag<E>) -> Option<usize> {
        self.slots.get(&tag.0).copied()
    }

    pub fn contains(&self, tag: &ZetaTag<E>) -> bool {
        self.slots.contains_key(&tag.0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<E: Pairing> From<&SpentTagList<E>> for TagIndex<E> {
    fn from(list: &SpentTagList<E>) -> Self {
        Self::new(list.tags.iter().enumerate())
    }
}

/// `init`: nothing consumed, a single token of the contract's kind emitted.
pub fn check_init<E: Pairing>(tx: &Transaction, kind: TokenKind) -> Result<(), Rejection> {
    Arity::new(0, 0, 0, 1, 0).check(tx)?;
    tx.output::<LedgerObject<E>>(0)?.expect_token(kind)?;
    Ok(())
}

/// The token consumed by a method creating a contract instance must be re-emitted as output 0.
pub fn check_token_passthrough<E: Pairing>(
    tx: &Transaction,
    kind: TokenKind,
) -> Result<(), Rejection> {
    tx.input::<LedgerObject<E>>(0)?.expect_token(kind)?;
    tx.output::<LedgerObject<E>>(0)?.expect_token(kind)?;
    Ok(())
}

/// `new` must be `old` with exactly `tag` appended, and `tag` must not have been spent before.
pub fn check_spend<E: Pairing>(
    old: &SpentTagList<E>,
    new: &SpentTagList<E>,
    tag: &ZetaTag<E>,
) -> Result<(), Violation> {
    unchanged("kind", &old.kind, &new.kind)?;
    unchanged("instance", &old.instance, &new.instance)?;
    unchanged("verification_key", &old.verification_key, &new.verification_key)?;
    if TagIndex::from(old).contains(tag) {
        return Err(Violation::DoubleUse);
    }
    check_appended(&old.tags, &new.tags, tag)
}

/// Every showing of a method hides a fixed number of attributes, the others being public.
pub fn expect_hidden<E: Pairing>(
    proof: &ShowingProof<E>,
    expected: usize,
) -> Result<(), ShowingError> {
    let received = proof.hidden_attribute_count();
    if received != expected {
        return Err(ShowingError::ResponseCountMismatch { received, expected });
    }
    Ok(())
}

/// `new == old ++ [item]`
pub fn check_appended<T: PartialEq>(old: &[T], new: &[T], item: &T) -> Result<(), Violation> {
    match new.split_last() {
        Some((last, prefix)) if prefix == old && last == item => Ok(()),
        _ => Err(Violation::ListDelta),
    }
}

/// Fails with `FieldChanged(name)` unless `old == new`.
pub fn unchanged<T: PartialEq>(name: &'static str, old: &T, new: &T) -> Result<(), Violation> {
    if old == new {
        Ok(())
    } else {
        Err(Violation::FieldChanged(name))
    }
}
