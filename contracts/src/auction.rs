//! Sealed bid auction. Bidders hold a credential over `(seq, value)`, commit by showing it with
//! both attributes hidden, then reveal the value. The highest revealed value wins, ties going to
//! the earliest slot. Losers may withdraw, the winner may submit the work once.
//!
//! Phases are derived from the bid list: commits are open while no slot has been revealed,
//! reveals while no slot has been withdrawn and no work was submitted. Withdrawals and the work
//! submission wait until every committed bid is revealed.

use core::marker::PhantomData;

use ark_ec::{pairing::Pairing, CurveGroup};
use ark_serialize::*;
use ark_std::rand::RngCore;
use coconut::{Credential, Params, ShowingError, ShowingProof, TagBase, VerificationKey, ZetaTag};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{hashing_utils::field_elem_from_bytes, serde_utils::ArkObjectBytes};

use crate::{
    checker::{
        check_appended, check_init, check_token_passthrough, expect_hidden, unchanged, Checker,
        TagIndex,
    },
    error::{ContractError, Precondition, Rejection, Violation},
    object::{LedgerObject, TokenKind},
    transaction::{Arity, Transaction},
};

pub const CONTRACT_ID: &str = "auction";

/// State of one bidder's slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum BidEntry<E: Pairing> {
    Committed(ZetaTag<E>),
    Revealed { value: u64, tag: ZetaTag<E> },
    Withdrawn,
}

impl<E: Pairing> BidEntry<E> {
    pub fn tag(&self) -> Option<&ZetaTag<E>> {
        match self {
            Self::Committed(tag) | Self::Revealed { tag, .. } => Some(tag),
            Self::Withdrawn => None,
        }
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Auction<E: Pairing> {
    pub verification_key: VerificationKey<E>,
    pub commit_deadline: u64,
    pub reveal_deadline: u64,
    pub instance_id: u64,
    /// `v0 * g1 + o * hs[0]` for reserve price `v0`
    #[serde_as(as = "ArkObjectBytes")]
    pub min_price_commitment: E::G1Affine,
    pub bids: Vec<BidEntry<E>>,
    pub winning_file_hash: Option<Vec<u8>>,
}

impl<E: Pairing> Auction<E> {
    /// Slot of the highest revealed value, the lowest slot among equal values.
    pub fn winner(&self) -> Option<usize> {
        self.bids
            .iter()
            .enumerate()
            .filter_map(|(slot, bid)| match bid {
                BidEntry::Revealed { value, .. } => Some((slot, *value)),
                _ => None,
            })
            .fold(None, |best, (slot, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((slot, value)),
            })
            .map(|(slot, _)| slot)
    }

    pub fn tag_index(&self) -> TagIndex<E> {
        TagIndex::new(
            self.bids
                .iter()
                .enumerate()
                .filter_map(|(slot, bid)| bid.tag().map(|tag| (slot, tag))),
        )
    }

    pub fn accepts_commits(&self) -> bool {
        self.winning_file_hash.is_none()
            && self
                .bids
                .iter()
                .all(|bid| matches!(bid, BidEntry::Committed(_)))
    }

    pub fn accepts_reveals(&self) -> bool {
        self.winning_file_hash.is_none()
            && !self
                .bids
                .iter()
                .any(|bid| matches!(bid, BidEntry::Withdrawn))
    }

    /// Withdrawals and work submission wait until no bid is left sealed.
    pub fn reveals_complete(&self) -> bool {
        !self
            .bids
            .iter()
            .any(|bid| matches!(bid, BidEntry::Committed(_)))
    }

    fn with_slot(&self, slot: usize, bid: BidEntry<E>) -> Self {
        let mut auction = self.clone();
        auction.bids[slot] = bid;
        auction
    }

    /// Slot of `tag` holding `Revealed { value, tag }`.
    fn revealed_slot(&self, tag: &ZetaTag<E>, value: u64) -> Result<usize, Violation> {
        let slot = self.tag_index().slot(tag).ok_or(Violation::UnknownTag)?;
        match &self.bids[slot] {
            BidEntry::Revealed { value: v, .. } if *v == value => Ok(slot),
            _ => Err(Violation::UnexpectedBidState { slot }),
        }
    }
}

/// Everything but the bid list and the work hash stays fixed after creation.
fn check_terms<E: Pairing>(old: &Auction<E>, new: &Auction<E>) -> Result<(), Violation> {
    unchanged("verification_key", &old.verification_key, &new.verification_key)?;
    unchanged("commit_deadline", &old.commit_deadline, &new.commit_deadline)?;
    unchanged("reveal_deadline", &old.reveal_deadline, &new.reveal_deadline)?;
    unchanged("instance_id", &old.instance_id, &new.instance_id)?;
    unchanged(
        "min_price_commitment",
        &old.min_price_commitment,
        &new.min_price_commitment,
    )
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AuctionContract<E: Pairing, D> {
    pub params: Params<E>,
    #[serde(skip)]
    _digest: PhantomData<D>,
}

impl<E: Pairing, D: Digest> AuctionContract<E, D> {
    pub fn new(params: Params<E>) -> Self {
        Self {
            params,
            _digest: PhantomData,
        }
    }

    pub fn init(&self) -> Result<Transaction, ContractError> {
        Ok(Transaction::new(CONTRACT_ID, "init")
            .with_output(&LedgerObject::<E>::Token(TokenKind::Auction))?)
    }

    /// Opens an auction with a commitment to the reserve price under `opening`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        verification_key: VerificationKey<E>,
        commit_deadline: u64,
        reveal_deadline: u64,
        instance_id: u64,
        reserve_price: u64,
        opening: &E::ScalarField,
    ) -> Result<(Transaction, Auction<E>), ContractError> {
        if commit_deadline == 0 || commit_deadline >= reveal_deadline {
            return Err(Violation::InvalidDeadlines {
                commit: commit_deadline,
                reveal: reveal_deadline,
            }
            .into());
        }
        let h = self
            .params
            .hs
            .first()
            .ok_or(ContractError::InvalidArgument("params without hs"))?;
        let min_price_commitment =
            (self.params.g1 * E::ScalarField::from(reserve_price) + *h * opening).into_affine();
        let auction = Auction {
            verification_key,
            commit_deadline,
            reveal_deadline,
            instance_id,
            min_price_commitment,
            bids: Vec::new(),
            winning_file_hash: None,
        };
        let token = LedgerObject::<E>::Token(TokenKind::Auction);
        let tx = Transaction::new(CONTRACT_ID, "create")
            .with_input(&token)?
            .with_output(&token)?
            .with_output(&LedgerObject::from(auction.clone()))?;
        Ok((tx, auction))
    }

    /// Commits to a bid of `value` with a credential over `(seq, value)`.
    pub fn commit<R: RngCore>(
        &self,
        rng: &mut R,
        auction: &Auction<E>,
        credential: &Credential<E>,
        seq: &E::ScalarField,
        value: u64,
    ) -> Result<(Transaction, Auction<E>), ContractError> {
        if !auction.accepts_commits() {
            return Err(Violation::PhaseClosed.into());
        }
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &auction.verification_key,
            credential,
            &[*seq, E::ScalarField::from(value)],
            &[],
            &TagBase::Generator,
        )?;
        if auction.tag_index().contains(&zeta) {
            return Err(Violation::DoubleUse.into());
        }
        let mut new = auction.clone();
        new.bids.push(BidEntry::Committed(zeta));
        let tx = Transaction::new(CONTRACT_ID, "commit")
            .with_input(&LedgerObject::from(auction.clone()))?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    /// Opens the committed bid of the holder of `seq`.
    pub fn reveal<R: RngCore>(
        &self,
        rng: &mut R,
        auction: &Auction<E>,
        credential: &Credential<E>,
        seq: &E::ScalarField,
        value: u64,
    ) -> Result<(Transaction, Auction<E>), ContractError> {
        if !auction.accepts_reveals() {
            return Err(Violation::PhaseClosed.into());
        }
        let value_scalar = E::ScalarField::from(value);
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &auction.verification_key,
            credential,
            &[*seq],
            &[value_scalar],
            &TagBase::Generator,
        )?;
        let slot = auction
            .tag_index()
            .slot(&zeta)
            .ok_or(Violation::UnknownTag)?;
        if auction.bids[slot] != BidEntry::Committed(zeta) {
            return Err(Violation::UnexpectedBidState { slot }.into());
        }
        let new = auction.with_slot(slot, BidEntry::Revealed { value, tag: zeta });
        let tx = Transaction::new(CONTRACT_ID, "reveal")
            .with_input(&LedgerObject::from(auction.clone()))?
            .with_parameter(&value)?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    /// Withdraws a losing revealed bid, binding the showing to the refund `address`.
    pub fn withdraw<R: RngCore>(
        &self,
        rng: &mut R,
        auction: &Auction<E>,
        credential: &Credential<E>,
        seq: &E::ScalarField,
        value: u64,
        address: &[u8],
    ) -> Result<(Transaction, Auction<E>), ContractError> {
        if !auction.reveals_complete() {
            return Err(Violation::RevealsPending.into());
        }
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &auction.verification_key,
            credential,
            &[*seq],
            &[field_elem_from_bytes::<E::ScalarField, D>(address)],
            &TagBase::Generator,
        )?;
        let slot = auction.revealed_slot(&zeta, value)?;
        let new = auction.with_slot(slot, BidEntry::Withdrawn);
        let tx = Transaction::new(CONTRACT_ID, "withdraw")
            .with_input(&LedgerObject::from(auction.clone()))?
            .with_parameter(&value)?
            .with_parameter(address)?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    /// Records the digest of the delivered work, binding the showing to it.
    pub fn submit_work<R: RngCore>(
        &self,
        rng: &mut R,
        auction: &Auction<E>,
        credential: &Credential<E>,
        seq: &E::ScalarField,
        value: u64,
        file_hash: &[u8],
    ) -> Result<(Transaction, Auction<E>), ContractError> {
        if auction.winning_file_hash.is_some() {
            return Err(Violation::WorkAlreadySubmitted.into());
        }
        if !auction.reveals_complete() {
            return Err(Violation::RevealsPending.into());
        }
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &auction.verification_key,
            credential,
            &[*seq],
            &[field_elem_from_bytes::<E::ScalarField, D>(file_hash)],
            &TagBase::Generator,
        )?;
        auction.revealed_slot(&zeta, value)?;
        let mut new = auction.clone();
        new.winning_file_hash = Some(file_hash.to_vec());
        let tx = Transaction::new(CONTRACT_ID, "submit_work")
            .with_input(&LedgerObject::from(auction.clone()))?
            .with_parameter(&value)?
            .with_parameter(file_hash)?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    fn check_create(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 0, 2, 0).check(tx)?;
        check_token_passthrough::<E>(tx, TokenKind::Auction)?;
        let auction = tx.output::<LedgerObject<E>>(1)?.into_auction()?;
        if auction.commit_deadline == 0 || auction.commit_deadline >= auction.reveal_deadline {
            return Err(Violation::InvalidDeadlines {
                commit: auction.commit_deadline,
                reveal: auction.reveal_deadline,
            }
            .into());
        }
        if !auction.verification_key.valid() {
            return Err(Precondition::Showing(ShowingError::InvalidVerificationKey).into());
        }
        if !auction.bids.is_empty() {
            return Err(Violation::NotInitial("bids").into());
        }
        if auction.winning_file_hash.is_some() {
            return Err(Violation::NotInitial("winning_file_hash").into());
        }
        Ok(())
    }

    /// Decodes the consumed and the produced auction.
    fn transition(&self, tx: &Transaction) -> Result<(Auction<E>, Auction<E>), Rejection> {
        let old = tx.input::<LedgerObject<E>>(0)?.into_auction()?;
        let new = tx.output::<LedgerObject<E>>(0)?.into_auction()?;
        check_terms(&old, &new)?;
        Ok((old, new))
    }

    fn check_commit(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 2, 1, 0).check(tx)?;
        let (old, new) = self.transition(tx)?;
        let proof = tx.parameter::<ShowingProof<E>>(0)?;
        let zeta = tx.parameter::<ZetaTag<E>>(1)?;

        if !old.accepts_commits() {
            return Err(Violation::PhaseClosed.into());
        }
        if old.tag_index().contains(&zeta) {
            return Err(Violation::DoubleUse.into());
        }
        check_appended(&old.bids, &new.bids, &BidEntry::Committed(zeta))?;
        unchanged(
            "winning_file_hash",
            &old.winning_file_hash,
            &new.winning_file_hash,
        )?;

        expect_hidden(&proof, 2)?;
        proof.verify::<D>(
            &self.params,
            &new.verification_key,
            &zeta,
            &[],
            &[],
            &TagBase::Generator,
        )?;
        Ok(())
    }

    fn check_reveal(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 3, 1, 0).check(tx)?;
        let (old, new) = self.transition(tx)?;
        let value = tx.parameter::<u64>(0)?;
        let proof = tx.parameter::<ShowingProof<E>>(1)?;
        let zeta = tx.parameter::<ZetaTag<E>>(2)?;

        if !old.accepts_reveals() {
            return Err(Violation::PhaseClosed.into());
        }
        let slot = old.tag_index().slot(&zeta).ok_or(Violation::UnknownTag)?;
        if old.bids[slot] != BidEntry::Committed(zeta) {
            return Err(Violation::UnexpectedBidState { slot }.into());
        }
        let expected = old.with_slot(slot, BidEntry::Revealed { value, tag: zeta });
        if new.bids != expected.bids {
            return Err(Violation::ListDelta.into());
        }
        unchanged(
            "winning_file_hash",
            &old.winning_file_hash,
            &new.winning_file_hash,
        )?;

        let value = E::ScalarField::from(value);
        expect_hidden(&proof, 1)?;
        proof.verify::<D>(
            &self.params,
            &new.verification_key,
            &zeta,
            &[value],
            &[value],
            &TagBase::Generator,
        )?;
        Ok(())
    }

    fn check_withdraw(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 4, 1, 0).check(tx)?;
        let (old, new) = self.transition(tx)?;
        let value = tx.parameter::<u64>(0)?;
        let address = tx.parameter::<Vec<u8>>(1)?;
        let proof = tx.parameter::<ShowingProof<E>>(2)?;
        let zeta = tx.parameter::<ZetaTag<E>>(3)?;

        if !old.reveals_complete() {
            return Err(Violation::RevealsPending.into());
        }
        let slot = old.revealed_slot(&zeta, value)?;
        if old.winner() == Some(slot) {
            return Err(Violation::WinnerCannotWithdraw.into());
        }
        if new.bids != old.with_slot(slot, BidEntry::Withdrawn).bids {
            return Err(Violation::ListDelta.into());
        }
        unchanged(
            "winning_file_hash",
            &old.winning_file_hash,
            &new.winning_file_hash,
        )?;

        expect_hidden(&proof, 1)?;
        proof.verify::<D>(
            &self.params,
            &new.verification_key,
            &zeta,
            &[E::ScalarField::from(value)],
            &[field_elem_from_bytes::<E::ScalarField, D>(&address)],
            &TagBase::Generator,
        )?;
        Ok(())
    }

    fn check_submit_work(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 4, 1, 0).check(tx)?;
        let (old, new) = self.transition(tx)?;
        let value = tx.parameter::<u64>(0)?;
        let file_hash = tx.parameter::<Vec<u8>>(1)?;
        let proof = tx.parameter::<ShowingProof<E>>(2)?;
        let zeta = tx.parameter::<ZetaTag<E>>(3)?;

        if old.winning_file_hash.is_some() {
            return Err(Violation::WorkAlreadySubmitted.into());
        }
        if !old.reveals_complete() {
            return Err(Violation::RevealsPending.into());
        }
        let winner = old.winner().ok_or(Violation::NoWinner)?;
        let slot = old.revealed_slot(&zeta, value)?;
        if slot != winner {
            return Err(Violation::NotWinner.into());
        }
        unchanged("bids", &old.bids, &new.bids)?;
        if new.winning_file_hash.as_ref() != Some(&file_hash) {
            return Err(Violation::FieldChanged("winning_file_hash").into());
        }

        expect_hidden(&proof, 1)?;
        proof.verify::<D>(
            &self.params,
            &new.verification_key,
            &zeta,
            &[E::ScalarField::from(value)],
            &[field_elem_from_bytes::<E::ScalarField, D>(&file_hash)],
            &TagBase::Generator,
        )?;
        Ok(())
    }
}

impl<E: Pairing, D: Digest> Checker for AuctionContract<E, D> {
    fn contract_id(&self) -> &str {
        CONTRACT_ID
    }

    fn check(&self, tx: &Transaction) -> Result<(), Rejection> {
        self.check_contract(tx)?;
        match tx.method_id.as_str() {
            "init" => check_init::<E>(tx, TokenKind::Auction),
            "create" => self.check_create(tx),
            "commit" => self.check_commit(tx),
            "reveal" => self.check_reveal(tx),
            "withdraw" => self.check_withdraw(tx),
            "submit_work" => self.check_submit_work(tx),
            other => Err(Precondition::UnknownMethod(other.to_string()).into()),
        }
    }
}

mod serialization {
    use super::*;

    impl<E: Pairing> Valid for BidEntry<E> {
        fn check(&self) -> Result<(), SerializationError> {
            match self {
                Self::Committed(tag) | Self::Revealed { tag, .. } => tag.check(),
                Self::Withdrawn => Ok(()),
            }
        }
    }

    impl<E: Pairing> CanonicalSerialize for BidEntry<E> {
        fn serialize_with_mode<W: Write>(
            &self,
            mut writer: W,
            compress: Compress,
        ) -> Result<(), SerializationError> {
            match self {
                Self::Committed(tag) => {
                    CanonicalSerialize::serialize_with_mode(&0u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(tag, &mut writer, compress)
                }
                Self::Revealed { value, tag } => {
                    CanonicalSerialize::serialize_with_mode(&1u8, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(value, &mut writer, compress)?;
                    CanonicalSerialize::serialize_with_mode(tag, &mut writer, compress)
                }
                Self::Withdrawn => CanonicalSerialize::serialize_with_mode(&2u8, writer, compress),
            }
        }

        fn serialized_size(&self, compress: Compress) -> usize {
            0u8.serialized_size(compress)
                + match self {
                    Self::Committed(tag) => tag.serialized_size(compress),
                    Self::Revealed { value, tag } => {
                        value.serialized_size(compress) + tag.serialized_size(compress)
                    }
                    Self::Withdrawn => 0,
                }
        }
    }

    impl<E: Pairing> CanonicalDeserialize for BidEntry<E> {
        fn deserialize_with_mode<R: Read>(
            mut reader: R,
            compress: Compress,
            validate: Validate,
        ) -> Result<Self, SerializationError> {
            let t: u8 =
                CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?;
            match t {
                0u8 => Ok(Self::Committed(CanonicalDeserialize::deserialize_with_mode(
                    &mut reader,
                    compress,
                    validate,
                )?)),
                1u8 => {
                    let value =
                        CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?;
                    let tag =
                        CanonicalDeserialize::deserialize_with_mode(&mut reader, compress, validate)?;
                    Ok(Self::Revealed { value, tag })
                }
                2u8 => Ok(Self::Withdrawn),
                _ => Err(SerializationError::InvalidData),
            }
        }
    }
}
