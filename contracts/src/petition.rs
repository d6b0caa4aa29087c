//! Anonymous yes/no petitions. A signer shows a credential over a secret `d` with the tag base
//! hashed from the petition UUID, so signing twice yields the same tag, and adds an encrypted
//! vote to the scores. Once signing is over a threshold of trustees decrypts the scores.

use core::marker::PhantomData;

use ark_ec::pairing::Pairing;
use ark_std::rand::RngCore;
use ark_serialize::*;
use coconut::{Credential, Params, ShowingError, ShowingProof, TagBase, VerificationKey, ZetaTag};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    elgamal::{Ciphertext, SecretKey},
    serde_utils::ArkObjectBytes,
    shamir::ParticipantId,
};

use crate::{
    checker::{
        check_appended, check_init, check_spend, check_token_passthrough, expect_hidden, unchanged,
        Checker,
    },
    error::{ContractError, Precondition, Rejection, Violation},
    object::{LedgerObject, SpentListKind, SpentTagList, TokenKind},
    transaction::{Arity, Transaction},
    vote::{
        combine, decrypt, election_key_from, DecryptionEntry, EncryptedVote, TallyProof,
        VoteError, VoteParams, VoteProof,
    },
};

pub const CONTRACT_ID: &str = "petition";

/// Number of options of a petition, the first counts the votes `1`, the second the votes `0`.
pub const OPTION_COUNT: usize = 2;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Petition<E: Pairing> {
    pub uuid: Vec<u8>,
    /// Election key the votes are encrypted under.
    #[serde_as(as = "ArkObjectBytes")]
    pub owner_key: E::G1Affine,
    /// Key of trustee `i` at position `i - 1`.
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub trustee_keys: Vec<E::G1Affine>,
    pub t_owners: ParticipantId,
    pub n_owners: ParticipantId,
    pub verification_key: VerificationKey<E>,
    pub options: Vec<String>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub scores: Vec<Ciphertext<E::G1Affine>>,
    pub decryptions: Vec<DecryptionEntry<E::G1Affine>>,
}

impl<E: Pairing> Petition<E> {
    /// Quorum declared by the first decryption share.
    pub fn quorum(&self) -> Option<&[ParticipantId]> {
        self.decryptions.first().map(|entry| entry.quorum.as_slice())
    }

    /// Scores after adding `vote` to the first option and its complement to the second.
    pub fn scores_with(
        &self,
        params: &VoteParams<E::G1Affine>,
        vote: &EncryptedVote<E::G1Affine>,
    ) -> Result<Vec<Ciphertext<E::G1Affine>>, Violation> {
        match self.scores.as_slice() {
            [yes, no] => Ok(vec![*yes + vote.ciphertext, *no + vote.complement(params)]),
            scores => Err(Violation::InvalidOptions(scores.len())),
        }
    }

    pub fn check_decrypted(&self) -> Result<(), Precondition> {
        let required = self.t_owners as usize;
        if self.decryptions.len() < required {
            return Err(Precondition::InsufficientShares {
                received: self.decryptions.len(),
                required,
            });
        }
        Ok(())
    }

    /// Count of every option, read from the decrypted scores.
    pub fn outcome(&self, params: &VoteParams<E::G1Affine>) -> Result<Vec<(String, u64)>, VoteError> {
        let table = params.table()?;
        let combined = combine(
            self.decryptions.iter().take(self.t_owners as usize),
            self.scores.len(),
        )?;
        self.options
            .iter()
            .zip(self.scores.iter().zip(&combined))
            .map(|(option, (score, share))| -> Result<_, VoteError> {
                let count = decrypt(score, share, &table)?;
                let count = u64::try_from(count).map_err(|_| VoteError::RangeExceeded {
                    bound: table.bound(),
                })?;
                Ok((option.clone(), count))
            })
            .collect()
    }

    /// A quorum has exactly `t_owners` sorted ids of known trustees.
    fn check_quorum(&self, quorum: &[ParticipantId]) -> Result<(), Rejection> {
        if quorum.len() != self.t_owners as usize {
            return Err(Violation::QuorumSize {
                size: quorum.len(),
                threshold: self.t_owners,
            }
            .into());
        }
        if quorum.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Violation::UnsortedQuorum.into());
        }
        if let Some(id) = quorum.iter().find(|id| **id == 0 || **id > self.n_owners) {
            return Err(Precondition::UnknownTrustee(*id).into());
        }
        Ok(())
    }
}

/// Everything but the scores and the decryptions stays fixed after creation.
fn check_terms<E: Pairing>(old: &Petition<E>, new: &Petition<E>) -> Result<(), Violation> {
    unchanged("uuid", &old.uuid, &new.uuid)?;
    unchanged("owner_key", &old.owner_key, &new.owner_key)?;
    unchanged("trustee_keys", &old.trustee_keys, &new.trustee_keys)?;
    unchanged("t_owners", &old.t_owners, &new.t_owners)?;
    unchanged("n_owners", &old.n_owners, &new.n_owners)?;
    unchanged("verification_key", &old.verification_key, &new.verification_key)?;
    unchanged("options", &old.options, &new.options)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PetitionContract<E: Pairing, D> {
    pub params: Params<E>,
    pub vote_params: VoteParams<E::G1Affine>,
    #[serde(skip)]
    _digest: PhantomData<D>,
}

impl<E: Pairing, D: Digest> PetitionContract<E, D> {
    pub fn new(params: Params<E>, vote_params: VoteParams<E::G1Affine>) -> Self {
        Self {
            params,
            vote_params,
            _digest: PhantomData,
        }
    }

    pub fn init(&self) -> Result<Transaction, ContractError> {
        Ok(Transaction::new(CONTRACT_ID, "init")
            .with_output(&LedgerObject::<E>::Token(TokenKind::Petition))?)
    }

    /// Creates a petition decrypted by any `t_owners` of the trustees owning `trustee_keys`.
    pub fn create_petition(
        &self,
        uuid: &[u8],
        options: Vec<String>,
        trustee_keys: Vec<E::G1Affine>,
        t_owners: ParticipantId,
        verification_key: VerificationKey<E>,
    ) -> Result<(Transaction, Petition<E>, SpentTagList<E>), ContractError> {
        if options.len() != OPTION_COUNT {
            return Err(Violation::InvalidOptions(options.len()).into());
        }
        let n_owners = ParticipantId::try_from(trustee_keys.len())
            .map_err(|_| ContractError::InvalidArgument("too many trustees"))?;
        if t_owners == 0 || t_owners > n_owners {
            return Err(Violation::InvalidThreshold {
                threshold: t_owners,
                total: n_owners,
            }
            .into());
        }
        let owner_key = election_key_from(&trustee_keys, t_owners)?;
        let petition = Petition {
            uuid: uuid.to_vec(),
            owner_key,
            trustee_keys,
            t_owners,
            n_owners,
            verification_key,
            options,
            scores: vec![Ciphertext::zero(); OPTION_COUNT],
            decryptions: Vec::new(),
        };
        let list = SpentTagList::new(SpentListKind::Petition, uuid, None);
        let token = LedgerObject::<E>::Token(TokenKind::Petition);
        let tx = Transaction::new(CONTRACT_ID, "create_petition")
            .with_input(&token)?
            .with_output(&token)?
            .with_output(&LedgerObject::from(petition.clone()))?
            .with_output(&LedgerObject::from(list.clone()))?;
        Ok((tx, petition, list))
    }

    /// Signs with a credential over `[d]`, voting `1` for the first option or `0` for the second.
    pub fn sign<R: RngCore>(
        &self,
        rng: &mut R,
        petition: &Petition<E>,
        list: &SpentTagList<E>,
        credential: &Credential<E>,
        d: &E::ScalarField,
        vote: u64,
    ) -> Result<(Transaction, Petition<E>, SpentTagList<E>), ContractError> {
        if !petition.decryptions.is_empty() {
            return Err(Violation::TallyStarted.into());
        }
        let (proof, zeta) = ShowingProof::new::<R, D>(
            rng,
            &self.params,
            &petition.verification_key,
            credential,
            &[*d],
            &[],
            &TagBase::hashed(&petition.uuid),
        )?;
        if list.tags.contains(&zeta) {
            return Err(Violation::DoubleUse.into());
        }
        let (encrypted, _, vote_proof) = EncryptedVote::new::<R, D>(
            rng,
            &self.vote_params,
            &petition.owner_key,
            vote,
        )?;

        let mut new = petition.clone();
        new.scores = petition.scores_with(&self.vote_params, &encrypted)?;
        let new_list = list.with_tag(zeta);
        let tx = Transaction::new(CONTRACT_ID, "sign")
            .with_input(&LedgerObject::from(petition.clone()))?
            .with_input(&LedgerObject::from(list.clone()))?
            .with_parameter(&proof)?
            .with_parameter(&zeta)?
            .with_parameter(&encrypted)?
            .with_parameter(&vote_proof)?
            .with_output(&LedgerObject::from(new.clone()))?
            .with_output(&LedgerObject::from(new_list.clone()))?;
        Ok((tx, new, new_list))
    }

    /// Adds the decryption share of `trustee` for `quorum`.
    pub fn tally<R: RngCore>(
        &self,
        rng: &mut R,
        petition: &Petition<E>,
        trustee: ParticipantId,
        secret: &SecretKey<E::ScalarField>,
        quorum: Vec<ParticipantId>,
    ) -> Result<(Transaction, Petition<E>), ContractError> {
        let (entry, proof) = DecryptionEntry::new::<R, D>(
            rng,
            &self.vote_params,
            trustee,
            secret,
            quorum,
            &petition.scores,
        )?;
        if petition.quorum().is_some_and(|quorum| quorum != entry.quorum) {
            return Err(Violation::QuorumChanged.into());
        }
        if petition.decryptions.iter().any(|e| e.trustee == trustee) {
            return Err(Violation::DuplicateShare(trustee).into());
        }
        let mut new = petition.clone();
        new.decryptions.push(entry.clone());
        let tx = Transaction::new(CONTRACT_ID, "tally")
            .with_input(&LedgerObject::from(petition.clone()))?
            .with_parameter(&entry)?
            .with_parameter(&proof)?
            .with_output(&LedgerObject::from(new.clone()))?;
        Ok((tx, new))
    }

    /// Reads the outcome of a fully decrypted petition.
    pub fn read(
        &self,
        petition: &Petition<E>,
    ) -> Result<(Transaction, Vec<(String, u64)>), ContractError> {
        petition.check_decrypted()?;
        let outcome = petition.outcome(&self.vote_params)?;
        let tx = Transaction::new(CONTRACT_ID, "read")
            .with_reference_input(&LedgerObject::from(petition.clone()))?
            .with_return(&outcome)?;
        Ok((tx, outcome))
    }

    fn check_create(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 0, 3, 0).check(tx)?;
        check_token_passthrough::<E>(tx, TokenKind::Petition)?;
        let petition = tx.output::<LedgerObject<E>>(1)?.into_petition()?;
        let list = tx
            .output::<LedgerObject<E>>(2)?
            .into_spent_tags(SpentListKind::Petition)?;

        if petition.options.len() != OPTION_COUNT {
            return Err(Violation::InvalidOptions(petition.options.len()).into());
        }
        let (t, n) = (petition.t_owners, petition.n_owners);
        if t == 0 || t > n {
            return Err(Violation::InvalidThreshold {
                threshold: t,
                total: n,
            }
            .into());
        }
        if petition.trustee_keys.len() != n as usize
            || election_key_from(&petition.trustee_keys, t).ok() != Some(petition.owner_key)
        {
            return Err(Violation::InconsistentTrusteeKeys.into());
        }
        if !petition.verification_key.valid() {
            return Err(Precondition::Showing(ShowingError::InvalidVerificationKey).into());
        }
        if petition.scores != vec![Ciphertext::zero(); OPTION_COUNT] {
            return Err(Violation::NotInitial("scores").into());
        }
        if !petition.decryptions.is_empty() {
            return Err(Violation::NotInitial("decryptions").into());
        }

        if list.instance != petition.uuid {
            return Err(Violation::InstanceMismatch.into());
        }
        if list.verification_key.is_some() {
            return Err(Violation::NotInitial("verification_key").into());
        }
        if !list.tags.is_empty() {
            return Err(Violation::NotInitial("tags").into());
        }
        Ok(())
    }

    fn check_sign(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(2, 0, 4, 2, 0).check(tx)?;
        let old = tx.input::<LedgerObject<E>>(0)?.into_petition()?;
        let old_list = tx
            .input::<LedgerObject<E>>(1)?
            .into_spent_tags(SpentListKind::Petition)?;
        let new = tx.output::<LedgerObject<E>>(0)?.into_petition()?;
        let new_list = tx
            .output::<LedgerObject<E>>(1)?
            .into_spent_tags(SpentListKind::Petition)?;
        let proof = tx.parameter::<ShowingProof<E>>(0)?;
        let zeta = tx.parameter::<ZetaTag<E>>(1)?;
        let vote = tx.parameter::<EncryptedVote<E::G1Affine>>(2)?;
        let vote_proof = tx.parameter::<VoteProof<E::G1Affine>>(3)?;

        if old_list.instance != old.uuid {
            return Err(Violation::InstanceMismatch.into());
        }
        if !old.decryptions.is_empty() {
            return Err(Violation::TallyStarted.into());
        }
        check_terms(&old, &new)?;
        unchanged("decryptions", &old.decryptions, &new.decryptions)?;
        check_spend(&old_list, &new_list, &zeta)?;
        if new.scores != old.scores_with(&self.vote_params, &vote)? {
            return Err(Violation::FieldChanged("scores").into());
        }

        expect_hidden(&proof, 1)?;
        proof.verify::<D>(
            &self.params,
            &new.verification_key,
            &zeta,
            &[],
            &[],
            &TagBase::hashed(&new.uuid),
        )?;
        vote_proof.verify::<D>(&self.vote_params, &new.owner_key, &vote)?;
        Ok(())
    }

    fn check_tally(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(1, 0, 2, 1, 0).check(tx)?;
        let old = tx.input::<LedgerObject<E>>(0)?.into_petition()?;
        let new = tx.output::<LedgerObject<E>>(0)?.into_petition()?;
        let entry = tx.parameter::<DecryptionEntry<E::G1Affine>>(0)?;
        let proof = tx.parameter::<TallyProof<E::G1Affine>>(1)?;

        check_terms(&old, &new)?;
        unchanged("scores", &old.scores, &new.scores)?;
        match old.quorum() {
            Some(quorum) if quorum != entry.quorum => return Err(Violation::QuorumChanged.into()),
            Some(_) => (),
            None => old.check_quorum(&entry.quorum)?,
        }
        if !entry.quorum.contains(&entry.trustee) {
            return Err(Violation::TrusteeNotInQuorum(entry.trustee).into());
        }
        if old.decryptions.iter().any(|e| e.trustee == entry.trustee) {
            return Err(Violation::DuplicateShare(entry.trustee).into());
        }
        check_appended(&old.decryptions, &new.decryptions, &entry)?;

        let trustee_key = (entry.trustee as usize)
            .checked_sub(1)
            .and_then(|i| old.trustee_keys.get(i))
            .ok_or(Precondition::UnknownTrustee(entry.trustee))?;
        let l = entry.lagrange_coefficient()?;
        proof.verify::<D>(&self.vote_params, trustee_key, &l, &new.scores, &entry.shares)?;
        Ok(())
    }

    fn check_read(&self, tx: &Transaction) -> Result<(), Rejection> {
        Arity::new(0, 1, 0, 0, 1).check(tx)?;
        let petition = tx.reference_input::<LedgerObject<E>>(0)?.into_petition()?;
        let declared = tx.returned::<Vec<(String, u64)>>(0)?;

        petition.check_decrypted()?;
        if petition.outcome(&self.vote_params)? != declared {
            return Err(Violation::OutcomeMismatch.into());
        }
        Ok(())
    }
}

impl<E: Pairing, D: Digest> Checker for PetitionContract<E, D> {
    fn contract_id(&self) -> &str {
        CONTRACT_ID
    }

    fn check(&self, tx: &Transaction) -> Result<(), Rejection> {
        self.check_contract(tx)?;
        match tx.method_id.as_str() {
            "init" => check_init::<E>(tx, TokenKind::Petition),
            "create_petition" => self.check_create(tx),
            "sign" => self.check_sign(tx),
            "tally" => self.check_tally(tx),
            "read" => self.check_read(tx),
            other => Err(Precondition::UnknownMethod(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ProofFailure, vote::TrusteeKeys};
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;
    use coconut::setup::test_setup;

    type Contract = PetitionContract<Bls12_381, Blake2b512>;

    fn options() -> Vec<String> {
        vec!["YES".to_string(), "NO".to_string()]
    }

    #[test]
    fn creation_checks_options_and_trustees() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (_, vk, params, _) = test_setup::<Bls12_381, Blake2b512, _>(&mut rng, 1);
        let contract = Contract::new(params, VoteParams::new::<Blake2b512>(b"petition-test"));
        let keys = TrusteeKeys::deal(&mut rng, &contract.vote_params, 2, 3).unwrap();

        let (tx, petition, list) = contract
            .create_petition(b"p-1", options(), keys.trustee_keys.clone(), 2, vk.clone())
            .unwrap();
        contract.check(&tx).unwrap();
        assert_eq!(petition.owner_key, keys.election_key);
        assert_eq!(list.instance, b"p-1".to_vec());

        assert_eq!(
            contract
                .create_petition(b"p-1", vec!["YES".to_string()], keys.trustee_keys.clone(), 2, vk.clone())
                .unwrap_err(),
            ContractError::Violation(Violation::InvalidOptions(1))
        );
        assert_eq!(
            contract
                .create_petition(b"p-1", options(), keys.trustee_keys.clone(), 4, vk.clone())
                .unwrap_err(),
            ContractError::Violation(Violation::InvalidThreshold {
                threshold: 4,
                total: 3
            })
        );

        // An owner key not matching the trustee keys
        let mut forged = petition.clone();
        forged.owner_key = G1Affine::rand(&mut rng);
        let mut tx2 = tx.clone();
        tx2.outputs[1] = utils::wire::to_hex(&LedgerObject::from(forged)).unwrap();
        assert_eq!(
            contract.check(&tx2),
            Err(Violation::InconsistentTrusteeKeys.into())
        );

        // A list belonging to another petition
        let mut tx2 = tx;
        let other = SpentTagList::<Bls12_381>::new(SpentListKind::Petition, b"p-2".to_vec(), None);
        tx2.outputs[2] = utils::wire::to_hex(&LedgerObject::from(other)).unwrap();
        assert_eq!(contract.check(&tx2), Err(Violation::InstanceMismatch.into()));
    }

    #[test]
    fn signing_is_checked_and_tally_needs_a_quorum() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (sk, vk, params, _) = test_setup::<Bls12_381, Blake2b512, _>(&mut rng, 1);
        let contract = Contract::new(params, VoteParams::new::<Blake2b512>(b"petition-test"));
        let keys = TrusteeKeys::deal(&mut rng, &contract.vote_params, 2, 3).unwrap();
        let (_, petition, list) = contract
            .create_petition(b"p-1", options(), keys.trustee_keys.clone(), 2, vk)
            .unwrap();

        let d = Fr::rand(&mut rng);
        let credential = Credential::new(&mut rng, &[d], &sk, &contract.params.g1).unwrap();
        let (tx, signed, signed_list) = contract
            .sign(&mut rng, &petition, &list, &credential, &d, 1)
            .unwrap();
        contract.check(&tx).unwrap();
        assert_eq!(
            contract
                .sign(&mut rng, &signed, &signed_list, &credential, &d, 0)
                .unwrap_err(),
            ContractError::Violation(Violation::DoubleUse)
        );
        // Replaying the signature against the updated petition and list
        let mut replay = tx.clone();
        replay.inputs = vec![
            utils::wire::to_hex(&LedgerObject::from(signed.clone())).unwrap(),
            utils::wire::to_hex(&LedgerObject::from(signed_list.clone())).unwrap(),
        ];
        replay.outputs = vec![
            utils::wire::to_hex(&LedgerObject::from(signed.clone())).unwrap(),
            utils::wire::to_hex(&LedgerObject::from(
                signed_list.with_tag(signed_list.tags[0]),
            ))
            .unwrap(),
        ];
        assert_eq!(contract.check(&replay), Err(Violation::DoubleUse.into()));

        // Parameters out of order don't decode
        let mut tampered = tx.clone();
        tampered.parameters.swap(0, 2);
        assert!(matches!(
            contract.check(&tampered),
            Err(Rejection::Precondition(Precondition::Decode { .. }))
        ));
        let mut tampered = tx.clone();
        let mut wrong = signed.clone();
        wrong.scores.swap(0, 1);
        tampered.outputs[0] = utils::wire::to_hex(&LedgerObject::from(wrong)).unwrap();
        assert_eq!(
            contract.check(&tampered),
            Err(Violation::FieldChanged("scores").into())
        );

        let (_, partial) = contract
            .tally(&mut rng, &signed, 3, keys.secret(3).unwrap(), vec![3, 1])
            .unwrap();
        assert_eq!(partial.quorum(), Some(&[1u16, 3][..]));
        assert_eq!(
            contract.read(&partial).unwrap_err(),
            ContractError::Precondition(Precondition::InsufficientShares {
                received: 1,
                required: 2
            })
        );
        assert_eq!(
            contract
                .sign(&mut rng, &partial, &signed_list, &credential, &d, 1)
                .unwrap_err(),
            ContractError::Violation(Violation::TallyStarted)
        );

        // A share from a trustee using another trustee's key
        let (tx, _) = contract
            .tally(&mut rng, &partial, 1, keys.secret(2).unwrap(), vec![1, 3])
            .unwrap();
        assert!(matches!(
            contract.check(&tx),
            Err(Rejection::ProofInvalid(ProofFailure::Vote(
                VoteError::TallyChallengeMismatch
            )))
        ));

        let (tx, done) = contract
            .tally(&mut rng, &partial, 1, keys.secret(1).unwrap(), vec![1, 3])
            .unwrap();
        contract.check(&tx).unwrap();
        let (tx, outcome) = contract.read(&done).unwrap();
        contract.check(&tx).unwrap();
        assert_eq!(outcome, vec![("YES".to_string(), 1), ("NO".to_string(), 0)]);

        let mut lying = tx;
        lying.returns[0] =
            utils::wire::to_hex(&vec![("YES".to_string(), 0u64), ("NO".to_string(), 1u64)])
                .unwrap();
        assert_eq!(contract.check(&lying), Err(Violation::OutcomeMismatch.into()));
    }
}
