//! Encrypted yes/no votes. A vote `m` is encrypted as `(k * g, k * pk + m * h0)` under the election
//! key `pk`, whose secret is shared among trustees. Ciphertexts are summed to a running tally
//! which a threshold of trustees decrypts with proven partial decryptions, and the count is read
//! from `count * h0` with a bounded discrete log table.

use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{One, Zero};
use ark_serialize::*;
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    challenge::ChallengeContribution,
    concat_slices,
    discrete_log::DiscreteLogTable,
    elgamal::{Ciphertext, SecretKey},
    hashing_utils::affine_group_elem_from_try_and_incr,
    misc::n_rand,
    serde_utils::ArkObjectBytes,
    shamir::{deal_secret, lagrange_basis_at_0, lagrange_basis_at_0_for_all, ParticipantId, ShareError},
};

/// Largest absolute count readable from a decrypted tally unless configured otherwise.
pub const DEFAULT_TALLY_BOUND: u64 = 1000;

const VOTE_DOMAIN: &[u8] = b"vote-proof";
const TALLY_DOMAIN: &[u8] = b"tally-proof";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteError {
    NotABit(u64),
    NoCiphertexts,
    ShareCountMismatch { shares: usize, ciphertexts: usize },
    Quorum(ShareError),
    ChallengeMismatch,
    TallyChallengeMismatch,
    RangeExceeded { bound: u64 },
    Serialization(String),
}

impl VoteError {
    /// `true` for malformed inputs, `false` for failed proofs and out of range tallies.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotABit(_)
                | Self::NoCiphertexts
                | Self::ShareCountMismatch { .. }
                | Self::Quorum(_)
                | Self::Serialization(_)
        )
    }
}

impl From<ShareError> for VoteError {
    fn from(e: ShareError) -> Self {
        Self::Quorum(e)
    }
}

impl From<SerializationError> for VoteError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(format!("{:?}", e))
    }
}

/// Generators of the vote encryption: `g` for keys and randomness, `h0` encodes the vote.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct VoteParams<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub h0: G,
    pub tally_bound: u64,
}

impl<G: AffineRepr> VoteParams<G> {
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        Self {
            g: G::generator(),
            h0: affine_group_elem_from_try_and_incr::<G, D>(&concat_slices!(label, b"-h0")),
            tally_bound: DEFAULT_TALLY_BOUND,
        }
    }

    pub fn with_tally_bound(mut self, tally_bound: u64) -> Self {
        self.tally_bound = tally_bound;
        self
    }

    /// Lookup table for counts in `[-tally_bound, tally_bound]`.
    pub fn table(&self) -> Result<DiscreteLogTable<G>, VoteError> {
        Ok(DiscreteLogTable::new(self.h0, self.tally_bound)?)
    }
}

/// Keys of an election: the election key `x * g` and the key `x_i * g` of every trustee where
/// `x_i` is a Shamir share of `x`.
#[derive(Clone, Debug)]
pub struct TrusteeKeys<G: AffineRepr> {
    pub election_key: G,
    /// Key of trustee `i` at position `i - 1`.
    pub trustee_keys: Vec<G>,
    pub secrets: Vec<(ParticipantId, SecretKey<G::ScalarField>)>,
}

impl<G: AffineRepr> TrusteeKeys<G> {
    /// Trusted dealer setup for `total` trustees, any `threshold` of which decrypt.
    pub fn deal<R: RngCore>(
        rng: &mut R,
        params: &VoteParams<G>,
        threshold: ParticipantId,
        total: ParticipantId,
    ) -> Result<Self, VoteError> {
        let secret = G::ScalarField::rand(rng);
        let (shares, _) = deal_secret(rng, secret, threshold, total)?;
        let election_key = (params.g * secret).into_affine();
        let trustee_keys = G::Group::normalize_batch(
            &shares
                .0
                .iter()
                .map(|s| params.g * s.share)
                .collect::<Vec<_>>(),
        );
        let secrets = shares
            .0
            .iter()
            .map(|s| (s.id, SecretKey(s.share)))
            .collect();
        Ok(Self {
            election_key,
            trustee_keys,
            secrets,
        })
    }

    pub fn secret(&self, trustee: ParticipantId) -> Option<&SecretKey<G::ScalarField>> {
        self.secrets
            .iter()
            .find(|(id, _)| *id == trustee)
            .map(|(_, sk)| sk)
    }
}

/// Election key interpolated from the keys of trustees `1..=threshold`. Any other quorum gives
/// the same key when the trustee keys come from one sharing.
pub fn election_key_from<G: AffineRepr>(
    trustee_keys: &[G],
    threshold: ParticipantId,
) -> Result<G, VoteError> {
    let count = threshold as usize;
    if count == 0 || count > trustee_keys.len() {
        return Err(ShareError::BelowThreshold(threshold, trustee_keys.len() as ParticipantId).into());
    }
    let quorum = (1..=threshold).collect::<Vec<_>>();
    let basis = lagrange_basis_at_0_for_all::<G::ScalarField>(&quorum)?;
    Ok(G::Group::msm_unchecked(&trustee_keys[..count], &basis).into_affine())
}

/// A vote encrypted under the election key along with the commitment `cv = m * g + r1 * h0` the
/// well-formedness proof is built on.
#[serde_as]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct EncryptedVote<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub ciphertext: Ciphertext<G>,
    #[serde_as(as = "ArkObjectBytes")]
    pub commitment: G,
}

/// Proof of knowledge of `(k, m, r1, r2)` such that
/// - `a = k * g`
/// - `b = k * pk + m * h0`
/// - `cv = m * g + r1 * h0`
/// - `cv = m * cv + r2 * h0`
///
/// The last two hold together only if `m * (1 - m) = 0`, so the encrypted vote is a bit.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct VoteProof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub rk: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub rm: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub r1: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub r2: G::ScalarField,
}

impl<G: AffineRepr> EncryptedVote<G> {
    /// Encrypts `vote`, which must be 0 or 1. Returns the encrypted vote, the encryption of
    /// `1 - vote` and the proof.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &VoteParams<G>,
        election_key: &G,
        vote: u64,
    ) -> Result<(Self, Ciphertext<G>, VoteProof<G>), VoteError> {
        let m = match vote {
            0 => G::ScalarField::zero(),
            1 => G::ScalarField::one(),
            v => return Err(VoteError::NotABit(v)),
        };
        Self::prove::<R, D>(rng, params, election_key, m)
    }

    pub(crate) fn prove<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &VoteParams<G>,
        election_key: &G,
        m: G::ScalarField,
    ) -> Result<(Self, Ciphertext<G>, VoteProof<G>), VoteError> {
        let VoteParams { g, h0, .. } = *params;
        let k = G::ScalarField::rand(rng);
        let r1 = G::ScalarField::rand(rng);
        let r2 = (G::ScalarField::one() - m) * r1;

        let ciphertext =
            Ciphertext::new_with_randomness(&(h0 * m).into_affine(), election_key, &g, &k);
        let commitment = (g * m + h0 * r1).into_affine();
        let vote = Self {
            ciphertext,
            commitment,
        };

        let w: Vec<G::ScalarField> = n_rand(rng, 4);
        let witnesses = [
            g * w[0],
            *election_key * w[0] + h0 * w[1],
            g * w[1] + h0 * w[2],
            commitment * w[1] + h0 * w[3],
        ];
        let challenge = vote_challenge::<G, D>(params, election_key, &vote, &witnesses)?;
        let proof = VoteProof {
            challenge,
            rk: w[0] - challenge * k,
            rm: w[1] - challenge * m,
            r1: w[2] - challenge * r1,
            r2: w[3] - challenge * r2,
        };
        Ok((vote, vote.complement(params), proof))
    }

    /// Encryption of `1 - m` computed from the encryption of `m`.
    pub fn complement(&self, params: &VoteParams<G>) -> Ciphertext<G> {
        self.ciphertext.complement(&params.h0)
    }
}

impl<G: AffineRepr> VoteProof<G> {
    pub fn verify<D: Digest>(
        &self,
        params: &VoteParams<G>,
        election_key: &G,
        vote: &EncryptedVote<G>,
    ) -> Result<(), VoteError> {
        let VoteParams { g, h0, .. } = *params;
        let c = self.challenge;
        let Ciphertext { first, second } = vote.ciphertext;
        let cv = vote.commitment;

        let witnesses = [
            g * self.rk + first * c,
            *election_key * self.rk + h0 * self.rm + second * c,
            g * self.rm + h0 * self.r1 + cv * c,
            cv * self.rm + h0 * self.r2 + cv * c,
        ];
        if vote_challenge::<G, D>(params, election_key, vote, &witnesses)? != c {
            return Err(VoteError::ChallengeMismatch);
        }
        Ok(())
    }
}

/// `H(g, h0, pk, a, b, cv, Aw, Bw, Cw, Dw)`
fn vote_challenge<G: AffineRepr, D: Digest>(
    params: &VoteParams<G>,
    election_key: &G,
    vote: &EncryptedVote<G>,
    witnesses: &[G::Group; 4],
) -> Result<G::ScalarField, VoteError> {
    let witnesses = G::Group::normalize_batch(witnesses);
    let mut transcript = ChallengeContribution::new(VOTE_DOMAIN);
    transcript
        .append(&params.g)?
        .append(&params.h0)?
        .append(election_key)?
        .append(&vote.ciphertext.first)?
        .append(&vote.ciphertext.second)?
        .append(&vote.commitment)?;
    for w in &witnesses {
        transcript.append(w)?;
    }
    Ok(transcript.challenge::<G::ScalarField, D>())
}

/// Partial decryption of a trustee for a declared quorum, one share per ciphertext.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct DecryptionEntry<G: AffineRepr> {
    pub trustee: ParticipantId,
    /// Sorted ids of the trustees taking part in the decryption.
    pub quorum: Vec<ParticipantId>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub shares: Vec<G>,
}

impl<G: AffineRepr> DecryptionEntry<G> {
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &VoteParams<G>,
        trustee: ParticipantId,
        secret: &SecretKey<G::ScalarField>,
        mut quorum: Vec<ParticipantId>,
        ciphertexts: &[Ciphertext<G>],
    ) -> Result<(Self, TallyProof<G>), VoteError> {
        quorum.sort_unstable();
        let l = lagrange_basis_at_0::<G::ScalarField>(&quorum, trustee)?;
        let (shares, proof) = TallyProof::new::<R, D>(rng, params, secret, &l, ciphertexts)?;
        Ok((
            Self {
                trustee,
                quorum,
                shares,
            },
            proof,
        ))
    }

    pub fn lagrange_coefficient(&self) -> Result<G::ScalarField, VoteError> {
        Ok(lagrange_basis_at_0(&self.quorum, self.trustee)?)
    }
}

/// Proof that the shares `-x_i * l_i * a_j` use the same `x_i` as the trustee key `x_i * g`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct TallyProof<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: G::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub response: G::ScalarField,
}

impl<G: AffineRepr> TallyProof<G> {
    /// Returns the shares `-x_i * l_i * a_j` for every ciphertext `(a_j, b_j)` and the proof.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &VoteParams<G>,
        secret: &SecretKey<G::ScalarField>,
        lagrange_coefficient: &G::ScalarField,
        ciphertexts: &[Ciphertext<G>],
    ) -> Result<(Vec<G>, Self), VoteError> {
        if ciphertexts.is_empty() {
            return Err(VoteError::NoCiphertexts);
        }
        let x = secret.0;
        let bases = share_bases(lagrange_coefficient, ciphertexts);
        let shares =
            G::Group::normalize_batch(&bases.iter().map(|u| *u * x).collect::<Vec<_>>());
        let trustee_key = (params.g * x).into_affine();

        let w = G::ScalarField::rand(rng);
        let witnesses = core::iter::once(params.g * w)
            .chain(bases.iter().map(|u| *u * w))
            .collect::<Vec<_>>();
        let challenge =
            tally_challenge::<G, D>(params, &trustee_key, ciphertexts, &shares, &witnesses)?;
        Ok((
            shares,
            Self {
                challenge,
                response: w - challenge * x,
            },
        ))
    }

    pub fn verify<D: Digest>(
        &self,
        params: &VoteParams<G>,
        trustee_key: &G,
        lagrange_coefficient: &G::ScalarField,
        ciphertexts: &[Ciphertext<G>],
        shares: &[G],
    ) -> Result<(), VoteError> {
        if ciphertexts.is_empty() {
            return Err(VoteError::NoCiphertexts);
        }
        if shares.len() != ciphertexts.len() {
            return Err(VoteError::ShareCountMismatch {
                shares: shares.len(),
                ciphertexts: ciphertexts.len(),
            });
        }
        let c = self.challenge;
        let r = self.response;
        let bases = share_bases(lagrange_coefficient, ciphertexts);
        let witnesses = core::iter::once(params.g * r + *trustee_key * c)
            .chain(bases.iter().zip(shares).map(|(u, s)| *u * r + *s * c))
            .collect::<Vec<_>>();
        if tally_challenge::<G, D>(params, trustee_key, ciphertexts, shares, &witnesses)? != c {
            return Err(VoteError::TallyChallengeMismatch);
        }
        Ok(())
    }
}

/// `-l * a_j` for every ciphertext
fn share_bases<G: AffineRepr>(
    lagrange_coefficient: &G::ScalarField,
    ciphertexts: &[Ciphertext<G>],
) -> Vec<G> {
    let minus_l = -*lagrange_coefficient;
    G::Group::normalize_batch(
        &ciphertexts
            .iter()
            .map(|ct| ct.first * minus_l)
            .collect::<Vec<_>>(),
    )
}

/// `H(g, h0, pk_i, a_j.., share_j.., Aw_pk, Aw_j..)`
fn tally_challenge<G: AffineRepr, D: Digest>(
    params: &VoteParams<G>,
    trustee_key: &G,
    ciphertexts: &[Ciphertext<G>],
    shares: &[G],
    witnesses: &[G::Group],
) -> Result<G::ScalarField, VoteError> {
    let witnesses = G::Group::normalize_batch(witnesses);
    let mut transcript = ChallengeContribution::new(TALLY_DOMAIN);
    transcript
        .append(&params.g)?
        .append(&params.h0)?
        .append(trustee_key)?;
    for ct in ciphertexts {
        transcript.append(&ct.first)?;
    }
    transcript.append(shares)?.append(&witnesses[..])?;
    Ok(transcript.challenge::<G::ScalarField, D>())
}

/// Sums the shares of every entry position-wise, `count` being the number of ciphertexts.
pub fn combine<'a, G: AffineRepr>(
    entries: impl IntoIterator<Item = &'a DecryptionEntry<G>>,
    count: usize,
) -> Result<Vec<G>, VoteError> {
    let mut combined = vec![G::Group::zero(); count];
    for entry in entries {
        if entry.shares.len() != count {
            return Err(VoteError::ShareCountMismatch {
                shares: entry.shares.len(),
                ciphertexts: count,
            });
        }
        for (sum, share) in combined.iter_mut().zip(&entry.shares) {
            *sum += *share;
        }
    }
    Ok(G::Group::normalize_batch(&combined))
}

/// Recovers `m` from `second + combined = m * h0`.
pub fn decrypt<G: AffineRepr>(
    ciphertext: &Ciphertext<G>,
    combined: &G,
    table: &DiscreteLogTable<G>,
) -> Result<i64, VoteError> {
    let plain = (ciphertext.second + *combined).into_affine();
    table.lookup(&plain).ok_or(VoteError::RangeExceeded {
        bound: table.bound(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;

    fn params() -> VoteParams<G1Affine> {
        VoteParams::new::<Blake2b512>(b"vote-test")
    }

    #[test]
    fn bits_verify_and_other_values_do_not() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let params = params();
        let keys = TrusteeKeys::deal(&mut rng, &params, 2, 3).unwrap();
        let pk = keys.election_key;

        for bit in [0u64, 1] {
            let (vote, not_vote, proof) =
                EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &pk, bit).unwrap();
            proof.verify::<Blake2b512>(&params, &pk, &vote).unwrap();
            assert_eq!(not_vote, vote.complement(&params));

            let mut tampered = vote;
            tampered.commitment = (tampered.commitment + params.g).into_affine();
            assert_eq!(
                proof.verify::<Blake2b512>(&params, &pk, &tampered),
                Err(VoteError::ChallengeMismatch)
            );
            let mut other = proof.clone();
            other.rm += Fr::from(1u64);
            assert_eq!(
                other.verify::<Blake2b512>(&params, &pk, &vote),
                Err(VoteError::ChallengeMismatch)
            );
        }

        assert_eq!(
            EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &pk, 2).unwrap_err(),
            VoteError::NotABit(2)
        );
        // A prover ignoring the check can't produce an accepted proof for 2
        let (vote, _, proof) =
            EncryptedVote::prove::<_, Blake2b512>(&mut rng, &params, &pk, Fr::from(2u64)).unwrap();
        assert_eq!(
            proof.verify::<Blake2b512>(&params, &pk, &vote),
            Err(VoteError::ChallengeMismatch)
        );
    }

    #[test]
    fn every_quorum_decrypts_the_sum() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let params = params();
        let table = params.table().unwrap();
        let keys = TrusteeKeys::deal(&mut rng, &params, 2, 3).unwrap();
        let pk = keys.election_key;
        assert_eq!(election_key_from(&keys.trustee_keys, 2).unwrap(), pk);

        let mut yes = Ciphertext::zero();
        let mut no = Ciphertext::zero();
        for bit in [1u64, 0, 1, 1] {
            let (vote, not_vote, _) =
                EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &pk, bit).unwrap();
            yes = yes + vote.ciphertext;
            no = no + not_vote;
        }
        let scores = [yes, no];

        for quorum in [vec![1u16, 2], vec![1, 3], vec![2, 3]] {
            let entries = quorum
                .iter()
                .map(|id| {
                    let (entry, proof) = DecryptionEntry::new::<_, Blake2b512>(
                        &mut rng,
                        &params,
                        *id,
                        keys.secret(*id).unwrap(),
                        quorum.clone(),
                        &scores,
                    )
                    .unwrap();
                    proof
                        .verify::<Blake2b512>(
                            &params,
                            &keys.trustee_keys[*id as usize - 1],
                            &entry.lagrange_coefficient().unwrap(),
                            &scores,
                            &entry.shares,
                        )
                        .unwrap();
                    entry
                })
                .collect::<Vec<_>>();

            let combined = combine(&entries, 2).unwrap();
            assert_eq!(decrypt(&yes, &combined[0], &table).unwrap(), 3);
            assert_eq!(decrypt(&no, &combined[1], &table).unwrap(), 1);
        }
    }

    #[test]
    fn tally_proof_is_bound_to_the_trustee_key() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let params = params();
        let keys = TrusteeKeys::deal(&mut rng, &params, 2, 3).unwrap();
        let (vote, not_vote, _) =
            EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &keys.election_key, 1).unwrap();
        let scores = [vote.ciphertext, not_vote];

        let (entry, proof) = DecryptionEntry::new::<_, Blake2b512>(
            &mut rng,
            &params,
            1,
            keys.secret(1).unwrap(),
            vec![2, 1],
            &scores,
        )
        .unwrap();
        assert_eq!(entry.quorum, vec![1, 2]);
        let l = entry.lagrange_coefficient().unwrap();

        assert_eq!(
            proof.verify::<Blake2b512>(&params, &keys.trustee_keys[1], &l, &scores, &entry.shares),
            Err(VoteError::TallyChallengeMismatch)
        );
        let mut shares = entry.shares.clone();
        shares[0] = params.g;
        assert_eq!(
            proof.verify::<Blake2b512>(&params, &keys.trustee_keys[0], &l, &scores, &shares),
            Err(VoteError::TallyChallengeMismatch)
        );
        assert_eq!(
            proof.verify::<Blake2b512>(
                &params,
                &keys.trustee_keys[0],
                &l,
                &scores,
                &entry.shares[..1]
            ),
            Err(VoteError::ShareCountMismatch {
                shares: 1,
                ciphertexts: 2
            })
        );
        assert!(matches!(
            DecryptionEntry::new::<_, Blake2b512>(
                &mut rng,
                &params,
                3,
                keys.secret(3).unwrap(),
                vec![1, 2],
                &scores,
            ),
            Err(VoteError::Quorum(ShareError::ParticipantNotInSet(3)))
        ));
    }

    #[test]
    fn counts_outside_the_table_are_range_errors() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let params = params().with_tally_bound(2);
        let table = params.table().unwrap();
        let keys = TrusteeKeys::deal(&mut rng, &params, 1, 1).unwrap();

        let mut sum = Ciphertext::zero();
        for _ in 0..3 {
            let (vote, _, _) =
                EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &keys.election_key, 1)
                    .unwrap();
            sum = sum + vote.ciphertext;
        }
        let (entry, _) = DecryptionEntry::new::<_, Blake2b512>(
            &mut rng,
            &params,
            1,
            keys.secret(1).unwrap(),
            vec![1],
            &[sum],
        )
        .unwrap();
        let combined = combine([&entry], 1).unwrap();
        assert_eq!(
            decrypt(&sum, &combined[0], &table),
            Err(VoteError::RangeExceeded { bound: 2 })
        );
        assert!(!VoteError::RangeExceeded { bound: 2 }.is_precondition());
    }

    #[test]
    fn encodings() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let params = params();
        let keys = TrusteeKeys::deal(&mut rng, &params, 1, 1).unwrap();
        let (vote, _, proof) =
            EncryptedVote::new::<_, Blake2b512>(&mut rng, &params, &keys.election_key, 0).unwrap();

        let json = serde_json::to_string(&(vote, proof.clone())).unwrap();
        let (v, p): (EncryptedVote<G1Affine>, VoteProof<G1Affine>) =
            serde_json::from_str(&json).unwrap();
        assert_eq!((v, p), (vote, proof));

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            serde_json::from_str::<VoteParams<G1Affine>>(&json).unwrap(),
            params
        );
    }
}
