use ark_bls12_381::Bls12_381;
use ark_std::rand::RngCore;
use blake2::Blake2b512;
use coconut::{deal, Credential, Params, SecretKey, Threshold, VerificationKey};
use utils::shamir::ParticipantId;

use crate::Fr;

/// Authorities holding shares of one signing key, any `threshold` of which issue credentials.
pub struct Authorities {
    pub params: Params<Bls12_381>,
    pub threshold: ParticipantId,
    pub keys: Vec<(ParticipantId, SecretKey<Fr>)>,
    pub verification_keys: Vec<(ParticipantId, VerificationKey<Bls12_381>)>,
    /// Aggregate of the keys of authorities `1..=threshold`.
    pub verification_key: VerificationKey<Bls12_381>,
}

impl Authorities {
    pub fn setup<R: RngCore>(
        rng: &mut R,
        label: &[u8],
        attribute_count: u32,
        threshold: ParticipantId,
        total: ParticipantId,
    ) -> Self {
        let params = Params::<Bls12_381>::new::<Blake2b512>(label, attribute_count);
        let (_, keys) = deal::<_, Fr>(
            rng,
            attribute_count as usize,
            Threshold::new(threshold, total).unwrap(),
        )
        .unwrap();
        let verification_keys = keys
            .iter()
            .map(|(id, sk)| (*id, VerificationKey::new(sk, &params)))
            .collect::<Vec<_>>();
        let verification_key = VerificationKey::aggregate(
            verification_keys[..threshold as usize]
                .iter()
                .map(|(id, vk)| (*id, vk)),
        )
        .unwrap();
        Self {
            params,
            threshold,
            keys,
            verification_keys,
            verification_key,
        }
    }

    /// Ids of the authorities the verification key is aggregated from.
    pub fn signers(&self) -> Vec<ParticipantId> {
        (1..=self.threshold).collect()
    }

    /// Partial credential of authority `id` over `attributes`.
    pub fn partial(&self, id: ParticipantId, attributes: &[Fr]) -> Credential<Bls12_381> {
        let (_, sk) = self.keys.iter().find(|(i, _)| *i == id).unwrap();
        let partial = Credential::new_deterministic::<Blake2b512>(attributes, sk).unwrap();
        let (_, vk) = self.verification_keys.iter().find(|(i, _)| *i == id).unwrap();
        partial.verify(attributes, vk).unwrap();
        partial
    }

    /// Credential over `attributes` aggregated from the partial credentials of `signers`.
    pub fn issue(&self, attributes: &[Fr], signers: &[ParticipantId]) -> Credential<Bls12_381> {
        let partials = signers
            .iter()
            .map(|id| (*id, self.partial(*id, attributes)))
            .collect::<Vec<_>>();
        let credential =
            Credential::aggregate(partials.iter().map(|(id, c)| (*id, c))).unwrap();
        credential.verify(attributes, &self.verification_key).unwrap();
        credential
    }
}
