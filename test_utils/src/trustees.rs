use ark_std::rand::RngCore;
use blake2::Blake2b512;
use contracts::vote::{TrusteeKeys, VoteParams};
use utils::shamir::ParticipantId;

use crate::G1;

/// Vote parameters and the keys of `total` trustees, any `threshold` of which decrypt.
pub fn trustee_setup<R: RngCore>(
    rng: &mut R,
    label: &[u8],
    threshold: ParticipantId,
    total: ParticipantId,
) -> (VoteParams<G1>, TrusteeKeys<G1>) {
    let params = VoteParams::new::<Blake2b512>(label);
    let keys = TrusteeKeys::deal(rng, &params, threshold, total).unwrap();
    (params, keys)
}

/// Every subset of `1..=total` of size `threshold`, each sorted.
pub fn quorums(threshold: ParticipantId, total: ParticipantId) -> Vec<Vec<ParticipantId>> {
    let mut quorums = vec![vec![]];
    for id in 1..=total {
        let mut extended = quorums
            .iter()
            .filter(|q| q.len() < threshold as usize)
            .map(|q| {
                let mut q = q.clone();
                q.push(id);
                q
            })
            .collect::<Vec<_>>();
        quorums.append(&mut extended);
    }
    quorums.retain(|q| q.len() == threshold as usize);
    quorums
}
