use alloc::vec::Vec;

use ark_ec::{pairing::Pairing, CurveGroup, VariableBaseMSM};
use utils::shamir::{lagrange_basis_at_0_for_all, ParticipantId};

use super::{AggregationError, Credential};

impl<E: Pairing> Credential<E> {
    /// Combines partial credentials of at least `threshold` authorities, given with their unique
    /// participant ids, into a credential verifiable with the aggregate verification key. All
    /// partial credentials must share the same `h`.
    pub fn aggregate<'a, I>(participant_credentials: I) -> Result<Self, AggregationError>
    where
        I: IntoIterator<Item = (ParticipantId, &'a Credential<E>)>,
    {
        let (ids, credentials): (Vec<_>, Vec<_>) = participant_credentials.into_iter().unzip();
        let h = credentials.first().ok_or(AggregationError::NoCredentials)?.h;
        if let Some((id, _)) = ids.iter().zip(&credentials).find(|(_, c)| c.h != h) {
            return Err(AggregationError::InvalidHFor(*id));
        }
        let l = lagrange_basis_at_0_for_all::<E::ScalarField>(&ids)?;
        let s = credentials.iter().map(|c| c.s).collect::<Vec<_>>();

        Ok(Self {
            h,
            s: E::G1::msm_unchecked(&s, &l).into_affine(),
        })
    }
}
