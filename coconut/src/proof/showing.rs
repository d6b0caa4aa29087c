use alloc::vec::Vec;

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::One;
use ark_serialize::*;
use ark_std::{rand::RngCore, UniformRand, Zero};
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use utils::{
    challenge::ChallengeContribution, join, misc::n_rand, multi_pairing,
    serde_utils::ArkObjectBytes,
};

use super::{ShowingError, TagBase, ZetaTag};
use crate::{setup::Params, setup::VerificationKey, signature::Credential};

type Result<T, E = ShowingError> = core::result::Result<T, E>;

const SHOWING_DOMAIN: &[u8] = b"coconut-showing";

/// Showing of a credential over `k` hidden attributes `m`.
///
/// - `credential` is the rerandomized credential `(h', s') = (r * h, r * s)`
/// - `kappa = t * g2 + alpha + \sum_{i < k}(m_{i} * beta_{i})`
/// - `nu = t * h'`
/// - `challenge`, `rm`, `rt` prove knowledge of `m` and `t`, with the bound values hashed into
///   the challenge
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct ShowingProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub kappa: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub nu: E::G1Affine,
    pub credential: Credential<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub rm: Vec<E::ScalarField>,
    #[serde_as(as = "ArkObjectBytes")]
    pub rt: E::ScalarField,
}

impl<E: Pairing> ShowingProof<E> {
    /// Shows `credential` over `private_attributes`, which must fill the first slots of `vk`.
    /// `bind_attributes` are public values the proof is bound to, the same values must be given
    /// to `verify`. Returns the proof with the uniqueness tag `private_attributes[0] * base`.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        params: &Params<E>,
        vk: &VerificationKey<E>,
        credential: &Credential<E>,
        private_attributes: &[E::ScalarField],
        bind_attributes: &[E::ScalarField],
        base: &TagBase,
    ) -> Result<(Self, ZetaTag<E>)> {
        let k = private_attributes.len();
        check_shape(params, vk, k, 0)?;
        if credential.is_zero() {
            return Err(ShowingError::ZeroCredential);
        }
        let base = base.point::<E, D>(params);

        let r = E::ScalarField::rand(rng);
        let t = E::ScalarField::rand(rng);
        let wt = E::ScalarField::rand(rng);
        let wm: Vec<E::ScalarField> = n_rand(rng, k);

        let credential = credential.randomize_with(&r);
        let beta = &vk.beta[..k];
        let (kappa, nu, aw, bw, cw) = {
            let (kappa, nu) = join!(
                vk.g2 * t + vk.alpha + E::G2::msm_unchecked(beta, private_attributes),
                credential.h * t
            );
            let (aw, bw, cw) = join!(
                vk.g2 * wt + vk.alpha + E::G2::msm_unchecked(beta, &wm),
                credential.h * wt,
                base * wm[0]
            );
            (kappa.into_affine(), nu.into_affine(), aw, bw, cw)
        };
        let zeta = ZetaTag::new(&base, &private_attributes[0]);

        let challenge = challenge::<E, D>(params, vk, aw, bw, cw, bind_attributes)?;
        let rm = wm
            .iter()
            .zip(private_attributes)
            .map(|(w, m)| *w - challenge * m)
            .collect();
        let rt = wt - challenge * t;

        Ok((
            Self {
                kappa,
                nu,
                credential,
                challenge,
                rm,
                rt,
            },
            zeta,
        ))
    }

    /// Verifies the showing against `vk`, the tag and the bound values. `public_attributes` fill
    /// the slots following the hidden ones.
    pub fn verify<D: Digest>(
        &self,
        params: &Params<E>,
        vk: &VerificationKey<E>,
        zeta: &ZetaTag<E>,
        public_attributes: &[E::ScalarField],
        bind_attributes: &[E::ScalarField],
        base: &TagBase,
    ) -> Result<()> {
        let k = self.rm.len();
        check_shape(params, vk, k, public_attributes.len())?;
        let base = base.point::<E, D>(params);
        let c = self.challenge;
        let h = self.credential.h;

        let (aw, bw, cw) = join!(
            self.kappa * c
                + vk.g2 * self.rt
                + vk.alpha * (E::ScalarField::one() - c)
                + E::G2::msm_unchecked(&vk.beta[..k], &self.rm),
            self.nu * c + h * self.rt,
            base * self.rm[0] + zeta.0 * c
        );
        if challenge::<E, D>(params, vk, aw, bw, cw, bind_attributes)? != c {
            return Err(ShowingError::ChallengeMismatch);
        }
        if h.is_zero() {
            return Err(ShowingError::ZeroCredential);
        }

        let public = E::G2::msm_unchecked(&vk.beta[k..k + public_attributes.len()], public_attributes);
        let prod = multi_pairing! {
            h, public + self.kappa;
            -(self.credential.s + self.nu), vk.g2
        };
        if prod.is_zero() {
            Ok(())
        } else {
            Err(ShowingError::PairingCheckFailed)
        }
    }

    /// Number of hidden attributes this proof shows.
    pub fn hidden_attribute_count(&self) -> usize {
        self.rm.len()
    }
}

fn check_shape<E: Pairing>(
    params: &Params<E>,
    vk: &VerificationKey<E>,
    private: usize,
    public: usize,
) -> Result<()> {
    if private == 0 {
        return Err(ShowingError::NoPrivateAttributes);
    }
    if !vk.valid() {
        return Err(ShowingError::InvalidVerificationKey);
    }
    let supported = vk.supported_attribute_count();
    if private + public > supported {
        return Err(ShowingError::TooManyAttributes {
            received: private + public,
            supported,
        });
    }
    if params.g2 != vk.g2 {
        return Err(ShowingError::InvalidVerificationKey);
    }
    Ok(())
}

/// `H(g1, g2, alpha, Aw, Bw, Cw, hs, beta, [b_j * g1])`
fn challenge<E: Pairing, D: Digest>(
    params: &Params<E>,
    vk: &VerificationKey<E>,
    aw: E::G2,
    bw: E::G1,
    cw: E::G1,
    bind_attributes: &[E::ScalarField],
) -> Result<E::ScalarField> {
    let bound = bind_attributes
        .iter()
        .map(|b| params.g1 * b)
        .collect::<Vec<_>>();
    let bound = E::G1::normalize_batch(&bound);
    let witnesses = E::G1::normalize_batch(&[bw, cw]);

    let mut transcript = ChallengeContribution::new(SHOWING_DOMAIN);
    transcript
        .append(&params.g1)?
        .append(&params.g2)?
        .append(&vk.alpha)?
        .append(&aw.into_affine())?
        .append(&witnesses[0])?
        .append(&witnesses[1])?
        .append(&params.hs[..])?
        .append(&vk.beta[..])?
        .append(&bound[..])?;
    Ok(transcript.challenge::<E::ScalarField, D>())
}
