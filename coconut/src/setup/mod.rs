//! Coconut setup: public parameters, authority key pairs and threshold key generation based on
//! Shamir secret sharing.

use alloc::vec::Vec;

pub mod error;
pub mod keygen;
pub mod keypair;
pub mod params;

pub use error::KeygenError;
pub use keygen::*;
pub use keypair::*;
pub use params::*;

/// **Not intended to be used anywhere except for tests.**
/// Initializes secret key and verification key along with params and attributes to be used in tests.
#[allow(clippy::type_complexity)]
pub fn test_setup<E, D, R>(
    rng: &mut R,
    attribute_count: usize,
) -> (
    SecretKey<E::ScalarField>,
    VerificationKey<E>,
    Params<E>,
    Vec<E::ScalarField>,
)
where
    E: ark_ec::pairing::Pairing,
    D: digest::Digest,
    R: ark_std::rand::RngCore,
{
    let params = Params::new::<D>(b"test", attribute_count as u32);
    let secret = SecretKey::rand(rng, attribute_count);
    let public = VerificationKey::new(&secret, &params);
    let attributes = utils::misc::n_rand(rng, attribute_count);

    (secret, public, params, attributes)
}
