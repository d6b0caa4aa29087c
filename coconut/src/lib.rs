//! # Threshold issued credentials using Coconut
//!
//! - A trusted dealer shares the signing key among `n` authorities, any `t` of which issue a
//!   credential: each signs the attributes with the same `h` and the partial credentials are
//!   combined with Lagrange coefficients at 0.
//! - A holder shows the credential with a Sigma protocol made non-interactive with Fiat-Shamir.
//!   Hidden attributes stay hidden, public ones are supplied by the verifier, and arbitrary
//!   values can be bound into the challenge so the proof can't be replayed in another context.
//! - Every showing carries a uniqueness tag `m_0 * Base` used by ledgers to detect reuse of the
//!   first hidden attribute.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod proof;
pub mod setup;
pub mod signature;


pub use proof::*;
pub use setup::{
    deal, KeygenError, Params, SecretKey, Threshold, VerificationKey,
};
pub use signature::*;
