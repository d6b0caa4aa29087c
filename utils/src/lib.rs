#![cfg_attr(not(feature = "std"), no_std)]

//! Algebraic helpers shared by the credential and contract crates: hashing to field and curve
//! elements, Fiat-Shamir challenge construction, ElGamal ciphertexts, Shamir secret sharing
//! with Lagrange interpolation at 0, bounded discrete log lookup and the hex wire format.

extern crate alloc;

#[macro_use]
pub mod macros;
#[macro_use]
pub mod serde_utils;
pub mod challenge;
pub mod discrete_log;
pub mod elgamal;
pub mod hashing_utils;
pub mod misc;
pub mod shamir;
pub mod wire;
