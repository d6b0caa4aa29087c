use crate::{concat_slices, hashing_utils::projective_group_elem_from_try_and_incr};
use alloc::vec::Vec;
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::{cfg_into_iter, rand::RngCore, UniformRand};
use digest::Digest;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Generates `count` randoms using the supplied `rng`.
pub fn n_rand<T: UniformRand, R: RngCore>(rng: &mut R, count: usize) -> Vec<T> {
    (0..count).map(|_| rand(rng)).collect()
}

/// Generates a random using given `rng`.
pub fn rand<T: UniformRand, R: RngCore>(rng: &mut R) -> T {
    UniformRand::rand(rng)
}

/// Affine group elements created by hashing `label || separator || i` for each `i` in `0..count`.
pub fn n_affine_group_elements<G, D>(label: &[u8], separator: &[u8], count: u32) -> Vec<G>
where
    G: AffineRepr,
    D: Digest,
{
    let points = cfg_into_iter!(0..count)
        .map(|i| {
            projective_group_elem_from_try_and_incr::<G, D>(&concat_slices!(
                label,
                separator,
                i.to_le_bytes()
            ))
        })
        .collect::<Vec<_>>();
    G::Group::normalize_batch(&points)
}
