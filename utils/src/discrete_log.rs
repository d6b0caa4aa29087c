//! Discrete log lookup over a bounded signed range, used to read small integers such as vote
//! tallies out of `value * base`.

use alloc::{collections::BTreeMap, vec::Vec};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalSerialize, SerializationError};

/// Precomputed map `i * base -> i` for every `i` in `[-bound, bound]`.
#[derive(Clone, Debug)]
pub struct DiscreteLogTable<G: AffineRepr> {
    base: G,
    bound: u64,
    entries: BTreeMap<Vec<u8>, i64>,
}

fn point_key<G: AffineRepr>(point: &G) -> Result<Vec<u8>, SerializationError> {
    let mut bytes = Vec::with_capacity(point.compressed_size());
    point.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

impl<G: AffineRepr> DiscreteLogTable<G> {
    pub fn new(base: G, bound: u64) -> Result<Self, SerializationError> {
        let bound = bound.min(u32::MAX as u64);
        let start = -(base.mul_bigint([bound]));
        let points = (0..=2 * bound)
            .scan(start, |cur, _| {
                let point = *cur;
                *cur += base;
                Some(point)
            })
            .collect::<Vec<_>>();
        let mut entries = BTreeMap::new();
        for (offset, point) in G::Group::normalize_batch(&points).iter().enumerate() {
            entries.insert(point_key(point)?, offset as i64 - bound as i64);
        }
        Ok(Self {
            base,
            bound,
            entries,
        })
    }

    pub fn base(&self) -> &G {
        &self.base
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Returns `i` such that `i * base == target` if `|i| <= bound`, else `None`.
    pub fn lookup(&self, target: &G) -> Option<i64> {
        let key = point_key(target).ok()?;
        self.entries.get(&key).copied()
    }
}
