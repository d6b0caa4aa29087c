//! Hashing bytes to field and group elements with try-and-increment. These run in variable time
//! and are only applied to public inputs such as setup labels, identifiers and transcripts.

use crate::concat_slices;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::Zero;
use digest::Digest;

fn attempt_digest<D: Digest>(bytes: &[u8], attempt: u64) -> digest::Output<D> {
    if attempt == 0 {
        D::digest(bytes)
    } else {
        D::digest(concat_slices!(bytes, b"-attempt-", attempt.to_le_bytes()))
    }
}

/// Hash bytes to a point of the prime order subgroup. Returns as projective coordinates.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(
    bytes: &[u8],
) -> G::Group {
    let mut attempt = 0u64;
    loop {
        let hash = attempt_digest::<D>(bytes, attempt);
        if let Some(point) = G::from_random_bytes(&hash) {
            let point = point.mul_by_cofactor_to_group();
            if !point.is_zero() {
                return point;
            }
        }
        attempt += 1;
    }
}

/// Hash bytes to a point of the prime order subgroup. Returns as affine coordinates.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    projective_group_elem_from_try_and_incr::<G, D>(bytes).into_affine()
}

/// Hash bytes to a field element.
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut attempt = 0u64;
    loop {
        let hash = attempt_digest::<D>(bytes, attempt);
        if let Some(f) = F::from_random_bytes(&hash) {
            return f;
        }
        attempt += 1;
    }
}

/// Scalar an address or digest is bound into a proof as. The bytes are length-prefixed and hashed
/// under their own label, so distinct byte strings give distinct scalars.
pub fn field_elem_from_bytes<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    field_elem_from_try_and_incr::<F, D>(&concat_slices!(
        b"bind-",
        (bytes.len() as u64).to_le_bytes(),
        bytes
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine, G2Affine};
    use blake2::Blake2b512;

    #[test]
    fn hashing_is_deterministic_and_label_sensitive() {
        let a = affine_group_elem_from_try_and_incr::<G1Affine, Blake2b512>(b"petition-1234");
        let b = affine_group_elem_from_try_and_incr::<G1Affine, Blake2b512>(b"petition-1234");
        let c = affine_group_elem_from_try_and_incr::<G1Affine, Blake2b512>(b"petition-1235");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
        assert!(a.is_in_correct_subgroup_assuming_on_curve());

        let g2 = affine_group_elem_from_try_and_incr::<G2Affine, Blake2b512>(b"petition-1234");
        assert!(g2.is_in_correct_subgroup_assuming_on_curve());

        let f1 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"transcript");
        let f2 = field_elem_from_try_and_incr::<Fr, Blake2b512>(b"transcript ");
        assert_ne!(f1, f2);
    }

    #[test]
    fn bound_bytes_do_not_collide() {
        let alice = field_elem_from_bytes::<Fr, Blake2b512>(b"alice");
        assert_eq!(alice, field_elem_from_bytes::<Fr, Blake2b512>(b"alice"));
        assert_ne!(alice, field_elem_from_bytes::<Fr, Blake2b512>(b"\0alice"));
        assert_ne!(alice, field_elem_from_bytes::<Fr, Blake2b512>(b"alice\0"));
        assert_ne!(
            field_elem_from_bytes::<Fr, Blake2b512>(&[0, 0, 0, 7]),
            field_elem_from_bytes::<Fr, Blake2b512>(&[7])
        );
        assert_ne!(
            field_elem_from_bytes::<Fr, Blake2b512>(&[]),
            field_elem_from_bytes::<Fr, Blake2b512>(&[0])
        );
        // Not the plain hash of the bytes
        assert_ne!(alice, field_elem_from_try_and_incr::<Fr, Blake2b512>(b"alice"));
    }
}
