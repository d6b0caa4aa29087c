//! Hex wire format: every scalar, point, proof and ledger object is carried in transactions as the
//! hex string of its compressed canonical bytes.

use alloc::{format, string::String, vec::Vec};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireError {
    InvalidHex(String),
    Malformed(String),
    TrailingBytes(usize),
}

pub fn to_bytes<T: CanonicalSerialize + ?Sized>(item: &T) -> Result<Vec<u8>, WireError> {
    let mut bytes = Vec::with_capacity(item.compressed_size());
    item.serialize_compressed(&mut bytes)
        .map_err(|e| WireError::Malformed(format!("{:?}", e)))?;
    Ok(bytes)
}

/// Decodes and validates `T`, rejecting any bytes left over so that each value has exactly one
/// accepted encoding.
pub fn from_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, WireError> {
    let mut reader = bytes;
    let item = T::deserialize_compressed(&mut reader)
        .map_err(|e| WireError::Malformed(format!("{:?}", e)))?;
    if !reader.is_empty() {
        return Err(WireError::TrailingBytes(reader.len()));
    }
    Ok(item)
}

pub fn to_hex<T: CanonicalSerialize + ?Sized>(item: &T) -> Result<String, WireError> {
    to_bytes(item).map(hex::encode)
}

pub fn decode_hex(encoded: &str) -> Result<Vec<u8>, WireError> {
    hex::decode(encoded).map_err(|e| WireError::InvalidHex(format!("{:?}", e)))
}

pub fn from_hex<T: CanonicalDeserialize>(encoded: &str) -> Result<T, WireError> {
    from_bytes(&decode_hex(encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine};
    use ark_ec::AffineRepr;

    #[test]
    fn rejects_bad_hex_and_trailing_bytes() {
        let g = G1Affine::generator();
        let encoded = to_hex(&g).unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(from_hex::<G1Affine>(&encoded).unwrap(), g);

        assert!(matches!(
            from_hex::<G1Affine>("zz"),
            Err(WireError::InvalidHex(_))
        ));
        assert_eq!(
            from_hex::<G1Affine>(&format!("{}00", encoded)),
            Err(WireError::TrailingBytes(1))
        );
        assert!(matches!(
            from_hex::<Fr>(&encoded[..10]),
            Err(WireError::Malformed(_))
        ));
        assert_eq!(from_hex::<u64>(&to_hex(&7u64).unwrap()).unwrap(), 7);
    }
}
