use alloy_primitives::{FixedBytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tree_hash::TreeHash;

use crate::{fixed_bytes_wrapper, CodecError};

fixed_bytes_wrapper! {
    /// 32 byte hash or root.
    pub struct Hash32;
    size = 32;
}

fixed_bytes_wrapper! {
    /// 20 byte execution layer address.
    pub struct Address20;
    size = 20;
}

fixed_bytes_wrapper! {
    pub struct BlsPublicKey;
    size = 48;
}

fixed_bytes_wrapper! {
    pub struct BlsSignature;
    size = 96;
}

fixed_bytes_wrapper! {
    /// Recoverable secp256k1 signature, `r || s || v`.
    pub struct EcdsaSignature;
    size = 65;
}

fixed_bytes_wrapper! {
    pub struct LogsBloom;
    size = 256;
}

fixed_bytes_wrapper! {
    pub struct KzgCommitment;
    size = 48;
}

fixed_bytes_wrapper! {
    pub struct KzgProof;
    size = 48;
}

fixed_bytes_wrapper! {
    /// Four byte fork version as published by the beacon node.
    pub struct Version4;
    size = 4;
}

impl From<Hash32> for tree_hash::Hash256 {
    fn from(value: Hash32) -> Self {
        value.0
    }
}

/// Pre-Deneb wire form of `base_fee_per_gas`: the integer as 32 little-endian bytes.
///
/// JSON carries the decimal value, SSZ and tree hash use the bytes as they are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uint256Le(pub FixedBytes<32>);

impl Uint256Le {
    /// Left-pads the big-endian form to 32 bytes and reverses it.
    pub fn from_u256(value: U256) -> Self {
        let mut bytes = value.to_be_bytes::<32>();
        bytes.reverse();
        Self(FixedBytes(bytes))
    }

    /// Reverses back to big-endian and rebuilds the integer.
    pub fn to_u256(&self) -> Result<U256, CodecError> {
        let mut bytes = self.0 .0;
        bytes.reverse();
        U256::try_from_be_slice(&bytes).ok_or(CodecError::IntegerOverflow)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Serialize for Uint256Le {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.to_u256().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&value.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint256Le {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let value = U256::from_str_radix(&text, 10).map_err(serde::de::Error::custom)?;
        Ok(Self::from_u256(value))
    }
}

impl ssz::Encode for Uint256Le {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn ssz_bytes_len(&self) -> usize {
        32
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.0.as_slice());
    }
}

impl ssz::Decode for Uint256Le {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        if bytes.len() != 32 {
            return Err(ssz::DecodeError::InvalidByteLength { len: bytes.len(), expected: 32 });
        }
        Ok(Self(FixedBytes::from_slice(bytes)))
    }
}

impl TreeHash for Uint256Le {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
        unreachable!("Vector should never be packed.")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Vector should never be packed.")
    }

    fn tree_hash_root(&self) -> tree_hash::Hash256 {
        tree_hash::Hash256::from(self.0 .0)
    }
}

#[cfg(test)]
mod tests {
    use ssz::{Decode, Encode};

    use super::*;

    #[test]
    fn test_from_bytes_exact_length() {
        assert!(Hash32::from_bytes(&[0u8; 32]).is_ok());
        assert!(Address20::from_bytes(&[0u8; 20]).is_ok());
        assert!(BlsPublicKey::from_bytes(&[0u8; 48]).is_ok());
        assert!(EcdsaSignature::from_bytes(&[0u8; 65]).is_ok());
        assert!(BlsSignature::from_bytes(&[0u8; 96]).is_ok());

        assert!(matches!(
            Hash32::from_bytes(&[0u8; 31]),
            Err(CodecError::LengthMismatch { expected: 32, got: 31 })
        ));
        assert!(matches!(
            Address20::from_bytes(&[0u8; 21]),
            Err(CodecError::LengthMismatch { expected: 20, got: 21 })
        ));
        assert!(matches!(
            BlsSignature::from_bytes(&[0u8; 48]),
            Err(CodecError::LengthMismatch { expected: 96, got: 48 })
        ));
    }

    #[test]
    fn test_hex_text() {
        let text = "0x1f9090aae28b8a3dceadf281b0f12828e676c326";
        let address = Address20::from_hex_text(text).unwrap();
        assert_eq!(address.to_hex_text(), text);
        assert_eq!(address.to_string(), text);

        // uppercase input is accepted, output is always lowercase
        let upper = Address20::from_hex_text("0x1F9090AAE28B8A3DCEADF281B0F12828E676C326").unwrap();
        assert_eq!(upper, address);

        assert!(matches!(
            Address20::from_hex_text("1f9090aae28b8a3dceadf281b0f12828e676c326"),
            Err(CodecError::Hex(_))
        ));
        assert!(matches!(Address20::from_hex_text("0x1f90"), Err(CodecError::LengthMismatch { .. })));
        assert!(matches!(Hash32::from_hex_text("0xzz"), Err(CodecError::Hex(_))));
    }

    #[test]
    fn test_json_hex() {
        let sig = EcdsaSignature::from([7u8; 65]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "07".repeat(65)));
        let decoded: EcdsaSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, sig);

        let short = format!("\"0x{}\"", "07".repeat(64));
        assert!(serde_json::from_str::<EcdsaSignature>(&short).is_err());
    }

    #[test]
    fn test_ssz_fixed_length() {
        let pubkey = BlsPublicKey::from([3u8; 48]);
        let bytes = pubkey.as_ssz_bytes();
        assert_eq!(bytes.len(), 48);
        assert_eq!(BlsPublicKey::from_ssz_bytes(&bytes).unwrap(), pubkey);
        assert!(BlsPublicKey::from_ssz_bytes(&bytes[..47]).is_err());
    }

    #[test]
    fn test_tree_hash_matches_b256() {
        let hash = Hash32::from([9u8; 32]);
        assert_eq!(hash.tree_hash_root(), hash.0);

        // a 20 byte vector fits in a single right-padded chunk
        let address = Address20::from([0xab; 20]);
        let mut chunk = [0u8; 32];
        chunk[..20].copy_from_slice(&[0xab; 20]);
        assert_eq!(address.tree_hash_root(), tree_hash::Hash256::from(chunk));
    }

    #[test]
    fn test_base_fee_known_bytes() {
        let le = Uint256Le::from_u256(U256::from(1_000_000_000u64));
        let mut expected = [0u8; 32];
        expected[..4].copy_from_slice(&[0x00, 0xca, 0x9a, 0x3b]);
        assert_eq!(le.as_slice(), &expected);
        assert_eq!(le.to_u256().unwrap(), U256::from(1_000_000_000u64));
    }

    #[test]
    fn test_base_fee_extremes() {
        let max = (U256::from(1u64) << 255) - U256::from(1u64);
        for value in [U256::ZERO, max, U256::MAX] {
            let le = Uint256Le::from_u256(value);
            assert_eq!(le.to_u256().unwrap(), value);
            let decoded = Uint256Le::from_ssz_bytes(&le.as_ssz_bytes()).unwrap();
            assert_eq!(decoded.to_u256().unwrap(), value);
        }

        assert_eq!(Uint256Le::from_u256(U256::ZERO).as_slice(), &[0u8; 32]);
        let max_le = Uint256Le::from_u256(max);
        assert_eq!(max_le.as_slice()[31], 0x7f);
        assert!(max_le.as_slice()[..31].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_base_fee_json_decimal() {
        let le: Uint256Le = serde_json::from_str(r#""38847930295""#).unwrap();
        assert_eq!(le.to_u256().unwrap(), U256::from(38847930295u64));
        assert_eq!(serde_json::to_string(&le).unwrap(), r#""38847930295""#);
        assert!(serde_json::from_str::<Uint256Le>(r#""0x10""#).is_err());
    }

    #[test]
    fn test_base_fee_le_tree_hash_matches_u256() {
        let value = U256::from(123_456_789u64);
        assert_eq!(Uint256Le::from_u256(value).tree_hash_root(), value.tree_hash_root());
    }
}
