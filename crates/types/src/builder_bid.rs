//! Bid a relay hands to the proposer: value, builder key and the header it commits to.
//!
//! Binary layout, all integers little-endian:
//!
//! | bytes          | content                        |
//! |----------------|--------------------------------|
//! | `[0, 32)`      | value                          |
//! | `[32, 80)`     | builder public key             |
//! | `[80, 84)`     | offset of the header (u32)     |
//! | `[offset, ..)` | header SSZ, empty when absent  |

use alloy_primitives::{FixedBytes, U256};
use serde::{Deserialize, Deserializer, Serialize};
use ssz::Encode;
use tracing::trace;
use tree_hash::TreeHash;

use crate::{
    utils::merkleize_leaves, BlsPublicKey, BlsSignature, CodecError, ForkVersion, Hash32,
    Uint256Le, VersionedExecutionPayloadHeader,
};

const VALUE_END: usize = 32;
const PUBKEY_END: usize = VALUE_END + BlsPublicKey::SIZE;
const OFFSET_SIZE: usize = 4;

/// The header is optional in the binary form only. JSON without a header is rejected.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BuilderBid {
    pub pubkey: BlsPublicKey,
    #[serde(with = "serde_utils::quoted_u256")]
    pub value: U256,
    pub header: Option<VersionedExecutionPayloadHeader>,
}

#[derive(Deserialize)]
struct BuilderBidJson {
    pubkey: BlsPublicKey,
    #[serde(with = "serde_utils::quoted_u256")]
    value: U256,
    #[serde(default)]
    header: Option<VersionedExecutionPayloadHeader>,
}

impl TryFrom<BuilderBidJson> for BuilderBid {
    type Error = CodecError;

    fn try_from(raw: BuilderBidJson) -> Result<Self, Self::Error> {
        let header = raw.header.ok_or(CodecError::NoVariantPopulated)?;
        Ok(Self { pubkey: raw.pubkey, value: raw.value, header: Some(header) })
    }
}

impl<'de> Deserialize<'de> for BuilderBid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BuilderBidJson::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl BuilderBid {
    /// Size of the fixed part, including the header offset.
    pub const FIXED_SIZE: usize = PUBKEY_END + OFFSET_SIZE;

    pub fn from_ssz_bytes_by_fork(bytes: &[u8], fork: ForkVersion) -> Result<Self, CodecError> {
        let (pubkey, value, tail) = split_fixed(bytes)?;
        let header = if tail.is_empty() {
            None
        } else {
            Some(VersionedExecutionPayloadHeader::from_ssz_bytes_by_fork(tail, fork)?)
        };
        Ok(Self { pubkey, value, header })
    }

    /// Decodes the header by trying each fork, newest first.
    pub fn from_ssz_bytes_any(bytes: &[u8]) -> Result<Self, CodecError> {
        let (pubkey, value, tail) = split_fixed(bytes)?;
        let header = if tail.is_empty() {
            None
        } else {
            Some(VersionedExecutionPayloadHeader::from_ssz_bytes_any(tail)?)
        };
        Ok(Self { pubkey, value, header })
    }

    /// Merkleizes `[pubkey, value, header]`. The value leaf is its little-endian encoding.
    pub fn hash_tree_root(&self) -> Result<Hash32, CodecError> {
        let header = self.header.as_ref().ok_or(CodecError::NoVariantPopulated)?;
        let leaves = [
            self.pubkey.tree_hash_root(),
            Uint256Le::from_u256(self.value).tree_hash_root(),
            header.tree_hash_root(),
        ];
        Ok(Hash32(merkleize_leaves(&leaves)))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let raw: BuilderBidJson = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

fn split_fixed(bytes: &[u8]) -> Result<(BlsPublicKey, U256, &[u8]), CodecError> {
    if bytes.len() < BuilderBid::FIXED_SIZE {
        return Err(CodecError::MalformedLayout(format!(
            "bid is {} bytes, fixed part alone is {}",
            bytes.len(),
            BuilderBid::FIXED_SIZE
        )));
    }

    let value = Uint256Le(FixedBytes::from_slice(&bytes[..VALUE_END])).to_u256()?;
    let pubkey = BlsPublicKey::from_bytes(&bytes[VALUE_END..PUBKEY_END])?;

    let mut raw_offset = [0u8; OFFSET_SIZE];
    raw_offset.copy_from_slice(&bytes[PUBKEY_END..BuilderBid::FIXED_SIZE]);
    let offset = u32::from_le_bytes(raw_offset) as usize;

    if offset < BuilderBid::FIXED_SIZE || offset > bytes.len() {
        return Err(CodecError::MalformedLayout(format!(
            "header offset {offset} outside [{}, {}]",
            BuilderBid::FIXED_SIZE,
            bytes.len()
        )));
    }

    trace!(offset, header_len = bytes.len() - offset, "split builder bid");
    Ok((pubkey, value, &bytes[offset..]))
}

impl ssz::Encode for BuilderBid {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        Self::FIXED_SIZE + self.header.as_ref().map_or(0, |header| header.ssz_bytes_len())
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(Uint256Le::from_u256(self.value).as_slice());
        buf.extend_from_slice(self.pubkey.as_slice());
        buf.extend_from_slice(&(Self::FIXED_SIZE as u32).to_le_bytes());
        if let Some(header) = &self.header {
            header.ssz_append(buf);
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBuilderBid {
    pub message: BuilderBid,
    pub signature: BlsSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base::BaseExecutionPayloadHeader, blinded::Blind,
        construct::construct_execution_payload_header, test_utils::random_base_payload,
    };

    fn capella_header(seed: u64) -> VersionedExecutionPayloadHeader {
        let base: BaseExecutionPayloadHeader =
            random_base_payload(seed, ForkVersion::Capella).to_blinded();
        construct_execution_payload_header(ForkVersion::Capella, &base).unwrap()
    }

    fn bid(seed: u64) -> BuilderBid {
        BuilderBid {
            pubkey: BlsPublicKey::from([7u8; 48]),
            value: U256::from(1_000_000_000u64),
            header: Some(capella_header(seed)),
        }
    }

    #[test]
    fn test_fixed_size() {
        assert_eq!(BuilderBid::FIXED_SIZE, 84);
    }

    #[test]
    fn test_layout() {
        let bid = bid(80);
        let header_bytes = bid.header.as_ref().unwrap().as_ssz_bytes();
        let bytes = bid.as_ssz_bytes();

        assert_eq!(bytes.len(), 84 + header_bytes.len());
        assert_eq!(bytes.len(), bid.ssz_bytes_len());
        assert_eq!(&bytes[..4], &[0x00, 0xca, 0x9a, 0x3b]);
        assert!(bytes[4..32].iter().all(|b| *b == 0));
        assert_eq!(&bytes[32..80], &[7u8; 48]);
        assert_eq!(&bytes[80..84], &84u32.to_le_bytes());
        assert_eq!(&bytes[84..], header_bytes.as_slice());
    }

    #[test]
    fn test_decode() {
        let bid = bid(81);
        let bytes = bid.as_ssz_bytes();

        let by_fork = BuilderBid::from_ssz_bytes_by_fork(&bytes, ForkVersion::Capella).unwrap();
        assert_eq!(by_fork, bid);

        let probed = BuilderBid::from_ssz_bytes_any(&bytes).unwrap();
        assert_eq!(probed, bid);
        assert_eq!(probed.header.unwrap().fork(), ForkVersion::Capella);

        assert!(BuilderBid::from_ssz_bytes_by_fork(&bytes, ForkVersion::Deneb).is_err());
    }

    #[test]
    fn test_without_header() {
        let bid = BuilderBid { header: None, ..bid(82) };
        let bytes = bid.as_ssz_bytes();
        assert_eq!(bytes.len(), BuilderBid::FIXED_SIZE);

        let decoded = BuilderBid::from_ssz_bytes_any(&bytes).unwrap();
        assert!(decoded.header.is_none());
        assert_eq!(decoded.value, bid.value);
        assert_eq!(decoded.as_ssz_bytes(), bytes);
        assert!(matches!(decoded.hash_tree_root(), Err(CodecError::NoVariantPopulated)));
    }

    #[test]
    fn test_malformed_layouts() {
        let bytes = bid(83).as_ssz_bytes();

        let short = &bytes[..83];
        assert!(matches!(
            BuilderBid::from_ssz_bytes_any(short),
            Err(CodecError::MalformedLayout(_))
        ));

        let mut low_offset = bytes.clone();
        low_offset[80..84].copy_from_slice(&83u32.to_le_bytes());
        assert!(matches!(
            BuilderBid::from_ssz_bytes_by_fork(&low_offset, ForkVersion::Capella),
            Err(CodecError::MalformedLayout(_))
        ));

        let mut past_end = bytes.clone();
        past_end[80..84].copy_from_slice(&(bytes.len() as u32 + 1).to_le_bytes());
        assert!(matches!(
            BuilderBid::from_ssz_bytes_by_fork(&past_end, ForkVersion::Capella),
            Err(CodecError::MalformedLayout(_))
        ));

        // offset equal to the length is an empty header
        let mut at_end = bytes.clone();
        at_end[80..84].copy_from_slice(&(bytes.len() as u32).to_le_bytes());
        let decoded = BuilderBid::from_ssz_bytes_by_fork(&at_end, ForkVersion::Capella).unwrap();
        assert!(decoded.header.is_none());
    }

    #[test]
    fn test_hash_tree_root_leaf_order() {
        let bid = bid(84);
        let header_root = bid.header.as_ref().unwrap().tree_hash_root();
        let expected = merkleize_leaves(&[
            bid.pubkey.tree_hash_root(),
            bid.value.tree_hash_root(),
            header_root,
        ]);
        assert_eq!(bid.hash_tree_root().unwrap(), Hash32(expected));

        let swapped = merkleize_leaves(&[
            bid.value.tree_hash_root(),
            bid.pubkey.tree_hash_root(),
            header_root,
        ]);
        assert_ne!(bid.hash_tree_root().unwrap(), Hash32(swapped));
    }

    #[test]
    fn test_json() {
        let bid = bid(85);
        let value = serde_json::to_value(&bid).unwrap();
        assert_eq!(value["value"], "1000000000");
        assert!(value["pubkey"].as_str().unwrap().starts_with("0x0707"));
        assert!(value["header"]["withdrawals_root"].is_string());

        let decoded: BuilderBid = serde_json::from_str(&bid.to_json().unwrap()).unwrap();
        assert_eq!(decoded, bid);

        assert_eq!(BuilderBid::from_json(&bid.to_json().unwrap()).unwrap(), bid);

        let signed = SignedBuilderBid { message: bid, signature: BlsSignature::default() };
        let json = serde_json::to_string(&signed).unwrap();
        assert_eq!(serde_json::from_str::<SignedBuilderBid>(&json).unwrap(), signed);
    }

    #[test]
    fn test_json_requires_header() {
        let headerless = BuilderBid { header: None, ..bid(86) };
        let json = headerless.to_json().unwrap();
        assert!(matches!(BuilderBid::from_json(&json), Err(CodecError::NoVariantPopulated)));
        assert!(serde_json::from_str::<BuilderBid>(&json).is_err());

        let pubkey = BlsPublicKey::from([7u8; 48]);
        let missing = format!(r#"{{"pubkey":"{pubkey}","value":"1"}}"#);
        assert!(matches!(BuilderBid::from_json(&missing), Err(CodecError::NoVariantPopulated)));

        let signature = BlsSignature::default();
        let signed = format!(r#"{{"message":{missing},"signature":"{signature}"}}"#);
        assert!(serde_json::from_str::<SignedBuilderBid>(&signed).is_err());
    }
}
