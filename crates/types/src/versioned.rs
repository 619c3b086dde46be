use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz::Encode;
use tracing::{debug, trace};
use tree_hash::TreeHash;

use crate::{bellatrix, capella, deneb, CodecError, ForkVersion, Hash32};

/// Decoding with the fork known up front.
pub trait ForkVersionDecode: Sized {
    fn from_json_value_by_fork(
        value: serde_json::Value,
        fork: ForkVersion,
    ) -> Result<Self, CodecError>;

    fn from_ssz_bytes_by_fork(bytes: &[u8], fork: ForkVersion) -> Result<Self, CodecError>;

    fn fork(&self) -> ForkVersion;
}

/// Tries every fork from newest to oldest. If none decodes, all three reasons are returned.
pub fn probe_forks<T>(
    kind: &'static str,
    mut attempt: impl FnMut(ForkVersion) -> Result<T, CodecError>,
) -> Result<T, CodecError> {
    let mut reason = |fork: ForkVersion| match attempt(fork) {
        Ok(decoded) => {
            debug!(kind, %fork, "decoded without explicit fork");
            Ok(decoded)
        }
        Err(err) => {
            trace!(kind, %fork, %err, "fork did not match");
            Err(err.to_string())
        }
    };

    let deneb = match reason(ForkVersion::Deneb) {
        Ok(decoded) => return Ok(decoded),
        Err(err) => err,
    };
    let capella = match reason(ForkVersion::Capella) {
        Ok(decoded) => return Ok(decoded),
        Err(err) => err,
    };
    let bellatrix = match reason(ForkVersion::Bellatrix) {
        Ok(decoded) => return Ok(decoded),
        Err(err) => err,
    };

    Err(CodecError::DecodeExhausted { deneb, capella, bellatrix })
}

macro_rules! versioned_container {
    (
        $(#[$attr:meta])*
        pub enum $Name:ident {
            Bellatrix($B:ty),
            Capella($C:ty),
            Deneb($D:ty),
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum $Name {
            Bellatrix($B),
            Capella($C),
            Deneb($D),
        }

        impl $Name {
            pub fn fork(&self) -> ForkVersion {
                match self {
                    Self::Bellatrix(_) => ForkVersion::Bellatrix,
                    Self::Capella(_) => ForkVersion::Capella,
                    Self::Deneb(_) => ForkVersion::Deneb,
                }
            }

            pub fn version_name(&self) -> &'static str {
                self.fork().version_name()
            }

            pub fn version_number(&self) -> u64 {
                self.fork().version_number()
            }

            pub fn to_json(&self) -> Result<String, CodecError> {
                Ok(serde_json::to_string(self)?)
            }

            pub fn as_ssz_bytes(&self) -> Vec<u8> {
                match self {
                    Self::Bellatrix(inner) => inner.as_ssz_bytes(),
                    Self::Capella(inner) => inner.as_ssz_bytes(),
                    Self::Deneb(inner) => inner.as_ssz_bytes(),
                }
            }

            pub fn ssz_bytes_len(&self) -> usize {
                match self {
                    Self::Bellatrix(inner) => inner.ssz_bytes_len(),
                    Self::Capella(inner) => inner.ssz_bytes_len(),
                    Self::Deneb(inner) => inner.ssz_bytes_len(),
                }
            }

            pub fn hash_tree_root(&self) -> Hash32 {
                Hash32(self.tree_hash_root())
            }

            pub fn from_json_by_fork(json: &str, fork: ForkVersion) -> Result<Self, CodecError> {
                Ok(match fork {
                    ForkVersion::Bellatrix => Self::Bellatrix(serde_json::from_str(json)?),
                    ForkVersion::Capella => Self::Capella(serde_json::from_str(json)?),
                    ForkVersion::Deneb => Self::Deneb(serde_json::from_str(json)?),
                })
            }

            pub fn from_json_any(json: &str) -> Result<Self, CodecError> {
                let value: serde_json::Value = serde_json::from_str(json)?;
                Self::from_json_value_any(value)
            }

            pub fn from_json_value_any(value: serde_json::Value) -> Result<Self, CodecError> {
                probe_forks(stringify!($Name), |fork| {
                    Self::from_json_value_by_fork(value.clone(), fork)
                })
            }

            pub fn from_ssz_bytes_any(bytes: &[u8]) -> Result<Self, CodecError> {
                probe_forks(stringify!($Name), |fork| Self::from_ssz_bytes_by_fork(bytes, fork))
            }

            pub fn from_json_value_by_fork(
                value: serde_json::Value,
                fork: ForkVersion,
            ) -> Result<Self, CodecError> {
                Ok(match fork {
                    ForkVersion::Bellatrix => Self::Bellatrix(serde_json::from_value(value)?),
                    ForkVersion::Capella => Self::Capella(serde_json::from_value(value)?),
                    ForkVersion::Deneb => Self::Deneb(serde_json::from_value(value)?),
                })
            }

            pub fn from_ssz_bytes_by_fork(
                bytes: &[u8],
                fork: ForkVersion,
            ) -> Result<Self, CodecError> {
                Ok(match fork {
                    ForkVersion::Bellatrix => {
                        Self::Bellatrix(<$B as ssz::Decode>::from_ssz_bytes(bytes)?)
                    }
                    ForkVersion::Capella => Self::Capella(<$C as ssz::Decode>::from_ssz_bytes(bytes)?),
                    ForkVersion::Deneb => Self::Deneb(<$D as ssz::Decode>::from_ssz_bytes(bytes)?),
                })
            }

            /// YAML goes through the JSON representation, so quoted integers stay quoted.
            pub fn to_yaml(&self) -> Result<String, CodecError> {
                let value = serde_json::to_value(self)?;
                Ok(serde_yaml::to_string(&value)?)
            }

            pub fn from_yaml_by_fork(yaml: &str, fork: ForkVersion) -> Result<Self, CodecError> {
                let value: serde_json::Value = serde_yaml::from_str(yaml)?;
                Self::from_json_value_by_fork(value, fork)
            }

            pub fn from_yaml_any(yaml: &str) -> Result<Self, CodecError> {
                let value: serde_json::Value = serde_yaml::from_str(yaml)?;
                Self::from_json_value_any(value)
            }
        }

        impl fmt::Display for $Name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let json = self.to_json().map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }

        impl ForkVersionDecode for $Name {
            fn from_json_value_by_fork(
                value: serde_json::Value,
                fork: ForkVersion,
            ) -> Result<Self, CodecError> {
                $Name::from_json_value_by_fork(value, fork)
            }

            fn from_ssz_bytes_by_fork(bytes: &[u8], fork: ForkVersion) -> Result<Self, CodecError> {
                $Name::from_ssz_bytes_by_fork(bytes, fork)
            }

            fn fork(&self) -> ForkVersion {
                $Name::fork(self)
            }
        }

        impl<'de> Deserialize<'de> for $Name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = serde_json::Value::deserialize(deserializer)?;
                Self::from_json_value_any(value).map_err(serde::de::Error::custom)
            }
        }

        impl ssz::Encode for $Name {
            fn is_ssz_fixed_len() -> bool {
                false
            }

            fn ssz_bytes_len(&self) -> usize {
                $Name::ssz_bytes_len(self)
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                match self {
                    Self::Bellatrix(inner) => inner.ssz_append(buf),
                    Self::Capella(inner) => inner.ssz_append(buf),
                    Self::Deneb(inner) => inner.ssz_append(buf),
                }
            }
        }

        impl TreeHash for $Name {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                tree_hash::TreeHashType::Container
            }

            fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
                unreachable!("Container should never be packed.")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("Container should never be packed.")
            }

            fn tree_hash_root(&self) -> tree_hash::Hash256 {
                match self {
                    Self::Bellatrix(inner) => inner.tree_hash_root(),
                    Self::Capella(inner) => inner.tree_hash_root(),
                    Self::Deneb(inner) => inner.tree_hash_root(),
                }
            }
        }

        impl From<$B> for $Name {
            fn from(inner: $B) -> Self {
                Self::Bellatrix(inner)
            }
        }

        impl From<$C> for $Name {
            fn from(inner: $C) -> Self {
                Self::Capella(inner)
            }
        }

        impl From<$D> for $Name {
            fn from(inner: $D) -> Self {
                Self::Deneb(inner)
            }
        }
    };
}

versioned_container! {
    pub enum VersionedExecutionPayload {
        Bellatrix(bellatrix::ExecutionPayload),
        Capella(capella::ExecutionPayload),
        Deneb(deneb::ExecutionPayload),
    }
}

versioned_container! {
    /// Payload as returned by the builder API, where Deneb also carries the blobs bundle.
    pub enum VersionedExecutionPayloadV2 {
        Bellatrix(bellatrix::ExecutionPayload),
        Capella(capella::ExecutionPayload),
        Deneb(deneb::ExecutionPayloadAndBlobsBundle),
    }
}

versioned_container! {
    pub enum VersionedExecutionPayloadHeader {
        Bellatrix(bellatrix::ExecutionPayloadHeader),
        Capella(capella::ExecutionPayloadHeader),
        Deneb(deneb::ExecutionPayloadHeader),
    }
}

versioned_container! {
    pub enum VersionedBeaconBlock {
        Bellatrix(bellatrix::BeaconBlock),
        Capella(capella::BeaconBlock),
        Deneb(deneb::BeaconBlock),
    }
}

versioned_container! {
    pub enum VersionedBlindedBeaconBlock {
        Bellatrix(bellatrix::BlindedBeaconBlock),
        Capella(capella::BlindedBeaconBlock),
        Deneb(deneb::BlindedBeaconBlock),
    }
}

versioned_container! {
    pub enum VersionedSignedBeaconBlock {
        Bellatrix(bellatrix::SignedBeaconBlock),
        Capella(capella::SignedBeaconBlock),
        Deneb(deneb::SignedBeaconBlock),
    }
}

versioned_container! {
    pub enum VersionedSignedBlindedBeaconBlock {
        Bellatrix(bellatrix::SignedBlindedBeaconBlock),
        Capella(capella::SignedBlindedBeaconBlock),
        Deneb(deneb::SignedBlindedBeaconBlock),
    }
}

impl VersionedExecutionPayload {
    pub fn block_hash(&self) -> Hash32 {
        match self {
            Self::Bellatrix(payload) => payload.block_hash,
            Self::Capella(payload) => payload.block_hash,
            Self::Deneb(payload) => payload.block_hash,
        }
    }

    pub fn block_number(&self) -> u64 {
        match self {
            Self::Bellatrix(payload) => payload.block_number,
            Self::Capella(payload) => payload.block_number,
            Self::Deneb(payload) => payload.block_number,
        }
    }
}

impl VersionedExecutionPayloadHeader {
    pub fn block_hash(&self) -> Hash32 {
        match self {
            Self::Bellatrix(header) => header.block_hash,
            Self::Capella(header) => header.block_hash,
            Self::Deneb(header) => header.block_hash,
        }
    }
}

impl VersionedExecutionPayloadV2 {
    /// Drops the blobs bundle, if any.
    pub fn into_payload(self) -> VersionedExecutionPayload {
        match self {
            Self::Bellatrix(payload) => VersionedExecutionPayload::Bellatrix(payload),
            Self::Capella(payload) => VersionedExecutionPayload::Capella(payload),
            Self::Deneb(contents) => VersionedExecutionPayload::Deneb(contents.execution_payload),
        }
    }
}

impl VersionedBeaconBlock {
    pub fn slot(&self) -> u64 {
        match self {
            Self::Bellatrix(block) => block.slot,
            Self::Capella(block) => block.slot,
            Self::Deneb(block) => block.slot,
        }
    }
}

impl VersionedSignedBeaconBlock {
    pub fn slot(&self) -> u64 {
        match self {
            Self::Bellatrix(block) => block.message.slot,
            Self::Capella(block) => block.message.slot,
            Self::Deneb(block) => block.message.slot,
        }
    }

    pub fn block_hash(&self) -> Hash32 {
        match self {
            Self::Bellatrix(block) => block.message.body.execution_payload.block_hash,
            Self::Capella(block) => block.message.body.execution_payload.block_hash,
            Self::Deneb(block) => block.message.body.execution_payload.block_hash,
        }
    }
}

impl VersionedSignedBlindedBeaconBlock {
    pub fn slot(&self) -> u64 {
        match self {
            Self::Bellatrix(block) => block.message.slot,
            Self::Capella(block) => block.message.slot,
            Self::Deneb(block) => block.message.slot,
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl RawEnvelope {
    fn decode<T: ForkVersionDecode>(self, fork: ForkVersion) -> Result<T, CodecError> {
        match self.data {
            None | Some(serde_json::Value::Null) => Err(CodecError::NoVariantPopulated),
            Some(value) => T::from_json_value_by_fork(value, fork),
        }
    }
}

/// `{"version": "<number>", "data": ...}`. The data is decoded with the stated fork.
#[derive(Debug, Clone, PartialEq)]
pub struct WithVersionNumber<T> {
    pub data: T,
}

impl<T: ForkVersionDecode> WithVersionNumber<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn version(&self) -> ForkVersion {
        self.data.fork()
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let raw: RawEnvelope = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnvelope) -> Result<Self, CodecError> {
        let number = raw
            .version
            .parse::<u64>()
            .map_err(|_| CodecError::UnsupportedForkVersion(raw.version.clone()))?;
        let fork = ForkVersion::try_from(number)?;
        Ok(Self { data: raw.decode(fork)? })
    }
}

impl<T: ForkVersionDecode + Serialize> Serialize for WithVersionNumber<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            version: String,
            data: &'a T,
        }

        Envelope { version: self.version().version_number().to_string(), data: &self.data }
            .serialize(serializer)
    }
}

impl<'de, T: ForkVersionDecode> Deserialize<'de> for WithVersionNumber<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

/// `{"version": "<name>", "data": ...}`, the shape of beacon-node v2 responses.
#[derive(Debug, Clone, PartialEq)]
pub struct WithVersionName<T> {
    pub data: T,
}

impl<T: ForkVersionDecode> WithVersionName<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn version(&self) -> ForkVersion {
        self.data.fork()
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let raw: RawEnvelope = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnvelope) -> Result<Self, CodecError> {
        let fork = ForkVersion::deserialize(serde_json::Value::String(raw.version.clone()))
            .map_err(|_| CodecError::UnsupportedForkVersion(raw.version.clone()))?;
        Ok(Self { data: raw.decode(fork)? })
    }
}

impl<T: ForkVersionDecode + Serialize> Serialize for WithVersionName<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Envelope<'a, T> {
            version: ForkVersion,
            data: &'a T,
        }

        Envelope { version: self.version(), data: &self.data }.serialize(serializer)
    }
}

impl<'de, T: ForkVersionDecode> Deserialize<'de> for WithVersionName<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}
