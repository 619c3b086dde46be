use alloy_primitives::{b256, Bytes};
use serde::{Deserialize, Deserializer, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    typenum::{U1048576, U1073741824, U16, U32, U4096},
    VariableList,
};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{ssz_bytes_wrapper, Address20, Hash32, KzgCommitment, KzgProof};

pub type MaxTransactionsPerPayload = U1048576;
pub type MaxWithdrawalsPerPayload = U16;
pub type MaxBlobCommitmentsPerBlock = U4096;

pub const BYTES_PER_BLOB: usize = 131_072;

/// Root of an empty `List[Withdrawal, 16]`.
pub const EMPTY_WITHDRAWALS_ROOT: Hash32 =
    Hash32(b256!("792930bbd5baac43bcc798ee49aa8185ef76bb3b44ba62b91d86ae569e4bb535"));

ssz_bytes_wrapper! {
    /// VariableList<u8, MAX_EXTRA_DATA_BYTES>
    pub struct ExtraData;
    max  = U32;
}

ssz_bytes_wrapper! {
    /// VariableList<u8, MAX_BYTES_PER_TRANSACTION>
    pub struct Transaction;
    max  = U1073741824;
}

pub type Transactions = VariableList<Transaction, MaxTransactionsPerPayload>;
pub type Withdrawals = VariableList<Withdrawal, MaxWithdrawalsPerPayload>;
pub type KzgCommitments = VariableList<KzgCommitment, MaxBlobCommitmentsPerBlock>;
pub type KzgProofs = VariableList<KzgProof, MaxBlobCommitmentsPerBlock>;
pub type Blobs = VariableList<Blob, MaxBlobCommitmentsPerBlock>;

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct Withdrawal {
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    pub address: Address20,
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
}

pub fn compute_transactions_root(transactions: &Transactions) -> Hash32 {
    Hash32(transactions.tree_hash_root())
}

/// An empty list always maps to [`EMPTY_WITHDRAWALS_ROOT`].
pub fn compute_withdrawals_root(withdrawals: &Withdrawals) -> Hash32 {
    if withdrawals.is_empty() {
        return EMPTY_WITHDRAWALS_ROOT;
    }
    Hash32(withdrawals.tree_hash_root())
}

/// A single EIP-4844 blob, exactly [`BYTES_PER_BLOB`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Blob(Bytes);

impl Blob {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::CodecError> {
        if bytes.len() != BYTES_PER_BLOB {
            return Err(crate::CodecError::LengthMismatch {
                expected: BYTES_PER_BLOB,
                got: bytes.len(),
            });
        }
        Ok(Self(Bytes::copy_from_slice(bytes)))
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Default for Blob {
    fn default() -> Self {
        Self(Bytes::from(vec![0u8; BYTES_PER_BLOB]))
    }
}

impl<'de> Deserialize<'de> for Blob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Bytes::deserialize(deserializer)?;
        Blob::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl ssz::Encode for Blob {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BYTES_PER_BLOB
    }

    fn ssz_bytes_len(&self) -> usize {
        BYTES_PER_BLOB
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_slice());
    }
}

impl ssz::Decode for Blob {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        BYTES_PER_BLOB
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        if bytes.len() != BYTES_PER_BLOB {
            return Err(ssz::DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: BYTES_PER_BLOB,
            });
        }
        Ok(Self(Bytes::copy_from_slice(bytes)))
    }
}

impl TreeHash for Blob {
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
        tree_hash::merkle_root(self.as_slice(), BYTES_PER_BLOB / tree_hash::HASHSIZE)
    }
}
