//! Full bid a builder submits to the relay, including payout and RPBS material.

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};
use tree_hash::TreeHash;

use crate::{
    utils::{bytes_leaf, merkleize_leaves, u64_leaf},
    Address20, BlsPublicKey, BlsSignature, CodecError, EcdsaSignature, Hash32, Uint256Le,
    VersionedExecutionPayloadHeader,
};

/// Encoded randomizable proxy blind signature, each component as text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedRpbsSignature {
    pub z1_hat: String,
    pub c1_hat: String,
    pub s1_hat: String,
    pub c2_hat: String,
    pub s2_hat: String,
    pub m1_hat: String,
}

impl EncodedRpbsSignature {
    pub fn hash_tree_root(&self) -> Hash32 {
        let leaves = [
            bytes_leaf(self.z1_hat.as_bytes()),
            bytes_leaf(self.c1_hat.as_bytes()),
            bytes_leaf(self.s1_hat.as_bytes()),
            bytes_leaf(self.c2_hat.as_bytes()),
            bytes_leaf(self.s2_hat.as_bytes()),
            bytes_leaf(self.m1_hat.as_bytes()),
        ];
        Hash32(merkleize_leaves(&leaves))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidPayload {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    pub parent_hash: Hash32,
    pub block_hash: Hash32,
    pub builder_pubkey: BlsPublicKey,
    pub proposer_pubkey: BlsPublicKey,
    pub proposer_fee_recipient: Address20,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_limit: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_used: u64,
    #[serde(with = "crate::serde_ext::u256_number")]
    pub value: U256,
    pub execution_payload_header: Option<VersionedExecutionPayloadHeader>,
    pub endpoint: String,
    pub builder_wallet_address: Address20,
    #[serde(with = "crate::serde_ext::base64_bytes")]
    pub payout_pool_transaction: Bytes,
    pub rpbs: EncodedRpbsSignature,
    pub rpbs_pubkey: String,
}

impl BidPayload {
    /// Merkleizes the fields in declaration order. Byte fields longer than a chunk are
    /// merkleized over their chunks without a length mixin.
    pub fn hash_tree_root(&self) -> Result<Hash32, CodecError> {
        let header =
            self.execution_payload_header.as_ref().ok_or(CodecError::NoVariantPopulated)?;

        let leaves = [
            u64_leaf(self.slot),
            bytes_leaf(self.parent_hash.as_slice()),
            bytes_leaf(self.block_hash.as_slice()),
            bytes_leaf(self.builder_pubkey.as_slice()),
            bytes_leaf(self.proposer_pubkey.as_slice()),
            bytes_leaf(self.proposer_fee_recipient.as_slice()),
            u64_leaf(self.gas_limit),
            u64_leaf(self.gas_used),
            Uint256Le::from_u256(self.value).tree_hash_root(),
            header.tree_hash_root(),
            bytes_leaf(self.endpoint.as_bytes()),
            bytes_leaf(self.builder_wallet_address.as_slice()),
            bytes_leaf(&self.payout_pool_transaction),
            self.rpbs.hash_tree_root().into(),
            bytes_leaf(self.rpbs_pubkey.as_bytes()),
        ];
        Ok(Hash32(merkleize_leaves(&leaves)))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderBlockBid {
    pub signature: BlsSignature,
    pub message: BidPayload,
    pub ecdsa_signature: EcdsaSignature,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBuilderBlockBid {
    pub message: BuilderBlockBid,
    pub signature: BlsSignature,
}
