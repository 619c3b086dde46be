//! Deneb wire shapes. The base fee is a native 256-bit integer from here on.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{
    consensus::{
        Attestations, AttesterSlashings, BlsToExecutionChanges, Deposits, Eth1Data,
        ProposerSlashings, SyncAggregate, VoluntaryExits,
    },
    fields::{Blobs, ExtraData, KzgCommitments, KzgProofs, Transactions, Withdrawals},
    Address20, BlsSignature, Hash32, LogsBloom,
};

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct ExecutionPayload {
    pub parent_hash: Hash32,
    pub fee_recipient: Address20,
    pub state_root: Hash32,
    pub receipts_root: Hash32,
    pub logs_bloom: LogsBloom,
    pub prev_randao: Hash32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub block_number: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_limit: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_used: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub timestamp: u64,
    pub extra_data: ExtraData,
    #[serde(with = "serde_utils::quoted_u256")]
    pub base_fee_per_gas: U256,
    pub block_hash: Hash32,
    pub transactions: Transactions,
    pub withdrawals: Withdrawals,
    #[serde(with = "serde_utils::quoted_u64")]
    pub blob_gas_used: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub excess_blob_gas: u64,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct ExecutionPayloadHeader {
    pub parent_hash: Hash32,
    pub fee_recipient: Address20,
    pub state_root: Hash32,
    pub receipts_root: Hash32,
    pub logs_bloom: LogsBloom,
    pub prev_randao: Hash32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub block_number: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_limit: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub gas_used: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub timestamp: u64,
    pub extra_data: ExtraData,
    #[serde(with = "serde_utils::quoted_u256")]
    pub base_fee_per_gas: U256,
    pub block_hash: Hash32,
    pub transactions_root: Hash32,
    pub withdrawals_root: Hash32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub blob_gas_used: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub excess_blob_gas: u64,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Hash32,
    pub proposer_slashings: ProposerSlashings,
    pub attester_slashings: AttesterSlashings,
    pub attestations: Attestations,
    pub deposits: Deposits,
    pub voluntary_exits: VoluntaryExits,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
    pub bls_to_execution_changes: BlsToExecutionChanges,
    pub blob_kzg_commitments: KzgCommitments,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BlindedBeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Hash32,
    pub proposer_slashings: ProposerSlashings,
    pub attester_slashings: AttesterSlashings,
    pub attestations: Attestations,
    pub deposits: Deposits,
    pub voluntary_exits: VoluntaryExits,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload_header: ExecutionPayloadHeader,
    pub bls_to_execution_changes: BlsToExecutionChanges,
    pub blob_kzg_commitments: KzgCommitments,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BeaconBlock {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash32,
    pub state_root: Hash32,
    pub body: BeaconBlockBody,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BlindedBeaconBlock {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash32,
    pub state_root: Hash32,
    pub body: BlindedBeaconBlockBody,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct SignedBeaconBlock {
    pub message: BeaconBlock,
    pub signature: BlsSignature,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct SignedBlindedBeaconBlock {
    pub message: BlindedBeaconBlock,
    pub signature: BlsSignature,
}

/// Blob sidecar material returned alongside a Deneb payload by the builder API.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct BlobsBundle {
    pub commitments: KzgCommitments,
    pub proofs: KzgProofs,
    pub blobs: Blobs,
}

impl BlobsBundle {
    pub fn is_consistent(&self) -> bool {
        self.commitments.len() == self.proofs.len() && self.proofs.len() == self.blobs.len()
    }
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct ExecutionPayloadAndBlobsBundle {
    pub execution_payload: ExecutionPayload,
    pub blobs_bundle: BlobsBundle,
}
