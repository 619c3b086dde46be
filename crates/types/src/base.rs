//! Fork-agnostic canonical schema.
//!
//! Every struct here holds the union of the fields any supported fork uses. Fields a fork does
//! not carry stay at their zero value, and missing JSON keys default to zero so a Bellatrix
//! object can be written without Capella or Deneb keys.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    consensus::{
        Attestations, AttesterSlashings, BlsToExecutionChanges, Deposits, Eth1Data,
        ProposerSlashings, SyncAggregate, VoluntaryExits,
    },
    deneb::BlobsBundle,
    fields::{ExtraData, KzgCommitments, Transactions, Withdrawals},
    Address20, BlsSignature, Hash32, LogsBloom,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseExecutionPayload {
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
    /// Only carried by the Deneb payload-and-blobs container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blobs_bundle: Option<BlobsBundle>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseExecutionPayloadHeader {
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

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseBeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Hash32,
    pub proposer_slashings: ProposerSlashings,
    pub attester_slashings: AttesterSlashings,
    pub attestations: Attestations,
    pub deposits: Deposits,
    pub voluntary_exits: VoluntaryExits,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: BaseExecutionPayload,
    pub bls_to_execution_changes: BlsToExecutionChanges,
    pub blob_kzg_commitments: KzgCommitments,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseBlindedBeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: Hash32,
    pub proposer_slashings: ProposerSlashings,
    pub attester_slashings: AttesterSlashings,
    pub attestations: Attestations,
    pub deposits: Deposits,
    pub voluntary_exits: VoluntaryExits,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload_header: BaseExecutionPayloadHeader,
    pub bls_to_execution_changes: BlsToExecutionChanges,
    pub blob_kzg_commitments: KzgCommitments,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseBeaconBlock {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash32,
    pub state_root: Hash32,
    pub body: BaseBeaconBlockBody,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseBlindedBeaconBlock {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash32,
    pub state_root: Hash32,
    pub body: BaseBlindedBeaconBlockBody,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSignedBeaconBlock {
    pub message: BaseBeaconBlock,
    pub signature: BlsSignature,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseSignedBlindedBeaconBlock {
    pub message: BaseBlindedBeaconBlock,
    pub signature: BlsSignature,
}
