//! Capella wire shapes: Bellatrix plus withdrawals and BLS-to-execution changes.

use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{
    consensus::{
        Attestations, AttesterSlashings, BlsToExecutionChanges, Deposits, Eth1Data,
        ProposerSlashings, SyncAggregate, VoluntaryExits,
    },
    fields::{ExtraData, Transactions, Withdrawals},
    Address20, BlsSignature, Hash32, LogsBloom, Uint256Le,
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
    pub base_fee_per_gas: Uint256Le,
    pub block_hash: Hash32,
    pub transactions: Transactions,
    pub withdrawals: Withdrawals,
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
    pub base_fee_per_gas: Uint256Le,
    pub block_hash: Hash32,
    pub transactions_root: Hash32,
    pub withdrawals_root: Hash32,
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

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use ssz::Encode;

    use super::*;
    use crate::test_utils::{
        capella_signed_block_json, test_encode_decode_json, test_encode_decode_ssz,
    };

    #[test]
    fn test_signed_block_mainnet() {
        let block = test_encode_decode_json::<SignedBeaconBlock>(capella_signed_block_json());
        let payload = &block.message.body.execution_payload;

        assert_eq!(block.message.slot, 7222896);
        assert_eq!(payload.base_fee_per_gas.to_u256().unwrap(), U256::from(38847930295u64));
        assert_eq!(payload.transactions.len(), 3);
        assert_eq!(payload.withdrawals.len(), 2);
        assert_eq!(payload.withdrawals[1].amount, 15593371);

        let decoded = test_encode_decode_ssz::<SignedBeaconBlock>(&block.as_ssz_bytes());
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_payload_rejects_deneb_fields() {
        let block: SignedBeaconBlock = serde_json::from_str(capella_signed_block_json()).unwrap();
        let mut value = serde_json::to_value(&block.message.body.execution_payload).unwrap();
        value["blob_gas_used"] = "0".into();
        assert!(serde_json::from_value::<ExecutionPayload>(value).is_err());
    }
}
