//! Beacon block operations shared by every fork.

use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    typenum::{U128, U16, U2, U2048, U33, U512},
    BitList, BitVector, FixedVector, VariableList,
};
use tree_hash_derive::TreeHash;

use crate::{Address20, BlsPublicKey, BlsSignature, Hash32};

pub type MaxValidatorsPerCommittee = U2048;
pub type SyncCommitteeSize = U512;

pub type ProposerSlashings = VariableList<ProposerSlashing, U16>;
pub type AttesterSlashings = VariableList<AttesterSlashing, U2>;
pub type Attestations = VariableList<Attestation, U128>;
pub type Deposits = VariableList<Deposit, U16>;
pub type VoluntaryExits = VariableList<SignedVoluntaryExit, U16>;
pub type BlsToExecutionChanges = VariableList<SignedBlsToExecutionChange, U16>;

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct Eth1Data {
    pub deposit_root: Hash32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub deposit_count: u64,
    pub block_hash: Hash32,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct Checkpoint {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    pub root: Hash32,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct AttestationData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    pub beacon_block_root: Hash32,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct Attestation {
    pub aggregation_bits: BitList<MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct IndexedAttestation {
    #[serde(with = "ssz_types::serde_utils::quoted_u64_var_list")]
    pub attesting_indices: VariableList<u64, MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct BeaconBlockHeader {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash32,
    pub state_root: Hash32,
    pub body_root: Hash32,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct DepositData {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: Hash32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct Deposit {
    pub proof: FixedVector<Hash32, U33>,
    pub data: DepositData,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct VoluntaryExit {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(deny_unknown_fields)]
pub struct SyncAggregate {
    pub sync_committee_bits: BitVector<SyncCommitteeSize>,
    pub sync_committee_signature: BlsSignature,
}

impl Default for SyncAggregate {
    fn default() -> Self {
        Self { sync_committee_bits: BitVector::new(), sync_committee_signature: BlsSignature::default() }
    }
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct BlsToExecutionChange {
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    pub from_bls_pubkey: BlsPublicKey,
    pub to_execution_address: Address20,
}

#[derive(
    Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
#[serde(deny_unknown_fields)]
pub struct SignedBlsToExecutionChange {
    pub message: BlsToExecutionChange,
    pub signature: BlsSignature,
}

#[cfg(test)]
mod tests {
    use ssz::{Decode, Encode};

    use super::*;
    use crate::test_utils::test_encode_decode_json;

    #[test]
    fn test_attestation_json() {
        let data = r#"{"aggregation_bits":"0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f","data":{"slot":"7222895","index":"56","beacon_block_root":"0xf1009b1ca7be5f9ff2b47402e47ef876641e8f4e479ff21826476663d018cbed","source":{"epoch":"225714","root":"0xd970dfc62b9e78ed3069ceec0f6b838fb0a752e3e622a9236c3d810983251023"},"target":{"epoch":"225715","root":"0xc10fda82caed2d402c2345fd0ce9fab0da74344d1e8a19fe65c3861aa0a92fba"}},"signature":"0x8886f82260f48f426007fdfe833d11b09e8ececfb6d8fcebf3efeac9f01ba77a452cb0cbc2e314276ec6669ffdc5a1c0136d3b40ef0dc027139d5dbbf9e65277476dde65a7229496c88059da49159973ca21b96537efc0d2356fa077b407fc23"}"#;
        let attestation = test_encode_decode_json::<Attestation>(data);
        assert_eq!(attestation.data.slot, 7222895);
        assert_eq!(attestation.data.target.epoch, 225715);

        let ssz_bytes = attestation.as_ssz_bytes();
        assert_eq!(Attestation::from_ssz_bytes(&ssz_bytes).unwrap(), attestation);
    }

    #[test]
    fn test_indexed_attestation_quoted_indices() {
        let data = r#"{"attesting_indices":["1","2","3"],"data":{"slot":"1","index":"0","beacon_block_root":"0x0000000000000000000000000000000000000000000000000000000000000000","source":{"epoch":"0","root":"0x0000000000000000000000000000000000000000000000000000000000000000"},"target":{"epoch":"0","root":"0x0000000000000000000000000000000000000000000000000000000000000000"}},"signature":"0x000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000"}"#;
        let indexed = test_encode_decode_json::<IndexedAttestation>(data);
        assert_eq!(indexed.attesting_indices.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sync_aggregate_default() {
        let aggregate = SyncAggregate::default();
        assert_eq!(aggregate.sync_committee_bits.num_set_bits(), 0);
        assert_eq!(aggregate.as_ssz_bytes().len(), 64 + 96);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let data = r#"{"epoch":"1","validator_index":"2","extra":"3"}"#;
        assert!(serde_json::from_str::<VoluntaryExit>(data).is_err());
    }
}
