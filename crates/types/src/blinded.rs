//! Full ↔ blinded conversions.
//!
//! Blinding replaces the transaction and withdrawal lists with their hash tree roots, so the
//! blinded object has the same root as the full one. Unblinding cannot recover the lists and
//! yields empty ones.

use crate::{
    base::{
        BaseBeaconBlock, BaseBeaconBlockBody, BaseBlindedBeaconBlock, BaseBlindedBeaconBlockBody,
        BaseExecutionPayload, BaseExecutionPayloadHeader, BaseSignedBeaconBlock,
        BaseSignedBlindedBeaconBlock,
    },
    bellatrix, capella, deneb,
    fields::{compute_transactions_root, compute_withdrawals_root},
    VersionedBeaconBlock, VersionedBlindedBeaconBlock, VersionedExecutionPayload,
    VersionedExecutionPayloadHeader, VersionedSignedBeaconBlock,
    VersionedSignedBlindedBeaconBlock,
};

pub trait Blind {
    type Blinded;

    fn to_blinded(&self) -> Self::Blinded;
}

pub trait Unblind {
    type Full;

    /// Transactions and withdrawals come back empty.
    fn to_full(&self) -> Self::Full;
}

impl Blind for bellatrix::ExecutionPayload {
    type Blinded = bellatrix::ExecutionPayloadHeader;

    fn to_blinded(&self) -> Self::Blinded {
        bellatrix::ExecutionPayloadHeader {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: compute_transactions_root(&self.transactions),
        }
    }
}

impl Unblind for bellatrix::ExecutionPayloadHeader {
    type Full = bellatrix::ExecutionPayload;

    fn to_full(&self) -> Self::Full {
        bellatrix::ExecutionPayload {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions: Default::default(),
        }
    }
}

impl Blind for capella::ExecutionPayload {
    type Blinded = capella::ExecutionPayloadHeader;

    fn to_blinded(&self) -> Self::Blinded {
        capella::ExecutionPayloadHeader {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: compute_transactions_root(&self.transactions),
            withdrawals_root: compute_withdrawals_root(&self.withdrawals),
        }
    }
}

impl Unblind for capella::ExecutionPayloadHeader {
    type Full = capella::ExecutionPayload;

    fn to_full(&self) -> Self::Full {
        capella::ExecutionPayload {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions: Default::default(),
            withdrawals: Default::default(),
        }
    }
}

impl Blind for deneb::ExecutionPayload {
    type Blinded = deneb::ExecutionPayloadHeader;

    fn to_blinded(&self) -> Self::Blinded {
        deneb::ExecutionPayloadHeader {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: compute_transactions_root(&self.transactions),
            withdrawals_root: compute_withdrawals_root(&self.withdrawals),
            blob_gas_used: self.blob_gas_used,
            excess_blob_gas: self.excess_blob_gas,
        }
    }
}

impl Unblind for deneb::ExecutionPayloadHeader {
    type Full = deneb::ExecutionPayload;

    fn to_full(&self) -> Self::Full {
        deneb::ExecutionPayload {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions: Default::default(),
            withdrawals: Default::default(),
            blob_gas_used: self.blob_gas_used,
            excess_blob_gas: self.excess_blob_gas,
        }
    }
}

impl Blind for BaseExecutionPayload {
    type Blinded = BaseExecutionPayloadHeader;

    fn to_blinded(&self) -> Self::Blinded {
        BaseExecutionPayloadHeader {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: compute_transactions_root(&self.transactions),
            withdrawals_root: compute_withdrawals_root(&self.withdrawals),
            blob_gas_used: self.blob_gas_used,
            excess_blob_gas: self.excess_blob_gas,
        }
    }
}

impl Unblind for BaseExecutionPayloadHeader {
    type Full = BaseExecutionPayload;

    fn to_full(&self) -> Self::Full {
        BaseExecutionPayload {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom,
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions: Default::default(),
            withdrawals: Default::default(),
            blob_gas_used: self.blob_gas_used,
            excess_blob_gas: self.excess_blob_gas,
            blobs_bundle: None,
        }
    }
}

/// Body, block and signed block conversions only differ in which list fields a fork carries
/// besides the execution payload.
macro_rules! impl_block_blinding {
    (
        body: $Body:path => $BlindedBody:path,
        block: $Block:path => $BlindedBlock:path,
        signed: $Signed:path => $SignedBlinded:path,
        extra: [$($extra:ident),*] $(,)?
    ) => {
        impl Blind for $Body {
            type Blinded = $BlindedBody;

            fn to_blinded(&self) -> Self::Blinded {
                $BlindedBody {
                    randao_reveal: self.randao_reveal,
                    eth1_data: self.eth1_data.clone(),
                    graffiti: self.graffiti,
                    proposer_slashings: self.proposer_slashings.clone(),
                    attester_slashings: self.attester_slashings.clone(),
                    attestations: self.attestations.clone(),
                    deposits: self.deposits.clone(),
                    voluntary_exits: self.voluntary_exits.clone(),
                    sync_aggregate: self.sync_aggregate.clone(),
                    execution_payload_header: self.execution_payload.to_blinded(),
                    $($extra: self.$extra.clone(),)*
                }
            }
        }

        impl Unblind for $BlindedBody {
            type Full = $Body;

            fn to_full(&self) -> Self::Full {
                $Body {
                    randao_reveal: self.randao_reveal,
                    eth1_data: self.eth1_data.clone(),
                    graffiti: self.graffiti,
                    proposer_slashings: self.proposer_slashings.clone(),
                    attester_slashings: self.attester_slashings.clone(),
                    attestations: self.attestations.clone(),
                    deposits: self.deposits.clone(),
                    voluntary_exits: self.voluntary_exits.clone(),
                    sync_aggregate: self.sync_aggregate.clone(),
                    execution_payload: self.execution_payload_header.to_full(),
                    $($extra: self.$extra.clone(),)*
                }
            }
        }

        impl Blind for $Block {
            type Blinded = $BlindedBlock;

            fn to_blinded(&self) -> Self::Blinded {
                $BlindedBlock {
                    slot: self.slot,
                    proposer_index: self.proposer_index,
                    parent_root: self.parent_root,
                    state_root: self.state_root,
                    body: self.body.to_blinded(),
                }
            }
        }

        impl Unblind for $BlindedBlock {
            type Full = $Block;

            fn to_full(&self) -> Self::Full {
                $Block {
                    slot: self.slot,
                    proposer_index: self.proposer_index,
                    parent_root: self.parent_root,
                    state_root: self.state_root,
                    body: self.body.to_full(),
                }
            }
        }

        impl Blind for $Signed {
            type Blinded = $SignedBlinded;

            fn to_blinded(&self) -> Self::Blinded {
                $SignedBlinded { message: self.message.to_blinded(), signature: self.signature }
            }
        }

        impl Unblind for $SignedBlinded {
            type Full = $Signed;

            fn to_full(&self) -> Self::Full {
                $Signed { message: self.message.to_full(), signature: self.signature }
            }
        }
    };
}

impl_block_blinding! {
    body: bellatrix::BeaconBlockBody => bellatrix::BlindedBeaconBlockBody,
    block: bellatrix::BeaconBlock => bellatrix::BlindedBeaconBlock,
    signed: bellatrix::SignedBeaconBlock => bellatrix::SignedBlindedBeaconBlock,
    extra: [],
}

impl_block_blinding! {
    body: capella::BeaconBlockBody => capella::BlindedBeaconBlockBody,
    block: capella::BeaconBlock => capella::BlindedBeaconBlock,
    signed: capella::SignedBeaconBlock => capella::SignedBlindedBeaconBlock,
    extra: [bls_to_execution_changes],
}

impl_block_blinding! {
    body: deneb::BeaconBlockBody => deneb::BlindedBeaconBlockBody,
    block: deneb::BeaconBlock => deneb::BlindedBeaconBlock,
    signed: deneb::SignedBeaconBlock => deneb::SignedBlindedBeaconBlock,
    extra: [bls_to_execution_changes, blob_kzg_commitments],
}

impl_block_blinding! {
    body: BaseBeaconBlockBody => BaseBlindedBeaconBlockBody,
    block: BaseBeaconBlock => BaseBlindedBeaconBlock,
    signed: BaseSignedBeaconBlock => BaseSignedBlindedBeaconBlock,
    extra: [bls_to_execution_changes, blob_kzg_commitments],
}

macro_rules! impl_versioned_blinding {
    ($Full:ident => $Blinded:ident) => {
        impl Blind for $Full {
            type Blinded = $Blinded;

            fn to_blinded(&self) -> Self::Blinded {
                match self {
                    $Full::Bellatrix(inner) => $Blinded::Bellatrix(inner.to_blinded()),
                    $Full::Capella(inner) => $Blinded::Capella(inner.to_blinded()),
                    $Full::Deneb(inner) => $Blinded::Deneb(inner.to_blinded()),
                }
            }
        }

        impl Unblind for $Blinded {
            type Full = $Full;

            fn to_full(&self) -> Self::Full {
                match self {
                    $Blinded::Bellatrix(inner) => $Full::Bellatrix(inner.to_full()),
                    $Blinded::Capella(inner) => $Full::Capella(inner.to_full()),
                    $Blinded::Deneb(inner) => $Full::Deneb(inner.to_full()),
                }
            }
        }
    };
}

impl_versioned_blinding!(VersionedExecutionPayload => VersionedExecutionPayloadHeader);
impl_versioned_blinding!(VersionedBeaconBlock => VersionedBlindedBeaconBlock);
impl_versioned_blinding!(VersionedSignedBeaconBlock => VersionedSignedBlindedBeaconBlock);
