//! Projection of the canonical schema onto the wire shape of a single fork.
//!
//! Fields the target fork does not carry are dropped. Pre-Deneb forks receive the base fee as
//! little-endian bytes.

use tracing::trace;

use crate::{
    base::{
        BaseBeaconBlock, BaseBeaconBlockBody, BaseBlindedBeaconBlock, BaseBlindedBeaconBlockBody,
        BaseExecutionPayload, BaseExecutionPayloadHeader, BaseSignedBeaconBlock,
        BaseSignedBlindedBeaconBlock,
    },
    bellatrix, capella, deneb, CodecError, ForkVersion, Uint256Le, VersionedBeaconBlock,
    VersionedBlindedBeaconBlock, VersionedExecutionPayload, VersionedExecutionPayloadHeader,
    VersionedExecutionPayloadV2, VersionedSignedBeaconBlock, VersionedSignedBlindedBeaconBlock,
};

macro_rules! project_block {
    ($($Block:ident)::+, $base:expr, $body:expr) => {
        $($Block)::+ {
            slot: $base.slot,
            proposer_index: $base.proposer_index,
            parent_root: $base.parent_root,
            state_root: $base.state_root,
            body: $body,
        }
    };
}

fn resolve<F>(fork: F) -> Result<ForkVersion, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    Ok(fork.try_into()?)
}

pub fn construct_execution_payload<F>(
    fork: F,
    base: &BaseExecutionPayload,
) -> Result<VersionedExecutionPayload, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, block_number = base.block_number, "constructing execution payload");

    Ok(match fork {
        ForkVersion::Bellatrix => VersionedExecutionPayload::Bellatrix(bellatrix_payload(base)),
        ForkVersion::Capella => VersionedExecutionPayload::Capella(capella_payload(base)),
        ForkVersion::Deneb => VersionedExecutionPayload::Deneb(deneb_payload(base)),
    })
}

/// Like [`construct_execution_payload`], but Deneb also carries the blobs bundle. A missing
/// bundle becomes an empty one.
pub fn construct_execution_payload_v2<F>(
    fork: F,
    base: &BaseExecutionPayload,
) -> Result<VersionedExecutionPayloadV2, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;

    Ok(match fork {
        ForkVersion::Bellatrix => VersionedExecutionPayloadV2::Bellatrix(bellatrix_payload(base)),
        ForkVersion::Capella => VersionedExecutionPayloadV2::Capella(capella_payload(base)),
        ForkVersion::Deneb => {
            VersionedExecutionPayloadV2::Deneb(deneb::ExecutionPayloadAndBlobsBundle {
                execution_payload: deneb_payload(base),
                blobs_bundle: base.blobs_bundle.clone().unwrap_or_default(),
            })
        }
    })
}

pub fn construct_execution_payload_header<F>(
    fork: F,
    base: &BaseExecutionPayloadHeader,
) -> Result<VersionedExecutionPayloadHeader, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, block_number = base.block_number, "constructing execution payload header");

    Ok(match fork {
        ForkVersion::Bellatrix => VersionedExecutionPayloadHeader::Bellatrix(bellatrix_header(base)),
        ForkVersion::Capella => VersionedExecutionPayloadHeader::Capella(capella_header(base)),
        ForkVersion::Deneb => VersionedExecutionPayloadHeader::Deneb(deneb_header(base)),
    })
}

pub fn construct_beacon_block<F>(
    fork: F,
    base: &BaseBeaconBlock,
) -> Result<VersionedBeaconBlock, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, slot = base.slot, "constructing beacon block");

    Ok(match fork {
        ForkVersion::Bellatrix => VersionedBeaconBlock::Bellatrix(bellatrix_block(base)),
        ForkVersion::Capella => VersionedBeaconBlock::Capella(capella_block(base)),
        ForkVersion::Deneb => VersionedBeaconBlock::Deneb(deneb_block(base)),
    })
}

pub fn construct_blinded_beacon_block<F>(
    fork: F,
    base: &BaseBlindedBeaconBlock,
) -> Result<VersionedBlindedBeaconBlock, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, slot = base.slot, "constructing blinded beacon block");

    Ok(match fork {
        ForkVersion::Bellatrix => {
            VersionedBlindedBeaconBlock::Bellatrix(bellatrix_blinded_block(base))
        }
        ForkVersion::Capella => VersionedBlindedBeaconBlock::Capella(capella_blinded_block(base)),
        ForkVersion::Deneb => VersionedBlindedBeaconBlock::Deneb(deneb_blinded_block(base)),
    })
}

pub fn construct_signed_beacon_block<F>(
    fork: F,
    base: &BaseSignedBeaconBlock,
) -> Result<VersionedSignedBeaconBlock, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, slot = base.message.slot, "constructing signed beacon block");

    let signature = base.signature;
    Ok(match fork {
        ForkVersion::Bellatrix => {
            VersionedSignedBeaconBlock::Bellatrix(bellatrix::SignedBeaconBlock {
                message: bellatrix_block(&base.message),
                signature,
            })
        }
        ForkVersion::Capella => VersionedSignedBeaconBlock::Capella(capella::SignedBeaconBlock {
            message: capella_block(&base.message),
            signature,
        }),
        ForkVersion::Deneb => VersionedSignedBeaconBlock::Deneb(deneb::SignedBeaconBlock {
            message: deneb_block(&base.message),
            signature,
        }),
    })
}

pub fn construct_signed_blinded_beacon_block<F>(
    fork: F,
    base: &BaseSignedBlindedBeaconBlock,
) -> Result<VersionedSignedBlindedBeaconBlock, CodecError>
where
    F: TryInto<ForkVersion>,
    CodecError: From<F::Error>,
{
    let fork = resolve(fork)?;
    trace!(%fork, slot = base.message.slot, "constructing signed blinded beacon block");

    let signature = base.signature;
    Ok(match fork {
        ForkVersion::Bellatrix => {
            VersionedSignedBlindedBeaconBlock::Bellatrix(bellatrix::SignedBlindedBeaconBlock {
                message: bellatrix_blinded_block(&base.message),
                signature,
            })
        }
        ForkVersion::Capella => {
            VersionedSignedBlindedBeaconBlock::Capella(capella::SignedBlindedBeaconBlock {
                message: capella_blinded_block(&base.message),
                signature,
            })
        }
        ForkVersion::Deneb => {
            VersionedSignedBlindedBeaconBlock::Deneb(deneb::SignedBlindedBeaconBlock {
                message: deneb_blinded_block(&base.message),
                signature,
            })
        }
    })
}

fn bellatrix_payload(base: &BaseExecutionPayload) -> bellatrix::ExecutionPayload {
    bellatrix::ExecutionPayload {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: Uint256Le::from_u256(base.base_fee_per_gas),
        block_hash: base.block_hash,
        transactions: base.transactions.clone(),
    }
}

fn capella_payload(base: &BaseExecutionPayload) -> capella::ExecutionPayload {
    capella::ExecutionPayload {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: Uint256Le::from_u256(base.base_fee_per_gas),
        block_hash: base.block_hash,
        transactions: base.transactions.clone(),
        withdrawals: base.withdrawals.clone(),
    }
}

fn deneb_payload(base: &BaseExecutionPayload) -> deneb::ExecutionPayload {
    deneb::ExecutionPayload {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: base.base_fee_per_gas,
        block_hash: base.block_hash,
        transactions: base.transactions.clone(),
        withdrawals: base.withdrawals.clone(),
        blob_gas_used: base.blob_gas_used,
        excess_blob_gas: base.excess_blob_gas,
    }
}

fn bellatrix_header(base: &BaseExecutionPayloadHeader) -> bellatrix::ExecutionPayloadHeader {
    bellatrix::ExecutionPayloadHeader {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: Uint256Le::from_u256(base.base_fee_per_gas),
        block_hash: base.block_hash,
        transactions_root: base.transactions_root,
    }
}

fn capella_header(base: &BaseExecutionPayloadHeader) -> capella::ExecutionPayloadHeader {
    capella::ExecutionPayloadHeader {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: Uint256Le::from_u256(base.base_fee_per_gas),
        block_hash: base.block_hash,
        transactions_root: base.transactions_root,
        withdrawals_root: base.withdrawals_root,
    }
}

fn deneb_header(base: &BaseExecutionPayloadHeader) -> deneb::ExecutionPayloadHeader {
    deneb::ExecutionPayloadHeader {
        parent_hash: base.parent_hash,
        fee_recipient: base.fee_recipient,
        state_root: base.state_root,
        receipts_root: base.receipts_root,
        logs_bloom: base.logs_bloom,
        prev_randao: base.prev_randao,
        block_number: base.block_number,
        gas_limit: base.gas_limit,
        gas_used: base.gas_used,
        timestamp: base.timestamp,
        extra_data: base.extra_data.clone(),
        base_fee_per_gas: base.base_fee_per_gas,
        block_hash: base.block_hash,
        transactions_root: base.transactions_root,
        withdrawals_root: base.withdrawals_root,
        blob_gas_used: base.blob_gas_used,
        excess_blob_gas: base.excess_blob_gas,
    }
}

fn bellatrix_body(base: &BaseBeaconBlockBody) -> bellatrix::BeaconBlockBody {
    bellatrix::BeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload: bellatrix_payload(&base.execution_payload),
    }
}

fn capella_body(base: &BaseBeaconBlockBody) -> capella::BeaconBlockBody {
    capella::BeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload: capella_payload(&base.execution_payload),
        bls_to_execution_changes: base.bls_to_execution_changes.clone(),
    }
}

fn deneb_body(base: &BaseBeaconBlockBody) -> deneb::BeaconBlockBody {
    deneb::BeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload: deneb_payload(&base.execution_payload),
        bls_to_execution_changes: base.bls_to_execution_changes.clone(),
        blob_kzg_commitments: base.blob_kzg_commitments.clone(),
    }
}

fn bellatrix_blinded_body(base: &BaseBlindedBeaconBlockBody) -> bellatrix::BlindedBeaconBlockBody {
    bellatrix::BlindedBeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload_header: bellatrix_header(&base.execution_payload_header),
    }
}

fn capella_blinded_body(base: &BaseBlindedBeaconBlockBody) -> capella::BlindedBeaconBlockBody {
    capella::BlindedBeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload_header: capella_header(&base.execution_payload_header),
        bls_to_execution_changes: base.bls_to_execution_changes.clone(),
    }
}

fn deneb_blinded_body(base: &BaseBlindedBeaconBlockBody) -> deneb::BlindedBeaconBlockBody {
    deneb::BlindedBeaconBlockBody {
        randao_reveal: base.randao_reveal,
        eth1_data: base.eth1_data.clone(),
        graffiti: base.graffiti,
        proposer_slashings: base.proposer_slashings.clone(),
        attester_slashings: base.attester_slashings.clone(),
        attestations: base.attestations.clone(),
        deposits: base.deposits.clone(),
        voluntary_exits: base.voluntary_exits.clone(),
        sync_aggregate: base.sync_aggregate.clone(),
        execution_payload_header: deneb_header(&base.execution_payload_header),
        bls_to_execution_changes: base.bls_to_execution_changes.clone(),
        blob_kzg_commitments: base.blob_kzg_commitments.clone(),
    }
}

fn bellatrix_block(base: &BaseBeaconBlock) -> bellatrix::BeaconBlock {
    project_block!(bellatrix::BeaconBlock, base, bellatrix_body(&base.body))
}

fn capella_block(base: &BaseBeaconBlock) -> capella::BeaconBlock {
    project_block!(capella::BeaconBlock, base, capella_body(&base.body))
}

fn deneb_block(base: &BaseBeaconBlock) -> deneb::BeaconBlock {
    project_block!(deneb::BeaconBlock, base, deneb_body(&base.body))
}

fn bellatrix_blinded_block(base: &BaseBlindedBeaconBlock) -> bellatrix::BlindedBeaconBlock {
    project_block!(bellatrix::BlindedBeaconBlock, base, bellatrix_blinded_body(&base.body))
}

fn capella_blinded_block(base: &BaseBlindedBeaconBlock) -> capella::BlindedBeaconBlock {
    project_block!(capella::BlindedBeaconBlock, base, capella_blinded_body(&base.body))
}

fn deneb_blinded_block(base: &BaseBlindedBeaconBlock) -> deneb::BlindedBeaconBlock {
    project_block!(deneb::BlindedBeaconBlock, base, deneb_blinded_body(&base.body))
}
