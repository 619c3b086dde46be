//! Inverse of [`crate::construct`]: reads the populated variant back into the canonical schema.
//!
//! Every extractor accepts either a reference or an `Option` of one, and an empty input is
//! reported as [`CodecError::NoVariantPopulated`].

use crate::{
    base::{
        BaseBeaconBlock, BaseBeaconBlockBody, BaseBlindedBeaconBlock, BaseBlindedBeaconBlockBody,
        BaseExecutionPayload, BaseExecutionPayloadHeader, BaseSignedBeaconBlock,
        BaseSignedBlindedBeaconBlock,
    },
    bellatrix, capella, deneb, CodecError, VersionedBeaconBlock, VersionedBlindedBeaconBlock,
    VersionedExecutionPayload, VersionedExecutionPayloadHeader, VersionedExecutionPayloadV2,
    VersionedSignedBeaconBlock, VersionedSignedBlindedBeaconBlock,
};

macro_rules! restore_block {
    ($base:expr, $body:expr) => {
        Ok(BaseBeaconBlock {
            slot: $base.slot,
            proposer_index: $base.proposer_index,
            parent_root: $base.parent_root,
            state_root: $base.state_root,
            body: $body,
        })
    };
}

macro_rules! restore_blinded_block {
    ($base:expr, $body:expr) => {
        Ok(BaseBlindedBeaconBlock {
            slot: $base.slot,
            proposer_index: $base.proposer_index,
            parent_root: $base.parent_root,
            state_root: $base.state_root,
            body: $body,
        })
    };
}

fn populated<'a, T: 'a>(input: impl Into<Option<&'a T>>) -> Result<&'a T, CodecError> {
    input.into().ok_or(CodecError::NoVariantPopulated)
}

pub fn to_base_execution_payload<'a>(
    payload: impl Into<Option<&'a VersionedExecutionPayload>>,
) -> Result<BaseExecutionPayload, CodecError> {
    match populated(payload)? {
        VersionedExecutionPayload::Bellatrix(payload) => from_bellatrix_payload(payload),
        VersionedExecutionPayload::Capella(payload) => from_capella_payload(payload),
        VersionedExecutionPayload::Deneb(payload) => Ok(from_deneb_payload(payload)),
    }
}

pub fn to_base_execution_payload_v2<'a>(
    payload: impl Into<Option<&'a VersionedExecutionPayloadV2>>,
) -> Result<BaseExecutionPayload, CodecError> {
    match populated(payload)? {
        VersionedExecutionPayloadV2::Bellatrix(payload) => from_bellatrix_payload(payload),
        VersionedExecutionPayloadV2::Capella(payload) => from_capella_payload(payload),
        VersionedExecutionPayloadV2::Deneb(contents) => Ok(BaseExecutionPayload {
            blobs_bundle: Some(contents.blobs_bundle.clone()),
            ..from_deneb_payload(&contents.execution_payload)
        }),
    }
}

pub fn to_base_execution_payload_header<'a>(
    header: impl Into<Option<&'a VersionedExecutionPayloadHeader>>,
) -> Result<BaseExecutionPayloadHeader, CodecError> {
    match populated(header)? {
        VersionedExecutionPayloadHeader::Bellatrix(header) => from_bellatrix_header(header),
        VersionedExecutionPayloadHeader::Capella(header) => from_capella_header(header),
        VersionedExecutionPayloadHeader::Deneb(header) => Ok(from_deneb_header(header)),
    }
}

pub fn to_base_beacon_block<'a>(
    block: impl Into<Option<&'a VersionedBeaconBlock>>,
) -> Result<BaseBeaconBlock, CodecError> {
    match populated(block)? {
        VersionedBeaconBlock::Bellatrix(block) => from_bellatrix_block(block),
        VersionedBeaconBlock::Capella(block) => from_capella_block(block),
        VersionedBeaconBlock::Deneb(block) => from_deneb_block(block),
    }
}

pub fn to_base_blinded_beacon_block<'a>(
    block: impl Into<Option<&'a VersionedBlindedBeaconBlock>>,
) -> Result<BaseBlindedBeaconBlock, CodecError> {
    match populated(block)? {
        VersionedBlindedBeaconBlock::Bellatrix(block) => from_bellatrix_blinded_block(block),
        VersionedBlindedBeaconBlock::Capella(block) => from_capella_blinded_block(block),
        VersionedBlindedBeaconBlock::Deneb(block) => from_deneb_blinded_block(block),
    }
}

pub fn to_base_signed_beacon_block<'a>(
    block: impl Into<Option<&'a VersionedSignedBeaconBlock>>,
) -> Result<BaseSignedBeaconBlock, CodecError> {
    let (message, signature) = match populated(block)? {
        VersionedSignedBeaconBlock::Bellatrix(block) => {
            (from_bellatrix_block(&block.message)?, block.signature)
        }
        VersionedSignedBeaconBlock::Capella(block) => {
            (from_capella_block(&block.message)?, block.signature)
        }
        VersionedSignedBeaconBlock::Deneb(block) => {
            (from_deneb_block(&block.message)?, block.signature)
        }
    };
    Ok(BaseSignedBeaconBlock { message, signature })
}

pub fn to_base_signed_blinded_beacon_block<'a>(
    block: impl Into<Option<&'a VersionedSignedBlindedBeaconBlock>>,
) -> Result<BaseSignedBlindedBeaconBlock, CodecError> {
    let (message, signature) = match populated(block)? {
        VersionedSignedBlindedBeaconBlock::Bellatrix(block) => {
            (from_bellatrix_blinded_block(&block.message)?, block.signature)
        }
        VersionedSignedBlindedBeaconBlock::Capella(block) => {
            (from_capella_blinded_block(&block.message)?, block.signature)
        }
        VersionedSignedBlindedBeaconBlock::Deneb(block) => {
            (from_deneb_blinded_block(&block.message)?, block.signature)
        }
    };
    Ok(BaseSignedBlindedBeaconBlock { message, signature })
}

fn from_bellatrix_payload(
    payload: &bellatrix::ExecutionPayload,
) -> Result<BaseExecutionPayload, CodecError> {
    Ok(BaseExecutionPayload {
        parent_hash: payload.parent_hash,
        fee_recipient: payload.fee_recipient,
        state_root: payload.state_root,
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom,
        prev_randao: payload.prev_randao,
        block_number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: payload.extra_data.clone(),
        base_fee_per_gas: payload.base_fee_per_gas.to_u256()?,
        block_hash: payload.block_hash,
        transactions: payload.transactions.clone(),
        ..Default::default()
    })
}

fn from_capella_payload(
    payload: &capella::ExecutionPayload,
) -> Result<BaseExecutionPayload, CodecError> {
    Ok(BaseExecutionPayload {
        parent_hash: payload.parent_hash,
        fee_recipient: payload.fee_recipient,
        state_root: payload.state_root,
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom,
        prev_randao: payload.prev_randao,
        block_number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: payload.extra_data.clone(),
        base_fee_per_gas: payload.base_fee_per_gas.to_u256()?,
        block_hash: payload.block_hash,
        transactions: payload.transactions.clone(),
        withdrawals: payload.withdrawals.clone(),
        ..Default::default()
    })
}

fn from_deneb_payload(payload: &deneb::ExecutionPayload) -> BaseExecutionPayload {
    BaseExecutionPayload {
        parent_hash: payload.parent_hash,
        fee_recipient: payload.fee_recipient,
        state_root: payload.state_root,
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom,
        prev_randao: payload.prev_randao,
        block_number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: payload.extra_data.clone(),
        base_fee_per_gas: payload.base_fee_per_gas,
        block_hash: payload.block_hash,
        transactions: payload.transactions.clone(),
        withdrawals: payload.withdrawals.clone(),
        blob_gas_used: payload.blob_gas_used,
        excess_blob_gas: payload.excess_blob_gas,
        blobs_bundle: None,
    }
}

fn from_bellatrix_header(
    header: &bellatrix::ExecutionPayloadHeader,
) -> Result<BaseExecutionPayloadHeader, CodecError> {
    Ok(BaseExecutionPayloadHeader {
        parent_hash: header.parent_hash,
        fee_recipient: header.fee_recipient,
        state_root: header.state_root,
        receipts_root: header.receipts_root,
        logs_bloom: header.logs_bloom,
        prev_randao: header.prev_randao,
        block_number: header.block_number,
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        timestamp: header.timestamp,
        extra_data: header.extra_data.clone(),
        base_fee_per_gas: header.base_fee_per_gas.to_u256()?,
        block_hash: header.block_hash,
        transactions_root: header.transactions_root,
        ..Default::default()
    })
}

fn from_capella_header(
    header: &capella::ExecutionPayloadHeader,
) -> Result<BaseExecutionPayloadHeader, CodecError> {
    Ok(BaseExecutionPayloadHeader {
        parent_hash: header.parent_hash,
        fee_recipient: header.fee_recipient,
        state_root: header.state_root,
        receipts_root: header.receipts_root,
        logs_bloom: header.logs_bloom,
        prev_randao: header.prev_randao,
        block_number: header.block_number,
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        timestamp: header.timestamp,
        extra_data: header.extra_data.clone(),
        base_fee_per_gas: header.base_fee_per_gas.to_u256()?,
        block_hash: header.block_hash,
        transactions_root: header.transactions_root,
        withdrawals_root: header.withdrawals_root,
        ..Default::default()
    })
}

fn from_deneb_header(header: &deneb::ExecutionPayloadHeader) -> BaseExecutionPayloadHeader {
    BaseExecutionPayloadHeader {
        parent_hash: header.parent_hash,
        fee_recipient: header.fee_recipient,
        state_root: header.state_root,
        receipts_root: header.receipts_root,
        logs_bloom: header.logs_bloom,
        prev_randao: header.prev_randao,
        block_number: header.block_number,
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        timestamp: header.timestamp,
        extra_data: header.extra_data.clone(),
        base_fee_per_gas: header.base_fee_per_gas,
        block_hash: header.block_hash,
        transactions_root: header.transactions_root,
        withdrawals_root: header.withdrawals_root,
        blob_gas_used: header.blob_gas_used,
        excess_blob_gas: header.excess_blob_gas,
    }
}

fn from_bellatrix_body(
    body: &bellatrix::BeaconBlockBody,
) -> Result<BaseBeaconBlockBody, CodecError> {
    Ok(BaseBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: from_bellatrix_payload(&body.execution_payload)?,
        ..Default::default()
    })
}

fn from_capella_body(body: &capella::BeaconBlockBody) -> Result<BaseBeaconBlockBody, CodecError> {
    Ok(BaseBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: from_capella_payload(&body.execution_payload)?,
        bls_to_execution_changes: body.bls_to_execution_changes.clone(),
        ..Default::default()
    })
}

fn from_deneb_body(body: &deneb::BeaconBlockBody) -> BaseBeaconBlockBody {
    BaseBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: from_deneb_payload(&body.execution_payload),
        bls_to_execution_changes: body.bls_to_execution_changes.clone(),
        blob_kzg_commitments: body.blob_kzg_commitments.clone(),
    }
}

fn from_bellatrix_blinded_body(
    body: &bellatrix::BlindedBeaconBlockBody,
) -> Result<BaseBlindedBeaconBlockBody, CodecError> {
    Ok(BaseBlindedBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload_header: from_bellatrix_header(&body.execution_payload_header)?,
        ..Default::default()
    })
}

fn from_capella_blinded_body(
    body: &capella::BlindedBeaconBlockBody,
) -> Result<BaseBlindedBeaconBlockBody, CodecError> {
    Ok(BaseBlindedBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload_header: from_capella_header(&body.execution_payload_header)?,
        bls_to_execution_changes: body.bls_to_execution_changes.clone(),
        ..Default::default()
    })
}

fn from_deneb_blinded_body(body: &deneb::BlindedBeaconBlockBody) -> BaseBlindedBeaconBlockBody {
    BaseBlindedBeaconBlockBody {
        randao_reveal: body.randao_reveal,
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: body.proposer_slashings.clone(),
        attester_slashings: body.attester_slashings.clone(),
        attestations: body.attestations.clone(),
        deposits: body.deposits.clone(),
        voluntary_exits: body.voluntary_exits.clone(),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload_header: from_deneb_header(&body.execution_payload_header),
        bls_to_execution_changes: body.bls_to_execution_changes.clone(),
        blob_kzg_commitments: body.blob_kzg_commitments.clone(),
    }
}

fn from_bellatrix_block(block: &bellatrix::BeaconBlock) -> Result<BaseBeaconBlock, CodecError> {
    restore_block!(block, from_bellatrix_body(&block.body)?)
}

fn from_capella_block(block: &capella::BeaconBlock) -> Result<BaseBeaconBlock, CodecError> {
    restore_block!(block, from_capella_body(&block.body)?)
}

fn from_deneb_block(block: &deneb::BeaconBlock) -> Result<BaseBeaconBlock, CodecError> {
    restore_block!(block, from_deneb_body(&block.body))
}

fn from_bellatrix_blinded_block(
    block: &bellatrix::BlindedBeaconBlock,
) -> Result<BaseBlindedBeaconBlock, CodecError> {
    restore_blinded_block!(block, from_bellatrix_blinded_body(&block.body)?)
}

fn from_capella_blinded_block(
    block: &capella::BlindedBeaconBlock,
) -> Result<BaseBlindedBeaconBlock, CodecError> {
    restore_blinded_block!(block, from_capella_blinded_body(&block.body)?)
}

fn from_deneb_blinded_block(
    block: &deneb::BlindedBeaconBlock,
) -> Result<BaseBlindedBeaconBlock, CodecError> {
    restore_blinded_block!(block, from_deneb_blinded_body(&block.body))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        blinded::Blind,
        construct::{
            construct_beacon_block, construct_blinded_beacon_block, construct_execution_payload,
            construct_execution_payload_header, construct_execution_payload_v2,
            construct_signed_beacon_block, construct_signed_blinded_beacon_block,
        },
        deneb::BlobsBundle,
        test_utils::{random_base_payload, random_base_signed_block, random_bytes},
        ForkVersion, Hash32, Uint256Le,
    };

    /// Bellatrix headers have no withdrawals root, so the canonical form leaves it zero.
    fn fork_shaped(
        mut header: BaseExecutionPayloadHeader,
        fork: ForkVersion,
    ) -> BaseExecutionPayloadHeader {
        if !fork.has_withdrawals() {
            header.withdrawals_root = Hash32::default();
        }
        header
    }

    #[test]
    fn test_payload_round_trip_every_fork() {
        for fork in ForkVersion::ALL {
            let base = random_base_payload(20 + fork.version_number(), fork);
            let versioned = construct_execution_payload(fork, &base).unwrap();
            assert_eq!(to_base_execution_payload(&versioned).unwrap(), base, "{fork}");
        }
    }

    #[test]
    fn test_signed_block_round_trip_every_fork() {
        for fork in ForkVersion::ALL {
            let base = random_base_signed_block(30 + fork.version_number(), fork);

            let signed = construct_signed_beacon_block(fork, &base).unwrap();
            assert_eq!(to_base_signed_beacon_block(&signed).unwrap(), base, "{fork}");

            let unsigned = construct_beacon_block(fork, &base.message).unwrap();
            assert_eq!(to_base_beacon_block(&unsigned).unwrap(), base.message, "{fork}");
        }
    }

    #[test]
    fn test_header_round_trip_every_fork() {
        for fork in ForkVersion::ALL {
            let payload = random_base_payload(35 + fork.version_number(), fork);
            let base = fork_shaped(payload.to_blinded(), fork);
            let versioned = construct_execution_payload_header(fork, &base).unwrap();
            assert_eq!(versioned.fork(), fork);
            assert_eq!(to_base_execution_payload_header(&versioned).unwrap(), base, "{fork}");
        }
    }

    #[test]
    fn test_blinded_block_round_trip_every_fork() {
        for fork in ForkVersion::ALL {
            let mut base = random_base_signed_block(45 + fork.version_number(), fork).to_blinded();
            let header = &mut base.message.body.execution_payload_header;
            *header = fork_shaped(header.clone(), fork);

            let signed = construct_signed_blinded_beacon_block(fork, &base).unwrap();
            assert_eq!(signed.fork(), fork);
            assert_eq!(to_base_signed_blinded_beacon_block(&signed).unwrap(), base, "{fork}");

            let unsigned = construct_blinded_beacon_block(fork, &base.message).unwrap();
            assert_eq!(unsigned.fork(), fork);
            assert_eq!(to_base_blinded_beacon_block(&unsigned).unwrap(), base.message, "{fork}");

            // same block through both paths
            let full = construct_signed_beacon_block(
                fork,
                &random_base_signed_block(45 + fork.version_number(), fork),
            )
            .unwrap();
            assert_eq!(full.to_blinded(), signed, "{fork}");
        }
    }

    #[test]
    fn test_capella_scenario_base_fee() {
        let base = BaseExecutionPayload {
            base_fee_per_gas: U256::from(1_000_000_000u64),
            ..random_base_payload(40, ForkVersion::Capella)
        };
        let versioned = construct_execution_payload(ForkVersion::Capella, &base).unwrap();
        let restored = to_base_execution_payload(&versioned).unwrap();
        assert_eq!(restored.base_fee_per_gas, U256::from(1_000_000_000u64));
    }

    #[test]
    fn test_extreme_base_fees_survive() {
        for fee in [U256::ZERO, U256::from(1u64), U256::MAX >> 1usize, U256::MAX] {
            let base = BaseExecutionPayload { base_fee_per_gas: fee, ..Default::default() };
            for fork in [ForkVersion::Bellatrix, ForkVersion::Capella] {
                let versioned = construct_execution_payload(fork, &base).unwrap();
                assert_eq!(to_base_execution_payload(&versioned).unwrap().base_fee_per_gas, fee);
            }
        }
    }

    #[test]
    fn test_wire_base_fee_reversed_back() {
        let mut le = [0u8; 32];
        le[0] = 0x01;
        le[31] = 0x80;
        let payload = bellatrix::ExecutionPayload {
            base_fee_per_gas: Uint256Le(le.into()),
            ..Default::default()
        };
        let base = to_base_execution_payload(&VersionedExecutionPayload::Bellatrix(payload))
            .unwrap();
        assert_eq!(base.base_fee_per_gas, (U256::from(1u64) << 255usize) + U256::from(1u64));
    }

    #[test]
    fn test_missing_variant() {
        assert!(matches!(
            to_base_execution_payload(None::<&VersionedExecutionPayload>),
            Err(CodecError::NoVariantPopulated)
        ));
        assert!(matches!(
            to_base_signed_blinded_beacon_block(None::<&VersionedSignedBlindedBeaconBlock>),
            Err(CodecError::NoVariantPopulated)
        ));
        assert!(matches!(
            to_base_execution_payload_header(None::<&VersionedExecutionPayloadHeader>),
            Err(CodecError::NoVariantPopulated)
        ));
    }

    #[test]
    fn test_v2_keeps_blobs_bundle() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut bundle = BlobsBundle::default();
        bundle.commitments.push(random_bytes::<48>(&mut rng).into()).unwrap();
        bundle.proofs.push(random_bytes::<48>(&mut rng).into()).unwrap();
        bundle.blobs.push(Default::default()).unwrap();

        let base = BaseExecutionPayload {
            blobs_bundle: Some(bundle),
            ..random_base_payload(41, ForkVersion::Deneb)
        };
        let versioned = construct_execution_payload_v2(ForkVersion::Deneb, &base).unwrap();
        assert_eq!(to_base_execution_payload_v2(&versioned).unwrap(), base);

        // pre-deneb forks have nowhere to put the bundle
        let capella = construct_execution_payload_v2(ForkVersion::Capella, &base).unwrap();
        let restored = to_base_execution_payload_v2(&capella).unwrap();
        assert!(restored.blobs_bundle.is_none());
        assert_eq!(restored.blob_gas_used, 0);
    }

    #[test]
    fn test_bellatrix_zeroes_later_fields() {
        let base = random_base_payload(42, ForkVersion::Deneb);
        let versioned = construct_execution_payload(ForkVersion::Bellatrix, &base).unwrap();
        let restored = to_base_execution_payload(&versioned).unwrap();
        assert!(restored.withdrawals.is_empty());
        assert_eq!(restored.excess_blob_gas, 0);
        assert_eq!(restored.block_hash, base.block_hash);
    }
}
