use alloy_primitives::U256;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::Value;
use ssz::{Decode, Encode};

use crate::{
    base::{BaseBeaconBlock, BaseBeaconBlockBody, BaseExecutionPayload, BaseSignedBeaconBlock},
    capella,
    consensus::{BlsToExecutionChange, Eth1Data, SignedBlsToExecutionChange},
    construct::construct_execution_payload,
    fields::{ExtraData, Transaction, Withdrawal},
    ForkVersion, VersionedExecutionPayload,
};

/// Test that the encoding and decoding works, returns the decoded struct
pub fn test_encode_decode_json<T: serde::Serialize + serde::de::DeserializeOwned>(d: &str) -> T {
    let decoded = serde_json::from_str::<T>(d).expect("deserialize json");

    // re-encode to make sure that different formats are ignored
    let encoded = serde_json::to_string(&decoded).unwrap();
    let original_v: Value = serde_json::from_str(d).unwrap();
    let encoded_v: Value = serde_json::from_str(&encoded).unwrap();

    if original_v != encoded_v {
        println!("ORIGINAL: {original_v}");
        println!("ENCODED: {encoded_v}");
        panic!("encode mismatch");
    }

    decoded
}

pub fn test_encode_decode_ssz<T: Encode + Decode>(d: &[u8]) -> T {
    let decoded = T::from_ssz_bytes(d).expect("deserialize ssz");
    let encoded = T::as_ssz_bytes(&decoded);

    assert_eq!(encoded, d);

    decoded
}

/// Data object of a mainnet capella block, slot 7222896.
pub fn capella_signed_block_json() -> &'static str {
    include_str!("../testdata/signed_beacon_block_capella.json")
}

pub fn random_bytes<const N: usize>(rng: &mut StdRng) -> [u8; N] {
    let mut out = [0u8; N];
    rng.fill(&mut out[..]);
    out
}

/// Canonical payload whose fields are all populated for `fork` and zero otherwise.
pub fn random_base_payload(seed: u64, fork: ForkVersion) -> BaseExecutionPayload {
    let mut rng = StdRng::seed_from_u64(seed);

    let extra_len = rng.gen_range(0..=32);
    let extra_data = ExtraData::new(random_vec(&mut rng, extra_len)).unwrap();

    let mut payload = BaseExecutionPayload {
        parent_hash: random_bytes::<32>(&mut rng).into(),
        fee_recipient: random_bytes::<20>(&mut rng).into(),
        state_root: random_bytes::<32>(&mut rng).into(),
        receipts_root: random_bytes::<32>(&mut rng).into(),
        logs_bloom: random_bytes::<256>(&mut rng).into(),
        prev_randao: random_bytes::<32>(&mut rng).into(),
        block_number: rng.gen(),
        gas_limit: rng.gen(),
        gas_used: rng.gen(),
        timestamp: rng.gen(),
        extra_data,
        base_fee_per_gas: U256::from_be_bytes(random_bytes::<32>(&mut rng)),
        block_hash: random_bytes::<32>(&mut rng).into(),
        ..Default::default()
    };

    for _ in 0..rng.gen_range(1..4) {
        let len = rng.gen_range(1..200);
        let tx = Transaction::new(random_vec(&mut rng, len)).unwrap();
        payload.transactions.push(tx).unwrap();
    }

    if fork.has_withdrawals() {
        for _ in 0..rng.gen_range(1..4) {
            let withdrawal = Withdrawal {
                index: rng.gen(),
                validator_index: rng.gen(),
                address: random_bytes::<20>(&mut rng).into(),
                amount: rng.gen(),
            };
            payload.withdrawals.push(withdrawal).unwrap();
        }
    }

    if fork.has_blobs() {
        payload.blob_gas_used = rng.gen();
        payload.excess_blob_gas = rng.gen();
    }

    payload
}

pub fn random_capella_payload(seed: u64) -> capella::ExecutionPayload {
    let base = random_base_payload(seed, ForkVersion::Capella);
    match construct_execution_payload(ForkVersion::Capella, &base) {
        Ok(VersionedExecutionPayload::Capella(payload)) => payload,
        other => panic!("unexpected payload: {other:?}"),
    }
}

pub fn random_base_signed_block(seed: u64, fork: ForkVersion) -> BaseSignedBeaconBlock {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut body = BaseBeaconBlockBody {
        randao_reveal: random_bytes::<96>(&mut rng).into(),
        eth1_data: Eth1Data {
            deposit_root: random_bytes::<32>(&mut rng).into(),
            deposit_count: rng.gen(),
            block_hash: random_bytes::<32>(&mut rng).into(),
        },
        graffiti: random_bytes::<32>(&mut rng).into(),
        execution_payload: random_base_payload(seed, fork),
        ..Default::default()
    };

    if fork.has_withdrawals() {
        let change = SignedBlsToExecutionChange {
            message: BlsToExecutionChange {
                validator_index: rng.gen(),
                from_bls_pubkey: random_bytes::<48>(&mut rng).into(),
                to_execution_address: random_bytes::<20>(&mut rng).into(),
            },
            signature: random_bytes::<96>(&mut rng).into(),
        };
        body.bls_to_execution_changes.push(change).unwrap();
    }

    if fork.has_blobs() {
        for _ in 0..2 {
            body.blob_kzg_commitments.push(random_bytes::<48>(&mut rng).into()).unwrap();
        }
    }

    BaseSignedBeaconBlock {
        message: BaseBeaconBlock {
            slot: rng.gen(),
            proposer_index: rng.gen(),
            parent_root: random_bytes::<32>(&mut rng).into(),
            state_root: random_bytes::<32>(&mut rng).into(),
            body,
        },
        signature: random_bytes::<96>(&mut rng).into(),
    }
}

fn random_vec(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}
