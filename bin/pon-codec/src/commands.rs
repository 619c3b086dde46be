use std::{fs, io::Read, path::PathBuf};

use alloy_primitives::hex;
use clap::{Args, ValueEnum};
use eyre::{bail, eyre};
use pon_beacon_client::BeaconClientTrait;
use pon_types::{
    construct_beacon_block, construct_blinded_beacon_block, construct_execution_payload,
    construct_execution_payload_header, construct_execution_payload_v2,
    construct_signed_beacon_block, construct_signed_blinded_beacon_block, probe_forks,
    to_base_beacon_block, to_base_blinded_beacon_block, to_base_execution_payload,
    to_base_execution_payload_header, to_base_execution_payload_v2, to_base_signed_beacon_block,
    to_base_signed_blinded_beacon_block, Blind, BuilderBid, ForkVersion, ForkVersionDecode, Hash32,
    VersionedBeaconBlock, VersionedBlindedBeaconBlock, VersionedExecutionPayload,
    VersionedExecutionPayloadHeader, VersionedExecutionPayloadV2, VersionedSignedBeaconBlock,
    VersionedSignedBlindedBeaconBlock,
};
use serde::Serialize;
use ssz::Encode;
use tracing::{debug, info};
use tree_hash::TreeHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    ExecutionPayload,
    ExecutionPayloadV2,
    ExecutionPayloadHeader,
    BeaconBlock,
    BlindedBeaconBlock,
    SignedBeaconBlock,
    SignedBlindedBeaconBlock,
    BuilderBid,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, value_enum)]
    pub kind: Kind,
    /// Fork name or version number. Without it, every fork is tried.
    #[arg(long)]
    pub fork: Option<ForkVersion>,
    /// Input is hex encoded SSZ instead of JSON.
    #[arg(long)]
    pub ssz: bool,
    /// Input file, stdin when omitted or `-`.
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BlindArgs {
    #[arg(long)]
    pub fork: Option<ForkVersion>,
    pub input: Option<PathBuf>,
}

macro_rules! for_kind {
    ($kind:expr, |$T:ident| $versioned:expr, bid => $bid:expr) => {
        match $kind {
            Kind::ExecutionPayload => {
                type $T = VersionedExecutionPayload;
                $versioned
            }
            Kind::ExecutionPayloadV2 => {
                type $T = VersionedExecutionPayloadV2;
                $versioned
            }
            Kind::ExecutionPayloadHeader => {
                type $T = VersionedExecutionPayloadHeader;
                $versioned
            }
            Kind::BeaconBlock => {
                type $T = VersionedBeaconBlock;
                $versioned
            }
            Kind::BlindedBeaconBlock => {
                type $T = VersionedBlindedBeaconBlock;
                $versioned
            }
            Kind::SignedBeaconBlock => {
                type $T = VersionedSignedBeaconBlock;
                $versioned
            }
            Kind::SignedBlindedBeaconBlock => {
                type $T = VersionedSignedBlindedBeaconBlock;
                $versioned
            }
            Kind::BuilderBid => $bid,
        }
    };
}

pub fn read_input(path: Option<&PathBuf>) -> eyre::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn to_pretty<T: Serialize>(value: &T) -> eyre::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn decode_container<T: ForkVersionDecode>(
    text: &str,
    ssz: bool,
    fork: Option<ForkVersion>,
) -> eyre::Result<T> {
    let kind = std::any::type_name::<T>();
    let decoded = if ssz {
        let bytes = hex::decode(text.trim())?;
        match fork {
            Some(fork) => T::from_ssz_bytes_by_fork(&bytes, fork)?,
            None => probe_forks(kind, |fork| T::from_ssz_bytes_by_fork(&bytes, fork))?,
        }
    } else {
        let value: serde_json::Value = serde_json::from_str(text)?;
        match fork {
            Some(fork) => T::from_json_value_by_fork(value, fork)?,
            None => probe_forks(kind, |fork| T::from_json_value_by_fork(value.clone(), fork))?,
        }
    };
    debug!(kind, fork = %decoded.fork(), "decoded input");
    Ok(decoded)
}

fn decode_bid(text: &str, ssz: bool, fork: Option<ForkVersion>) -> eyre::Result<BuilderBid> {
    if ssz {
        let bytes = hex::decode(text.trim())?;
        return Ok(match fork {
            Some(fork) => BuilderBid::from_ssz_bytes_by_fork(&bytes, fork)?,
            None => BuilderBid::from_ssz_bytes_any(&bytes)?,
        });
    }

    let bid = BuilderBid::from_json(text)?;
    if let (Some(fork), Some(header)) = (fork, &bid.header) {
        if header.fork() != fork {
            bail!("bid header decodes as {}, expected {fork}", header.fork());
        }
    }
    Ok(bid)
}

pub fn decode(args: &InputArgs, text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    for_kind!(
        args.kind,
        |T| to_pretty(&decode_container::<T>(text, args.ssz, fork)?),
        bid => to_pretty(&decode_bid(text, args.ssz, fork)?)
    )
}

pub fn encode(args: &InputArgs, text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    if args.ssz {
        bail!("encode reads JSON input");
    }
    let bytes = for_kind!(
        args.kind,
        |T| decode_container::<T>(text, false, fork)?.as_ssz_bytes(),
        bid => decode_bid(text, false, fork)?.as_ssz_bytes()
    );
    Ok(hex::encode_prefixed(bytes))
}

pub fn root(args: &InputArgs, text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    let root = for_kind!(
        args.kind,
        |T| Hash32(decode_container::<T>(text, args.ssz, fork)?.tree_hash_root()),
        bid => decode_bid(text, args.ssz, fork)?.hash_tree_root()?
    );
    Ok(root.to_string())
}

/// Signed block in, signed blinded block out. Both share a hash tree root.
pub fn blind(text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    let block: VersionedSignedBeaconBlock = decode_container(text, false, fork)?;
    to_pretty(&block.to_blinded())
}

pub fn construct(args: &InputArgs, text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    let fork = fork.ok_or_else(|| eyre!("construct needs --fork or a configured default_fork"))?;
    if args.ssz {
        bail!("construct reads base JSON input");
    }

    match args.kind {
        Kind::ExecutionPayload => {
            to_pretty(&construct_execution_payload(fork, &serde_json::from_str(text)?)?)
        }
        Kind::ExecutionPayloadV2 => {
            to_pretty(&construct_execution_payload_v2(fork, &serde_json::from_str(text)?)?)
        }
        Kind::ExecutionPayloadHeader => {
            to_pretty(&construct_execution_payload_header(fork, &serde_json::from_str(text)?)?)
        }
        Kind::BeaconBlock => to_pretty(&construct_beacon_block(fork, &serde_json::from_str(text)?)?),
        Kind::BlindedBeaconBlock => {
            to_pretty(&construct_blinded_beacon_block(fork, &serde_json::from_str(text)?)?)
        }
        Kind::SignedBeaconBlock => {
            to_pretty(&construct_signed_beacon_block(fork, &serde_json::from_str(text)?)?)
        }
        Kind::SignedBlindedBeaconBlock => {
            to_pretty(&construct_signed_blinded_beacon_block(fork, &serde_json::from_str(text)?)?)
        }
        Kind::BuilderBid => bail!("builder bids have no base form"),
    }
}

pub fn extract(args: &InputArgs, text: &str, fork: Option<ForkVersion>) -> eyre::Result<String> {
    let ssz = args.ssz;
    match args.kind {
        Kind::ExecutionPayload => to_pretty(&to_base_execution_payload(
            &decode_container::<VersionedExecutionPayload>(text, ssz, fork)?,
        )?),
        Kind::ExecutionPayloadV2 => to_pretty(&to_base_execution_payload_v2(
            &decode_container::<VersionedExecutionPayloadV2>(text, ssz, fork)?,
        )?),
        Kind::ExecutionPayloadHeader => to_pretty(&to_base_execution_payload_header(
            &decode_container::<VersionedExecutionPayloadHeader>(text, ssz, fork)?,
        )?),
        Kind::BeaconBlock => to_pretty(&to_base_beacon_block(
            &decode_container::<VersionedBeaconBlock>(text, ssz, fork)?,
        )?),
        Kind::BlindedBeaconBlock => to_pretty(&to_base_blinded_beacon_block(
            &decode_container::<VersionedBlindedBeaconBlock>(text, ssz, fork)?,
        )?),
        Kind::SignedBeaconBlock => to_pretty(&to_base_signed_beacon_block(
            &decode_container::<VersionedSignedBeaconBlock>(text, ssz, fork)?,
        )?),
        Kind::SignedBlindedBeaconBlock => to_pretty(&to_base_signed_blinded_beacon_block(
            &decode_container::<VersionedSignedBlindedBeaconBlock>(text, ssz, fork)?,
        )?),
        Kind::BuilderBid => bail!("builder bids have no base form"),
    }
}

pub async fn genesis(client: &impl BeaconClientTrait) -> eyre::Result<String> {
    let genesis = client.get_genesis().await?;
    info!(
        uri = %client.get_uri(),
        genesis_time = genesis.genesis_time,
        fork_version = %genesis.genesis_fork_version,
        "fetched genesis"
    );
    to_pretty(&genesis)
}
