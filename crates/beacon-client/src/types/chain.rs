use std::{fmt, str::FromStr};

use pon_types::{Address20, ForkVersion, Hash32, Withdrawal};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum BlockId {
    Head,
    Genesis,
    Finalized,
    Slot(u64),
    Root(Hash32),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            BlockId::Finalized => "finalized",
            BlockId::Head => "head",
            BlockId::Genesis => "genesis",
            BlockId::Slot(slot) => return write!(f, "{slot}"),
            BlockId::Root(root) => return write!(f, "{root}"),
        };
        write!(f, "{printable}")
    }
}

impl FromStr for BlockId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finalized" => Ok(BlockId::Finalized),
            "head" => Ok(BlockId::Head),
            "genesis" => Ok(BlockId::Genesis),
            _ => parse_slot_or_root(s).map(|id| match id {
                SlotOrRoot::Slot(slot) => BlockId::Slot(slot),
                SlotOrRoot::Root(root) => BlockId::Root(root),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum StateId {
    Head,
    Genesis,
    Finalized,
    Justified,
    Slot(u64),
    Root(Hash32),
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            StateId::Finalized => "finalized",
            StateId::Justified => "justified",
            StateId::Head => "head",
            StateId::Genesis => "genesis",
            StateId::Slot(slot) => return write!(f, "{slot}"),
            StateId::Root(root) => return write!(f, "{root}"),
        };
        write!(f, "{printable}")
    }
}

impl FromStr for StateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finalized" => Ok(StateId::Finalized),
            "justified" => Ok(StateId::Justified),
            "head" => Ok(StateId::Head),
            "genesis" => Ok(StateId::Genesis),
            _ => parse_slot_or_root(s).map(|id| match id {
                SlotOrRoot::Slot(slot) => StateId::Slot(slot),
                SlotOrRoot::Root(root) => StateId::Root(root),
            }),
        }
    }
}

enum SlotOrRoot {
    Slot(u64),
    Root(Hash32),
}

fn parse_slot_or_root(s: &str) -> Result<SlotOrRoot, String> {
    if let Ok(slot) = s.parse::<u64>() {
        return Ok(SlotOrRoot::Slot(slot));
    }
    Hash32::from_hex_text(s)
        .map(SlotOrRoot::Root)
        .map_err(|err| format!("could not parse identifier from the provided argument {s}: {err}"))
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    #[serde(with = "serde_utils::quoted_u64")]
    pub head_slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub sync_distance: u64,
    pub is_syncing: bool,
    #[serde(default)]
    pub is_optimistic: bool,
}

// {"slot":"827256","block":"0x56b6...eb83","state":"0x419e...4e55","epoch_transition":false,
// "execution_optimistic":false,"previous_duty_dependent_root":"0x5b81...6b54",
// "current_duty_dependent_root":"0x5f32...2942"}
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadEventData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    pub block: Hash32,
    pub state: Hash32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PayloadAttributesEvent {
    pub version: ForkVersion,
    pub data: PayloadAttributesEventData,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PayloadAttributesEventData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposal_slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub parent_block_number: u64,
    pub parent_block_root: Hash32,
    pub parent_block_hash: Hash32,
    pub payload_attributes: PayloadAttributes,
}

/// Withdrawals appear from Capella, the parent beacon block root from Deneb.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PayloadAttributes {
    #[serde(with = "serde_utils::quoted_u64")]
    pub timestamp: u64,
    pub prev_randao: Hash32,
    pub suggested_fee_recipient: Address20,
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
    #[serde(default)]
    pub parent_beacon_block_root: Option<Hash32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RandaoData {
    pub randao: Hash32,
}
