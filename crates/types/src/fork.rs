use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Protocol upgrades covered by the codec. Later forks carry a superset of the fields of
/// earlier ones, so the ordering is meaningful.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ForkVersion {
    Bellatrix = 1,
    Capella = 2,
    #[default]
    Deneb = 3,
}

impl ForkVersion {
    pub const ALL: [ForkVersion; 3] =
        [ForkVersion::Bellatrix, ForkVersion::Capella, ForkVersion::Deneb];

    /// Order in which decoders try forks when no tag is available.
    pub const PROBE_ORDER: [ForkVersion; 3] =
        [ForkVersion::Deneb, ForkVersion::Capella, ForkVersion::Bellatrix];

    pub fn version_number(&self) -> u64 {
        *self as u64
    }

    pub fn version_name(&self) -> &'static str {
        match self {
            ForkVersion::Bellatrix => "bellatrix",
            ForkVersion::Capella => "capella",
            ForkVersion::Deneb => "deneb",
        }
    }

    pub fn has_withdrawals(&self) -> bool {
        *self >= ForkVersion::Capella
    }

    pub fn has_blobs(&self) -> bool {
        *self >= ForkVersion::Deneb
    }
}

impl fmt::Display for ForkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version_name())
    }
}

impl TryFrom<u64> for ForkVersion {
    type Error = CodecError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ForkVersion::Bellatrix),
            2 => Ok(ForkVersion::Capella),
            3 => Ok(ForkVersion::Deneb),
            other => Err(CodecError::UnsupportedForkVersion(other.to_string())),
        }
    }
}

impl FromStr for ForkVersion {
    type Err = CodecError;

    /// Accepts either the lowercase fork name or its version number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bellatrix" => Ok(ForkVersion::Bellatrix),
            "capella" => Ok(ForkVersion::Capella),
            "deneb" => Ok(ForkVersion::Deneb),
            other => match other.parse::<u64>() {
                Ok(number) => ForkVersion::try_from(number),
                Err(_) => Err(CodecError::UnsupportedForkVersion(s.to_string())),
            },
        }
    }
}

impl TryFrom<&str> for ForkVersion {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
