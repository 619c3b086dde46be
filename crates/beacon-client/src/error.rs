use std::{error::Error, fmt};

use pon_types::CodecError;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum BeaconClientError {
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("error from API: {0}")]
    Api(#[from] ApiError),

    #[error("missing expected data in response: {0}")]
    MissingExpectedData(String),
}

// NOTE: `IndexedError` must come before `ErrorMessage` so
// the `serde(untagged)` machinery does not greedily match it first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ApiError {
    IndexedError { code: u16, message: String, failures: Vec<IndexedError> },
    ErrorMessage { code: u16, message: String },
}

impl ApiError {
    pub fn code(&self) -> u16 {
        match self {
            Self::IndexedError { code, .. } | Self::ErrorMessage { code, .. } => *code,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexedError {
    index: usize,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ErrorMessage { code, message } => {
                write!(f, "{code}: {message}")
            }
            Self::IndexedError { code, message, failures } => {
                write!(f, "{code}: {message}: ")?;
                for failure in failures {
                    write!(f, "[{}] {}, ", failure.index, failure.message)?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ApiError {}
