#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported fork version: {0}")]
    UnsupportedForkVersion(String),

    #[error("no fork variant populated")]
    NoVariantPopulated,

    #[error("invalid length: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    #[error("integer overflows 256 bits")]
    IntegerOverflow,

    #[error("no fork matched (deneb: {deneb}; capella: {capella}; bellatrix: {bellatrix})")]
    DecodeExhausted { deneb: String, capella: String, bellatrix: String },

    #[error("ssz error: {0}")]
    Ssz(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid hex: {0}")]
    Hex(String),
}

impl From<std::convert::Infallible> for CodecError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

impl From<ssz::DecodeError> for CodecError {
    fn from(err: ssz::DecodeError) -> Self {
        Self::Ssz(format!("{err:?}"))
    }
}

impl From<ssz_types::Error> for CodecError {
    fn from(err: ssz_types::Error) -> Self {
        Self::Ssz(format!("{err:?}"))
    }
}

impl From<alloy_primitives::hex::FromHexError> for CodecError {
    fn from(err: alloy_primitives::hex::FromHexError) -> Self {
        Self::Hex(err.to_string())
    }
}
