use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Deserialize, Debug, Clone)]
#[serde(bound = "T: DeserializeOwned")]
#[serde(untagged)]
pub enum ApiResult<T> {
    Ok(T),
    Err(ApiError),
}

/// `{"data": ..., <meta>}` wrapper used by every beacon API response. Keys next to `data`, such
/// as `dependent_root` or `execution_optimistic`, are kept in `meta`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct BeaconResponse<T> {
    pub data: T,
    #[serde(flatten)]
    pub meta: HashMap<String, serde_json::Value>,
}
