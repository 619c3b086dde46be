use std::{fs::File, path::Path};

use clap::Args;
use pon_types::ForkVersion;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::CommonError;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PonConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub beacon_client: Option<BeaconClientConfig>,
    /// Fork used when a command is not given one explicitly. Without it, decoders probe.
    #[serde(default)]
    pub default_fork: Option<ForkVersion>,
}

impl PonConfig {
    /// Reads the file named by `--config`. A missing file yields the defaults.
    pub fn load(start_config: &StartConfig) -> Result<Self, CommonError> {
        let path = Path::new(&start_config.config);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CommonError> {
        let file = File::open(path)?;
        let config: PonConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BeaconClientConfig {
    pub url: Url,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub enum LoggingConfig {
    #[default]
    Console,
    File {
        dir_path: String,
        file_name: String,
    },
}

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartConfig {
    #[clap(long, default_value = "config.yml")]
    pub config: String,
}
