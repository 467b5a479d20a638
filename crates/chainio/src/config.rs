use std::{fs::File, path::Path};

use alloy_primitives::Address;
use avs_primitives::consts::DEFAULT_QUERY_BLOCK_RANGE;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Addresses of the registry contracts of one AVS deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReaderConfig {
    pub registry_coordinator: Address,
    pub operator_state_retriever: Address,
    pub bls_apk_registry: Address,
    pub stake_registry: Address,
    /// Blocks per `eth_getLogs` request when scanning registration events.
    #[serde(default = "default_query_block_range")]
    pub query_block_range: u64,
}

fn default_query_block_range() -> u64 {
    DEFAULT_QUERY_BLOCK_RANGE
}

impl ChainReaderConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::UnableToParseFile)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(ConfigError::UnableToOpenFile)?;
        let config: Self = serde_yaml::from_reader(file).map_err(ConfigError::UnableToParseFile)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.query_block_range == 0 {
            return Err(ConfigError::ZeroQueryBlockRange);
        }
        Ok(())
    }
}
