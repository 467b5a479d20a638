use std::io;

use alloy_primitives::Address;
use alloy_transport::TransportError;
use avs_primitives::{bls::PointError, BlockNumberOverflow};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The config file could not be opened: {0}")]
    /// The config file could not be opened.
    UnableToOpenFile(io::Error),
    #[error("The config file could not be parsed as YAML: {0}")]
    /// The config file could not be parsed as YAML.
    UnableToParseFile(serde_yaml::Error),
    #[error("query_block_range must be greater than zero")]
    ZeroQueryBlockRange,
}

#[derive(Debug, thiserror::Error)]
pub enum ChainReaderError {
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy_contract::Error),
    #[error("rpc request failed: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    BlockNumberOverflow(#[from] BlockNumberOverflow),
    #[error("operator {operator} registered an invalid public key: {source}")]
    InvalidPubkey {
        operator: Address,
        #[source]
        source: PointError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
