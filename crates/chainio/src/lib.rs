//! Chain access for the AVS registry contracts.

pub mod config;
pub mod contracts;
pub mod conversions;
mod error;
pub mod reader;
pub mod types;

pub use self::config::ChainReaderConfig;
pub use self::error::*;
pub use self::reader::AvsRegistryChainReader;
pub use self::types::*;
