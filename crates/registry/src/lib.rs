//! Block-pinned operator and quorum state of an AVS, read from its registry contracts.

pub mod chain_caller;
pub mod chain_state;
mod error;
pub mod fake;
pub mod opts;
pub mod provider;
pub mod service;

pub use self::chain_caller::{aggregate_quorum_states, AvsRegistryServiceChainCaller};
pub use self::chain_state::{OperatorInfoIndex, RegistryChainState, RegistryReader};
pub use self::error::*;
pub use self::fake::{FakeAvsRegistryService, FakeChainState, TestOperator};
pub use self::opts::CallOpts;
pub use self::provider::{ChainStateProvider, OperatorWithStake, ResolvedCheckpointIndices};
pub use self::service::AvsRegistryService;

#[cfg(any(test, feature = "mock"))]
pub use self::chain_state::MockRegistryReader;
#[cfg(any(test, feature = "mock"))]
pub use self::provider::MockChainStateProvider;
