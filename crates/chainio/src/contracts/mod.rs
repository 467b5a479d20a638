pub mod bls_apk_registry;
pub mod operator_state_retriever;
pub mod registry_coordinator;
pub mod stake_registry;

pub use self::bls_apk_registry::IBLSApkRegistry;
pub use self::operator_state_retriever::IOperatorStateRetriever;
pub use self::registry_coordinator::IRegistryCoordinator;
pub use self::stake_registry::IStakeRegistry;
