// Port Layer - Interfaces for external dependencies

pub mod check_registry;
pub mod game_catalog;
pub mod host_info;
pub mod id_provider; // For deterministic testing
pub mod process_spawner;
pub mod time_provider;

// Re-exports
pub use check_registry::{CheckError, CheckRegistry, CheckResult};
pub use game_catalog::{GameCatalog, StaticGameCatalog};
pub use host_info::{HostInfo, OsFamily, SystemHostInfo};
pub use id_provider::IdProvider;
pub use process_spawner::{
    LaunchError, ProcessEvent, ProcessSpawner, SpawnSpec, SpawnedProcess,
};
pub use time_provider::TimeProvider;
