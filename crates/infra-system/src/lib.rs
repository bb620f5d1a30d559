// Portside Infrastructure - System Adapters
// Implements: ProcessSpawner, CheckRegistry

pub mod os_spawner;
pub mod system_checks;

pub use os_spawner::OsProcessSpawner;
pub use system_checks::SystemCheckRegistry;
