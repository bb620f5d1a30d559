// Application Layer - orchestration services over domain + ports

pub mod checks;
pub mod command;
pub mod launcher;
pub mod store;

pub use checks::CheckSequencer;
pub use launcher::LaunchOrchestrator;
pub use store::StateHandle;
