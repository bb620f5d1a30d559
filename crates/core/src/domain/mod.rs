// Domain Layer - pure state model for the launch orchestrator

pub mod check;
pub mod error;
pub mod event;
pub mod game;
pub mod state;

pub use check::{Check, CheckId, CheckStatus};
pub use error::DomainError;
pub use event::StateEvent;
pub use game::GameId;
pub use state::{LauncherState, LogChannel, LogEntry, ProcessHandle, RunStatus};
