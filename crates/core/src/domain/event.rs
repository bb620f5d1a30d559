// State Events - the closed set of mutations the launcher state accepts
//
// Every observable transition of the orchestrator is expressed as one
// of these events; components never write state fields directly.

use std::path::PathBuf;

use crate::domain::check::CheckId;
use crate::domain::game::GameId;
use crate::domain::state::{LogEntry, ProcessHandle};

/// Typed mutation applied to [`LauncherState`](crate::domain::LauncherState)
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// A check probe started; clears its previous message
    CheckStarted { id: CheckId },
    /// A check probe resolved with a result payload
    CheckSucceeded { id: CheckId, message: String },
    /// A check probe failed with a typed error message
    CheckFailed { id: CheckId, message: String },

    /// The aggregate launch operation began
    LaunchStarted,
    /// The launched process terminated successfully
    LaunchSucceeded,
    /// The launch attempt failed; carries the reportable error text
    LaunchFailed { error: String },

    /// A kill request completed (killing nothing also succeeds)
    KillSucceeded,
    /// The OS refused the kill request
    KillFailed { error: String },

    /// A process was spawned; recorded before termination is awaited
    /// so a concurrent kill can always find the live handle
    ProcessStarted { handle: ProcessHandle },
    /// One line of process output arrived
    OutputLine { entry: LogEntry },

    /// The configured command text changed
    CommandUpdated { command: String },
    /// The configured local port changed
    PortUpdated { port: u16 },
    /// The working directory for the spawned process changed
    WorkingDirUpdated { working_dir: PathBuf },
    /// The selected game changed; resets checks and target fields.
    /// Carries the catalog data resolved by the orchestrator so the
    /// state transition itself stays pure.
    GameSelected {
        game: GameId,
        port: u16,
        check_ids: Vec<CheckId>,
        command: Option<String>,
    },
    /// A server file was chosen; derives workdir and default command
    ServerFileSelected {
        filepath: PathBuf,
        working_dir: PathBuf,
        command: String,
    },
}
