// Launcher State - the single observable state container
//
// Mutated exclusively through apply(StateEvent); the application layer
// wraps this in a shared handle that makes each apply atomic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::check::{Check, CheckId, CheckStatus};
use crate::domain::event::StateEvent;
use crate::domain::game::GameId;

/// Aggregate status of the launch operation (distinct from the status
/// of any individual check)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Which standard stream a process output line arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogChannel {
    Stdout,
    Stderr,
}

impl std::fmt::Display for LogChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogChannel::Stdout => write!(f, "stdout"),
            LogChannel::Stderr => write!(f, "stderr"),
        }
    }
}

/// One line of captured process output.
///
/// Key and timestamp are injected via the IdProvider / TimeProvider
/// ports so the log stays deterministic under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub key: String,
    pub channel: LogChannel,
    pub line: String,
    pub at_ms: i64,
}

/// Handle to a live spawned process.
///
/// Held in the state only while the process is alive; cleared on
/// normal exit, error exit, or explicit kill. Consumers must treat
/// "absent" as "no process running".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHandle {
    pub pid: u32,
}

/// Full launcher state: target configuration, check results, message
/// log, and the live process handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherState {
    pub status: RunStatus,
    pub error: Option<String>,
    pub messages: Vec<LogEntry>,
    pub command: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub filepath: Option<PathBuf>,
    pub port: u16,
    pub game: GameId,
    pub checks: Vec<Check>,
    pub process: Option<ProcessHandle>,
}

impl LauncherState {
    /// Create the initial state for a game target.
    ///
    /// `check_ids` and `command` come from the game catalog; checks
    /// start Idle in configured order.
    pub fn new(
        game: GameId,
        port: u16,
        check_ids: Vec<CheckId>,
        command: Option<String>,
    ) -> Self {
        Self {
            status: RunStatus::Idle,
            error: None,
            messages: Vec::new(),
            command,
            working_dir: None,
            filepath: None,
            port,
            game,
            checks: check_ids.into_iter().map(Check::new).collect(),
            process: None,
        }
    }

    /// Look up a check by id
    pub fn check(&self, id: &CheckId) -> Option<&Check> {
        self.checks.iter().find(|c| &c.id == id)
    }

    fn check_mut(&mut self, id: &CheckId) -> Option<&mut Check> {
        self.checks.iter_mut().find(|c| &c.id == id)
    }

    /// Apply one typed event.
    ///
    /// Events addressing a check id that is not in the current list
    /// are ignored; the check runner validates ids up front.
    pub fn apply(&mut self, event: &StateEvent) {
        match event {
            StateEvent::CheckStarted { id } => {
                if let Some(check) = self.check_mut(id) {
                    check.status = CheckStatus::Running;
                    check.message.clear();
                }
            }
            StateEvent::CheckSucceeded { id, message } => {
                if let Some(check) = self.check_mut(id) {
                    check.status = CheckStatus::Succeeded;
                    check.message = message.clone();
                }
            }
            StateEvent::CheckFailed { id, message } => {
                if let Some(check) = self.check_mut(id) {
                    check.status = CheckStatus::Failed;
                    check.message = message.clone();
                }
            }
            StateEvent::LaunchStarted => {
                self.status = RunStatus::Running;
                self.error = None;
            }
            StateEvent::LaunchSucceeded => {
                self.status = RunStatus::Succeeded;
                self.error = None;
                self.process = None;
            }
            StateEvent::LaunchFailed { error } => {
                self.status = RunStatus::Failed;
                self.error = Some(error.clone());
                self.process = None;
            }
            StateEvent::KillSucceeded => {
                self.status = RunStatus::Succeeded;
                self.process = None;
            }
            StateEvent::KillFailed { error } => {
                self.status = RunStatus::Failed;
                self.error = Some(error.clone());
                self.process = None;
            }
            StateEvent::ProcessStarted { handle } => {
                self.process = Some(*handle);
            }
            StateEvent::OutputLine { entry } => {
                self.messages.push(entry.clone());
            }
            StateEvent::CommandUpdated { command } => {
                self.command = Some(command.clone());
            }
            StateEvent::PortUpdated { port } => {
                self.port = *port;
            }
            StateEvent::WorkingDirUpdated { working_dir } => {
                self.working_dir = Some(working_dir.clone());
            }
            StateEvent::GameSelected {
                game,
                port,
                check_ids,
                command,
            } => {
                self.game = *game;
                self.port = *port;
                self.checks = check_ids.iter().cloned().map(Check::new).collect();
                self.filepath = None;
                self.working_dir = None;
                self.command = command.clone();
            }
            StateEvent::ServerFileSelected {
                filepath,
                working_dir,
                command,
            } => {
                self.filepath = Some(filepath.clone());
                self.working_dir = Some(working_dir.clone());
                self.command = Some(command.clone());
            }
        }
    }
}
