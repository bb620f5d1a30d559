// Launch Orchestrator
// Composes check sequencing, command resolution, and process
// supervision into the single user-facing "run" operation.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::application::checks::CheckSequencer;
use crate::application::command::{resolve_command, server_file_invocation};
use crate::application::store::StateHandle;
use crate::domain::{CheckId, GameId, LauncherState, LogEntry, RunStatus, StateEvent};
use crate::error::{AppError, Result};
use crate::port::{
    CheckRegistry, GameCatalog, HostInfo, IdProvider, LaunchError, ProcessEvent, ProcessSpawner,
    TimeProvider,
};

/// Orchestrates the pre-flight checks and the supervised launch of
/// the configured server process
pub struct LaunchOrchestrator {
    store: StateHandle,
    checks: CheckSequencer,
    spawner: Arc<dyn ProcessSpawner>,
    host: Arc<dyn HostInfo>,
    catalog: Arc<dyn GameCatalog>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl LaunchOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: StateHandle,
        registry: Arc<dyn CheckRegistry>,
        spawner: Arc<dyn ProcessSpawner>,
        host: Arc<dyn HostInfo>,
        catalog: Arc<dyn GameCatalog>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            checks: CheckSequencer::new(store.clone(), registry),
            store,
            spawner,
            host,
            catalog,
            id_provider,
            time_provider,
        }
    }

    /// Shared state handle (for subscribers and composition roots)
    pub fn store(&self) -> &StateHandle {
        &self.store
    }

    /// Switch the selected game: resets every check to idle, replaces
    /// the check list with the game's configured ids, and applies the
    /// catalog defaults for port and command
    pub fn select_game(&self, game: GameId) {
        info!(game = %game, "Game selected");
        self.store.apply(StateEvent::GameSelected {
            game,
            port: self.catalog.local_port(game),
            check_ids: self.catalog.check_list(game),
            command: self.catalog.default_command(game),
        });
    }

    pub fn update_command(&self, command: impl Into<String>) {
        self.store.apply(StateEvent::CommandUpdated {
            command: command.into(),
        });
    }

    pub fn update_port(&self, port: u16) {
        self.store.apply(StateEvent::PortUpdated { port });
    }

    pub fn update_working_dir(&self, working_dir: impl Into<std::path::PathBuf>) {
        self.store.apply(StateEvent::WorkingDirUpdated {
            working_dir: working_dir.into(),
        });
    }

    /// Choose a server file: derives its containing directory as the
    /// working dir and a default java invocation naming the file
    pub fn select_server_file(&self, filepath: &Path) -> Result<()> {
        let (working_dir, command) = server_file_invocation(filepath)?;
        self.store.apply(StateEvent::ServerFileSelected {
            filepath: filepath.to_path_buf(),
            working_dir,
            command,
        });
        Ok(())
    }

    /// Run a single check (see [`CheckSequencer::run_check`])
    pub async fn run_check(&self, id: &CheckId) -> Result<()> {
        self.checks.run_check(id).await
    }

    /// Run all checks of the current target in configured order
    pub async fn run_checks(&self) -> Result<()> {
        self.checks.run_checks().await
    }

    /// Spawn the configured command and supervise it to termination.
    ///
    /// # Errors
    /// - LaunchError::AlreadyRunning if a launch is in flight
    /// - LaunchError::CommandNotSet if no command is configured
    /// - LaunchError::EmptyCommand / SpawnFailed / StatusCode per the
    ///   launch taxonomy
    pub async fn launch(&self) -> Result<()> {
        // guard and transition under one lock so two concurrent
        // launches cannot both pass
        let started = self.store.apply_if(
            |state| state.status != RunStatus::Running,
            StateEvent::LaunchStarted,
        );
        if !started {
            return Err(LaunchError::AlreadyRunning.into());
        }

        let snapshot = self.store.snapshot();
        let result = self.launch_inner(&snapshot).await;
        match &result {
            Ok(()) => {
                info!("Launch completed");
                self.store.apply(StateEvent::LaunchSucceeded);
            }
            Err(e) => {
                error!(error = %e, "Launch failed");
                self.store.apply(StateEvent::LaunchFailed {
                    error: e.to_string(),
                });
            }
        }
        result
    }

    async fn launch_inner(&self, snapshot: &LauncherState) -> Result<()> {
        let command = snapshot
            .command
            .as_deref()
            .ok_or(LaunchError::CommandNotSet)?;

        let spec = resolve_command(
            command,
            snapshot.working_dir.as_deref(),
            self.host.os_family(),
        )?;

        info!(program = %spec.program, args = ?spec.args, "Spawning process");
        let spawned = self.spawner.spawn(&spec).await?;

        // Record the handle before awaiting termination so a
        // concurrent kill request can always find the live process
        self.store.apply(StateEvent::ProcessStarted {
            handle: spawned.handle,
        });

        self.supervise(spawned.events).await
    }

    /// Drain the process event stream until the terminal event.
    ///
    /// Exit code zero and signal termination both count as success;
    /// a signal means the user (or the kill operation) asked for it.
    /// Anything else, including an unknowable outcome, is a failure.
    async fn supervise(&self, mut events: mpsc::UnboundedReceiver<ProcessEvent>) -> Result<()> {
        while let Some(event) = events.recv().await {
            match event {
                ProcessEvent::Line { channel, line } => {
                    let entry = LogEntry {
                        key: self.id_provider.generate_id(),
                        channel,
                        line,
                        at_ms: self.time_provider.now_millis(),
                    };
                    self.store.apply(StateEvent::OutputLine { entry });
                }
                ProcessEvent::Exited { code, signal } => {
                    info!(code = ?code, signal = ?signal, "Process terminated");
                    return match (code, signal) {
                        (Some(0), _) => Ok(()),
                        (_, Some(_)) => Ok(()),
                        (Some(n), None) => Err(LaunchError::StatusCode(n).into()),
                        // neither a code nor a signal: the outcome is
                        // unknown and must not pass for success
                        (None, None) => Err(AppError::Internal(
                            "process terminated without an exit code or signal".to_string(),
                        )),
                    };
                }
                ProcessEvent::WaitFailed { error } => {
                    error!(error = %error, "Failed to await process termination");
                    return Err(AppError::Internal(format!(
                        "failed to await process termination: {}",
                        error
                    )));
                }
            }
        }
        Err(AppError::Internal(
            "process event stream closed before termination".to_string(),
        ))
    }

    /// Request termination of the running process.
    ///
    /// Killing nothing is not an error. The bookkeeping handle is
    /// cleared whether or not the OS accepted the request, to avoid a
    /// stuck reference to a dead process.
    pub async fn kill(&self) -> Result<()> {
        let Some(handle) = self.store.snapshot().process else {
            self.store.apply(StateEvent::KillSucceeded);
            return Ok(());
        };

        info!(pid = handle.pid, "Kill requested");
        match self.spawner.kill(&handle).await {
            Ok(()) => {
                self.store.apply(StateEvent::KillSucceeded);
                Ok(())
            }
            Err(e) => {
                error!(pid = handle.pid, error = %e, "Kill failed");
                self.store.apply(StateEvent::KillFailed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Run all checks, then launch only if every one succeeded.
    ///
    /// A check failure or fault aborts before any process is spawned,
    /// so check failure and launch failure are mutually exclusive
    /// outcomes of this composite operation.
    pub async fn run_checks_and_launch(&self) -> Result<()> {
        self.run_checks().await?;
        self.launch().await
    }
}
