// Process Spawner Port
// Abstraction over the OS: spawn a process, stream its output as
// events, request termination

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{LogChannel, ProcessHandle};

/// Concrete spawn specification produced by command resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Event emitted by a supervised process.
///
/// Lines are delivered in strict arrival order per stream; the
/// interleaving between stdout and stderr is best-effort. Exactly one
/// terminal event (`Exited` or `WaitFailed`) closes the stream, sent
/// after both pipe readers drain.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Line { channel: LogChannel, line: String },
    Exited {
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// The OS wait for the child failed; the process outcome is
    /// unknown and must not be reported as success
    WaitFailed { error: String },
}

/// A successfully spawned process: its handle plus the event stream
/// feeding the supervisor
pub struct SpawnedProcess {
    pub handle: ProcessHandle,
    pub events: mpsc::UnboundedReceiver<ProcessEvent>,
}

/// Launch failure taxonomy surfaced to callers.
///
/// Every expected launch failure maps to exactly one variant;
/// unexpected faults propagate as AppError::Internal instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("command is not set")]
    CommandNotSet,

    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to spawn process: {0}")]
    SpawnFailed(String),

    #[error("process exited with status code {0}")]
    StatusCode(i32),

    #[error("a launch is already running")]
    AlreadyRunning,

    #[error("failed to kill process: {0}")]
    KillFailed(String),
}

/// Process spawner port
///
/// Implementations:
/// - OsProcessSpawner (infra-system): tokio child processes
/// - mocks::MockProcessSpawner: scripted lifecycles for tests
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Start the process described by `spec`
    ///
    /// # Errors
    /// - LaunchError::SpawnFailed if the OS refuses to start it
    async fn spawn(&self, spec: &SpawnSpec) -> Result<SpawnedProcess, LaunchError>;

    /// Request termination of a live process.
    ///
    /// Termination is observed through the process's own event stream
    /// (signal exit), not through this call completing.
    ///
    /// # Errors
    /// - LaunchError::KillFailed if the OS rejects the request
    async fn kill(&self, handle: &ProcessHandle) -> Result<(), LaunchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Scripted lifecycle of a mock process
    #[derive(Debug, Clone)]
    pub enum MockLifecycle {
        /// Emit the lines, then exit with the given code
        ExitWith {
            lines: Vec<(LogChannel, String)>,
            code: i32,
        },
        /// Stay alive until kill() is called, then exit via signal
        RunUntilKilled,
        /// Refuse to spawn
        FailSpawn(String),
        /// Terminate without an exit code or signal
        ExitWithoutStatus,
        /// Report a failed OS wait instead of an exit status
        FailWait(String),
    }

    /// Mock ProcessSpawner with a scripted lifecycle
    pub struct MockProcessSpawner {
        lifecycle: MockLifecycle,
        spawn_count: Arc<Mutex<usize>>,
        kill_count: Arc<Mutex<usize>>,
        // Held open for RunUntilKilled so kill() can deliver the
        // terminating signal event
        live_sender: Arc<Mutex<Option<mpsc::UnboundedSender<ProcessEvent>>>>,
        kill_result: Mutex<Result<(), LaunchError>>,
    }

    impl MockProcessSpawner {
        pub fn new(lifecycle: MockLifecycle) -> Self {
            Self {
                lifecycle,
                spawn_count: Arc::new(Mutex::new(0)),
                kill_count: Arc::new(Mutex::new(0)),
                live_sender: Arc::new(Mutex::new(None)),
                kill_result: Mutex::new(Ok(())),
            }
        }

        pub fn exit_with_code(code: i32) -> Self {
            Self::new(MockLifecycle::ExitWith {
                lines: Vec::new(),
                code,
            })
        }

        pub fn fail_spawn(diagnostic: impl Into<String>) -> Self {
            Self::new(MockLifecycle::FailSpawn(diagnostic.into()))
        }

        /// Make the next kill() call fail at the OS level
        pub fn reject_kills(self, error: LaunchError) -> Self {
            *self.kill_result.lock().unwrap() = Err(error);
            self
        }

        pub fn spawn_count(&self) -> usize {
            *self.spawn_count.lock().unwrap()
        }

        pub fn kill_count(&self) -> usize {
            *self.kill_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProcessSpawner for MockProcessSpawner {
        async fn spawn(&self, _spec: &SpawnSpec) -> Result<SpawnedProcess, LaunchError> {
            *self.spawn_count.lock().unwrap() += 1;

            let (tx, rx) = mpsc::unbounded_channel();

            match &self.lifecycle {
                MockLifecycle::ExitWith { lines, code } => {
                    for (channel, line) in lines {
                        let _ = tx.send(ProcessEvent::Line {
                            channel: *channel,
                            line: line.clone(),
                        });
                    }
                    let _ = tx.send(ProcessEvent::Exited {
                        code: Some(*code),
                        signal: None,
                    });
                }
                MockLifecycle::RunUntilKilled => {
                    *self.live_sender.lock().unwrap() = Some(tx);
                }
                MockLifecycle::FailSpawn(diagnostic) => {
                    return Err(LaunchError::SpawnFailed(diagnostic.clone()));
                }
                MockLifecycle::ExitWithoutStatus => {
                    let _ = tx.send(ProcessEvent::Exited {
                        code: None,
                        signal: None,
                    });
                }
                MockLifecycle::FailWait(error) => {
                    let _ = tx.send(ProcessEvent::WaitFailed {
                        error: error.clone(),
                    });
                }
            }

            Ok(SpawnedProcess {
                handle: ProcessHandle { pid: 4242 },
                events: rx,
            })
        }

        async fn kill(&self, _handle: &ProcessHandle) -> Result<(), LaunchError> {
            *self.kill_count.lock().unwrap() += 1;

            let result = self.kill_result.lock().unwrap().clone();
            if result.is_ok() {
                if let Some(tx) = self.live_sender.lock().unwrap().take() {
                    let _ = tx.send(ProcessEvent::Exited {
                        code: None,
                        signal: Some(15),
                    });
                }
            }
            result
        }
    }
}
