// OS process spawner implementation
// tokio child processes with line-oriented output streaming

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use portside_core::domain::{LogChannel, ProcessHandle};
use portside_core::port::{
    LaunchError, ProcessEvent, ProcessSpawner, SpawnSpec, SpawnedProcess,
};

/// Process spawner backed by tokio::process.
///
/// Each spawned child gets two pipe reader tasks feeding one event
/// sink, plus a supervision task that waits for termination, joins
/// the readers, and emits the terminal Exited event last.
pub struct OsProcessSpawner;

impl OsProcessSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsProcessSpawner {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream one pipe line-by-line into the shared event sink
fn stream_lines<R>(
    reader: R,
    channel: LogChannel,
    tx: mpsc::UnboundedSender<ProcessEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(ProcessEvent::Line { channel, line }).is_err() {
                // receiver dropped; stop reading
                break;
            }
        }
    })
}

#[async_trait]
impl ProcessSpawner for OsProcessSpawner {
    async fn spawn(&self, spec: &SpawnSpec) -> Result<SpawnedProcess, LaunchError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(e.to_string()))?;
        let pid = child.id().ok_or_else(|| {
            LaunchError::SpawnFailed("process exited before a pid was assigned".to_string())
        })?;

        info!(pid, program = %spec.program, "Child process spawned");

        let (tx, rx) = mpsc::unbounded_channel();
        let stdout_task = child
            .stdout
            .take()
            .map(|out| stream_lines(out, LogChannel::Stdout, tx.clone()));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| stream_lines(err, LogChannel::Stderr, tx.clone()));

        tokio::spawn(async move {
            let status = child.wait().await;

            // Join both readers before reporting termination so every
            // output line precedes the terminal event
            if let Some(task) = stdout_task {
                let _ = task.await;
            }
            if let Some(task) = stderr_task {
                let _ = task.await;
            }

            match status {
                Ok(status) => {
                    let code = status.code();
                    #[cfg(unix)]
                    let signal = {
                        use std::os::unix::process::ExitStatusExt;
                        status.signal()
                    };
                    #[cfg(not(unix))]
                    let signal = None;

                    info!(pid, code = ?code, signal = ?signal, "Child process terminated");
                    let _ = tx.send(ProcessEvent::Exited { code, signal });
                }
                Err(e) => {
                    warn!(pid, error = %e, "Failed to await child process");
                    let _ = tx.send(ProcessEvent::WaitFailed {
                        error: e.to_string(),
                    });
                }
            }
        });

        Ok(SpawnedProcess {
            handle: ProcessHandle { pid },
            events: rx,
        })
    }

    async fn kill(&self, handle: &ProcessHandle) -> Result<(), LaunchError> {
        #[cfg(unix)]
        {
            use nix::errno::Errno;
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            info!(pid = handle.pid, "Sending SIGTERM");
            match kill(Pid::from_raw(handle.pid as i32), Signal::SIGTERM) {
                Ok(()) => Ok(()),
                // already exited: killing a dead process is not an error
                Err(Errno::ESRCH) => Ok(()),
                Err(e) => Err(LaunchError::KillFailed(format!("SIGTERM failed: {}", e))),
            }
        }

        #[cfg(windows)]
        {
            use std::process::Command;

            info!(pid = handle.pid, "Killing process on Windows");
            let output = Command::new("taskkill")
                .args(["/F", "/PID", &handle.pid.to_string()])
                .output()
                .map_err(|e| LaunchError::KillFailed(e.to_string()))?;

            if !output.status.success() {
                return Err(LaunchError::KillFailed(format!(
                    "taskkill failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                )));
            }

            Ok(())
        }
    }
}
