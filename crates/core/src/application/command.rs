// Command Resolution
// Turns the configured command text into a concrete spawn
// specification. Pure apart from the injected OS family.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::port::host_info::OsFamily;
use crate::port::{LaunchError, SpawnSpec};

const WINDOWS_SHELL: &str = "cmd";
const WINDOWS_SHELL_FLAG: &str = "/c";
const POSIX_SHELL: &str = "sh";
const POSIX_SHELL_FLAG: &str = "-c";

/// Resolve command text into a spawn specification.
///
/// `java` and `docker` programs are invoked directly with the split
/// argument vector. Everything else goes through the platform shell
/// with the full original text, preserving quoting and globbing that
/// naive whitespace-splitting would destroy.
pub fn resolve_command(
    text: &str,
    working_dir: Option<&Path>,
    os_family: OsFamily,
) -> std::result::Result<SpawnSpec, LaunchError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }

    let mut tokens = trimmed.split_whitespace();
    // split_whitespace on non-empty trimmed text always yields a token
    let first = tokens.next().unwrap_or_default();
    let working_dir = working_dir.map(Path::to_path_buf);

    let spec = match first {
        "java" | "docker" => SpawnSpec {
            program: first.to_string(),
            args: tokens.map(str::to_string).collect(),
            working_dir,
        },
        _ => match os_family {
            OsFamily::Windows => SpawnSpec {
                program: WINDOWS_SHELL.to_string(),
                args: vec![WINDOWS_SHELL_FLAG.to_string(), trimmed.to_string()],
                working_dir,
            },
            OsFamily::Unix => SpawnSpec {
                program: POSIX_SHELL.to_string(),
                args: vec![POSIX_SHELL_FLAG.to_string(), trimmed.to_string()],
                working_dir,
            },
        },
    };

    Ok(spec)
}

/// Derive the working directory and default invocation for a chosen
/// server file (e.g. a Minecraft server jar).
///
/// # Errors
/// - AppError::Config if the path has no containing directory
pub fn server_file_invocation(filepath: &Path) -> Result<(PathBuf, String)> {
    let dir = filepath
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| {
            AppError::Config(format!(
                "cannot derive working directory from {}",
                filepath.display()
            ))
        })?;

    let command = format!(
        "java -Xmx1024M -Xms1024M -jar {} nogui",
        filepath.display()
    );

    Ok((dir.to_path_buf(), command))
}
