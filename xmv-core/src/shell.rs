// command execution - runs rename tool invocations through the user's shell

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::XmvError;

pub const DEFAULT_SHELL: &str = "zsh";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// what a finished (or killed) command left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed, by us on timeout or by a signal
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }
}

/// capability to run one shell command line
///
/// a non-zero exit is an ordinary return; only failing to start or wait on
/// the command is an error
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn execute(&self, command: &str, limit: Duration) -> Result<CommandOutput, XmvError>;
}

/// runs commands as `<shell> -ic <command>` so aliases and functions from the
/// user's interactive config are available
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    /// resolve `shell` on PATH; fails before anything is run if it is missing
    pub fn locate(shell: &str) -> Result<Self, XmvError> {
        let path = which::which(shell).map_err(|source| XmvError::ShellNotFound {
            shell: shell.to_string(),
            source,
        })?;
        debug!(shell = %path.display(), "resolved shell");
        Ok(Self { shell: path })
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn execute(&self, command: &str, limit: Duration) -> Result<CommandOutput, XmvError> {
        let child = Command::new(&self.shell)
            .arg("-ic")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| XmvError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // dropping the wait future on timeout drops the child, which kills it
        let output = match timeout(limit, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| XmvError::Spawn {
                command: command.to_string(),
                source,
            })?,
            Err(_) => {
                debug!(command, ?limit, "command timed out and was killed");
                return Ok(CommandOutput::timed_out());
            }
        };

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            timed_out: false,
        })
    }
}
