// SPDX-License-Identifier: GPL-3.0-only

//! Shell command execution
//!
//! Commands are plain strings handed to `sh -c`. A nonzero exit status is
//! not an error: whatever the command printed on stdout is returned.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, trace};
use which::which;

use crate::error::{Result, SysError};

/// Runs a command string and returns its captured standard output.
///
/// Implementations must not fail on a nonzero exit status. An `Err` means
/// the command could not be run at all.
pub trait CommandExecutor {
    fn run(&self, command: &str) -> Result<String>;
}

/// `sh -c` backed executor
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    /// Locate `sh` in PATH
    pub fn new() -> Result<Self> {
        let shell = which("sh").map_err(|e| SysError::ShellNotFound(e.to_string()))?;
        debug!("Using shell at {:?}", shell);
        Ok(Self { shell })
    }

    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) -> Result<String> {
        debug!("Running: {}", command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|e| SysError::SpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            debug!(
                "`{}` exited with {}: {}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        trace!("`{}` output: {}", command, stdout.trim_end());

        Ok(stdout)
    }
}
