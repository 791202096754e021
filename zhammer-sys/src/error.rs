// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("shell not found: {0}")]
    ShellNotFound(String),

    #[error("failed to spawn `{command}`: {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("failed to write {path:?}: {reason}")]
    AttributeWrite { path: PathBuf, reason: String },
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
