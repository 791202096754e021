// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a zhammer run.
///
/// Failures of individual activation steps are not errors; they are
/// recorded as [`crate::Outcome::Tolerated`] in the transition report.
#[derive(Debug, Error)]
pub enum ZhammerError {
    #[error("Invalid ztab entry line `{line}`: {reason}")]
    TabEntry { line: String, reason: String },

    #[error("Invalid Size Specification: {0}")]
    InvalidSizeSpecification(String),

    #[error("no such entry: {0}")]
    NoSuchEntry(String),

    #[error("Do what now? name a device or pass --all")]
    UsageAmbiguous,

    #[error("cannot read ztab {path:?}: {source}")]
    ZtabIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ZhammerError {
    pub(crate) fn tab_entry(line: &str, reason: impl Into<String>) -> Self {
        Self::TabEntry {
            line: line.trim().to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoSuchEntry(_) => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZhammerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_exits_with_one() {
        assert_eq!(ZhammerError::NoSuchEntry("swap9".into()).exit_code(), 1);
    }

    #[test]
    fn everything_else_exits_with_two() {
        assert_eq!(ZhammerError::UsageAmbiguous.exit_code(), 2);
        assert_eq!(ZhammerError::tab_entry("x", "bad").exit_code(), 2);
        assert_eq!(
            ZhammerError::InvalidSizeSpecification("4X".into()).exit_code(),
            2
        );
    }

    #[test]
    fn tab_entry_carries_the_line() {
        let err = ZhammerError::tab_entry("  0 swap0 bogus 1G  ", "unknown type `bogus`");
        let msg = err.to_string();
        assert!(msg.contains("`0 swap0 bogus 1G`"));
        assert!(msg.contains("unknown type"));
    }
}
