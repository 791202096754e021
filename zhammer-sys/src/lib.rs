// SPDX-License-Identifier: GPL-3.0-only

//! Host-facing collaborators for zram lifecycle management
//!
//! Everything that touches the running system lives here:
//! - Running shell commands and capturing their output
//! - Writing zram size/reset attributes under sysfs
//! - Dry-run and recording stand-ins for both
//!
//! The lifecycle engine only ever sees the two traits, so the whole
//! activation protocol can run against the recording stand-ins in tests.

pub mod command;
pub mod control;
pub mod dry_run;
pub mod error;
pub mod record;

pub use command::{CommandExecutor, ShellExecutor};
pub use control::{DeviceControlSurface, SysfsControl, DEFAULT_SYSFS_ROOT};
pub use dry_run::{DryRunControl, DryRunExecutor};
pub use error::{Result, SysError};
pub use record::{ControlWrite, RecordingControl, RecordingExecutor};
