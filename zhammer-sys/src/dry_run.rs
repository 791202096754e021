// SPDX-License-Identifier: GPL-3.0-only

//! Stand-ins that log what would happen without touching the host

use tracing::info;

use crate::command::CommandExecutor;
use crate::control::DeviceControlSurface;
use crate::error::Result;

/// Logs each command and reports empty output.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn run(&self, command: &str) -> Result<String> {
        info!("[dry-run] {}", command);
        Ok(String::new())
    }
}

/// Logs each control write and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunControl;

impl DeviceControlSurface for DryRunControl {
    fn write_size(&self, index: u32, bytes: u64) -> Result<()> {
        info!("[dry-run] echo {} > zram{}/disksize", bytes, index);
        Ok(())
    }

    fn write_reset(&self, index: u32) -> Result<()> {
        info!("[dry-run] echo 1 > zram{}/reset", index);
        Ok(())
    }
}
