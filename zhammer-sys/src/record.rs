// SPDX-License-Identifier: GPL-3.0-only

//! Recording collaborators
//!
//! `RecordingExecutor` answers commands from a table of scripted outputs
//! keyed by command prefix and remembers every command it was given.
//! `RecordingControl` remembers every control write and can be told to
//! fail them.

use std::cell::RefCell;

use crate::command::CommandExecutor;
use crate::control::DeviceControlSurface;
use crate::error::{Result, SysError};

#[derive(Debug, Default)]
pub struct RecordingExecutor {
    responses: Vec<(String, String)>,
    unavailable: bool,
    commands: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any command starting with `prefix` with `output`. The first
    /// matching prefix wins.
    pub fn respond(mut self, prefix: &str, output: &str) -> Self {
        self.responses.push((prefix.to_string(), output.to_string()));
        self
    }

    /// Make every command fail to spawn.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.commands.borrow().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, command: &str) -> Result<String> {
        self.commands.borrow_mut().push(command.to_string());
        if self.unavailable {
            return Err(SysError::SpawnFailed {
                command: command.to_string(),
                reason: "executor unavailable".to_string(),
            });
        }
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlWrite {
    Size { index: u32, bytes: u64 },
    Reset { index: u32 },
}

#[derive(Debug, Default)]
pub struct RecordingControl {
    failing: bool,
    writes: RefCell<Vec<ControlWrite>>,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record writes but report each one as failed.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<ControlWrite> {
        self.writes.borrow().clone()
    }

    fn record(&self, write: ControlWrite) -> Result<()> {
        self.writes.borrow_mut().push(write);
        if self.failing {
            return Err(SysError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such device",
            )));
        }
        Ok(())
    }
}

impl DeviceControlSurface for RecordingControl {
    fn write_size(&self, index: u32, bytes: u64) -> Result<()> {
        self.record(ControlWrite::Size { index, bytes })
    }

    fn write_reset(&self, index: u32) -> Result<()> {
        self.record(ControlWrite::Reset { index })
    }
}
