// SPDX-License-Identifier: GPL-3.0-only

//! zram device control attributes under sysfs

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, SysError};

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/block";

/// Writes the per-device control attributes of a zram device.
pub trait DeviceControlSurface {
    /// Write `disksize` for `/dev/zram<index>`
    fn write_size(&self, index: u32, bytes: u64) -> Result<()>;

    /// Write `reset` for `/dev/zram<index>`
    fn write_reset(&self, index: u32) -> Result<()>;
}

/// Real sysfs-backed control surface rooted at `/sys/block` by default
#[derive(Debug, Clone)]
pub struct SysfsControl {
    root: PathBuf,
}

impl Default for SysfsControl {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl SysfsControl {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn attribute_path(&self, index: u32, attribute: &str) -> PathBuf {
        self.root.join(format!("zram{index}")).join(attribute)
    }

    fn write_attribute(&self, index: u32, attribute: &str, value: &str) -> Result<()> {
        let path = self.attribute_path(index, attribute);
        debug!("Writing {:?} to {:?}", value.trim_end(), path);
        fs::write(&path, value).map_err(|e| SysError::AttributeWrite {
            path,
            reason: e.to_string(),
        })
    }
}

impl DeviceControlSurface for SysfsControl {
    fn write_size(&self, index: u32, bytes: u64) -> Result<()> {
        self.write_attribute(index, "disksize", &format!("{bytes}\n"))
    }

    fn write_reset(&self, index: u32) -> Result<()> {
        self.write_attribute(index, "reset", "1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("zhammer-sysfs-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("zram0")).unwrap();
        root
    }

    #[test]
    fn writes_disksize_with_trailing_newline() {
        let root = scratch_root("size");
        let control = SysfsControl::new(&root);

        control.write_size(0, 4096).unwrap();

        let written = fs::read_to_string(root.join("zram0/disksize")).unwrap();
        assert_eq!(written, "4096\n");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn writes_reset_flag() {
        let root = scratch_root("reset");
        let control = SysfsControl::new(&root);

        control.write_reset(0).unwrap();

        let written = fs::read_to_string(root.join("zram0/reset")).unwrap();
        assert_eq!(written, "1");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_device_reports_attribute_path() {
        let root = scratch_root("missing");
        let control = SysfsControl::new(&root);

        let err = control.write_reset(7).unwrap_err();
        match err {
            SysError::AttributeWrite { path, .. } => assert!(path.ends_with("zram7/reset")),
            other => panic!("unexpected error: {other}"),
        }
        let _ = fs::remove_dir_all(&root);
    }
}
