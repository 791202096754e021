// SPDX-License-Identifier: GPL-3.0-only

//! Run settings
//!
//! The ztab path comes from the command line, then `ZHAMMER_ZTAB`, then
//! `/etc/ztab`. `ZHAMMER_SYSFS_ROOT` moves the zram control attributes away
//! from `/sys/block`.

use std::ffi::OsString;
use std::path::PathBuf;

use zhammer_sys::DEFAULT_SYSFS_ROOT;

pub const DEFAULT_ZTAB_PATH: &str = "/etc/ztab";
pub const ZTAB_ENV: &str = "ZHAMMER_ZTAB";
pub const SYSFS_ROOT_ENV: &str = "ZHAMMER_SYSFS_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ztab_path: PathBuf,
    pub sysfs_root: PathBuf,
    /// Log commands and control writes instead of performing them
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ztab_path: PathBuf::from(DEFAULT_ZTAB_PATH),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            dry_run: false,
        }
    }
}

impl Settings {
    pub fn resolve(ztab_override: Option<PathBuf>, dry_run: bool) -> Self {
        Self::resolve_with(ztab_override, dry_run, |key| std::env::var_os(key))
    }

    pub fn resolve_with(
        ztab_override: Option<PathBuf>,
        dry_run: bool,
        env: impl Fn(&str) -> Option<OsString>,
    ) -> Self {
        let defaults = Self::default();
        let ztab_path = ztab_override
            .or_else(|| env(ZTAB_ENV).map(PathBuf::from))
            .unwrap_or(defaults.ztab_path);
        let sysfs_root = env(SYSFS_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.sysfs_root);

        Self {
            ztab_path,
            sysfs_root,
            dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn falls_back_to_etc_ztab() {
        let settings = Settings::resolve_with(None, false, no_env);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ztab_path, PathBuf::from("/etc/ztab"));
        assert_eq!(settings.sysfs_root, PathBuf::from("/sys/block"));
    }

    #[test]
    fn flag_beats_environment() {
        let env = |key: &str| (key == ZTAB_ENV).then(|| OsString::from("/env/ztab"));
        let from_env = Settings::resolve_with(None, false, env);
        assert_eq!(from_env.ztab_path, PathBuf::from("/env/ztab"));

        let from_flag = Settings::resolve_with(Some("/flag/ztab".into()), true, env);
        assert_eq!(from_flag.ztab_path, PathBuf::from("/flag/ztab"));
        assert!(from_flag.dry_run);
    }

    #[test]
    fn sysfs_root_from_environment() {
        let env = |key: &str| (key == SYSFS_ROOT_ENV).then(|| OsString::from("/tmp/sys"));
        let settings = Settings::resolve_with(None, false, env);
        assert_eq!(settings.sysfs_root, PathBuf::from("/tmp/sys"));
    }
}
