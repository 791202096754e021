// SPDX-License-Identifier: GPL-3.0-only

use super::{Entry, NO_DEVICE_INDEX_REASON, Protocol};
use crate::lifecycle::{Host, Outcome, Report};

const ZFS_OPTIONS: &[&str] = &["zpool"];

/// L2ARC cache device
pub(crate) struct ZfsCache;

impl Protocol for ZfsCache {
    fn options(&self) -> &'static [&'static str] {
        ZFS_OPTIONS
    }

    fn online(&self, entry: &Entry, host: &Host<'_>, report: &mut Report) {
        let Some(pool) = entry.valid_options().value("zpool") else {
            report.record("zpool add", Outcome::Skipped("no zpool option".into()));
            return;
        };
        let Some(device) = entry.device_path() else {
            report.record("zpool add", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into()));
            return;
        };

        let status = host
            .run(report, "zpool status", &format!("zpool status -x {pool}"))
            .unwrap_or_default();
        if !is_pool_healthy(pool, &status) {
            report.record("zpool add", Outcome::Skipped(format!("pool {pool} is not healthy")));
            return;
        }

        host.run(report, "zpool add", &format!("zpool add {pool} cache {device}"));
    }

    fn offline(&self, _entry: &Entry, _host: &Host<'_>, report: &mut Report) {
        report.record(
            "zpool remove",
            Outcome::Skipped("cache devices are not detached automatically".into()),
        );
    }
}

/// Separate intent log device; never attached or detached from here.
pub(crate) struct ZfsLog;

impl Protocol for ZfsLog {
    fn options(&self) -> &'static [&'static str] {
        ZFS_OPTIONS
    }

    fn online(&self, _entry: &Entry, _host: &Host<'_>, report: &mut Report) {
        report.notice("Cowardly refusing to online zfs log.");
    }

    fn offline(&self, _entry: &Entry, _host: &Host<'_>, report: &mut Report) {
        report.notice("Cowardly refusing to offline zfs log.");
    }
}

/// `zpool status -x <pool>` answers with a single line when all is well.
pub fn is_pool_healthy(pool: &str, status: &str) -> bool {
    let expected = format!("pool '{pool}' is healthy");
    status.lines().any(|line| line.trim() == expected)
}
