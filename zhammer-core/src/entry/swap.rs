// SPDX-License-Identifier: GPL-3.0-only

use super::{Entry, NO_DEVICE_INDEX_REASON, Protocol};
use crate::lifecycle::{Host, Outcome, Report};

pub(crate) struct Swap;

impl Protocol for Swap {
    fn options(&self) -> &'static [&'static str] {
        &["pri", "swappiness"]
    }

    fn online(&self, entry: &Entry, host: &Host<'_>, report: &mut Report) {
        match entry.device_path() {
            Some(device) => {
                host.run(report, "mkswap", &format!("mkswap {device}"));
                let command = match priority(entry, report) {
                    Some(pri) => format!("swapon {device} -p {pri}"),
                    None => format!("swapon {device}"),
                };
                host.run(report, "swapon", &command);
            }
            None => {
                report.record("mkswap", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into()));
                report.record("swapon", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into()));
            }
        }

        // Host-wide, so it applies even without a device.
        set_swappiness(entry, host, report);
    }

    fn offline(&self, entry: &Entry, host: &Host<'_>, report: &mut Report) {
        match entry.device_path() {
            Some(device) => {
                host.run(report, "swapoff", &format!("swapoff {device}"));
            }
            None => report.record("swapoff", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into())),
        }
    }
}

fn priority(entry: &Entry, report: &mut Report) -> Option<i32> {
    let raw = entry.valid_options().value("pri")?;
    match raw.parse() {
        Ok(pri) => Some(pri),
        Err(_) => {
            report.record("pri", Outcome::Tolerated(format!("pri={raw} is not an integer")));
            None
        }
    }
}

fn set_swappiness(entry: &Entry, host: &Host<'_>, report: &mut Report) {
    let Some(raw) = entry.valid_options().value("swappiness") else {
        return;
    };
    match raw.parse::<u32>() {
        Ok(swappiness) => {
            host.run(report, "swappiness", &format!("sysctl -w vm.swappiness={swappiness}"));
        }
        Err(_) => report.record(
            "swappiness",
            Outcome::Tolerated(format!("swappiness={raw} is not an integer")),
        ),
    }
}
