// SPDX-License-Identifier: GPL-3.0-only

use super::{Entry, Protocol};
use crate::lifecycle::{Host, Outcome, Report};

pub(crate) struct Defaults;

impl Protocol for Defaults {
    fn options(&self) -> &'static [&'static str] {
        &["devices"]
    }

    fn online(&self, entry: &Entry, host: &Host<'_>, report: &mut Report) {
        let Some(modules) = host.run(report, "lsmod", "lsmod") else {
            return;
        };
        if is_module_loaded(&modules) {
            report.record("modprobe", Outcome::Skipped("zram module already loaded".into()));
            return;
        }

        let command = match device_count_parameter(entry, host, report) {
            Some(parameter) => format!("modprobe zram {parameter}"),
            None => "modprobe zram".to_string(),
        };
        host.run(report, "modprobe", &command);
    }

    fn offline(&self, _entry: &Entry, host: &Host<'_>, report: &mut Report) {
        host.run(report, "rmmod", "rmmod zram");
    }
}

/// `lsmod` lists the module in its first column.
pub fn is_module_loaded(lsmod: &str) -> bool {
    lsmod
        .lines()
        .any(|line| line.split_whitespace().next() == Some("zram"))
}

/// Older kernels name the device-count parameter `zram_num_devices`.
pub fn module_parameter_name(modinfo: &str) -> &'static str {
    if modinfo.contains("zram_num_devices") {
        "zram_num_devices"
    } else {
        "num_devices"
    }
}

fn device_count_parameter(entry: &Entry, host: &Host<'_>, report: &mut Report) -> Option<String> {
    let raw = entry.valid_options().value("devices")?;
    let devices: u32 = match raw.parse() {
        Ok(devices) => devices,
        Err(_) => {
            report.record(
                "devices",
                Outcome::Tolerated(format!("devices={raw} is not a device count")),
            );
            return None;
        }
    };
    if devices < 1 {
        return None;
    }

    let modinfo = host.run(report, "modinfo", "modinfo zram").unwrap_or_default();
    Some(format!("{}={devices}", module_parameter_name(&modinfo)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_detected_by_first_column() {
        let lsmod = "Module                  Size  Used by\nzram                   32768  2\nlz4_compress           24576  1 zram\n";
        assert!(is_module_loaded(lsmod));
        assert!(!is_module_loaded("Module Size Used by\nlz4_compress 24576 1 zram\n"));
        assert!(!is_module_loaded(""));
    }

    #[test]
    fn parameter_name_follows_modinfo() {
        assert_eq!(
            module_parameter_name("parm:           zram_num_devices:Number of zram devices (uint)"),
            "zram_num_devices"
        );
        assert_eq!(
            module_parameter_name("parm:           num_devices:Number of pre-created zram devices (uint)"),
            "num_devices"
        );
        assert_eq!(module_parameter_name(""), "num_devices");
    }
}
