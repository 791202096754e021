// SPDX-License-Identifier: GPL-3.0-only

//! Which entries an invocation touches, and in what order
//!
//! `DEFAULTS` leads every online run. On offline it is dropped unless it
//! was asked for or a full untyped `--all` run is unloading everything, and
//! `--all` offline runs go in reverse: devices first, module last.

use tracing::debug;

use crate::entry::{DEFAULTS_NAME, Entry};
use crate::error::{Result, ZhammerError};
use crate::lifecycle::{Action, Host, Report};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    pub device: Option<String>,
    pub process_all: bool,
    pub process_type: Option<String>,
}

impl Invocation {
    pub fn device(action: Action, device: impl Into<String>) -> Self {
        Self {
            action,
            device: Some(device.into()),
            process_all: false,
            process_type: None,
        }
    }

    pub fn all(action: Action, process_type: Option<String>) -> Self {
        Self {
            action,
            device: None,
            process_all: true,
            process_type,
        }
    }
}

/// Table keys to process, in processing order.
pub fn resolve_keys(table: &Table, invocation: &Invocation) -> Result<Vec<String>> {
    let mut keys = vec![DEFAULTS_NAME.to_string()];

    if let Some(device) = invocation.device.as_deref() {
        if !table.contains_key(device) {
            return Err(ZhammerError::NoSuchEntry(device.to_string()));
        }
        if device != DEFAULTS_NAME {
            keys.push(device.to_string());
        }
    } else if invocation.process_all {
        let mut numbered: Vec<(u64, &str)> = table
            .keys()
            .filter_map(|key| key.parse::<u64>().ok().map(|n| (n, key)))
            .collect();
        numbered.sort_unstable();
        keys.extend(numbered.into_iter().map(|(_, key)| key.to_string()));
    } else {
        return Err(ZhammerError::UsageAmbiguous);
    }

    if invocation.action == Action::Offline {
        let typed_batch = invocation.process_all && invocation.process_type.is_some();
        let targeted = !invocation.process_all
            && invocation.device.as_deref() != Some(DEFAULTS_NAME);
        if typed_batch || targeted {
            keys.retain(|key| key != DEFAULTS_NAME);
        }
        if invocation.process_all {
            keys.reverse();
        }
    }

    debug!("to_process: {:?}", keys);
    Ok(keys)
}

/// Entries to process, in order. An implicit `DEFAULTS` is left out when
/// the table has none.
pub fn resolve<'t>(table: &'t Table, invocation: &Invocation) -> Result<Vec<&'t Entry>> {
    let mut entries = Vec::new();
    for key in resolve_keys(table, invocation)? {
        match table.get(&key) {
            Some(entry) => entries.push(entry),
            None if key == DEFAULTS_NAME => debug!("ztab has no DEFAULTS entry"),
            None => return Err(ZhammerError::NoSuchEntry(key)),
        }
    }
    Ok(entries)
}

/// Resolve and drive every selected entry, strictly one after another.
///
/// `on_report` sees each report as soon as its transition finishes.
pub fn execute(
    table: &Table,
    invocation: &Invocation,
    host: &Host<'_>,
    mut on_report: impl FnMut(&Report),
) -> Result<Vec<Report>> {
    let process_type = invocation.process_type.as_deref();
    let reports: Vec<Report> = resolve(table, invocation)?
        .into_iter()
        .map(|entry| {
            debug!("attempting to {}: {}", invocation.action, entry);
            let report = match invocation.action {
                Action::Online => entry.online(host, invocation.process_all, process_type),
                Action::Offline => entry.offline(host, invocation.process_all, process_type),
            };
            on_report(&report);
            report
        })
        .collect();
    Ok(reports)
}
