// SPDX-License-Identifier: GPL-3.0-only

//! Online/offline transitions for a single entry
//!
//! Every transition runs the same shape: an eligibility gate, then the
//! size write (online) or reset write (offline) around the kind-specific
//! protocol. No step failure aborts a transition. Each step leaves an
//! [`Outcome`] in the [`Report`] instead, so callers can tell what was done,
//! what was skipped, and what failed and was tolerated.

use std::fmt;

use tracing::{debug, info};
use zhammer_sys::{CommandExecutor, DeviceControlSurface};

use crate::entry::{Entry, NO_DEVICE_INDEX_REASON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Online,
    Offline,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(String),
    /// Failed, and the transition carried on regardless
    Tolerated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: &'static str,
    pub outcome: Outcome,
}

/// What one transition of one entry did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub entry: String,
    pub action: Action,
    pub eligible: bool,
    pub steps: Vec<StepRecord>,
    /// Messages meant for the operator rather than the log
    pub notices: Vec<String>,
}

impl Report {
    pub fn new(entry: &Entry, action: Action) -> Self {
        Self {
            entry: entry.label(),
            action,
            eligible: false,
            steps: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn record(&mut self, step: &'static str, outcome: Outcome) {
        self.steps.push(StepRecord { step, outcome });
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn outcome(&self, step: &str) -> Option<&Outcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }

    pub fn tolerated(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|record| matches!(record.outcome, Outcome::Tolerated(_)))
    }
}

/// The host collaborators a transition talks to
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub executor: &'a dyn CommandExecutor,
    pub control: &'a dyn DeviceControlSurface,
}

impl<'a> Host<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, control: &'a dyn DeviceControlSurface) -> Self {
        Self { executor, control }
    }

    /// Run a command as step `step`. Returns its output, or `None` when it
    /// could not be run at all.
    pub fn run(&self, report: &mut Report, step: &'static str, command: &str) -> Option<String> {
        match self.executor.run(command) {
            Ok(output) => {
                report.record(step, Outcome::Applied);
                Some(output)
            }
            Err(e) => {
                debug!("{}: `{}` failed: {}", report.entry, command, e);
                report.record(step, Outcome::Tolerated(e.to_string()));
                None
            }
        }
    }
}

fn batch_eligible(entry: &Entry, process_all: bool, process_type: Option<&str>) -> bool {
    if !process_all {
        return true;
    }
    if entry.is_noauto() {
        return false;
    }
    process_type.is_none_or(|t| entry.matches_type(t))
}

/// `DEFAULTS` always comes online; other entries pass the batch filters.
pub fn can_online(entry: &Entry, process_all: bool, process_type: Option<&str>) -> bool {
    entry.is_defaults() || batch_eligible(entry, process_all, process_type)
}

/// Same filters as [`can_online`], with no exception for `DEFAULTS`.
pub fn can_offline(entry: &Entry, process_all: bool, process_type: Option<&str>) -> bool {
    batch_eligible(entry, process_all, process_type)
}

pub fn online(
    entry: &Entry,
    host: &Host<'_>,
    process_all: bool,
    process_type: Option<&str>,
) -> Report {
    let mut report = Report::new(entry, Action::Online);
    if !can_online(entry, process_all, process_type) {
        info!("Unable to online {}", entry);
        return report;
    }
    report.eligible = true;

    info!("Onlining: {}", entry);
    set_size(entry, host, &mut report);
    entry.kind().protocol().online(entry, host, &mut report);
    report
}

pub fn offline(
    entry: &Entry,
    host: &Host<'_>,
    process_all: bool,
    process_type: Option<&str>,
) -> Report {
    let mut report = Report::new(entry, Action::Offline);
    if !can_offline(entry, process_all, process_type) {
        info!("Unable to offline {}", entry);
        return report;
    }
    report.eligible = true;

    info!("Offlining: {}", entry);
    entry.kind().protocol().offline(entry, host, &mut report);
    reset(entry, host, &mut report);
    report
}

fn set_size(entry: &Entry, host: &Host<'_>, report: &mut Report) {
    let Some(index) = entry.index() else {
        report.record("disksize", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into()));
        return;
    };
    let bytes = match entry.size_bytes() {
        None => {
            report.record("disksize", Outcome::Skipped("no size".into()));
            return;
        }
        Some(Err(e)) => {
            debug!("{}: {}", report.entry, e);
            report.record("disksize", Outcome::Tolerated(e.to_string()));
            return;
        }
        Some(Ok(bytes)) => bytes,
    };

    match host.control.write_size(index, bytes) {
        Ok(()) => report.record("disksize", Outcome::Applied),
        Err(e) => {
            debug!("{}: disksize write failed: {}", report.entry, e);
            report.record("disksize", Outcome::Tolerated(e.to_string()));
        }
    }
}

fn reset(entry: &Entry, host: &Host<'_>, report: &mut Report) {
    let Some(index) = entry.index() else {
        report.record("reset", Outcome::Skipped(NO_DEVICE_INDEX_REASON.into()));
        return;
    };

    match host.control.write_reset(index) {
        Ok(()) => report.record("reset", Outcome::Applied),
        Err(e) => {
            debug!("{}: reset write failed: {}", report.entry, e);
            report.record("reset", Outcome::Tolerated(e.to_string()));
        }
    }
}
