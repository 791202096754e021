// SPDX-License-Identifier: GPL-3.0-only

//! ztab configuration model and zram entry lifecycle
//!
//! A ztab describes zram devices one per line:
//!
//! ```text
//! # index  name      type      size  options
//! -        DEFAULTS  swap      1G    devices=4,pri=10
//! 0        swap0     -         -     swappiness=80
//! 1        cache0    zfscache  4G    zpool=tank,noauto
//! ```
//!
//! [`Table`] parses that text into [`Entry`] values, [`selection`] works out
//! which entries an invocation touches and in what order, and [`lifecycle`]
//! drives each one online or offline through the host collaborators.

pub mod config;
pub mod entry;
pub mod error;
pub mod lifecycle;
pub mod options;
pub mod selection;
pub mod size;
pub mod table;

pub use config::Settings;
pub use entry::{DEFAULTS_NAME, Entry, EntryKind};
pub use error::{Result, ZhammerError};
pub use lifecycle::{Action, Host, Outcome, Report, StepRecord};
pub use options::{OptionSet, OptionValue};
pub use selection::Invocation;
pub use table::Table;
