// SPDX-License-Identifier: GPL-3.0-only

//! Typed ztab entries and their per-kind activation protocols

mod defaults;
mod filesystem;
mod swap;
mod zfs;

use std::collections::BTreeSet;
use std::fmt;

pub use defaults::{is_module_loaded, module_parameter_name};
pub use zfs::is_pool_healthy;

use crate::error::Result;
use crate::lifecycle::{self, Host, Report};
use crate::options::OptionSet;
use crate::size;

/// Reserved name of the table-wide default entry
pub const DEFAULTS_NAME: &str = "DEFAULTS";

/// Options every kind understands
pub const COMMON_OPTIONS: &[&str] = &["noauto"];

pub(crate) const NO_DEVICE_INDEX_REASON: &str = "no device index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Defaults,
    Swap,
    ZfsCache,
    ZfsLog,
    Filesystem,
}

impl EntryKind {
    /// Kind for a ztab type field. `DEFAULTS` is selected by name, never by
    /// type, so `defaults` is not accepted here.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "swap" => Some(Self::Swap),
            "zfscache" => Some(Self::ZfsCache),
            "zfslog" => Some(Self::ZfsLog),
            "fs" | "filesystem" => Some(Self::Filesystem),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::Swap => "swap",
            Self::ZfsCache => "zfscache",
            Self::ZfsLog => "zfslog",
            Self::Filesystem => "fs",
        }
    }

    pub(crate) fn protocol(self) -> &'static dyn Protocol {
        match self {
            Self::Defaults => &defaults::Defaults,
            Self::Swap => &swap::Swap,
            Self::ZfsCache => &zfs::ZfsCache,
            Self::ZfsLog => &zfs::ZfsLog,
            Self::Filesystem => &filesystem::Filesystem,
        }
    }

    /// `COMMON_OPTIONS` plus whatever this kind's protocol reads
    pub fn known_options(self) -> BTreeSet<&'static str> {
        COMMON_OPTIONS
            .iter()
            .chain(self.protocol().options())
            .copied()
            .collect()
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// The device-specific half of a transition. The shared gate and the
/// size/reset writes live in [`lifecycle`].
pub(crate) trait Protocol: Sync {
    fn options(&self) -> &'static [&'static str] {
        &[]
    }

    fn online(&self, entry: &Entry, host: &Host<'_>, report: &mut Report);

    fn offline(&self, entry: &Entry, host: &Host<'_>, report: &mut Report);
}

/// One ztab line after default inheritance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    index: Option<u32>,
    index_key: Option<String>,
    name: Option<String>,
    kind: EntryKind,
    type_name: Option<String>,
    size: Option<String>,
    options: OptionSet,
    valid_options: OptionSet,
}

impl Entry {
    /// Build an entry, filtering its options against what `kind` knows.
    ///
    /// A `Defaults` entry always carries the reserved name and no index.
    pub fn new(
        index: Option<u32>,
        name: Option<String>,
        kind: EntryKind,
        type_name: Option<String>,
        size: Option<String>,
        options: OptionSet,
    ) -> Self {
        let (index, name) = if kind == EntryKind::Defaults {
            (None, Some(DEFAULTS_NAME.to_string()))
        } else {
            (index, name)
        };
        let valid_options = options.filter(kind.known_options());
        let index_key = index.map(|i| i.to_string());

        Self {
            index,
            index_key,
            name,
            kind,
            type_name,
            size,
            options,
            valid_options,
        }
    }

    /// Register the index under the digits the table wrote, e.g. `007`.
    pub(crate) fn with_index_key(mut self, key: &str) -> Self {
        if self.index.is_some() {
            self.index_key = Some(key.to_string());
        }
        self
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// The index as written in the table
    pub fn index_key(&self) -> Option<&str> {
        self.index_key.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Declared type field, inherited from `DEFAULTS` when omitted. For the
    /// `DEFAULTS` entry itself this is the table-wide default type.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Everything the line (and its defaults) said
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// The options this kind acts on
    pub fn valid_options(&self) -> &OptionSet {
        &self.valid_options
    }

    pub fn is_defaults(&self) -> bool {
        self.kind == EntryKind::Defaults
    }

    pub fn is_noauto(&self) -> bool {
        self.valid_options.contains("noauto")
    }

    /// Whether a `--type` filter selects this entry
    pub fn matches_type(&self, process_type: &str) -> bool {
        if self.type_name.as_deref() == Some(process_type) {
            return true;
        }
        !self.is_defaults() && EntryKind::from_type_name(process_type) == Some(self.kind)
    }

    /// Table keys this entry registers under
    pub fn keys(&self) -> Vec<String> {
        if self.is_defaults() {
            return vec![DEFAULTS_NAME.to_string()];
        }
        self.index_key
            .clone()
            .into_iter()
            .chain(self.name.clone())
            .collect()
    }

    pub fn label(&self) -> String {
        match (&self.name, self.index) {
            (Some(name), _) => name.clone(),
            (None, Some(index)) => format!("zram{index}"),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    pub fn device_path(&self) -> Option<String> {
        self.index.map(|i| format!("/dev/zram{i}"))
    }

    /// Resolve the size literal; `None` when the entry has no size.
    pub fn size_bytes(&self) -> Option<Result<u64>> {
        self.size.as_deref().map(size::evaluate)
    }

    pub fn online(&self, host: &Host<'_>, process_all: bool, process_type: Option<&str>) -> Report {
        lifecycle::online(self, host, process_all, process_type)
    }

    pub fn offline(&self, host: &Host<'_>, process_all: bool, process_type: Option<&str>) -> Report {
        lifecycle::offline(self, host, process_all, process_type)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = if self.is_defaults() {
            DEFAULTS_NAME.to_string()
        } else {
            self.index_key.clone().unwrap_or_else(|| "-".to_string())
        };
        write!(
            f,
            "number: {}; name: {}; entry_type: {}; size: {}; options: {};",
            number,
            self.name.as_deref().unwrap_or("-"),
            self.type_name.as_deref().unwrap_or("-"),
            self.size.as_deref().unwrap_or("-"),
            self.valid_options,
        )
    }
}
