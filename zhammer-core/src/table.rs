// SPDX-License-Identifier: GPL-3.0-only

//! ztab parsing
//!
//! Each non-comment line holds up to five whitespace-separated fields:
//! `index name type size [options]`, with `-` standing for "no value" in
//! the first four. The `DEFAULTS` entry parsed so far supplies the type,
//! size and options a line leaves out.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::entry::{DEFAULTS_NAME, Entry, EntryKind};
use crate::error::{Result, ZhammerError};
use crate::options::OptionSet;
use crate::size;

const MAX_FIELDS: usize = 5;

/// Parsed ztab: every entry reachable by its index and by its name
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: Vec<Entry>,
    keys: BTreeMap<String, usize>,
    defaults: Option<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Processing from ztab: {:?}", path);
        let text = fs::read_to_string(path).map_err(|source| ZhammerError::ZtabIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&text)
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        let mut table = Self::new();
        for raw in text.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let entry = parse_line(line, table.defaults())?;
            table.insert(entry);
        }

        for (key, index) in &table.keys {
            debug!("{}: {}", key, table.entries[*index]);
        }
        Ok(table)
    }

    /// Register `entry` under each of its keys. A key that is already taken
    /// moves to the new entry.
    pub fn insert(&mut self, entry: Entry) {
        let slot = self.entries.len();
        for key in entry.keys() {
            if self.keys.insert(key.clone(), slot).is_some() {
                warn!("ztab key {} registered twice; the later line wins", key);
            }
        }
        if entry.is_defaults() {
            self.defaults = Some(slot);
        }
        self.entries.push(entry);
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.keys.get(key).map(|slot| &self.entries[*slot])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// The most recent `DEFAULTS` entry
    pub fn defaults(&self) -> Option<&Entry> {
        self.defaults.map(|slot| &self.entries[slot])
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Drop everything from the first `#`.
pub fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// Split into at most [`MAX_FIELDS`] fields; the last keeps any inner
/// whitespace.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(MAX_FIELDS);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if fields.len() == MAX_FIELDS - 1 {
            fields.push(rest.trim_end());
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    fields
}

fn placeholder(field: &str) -> Option<&str> {
    (field != "-").then_some(field)
}

/// Parse one comment-free line against the defaults in effect.
pub fn parse_line(line: &str, defaults: Option<&Entry>) -> Result<Entry> {
    if line.trim().is_empty() {
        return Err(ZhammerError::tab_entry(line, "empty line"));
    }

    let fields = split_fields(line);
    if fields.len() < 2 {
        return Err(ZhammerError::tab_entry(
            line,
            "expected at least an index and a name field",
        ));
    }

    let field = |n: usize| fields.get(n).copied().and_then(placeholder);
    let index_field = field(0);
    let name = field(1).map(str::to_string);

    let type_name = field(2)
        .map(str::to_string)
        .or_else(|| defaults.and_then(|d| d.type_name().map(str::to_string)));
    let size = field(3)
        .map(str::to_string)
        .or_else(|| defaults.and_then(|d| d.size().map(str::to_string)));

    let mut options = defaults.map(|d| d.options().clone()).unwrap_or_default();
    if let Some(list) = field(4) {
        options.merge(OptionSet::parse(list));
    }

    if let Some(size) = size.as_deref() {
        size::evaluate(size).map_err(|e| ZhammerError::tab_entry(line, e.to_string()))?;
    }

    if name.as_deref() == Some(DEFAULTS_NAME) {
        return Ok(Entry::new(
            None,
            name,
            EntryKind::Defaults,
            type_name,
            size,
            options,
        ));
    }

    if index_field.is_none() && name.is_none() {
        return Err(ZhammerError::tab_entry(line, "entry has neither an index nor a name"));
    }

    let bad_index = || ZhammerError::tab_entry(line, "index must be a non-negative integer");
    let index = match index_field {
        Some(raw) if raw.bytes().all(|b| b.is_ascii_digit()) => {
            Some(raw.parse::<u32>().map_err(|_| bad_index())?)
        }
        Some(_) => return Err(bad_index()),
        None => None,
    };

    let kind = match type_name.as_deref() {
        Some(t) => EntryKind::from_type_name(t)
            .ok_or_else(|| ZhammerError::tab_entry(line, format!("unknown type `{t}`")))?,
        None => return Err(ZhammerError::tab_entry(line, "no type given and no default type")),
    };

    let entry = Entry::new(index, name, kind, type_name, size, options);
    Ok(match index_field {
        Some(raw) => entry.with_index_key(raw),
        None => entry,
    })
}
