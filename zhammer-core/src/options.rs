// SPDX-License-Identifier: GPL-3.0-only

//! Comma-separated `key` / `key=value` option lists

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare `key`
    Flag,
    /// `key=value`
    Value(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet(BTreeMap<String, OptionValue>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `noauto,pri=10,zpool=tank`. Every token is kept, known or not.
    pub fn parse(text: &str) -> Self {
        let options = text
            .split(',')
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key.to_string(), OptionValue::Value(value.to_string())),
                None => (token.to_string(), OptionValue::Flag),
            })
            .collect();
        Self(options)
    }

    /// Lay `other` over `self`; keys in `other` win.
    pub fn merge(&mut self, other: OptionSet) {
        self.0.extend(other.0);
    }

    /// Keep only the keys named in `known`.
    pub fn filter<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kept = BTreeMap::new();
        for key in known {
            if let Some(value) = self.0.get(key) {
                kept.insert(key.to_string(), value.clone());
            }
        }
        Self(kept)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// The string after `=`; `None` for flags and missing keys.
    pub fn value(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(OptionValue::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            match value {
                OptionValue::Flag => write!(f, "{key}")?,
                OptionValue::Value(v) => write!(f, "{key}={v}")?,
            }
        }
        Ok(())
    }
}
