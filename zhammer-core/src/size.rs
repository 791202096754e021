// SPDX-License-Identifier: GPL-3.0-only

//! Size literals such as `512`, `64K`, `512MiB` or `4G`

use crate::error::{Result, ZhammerError};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

// Checked in order; within a group the longest suffix comes first.
const SUFFIX_GROUPS: &[(&[&str], u64)] = &[
    (&["KiB", "KB", "K", "k"], KIB),
    (&["MiB", "MB", "M", "m"], MIB),
    (&["GiB", "GB", "G", "g"], GIB),
];

/// Evaluate a size literal to a byte count.
///
/// The unit suffix has to end the literal and everything before it has to
/// be digits.
pub fn evaluate(expr: &str) -> Result<u64> {
    let invalid = || ZhammerError::InvalidSizeSpecification(expr.to_string());

    if is_digits(expr) {
        return expr.parse().map_err(|_| invalid());
    }

    for (suffixes, multiplier) in SUFFIX_GROUPS {
        let Some(number) = suffixes.iter().find_map(|suffix| expr.strip_suffix(suffix)) else {
            continue;
        };
        if !is_digits(number) {
            return Err(invalid());
        }
        return number
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(*multiplier))
            .ok_or_else(invalid);
    }

    Err(invalid())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
