// SPDX-License-Identifier: GPL-3.0-only

use super::{Entry, Protocol};
use crate::lifecycle::{Host, Report};

pub(crate) struct Filesystem;

impl Protocol for Filesystem {
    fn online(&self, _entry: &Entry, _host: &Host<'_>, report: &mut Report) {
        report.notice("fs module not yet implemented");
    }

    fn offline(&self, _entry: &Entry, _host: &Host<'_>, report: &mut Report) {
        report.notice("fs module not yet implemented");
    }
}
