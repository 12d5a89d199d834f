// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report rendering, export and comparison

pub mod diff;
pub mod formatter;
pub mod output;
pub mod sarif;

use crate::types::*;
use anyhow::Result;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Save report to file
pub fn save_report<P: AsRef<Path>>(report: &AuditReport, path: P) -> Result<()> {
    let formatter = ReportFormatter::new();
    formatter.save(report, path)
}
