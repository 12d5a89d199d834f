// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistent storage for audit reports

use crate::report::ReportOutputFormat;
use crate::types::AuditReport;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

pub use crate::report::diff::load_report;

const FILE_PREFIX: &str = "locale-audit-";

/// Write the report once per format into `directory`, named by timestamp.
pub fn persist_report(
    report: &AuditReport,
    directory: &Path,
    formats: &[ReportOutputFormat],
) -> Result<Vec<PathBuf>> {
    let mut stored = Vec::new();
    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();

    fs::create_dir_all(directory)
        .with_context(|| format!("creating {}", directory.display()))?;
    for format in formats {
        let file_name = format!("{}{}.{}", FILE_PREFIX, timestamp, format.extension());
        let path = directory.join(&file_name);
        let content = format.serialize(report)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        stored.push(path);
    }

    Ok(stored)
}

/// The newest `count` JSON reports in `dir`, oldest first.
pub fn latest_reports(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(anyhow!("reports directory not found: {}", dir.display()));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let is_report = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(FILE_PREFIX))
                .unwrap_or(false);
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            is_report && is_json
        })
        .collect();

    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if entries.len() < count {
        return Err(anyhow!(
            "not enough reports in {} (need {}, found {})",
            dir.display(),
            count,
            entries.len()
        ));
    }
    let start = entries.len() - count;
    Ok(entries[start..].to_vec())
}
