// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sweep: batch auditing of every catalog directory under a root
//!
//! Walks the tree, treats any directory holding at least two locale files
//! (`<code>.json` with a valid locale code) as a catalog, audits each one
//! and produces a summary sorted by finding count (highest first).

use crate::audit;
use crate::catalog::{io::is_json, Catalog};
use crate::config::Rules;
use crate::i18n::is_valid_locale_code;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "dist", "build", "__pycache__"];

/// Configuration for a sweep run
pub struct SweepConfig {
    pub root: PathBuf,
    pub reference: String,
    pub max_depth: usize,
    /// Only keep catalogs with findings
    pub findings_only: bool,
    /// Minimum number of findings to include
    pub min_findings: usize,
}

/// Results from auditing a single catalog directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResult {
    pub directory: PathBuf,
    pub locales: usize,
    pub finding_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    /// Lowest coverage among non-reference locales
    pub min_coverage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub created_at: String,
    pub root: PathBuf,
    pub catalogs_scanned: usize,
    pub catalogs_with_findings: usize,
    pub total_findings: usize,
    pub total_critical: usize,
    pub results: Vec<CatalogResult>,
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

fn has_locale_stem(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(is_valid_locale_code)
        .unwrap_or(false)
}

fn locale_file_count(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_json(path) && has_locale_stem(path))
        .count()
}

/// Find catalog directories under `root`
pub fn discover_catalogs(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut catalogs = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry.file_name().to_str().map(is_skipped).unwrap_or(false)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable path: {}", err);
                continue;
            }
        };
        if entry.file_type().is_dir() && locale_file_count(entry.path()) >= 2 {
            debug!(dir = %entry.path().display(), "catalog found");
            catalogs.push(entry.path().to_path_buf());
        }
    }

    catalogs.sort();
    Ok(catalogs)
}

fn audit_directory(dir: &Path, reference: &str, rules: &Rules) -> Result<CatalogResult> {
    // Other JSON next to the locales (package.json, tsconfig.json) is not a locale.
    let catalog = Catalog::load_matching(dir, has_locale_stem)?;
    let report = audit::run(&catalog, reference, rules)?;
    let min_coverage = report
        .locales
        .iter()
        .filter(|entry| !entry.is_reference)
        .map(|entry| entry.coverage)
        .fold(100.0, f64::min);

    Ok(CatalogResult {
        directory: dir.to_path_buf(),
        locales: catalog.len(),
        finding_count: report.summary.total(),
        critical_count: report.summary.critical,
        high_count: report.summary.high,
        min_coverage,
        error: None,
    })
}

/// Run sweep across all catalogs under the root
pub fn run(config: &SweepConfig, rules: &Rules) -> Result<SweepReport> {
    let catalogs = discover_catalogs(&config.root, config.max_depth)?;
    let mut results: Vec<CatalogResult> = Vec::new();

    for dir in &catalogs {
        match audit_directory(dir, &config.reference, rules) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(dir = %dir.display(), "audit failed: {:#}", e);
                results.push(CatalogResult {
                    directory: dir.clone(),
                    locales: locale_file_count(dir),
                    finding_count: 0,
                    critical_count: 0,
                    high_count: 0,
                    min_coverage: 0.0,
                    error: Some(format!("{:#}", e)),
                });
            }
        }
    }

    // Noisiest catalogs first
    results.sort_by(|a, b| b.finding_count.cmp(&a.finding_count));

    if config.findings_only {
        results.retain(|r| r.finding_count > 0);
    }
    if config.min_findings > 0 {
        results.retain(|r| r.finding_count >= config.min_findings);
    }

    let catalogs_with_findings = results.iter().filter(|r| r.finding_count > 0).count();
    let total_findings: usize = results.iter().map(|r| r.finding_count).sum();
    let total_critical: usize = results.iter().map(|r| r.critical_count).sum();

    Ok(SweepReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        root: config.root.clone(),
        catalogs_scanned: catalogs.len(),
        catalogs_with_findings,
        total_findings,
        total_critical,
        results,
    })
}

/// Print a summary table to the terminal
pub fn print_summary(report: &SweepReport, quiet: bool) {
    if quiet {
        return;
    }

    println!("\n=== SWEEP SUMMARY ===");
    println!(
        "Root: {}  |  Catalogs scanned: {}  |  With findings: {}",
        report.root.display(),
        report.catalogs_scanned,
        report.catalogs_with_findings
    );
    println!(
        "Total findings: {}  |  Critical: {}",
        report.total_findings, report.total_critical
    );
    println!();

    if report.results.is_empty() {
        println!("  No catalogs with findings.");
        return;
    }

    println!(
        "  {:<44} {:>7} {:>6} {:>6} {:>6} {:>9}",
        "Catalog", "Locales", "Total", "Crit", "High", "Min cov"
    );
    println!("  {}", "-".repeat(82));

    for result in report.results.iter().take(20) {
        let name = result
            .directory
            .strip_prefix(&report.root)
            .unwrap_or(&result.directory)
            .display()
            .to_string();
        let name = if name.is_empty() { ".".to_string() } else { name };
        if let Some(err) = &result.error {
            println!("  {:<44} ERROR: {}", name, err);
        } else {
            println!(
                "  {:<44} {:>7} {:>6} {:>6} {:>6} {:>8.1}%",
                name,
                result.locales,
                result.finding_count,
                result.critical_count,
                result.high_count,
                result.min_coverage,
            );
        }
    }

    if report.results.len() > 20 {
        println!("  ... and {} more catalogs", report.results.len() - 20);
    }
    println!();
}

/// Write sweep report as JSON
pub fn write_report(report: &SweepReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
