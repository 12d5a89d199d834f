// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for the sweep subcommand (batch catalog auditing)

mod common;

use locale_audit::config::Rules;
use locale_audit::sweep::{self, SweepConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config(root: &Path) -> SweepConfig {
    SweepConfig {
        root: root.to_path_buf(),
        reference: "pl".to_string(),
        max_depth: 6,
        findings_only: false,
        min_findings: 0,
    }
}

#[test]
fn test_sweep_empty_directory() {
    let dir = TempDir::new().unwrap();
    let report = sweep::run(&config(dir.path()), &Rules::default()).expect("sweep on empty dir");
    assert_eq!(report.catalogs_scanned, 0);
    assert_eq!(report.total_findings, 0);
    assert!(report.results.is_empty());
}

#[test]
fn test_sweep_discovers_catalog_directories_only() {
    let dir = TempDir::new().unwrap();
    common::write_locales(
        &dir.path().join("web/locales"),
        &[("pl", common::PL), ("en", common::EN)],
    );
    // One locale file is not a catalog.
    common::write_locales(&dir.path().join("lonely"), &[("pl", common::PL)]);
    // JSON that is not named after a locale.
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(dir.path().join("config/package.json"), "{}").unwrap();
    fs::write(dir.path().join("config/tsconfig.json"), "{}").unwrap();

    let catalogs = sweep::discover_catalogs(dir.path(), 6).unwrap();
    assert_eq!(catalogs, vec![dir.path().join("web/locales")]);
}

#[test]
fn test_sweep_skips_vendor_and_hidden_dirs() {
    let dir = TempDir::new().unwrap();
    let files = [("pl", common::PL), ("en", common::EN)];
    common::write_locales(&dir.path().join("node_modules/pkg/locales"), &files);
    common::write_locales(&dir.path().join(".cache/locales"), &files);
    common::write_locales(&dir.path().join("app/i18n"), &files);

    let report = sweep::run(&config(dir.path()), &Rules::default()).unwrap();
    assert_eq!(report.catalogs_scanned, 1);
    assert_eq!(report.results[0].directory, dir.path().join("app/i18n"));
}

#[test]
fn test_sweep_sorts_and_filters() {
    let dir = TempDir::new().unwrap();
    common::write_locales(
        &dir.path().join("clean"),
        &[("pl", r#"{"a": "Jeden"}"#), ("en", r#"{"a": "One"}"#)],
    );
    common::write_locales(
        &dir.path().join("noisy"),
        &[("pl", common::PL), ("en", common::EN)],
    );

    let report = sweep::run(&config(dir.path()), &Rules::default()).unwrap();
    assert_eq!(report.catalogs_scanned, 2);
    assert_eq!(report.results[0].directory, dir.path().join("noisy"));
    assert_eq!(report.results[1].finding_count, 0);
    assert_eq!(report.results[1].min_coverage, 100.0);
    assert_eq!(report.catalogs_with_findings, 1);

    let mut only = config(dir.path());
    only.findings_only = true;
    let filtered = sweep::run(&only, &Rules::default()).unwrap();
    assert_eq!(filtered.results.len(), 1);
    assert_eq!(filtered.catalogs_scanned, 2);
}

#[test]
fn test_sweep_records_broken_catalogs() {
    let dir = TempDir::new().unwrap();
    common::write_locales(
        &dir.path().join("broken"),
        &[("pl", "{\"a\": "), ("en", r#"{"a": "One"}"#)],
    );
    let report = sweep::run(&config(dir.path()), &Rules::default()).unwrap();
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].error.is_some());
}

#[test]
fn test_sweep_report_written_as_json() {
    let dir = TempDir::new().unwrap();
    common::write_locales(
        &dir.path().join("locales"),
        &[("pl", common::PL), ("en", common::EN)],
    );
    let report = sweep::run(&config(dir.path()), &Rules::default()).unwrap();
    let out = dir.path().join("out/sweep.json");
    sweep::write_report(&report, &out).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["catalogs_scanned"], 1);
}

#[test]
fn test_sweep_rejects_file_root() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("pl.json");
    fs::write(&file, "{}").unwrap();
    assert!(sweep::discover_catalogs(&file, 6).is_err());
}

#[test]
fn test_sweep_ignores_non_locale_json_in_catalog() {
    let dir = TempDir::new().unwrap();
    let app = dir.path().join("app");
    common::write_locales(
        &app,
        &[("pl", r#"{"a": "Jeden"}"#), ("en", r#"{"a": "One"}"#)],
    );
    fs::write(app.join("package.json"), r#"{"name": "web", "version": "1.0.0"}"#).unwrap();
    fs::write(app.join("tsconfig.json"), "[]").unwrap();

    let report = sweep::run(&config(dir.path()), &Rules::default()).unwrap();
    assert_eq!(report.results.len(), 1);
    let result = &report.results[0];
    assert!(result.error.is_none(), "{:?}", result.error);
    assert_eq!(result.locales, 2);
    assert_eq!(result.finding_count, 0);
}
