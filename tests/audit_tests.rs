// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-to-end audits of on-disk catalogs

mod common;

use locale_audit::audit;
use locale_audit::catalog::Catalog;
use locale_audit::config::{Config, Rules};
use locale_audit::types::*;

fn audit_dir(files: &[(&str, &str)], rules: &Rules) -> AuditReport {
    let dir = common::catalog_dir(files);
    let catalog = Catalog::load(dir.path()).unwrap();
    audit::run(&catalog, "pl", rules).unwrap()
}

fn kinds_for(report: &AuditReport, locale: &str) -> Vec<(FindingKind, String)> {
    report
        .findings_for(locale)
        .map(|f| (f.kind, f.key.clone().unwrap_or_default()))
        .collect()
}

#[test]
fn test_missing_extra_and_placeholder_findings() {
    let report = audit_dir(&[("pl", common::PL), ("en", common::EN)], &Rules::default());
    let en = kinds_for(&report, "en");

    assert!(en.contains(&(FindingKind::MissingKey, "nav.about".to_string())));
    assert!(en.contains(&(FindingKind::ExtraKey, "legacy".to_string())));
    assert!(en.contains(&(FindingKind::PlaceholderMismatch, "greeting".to_string())));
    assert!(kinds_for(&report, "pl").is_empty());

    let coverage = report.coverage_for("en").unwrap();
    assert_eq!(coverage.reference_keys, 3);
    assert_eq!(coverage.present, 2);
    assert_eq!(coverage.extra, 1);
    assert_eq!(coverage.coverage, 66.7);
    assert_eq!(coverage.language.as_deref(), Some("English"));
}

#[test]
fn test_findings_sorted_by_severity() {
    let report = audit_dir(&[("pl", common::PL), ("en", common::EN)], &Rules::default());
    let ranks: Vec<u8> = report.findings.iter().map(|f| f.severity.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ranks, sorted);
    assert_eq!(report.summary.total(), report.findings.len());
}

#[test]
fn test_extra_key_reports_line() {
    let report = audit_dir(&[("pl", common::PL), ("en", common::EN)], &Rules::default());
    let extra = report
        .findings
        .iter()
        .find(|f| f.kind == FindingKind::ExtraKey)
        .unwrap();
    assert_eq!(extra.line, Some(6));
}

#[test]
fn test_shape_mismatch_is_critical() {
    let report = audit_dir(
        &[
            ("pl", r#"{"menu": {"open": "Otwórz", "close": "Zamknij"}}"#),
            ("de", r#"{"menu": "Menü"}"#),
        ],
        &Rules::default(),
    );
    let de = kinds_for(&report, "de");
    assert_eq!(de, vec![(FindingKind::ShapeMismatch, "menu".to_string())]);
    assert!(report.exceeds(Severity::Critical));
    assert_eq!(report.coverage_for("de").unwrap().missing, 2);
}

#[test]
fn test_value_quality_findings() {
    let report = audit_dir(
        &[
            (
                "pl",
                r#"{"title": "Ustawienia", "save": "Zapisz", "count": 3, "hint": "Kliknij "}"#,
            ),
            (
                "en",
                r#"{"title": "Ustawienia", "save": "TODO translate", "count": "3", "hint": ""}"#,
            ),
        ],
        &Rules::default(),
    );
    let en = kinds_for(&report, "en");
    assert!(en.contains(&(FindingKind::Untranslated, "title".to_string())));
    assert!(en.contains(&(FindingKind::LeftoverMarker, "save".to_string())));
    assert!(en.contains(&(FindingKind::TypeMismatch, "count".to_string())));
    assert!(en.contains(&(FindingKind::EmptyValue, "hint".to_string())));
}

#[test]
fn test_config_rules_silence_findings() {
    let config = Config {
        ignore_keys: vec!["^legacy$".to_string()],
        allow_identical: vec!["brand".to_string()],
        ..Config::default()
    };
    let rules = config.rules().unwrap();
    let report = audit_dir(
        &[
            ("pl", r#"{"brand": "Acme Studio"}"#),
            ("en", r#"{"brand": "Acme Studio", "legacy": "x"}"#),
        ],
        &rules,
    );
    assert!(kinds_for(&report, "en").is_empty(), "{:?}", report.findings);
}

#[test]
fn test_invalid_locale_code_and_ambiguous_key() {
    let report = audit_dir(
        &[
            ("pl", r#"{"a": "Tekst"}"#),
            ("english", r#"{"a": "Text", "b.c": "x"}"#),
        ],
        &Rules::default(),
    );
    let english = kinds_for(&report, "english");
    assert!(english.contains(&(FindingKind::InvalidLocaleCode, String::new())));
    assert!(english.contains(&(FindingKind::AmbiguousKey, "b.c".to_string())));
}

#[test]
fn test_missing_reference_fails() {
    let dir = common::catalog_dir(&[("en", common::EN)]);
    let catalog = Catalog::load(dir.path()).unwrap();
    assert!(audit::run(&catalog, "pl", &Rules::default()).is_err());
}

#[test]
fn test_ignored_keys_leave_shape_checks_and_coverage() {
    let config = Config {
        ignore_keys: vec!["^legacy".to_string(), "^price\\.gross$".to_string()],
        ..Config::default()
    };
    let rules = config.rules().unwrap();
    let report = audit_dir(
        &[
            (
                "pl",
                r#"{"legacy": {"title": "Stary"}, "price": {"net": "Netto", "gross": "Brutto"}}"#,
            ),
            ("en", r#"{"legacy": "Old", "price": "Price"}"#),
        ],
        &rules,
    );

    let en = kinds_for(&report, "en");
    assert_eq!(en, vec![(FindingKind::ShapeMismatch, "price".to_string())]);
    let coverage = report.coverage_for("en").unwrap();
    assert_eq!(coverage.reference_keys, 1);
    assert_eq!(coverage.missing, 1);
}
