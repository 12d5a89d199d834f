// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for SARIF 2.1.0 output format

mod common;

use locale_audit::audit;
use locale_audit::catalog::Catalog;
use locale_audit::config::Rules;
use locale_audit::report::sarif;
use locale_audit::types::*;

fn make_test_report() -> AuditReport {
    let dir = common::catalog_dir(&[("pl", common::PL), ("en", common::EN)]);
    let catalog = Catalog::load(dir.path()).unwrap();
    audit::run(&catalog, "pl", &Rules::default()).unwrap()
}

#[test]
fn test_sarif_valid_json() {
    let json = sarif::to_sarif_json(&make_test_report()).expect("SARIF serialization");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(parsed["version"], "2.1.0");
    assert!(parsed["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));
    assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "locale-audit");
}

#[test]
fn test_sarif_one_result_per_finding() {
    let report = make_test_report();
    let log = sarif::to_sarif(&report);
    assert_eq!(log.runs.len(), 1);
    assert_eq!(log.runs[0].results.len(), report.findings.len());
}

#[test]
fn test_sarif_rules_are_deduplicated() {
    let log = sarif::to_sarif(&make_test_report());
    let ids: Vec<&str> = log.runs[0]
        .tool
        .driver
        .rules
        .iter()
        .map(|rule| rule.id.as_str())
        .collect();
    // missing-key, extra-key, placeholder-mismatch
    assert_eq!(ids, vec!["LA002", "LA003", "LA006"]);
}

#[test]
fn test_sarif_levels_and_regions() {
    let log = sarif::to_sarif(&make_test_report());
    let results = &log.runs[0].results;

    let extra = results.iter().find(|r| r.rule_id == "LA003").unwrap();
    assert_eq!(extra.level, "note");
    let region = extra.locations[0].physical_location.region.as_ref().unwrap();
    assert_eq!(region.start_line, 6);
    assert!(extra.locations[0]
        .physical_location
        .artifact_location
        .uri
        .ends_with("en.json"));

    let missing = results.iter().find(|r| r.rule_id == "LA002").unwrap();
    assert_eq!(missing.level, "error");
    assert!(missing.message.text.starts_with("nav.about (en)"));
    // Missing keys have no line in the locale file.
    assert!(missing.locations[0].physical_location.region.is_none());
}

#[test]
fn test_sarif_empty_report() {
    let dir = common::catalog_dir(&[("pl", common::PL)]);
    let catalog = Catalog::load(dir.path()).unwrap();
    let report = audit::run(&catalog, "pl", &Rules::default()).unwrap();
    let log = sarif::to_sarif(&report);
    assert!(log.runs[0].results.is_empty());
    assert!(log.runs[0].tool.driver.rules.is_empty());
}
