// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog audit: completeness and value quality of every locale against
//! the reference locale.

pub mod completeness;
pub mod quality;

pub use completeness::KeyDiff;

use crate::catalog::{flatten, get_path, keys, Catalog, LocaleFile};
use crate::config::Rules;
use crate::i18n::{is_valid_locale_code, language_name};
use crate::types::{AuditReport, Finding, FindingKind, LocaleCoverage, SeveritySummary};
use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info};

/// Audit every locale of `catalog` against `reference`.
pub fn run(catalog: &Catalog, reference: &str, rules: &Rules) -> Result<AuditReport> {
    let reference_file = catalog.reference(reference)?;

    let mut results: Vec<(LocaleCoverage, Vec<Finding>)> = catalog
        .files()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|file| {
            if file.code == reference {
                audit_reference(file, rules)
            } else {
                audit_locale(file, reference_file, rules)
            }
        })
        .collect();
    results.sort_by(|a, b| a.0.locale.cmp(&b.0.locale));

    let mut locales = Vec::with_capacity(results.len());
    let mut findings = Vec::new();
    for (coverage, locale_findings) in results {
        debug!(
            locale = %coverage.locale,
            coverage = coverage.coverage,
            findings = locale_findings.len(),
            "locale audited"
        );
        locales.push(coverage);
        findings.extend(locale_findings);
    }
    findings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.locale.cmp(&b.locale))
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.kind.cmp(&b.kind))
    });

    let summary = SeveritySummary::from_findings(&findings);
    info!(
        reference,
        locales = locales.len(),
        findings = summary.total(),
        "audit complete"
    );

    Ok(AuditReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: catalog.dir.clone(),
        reference: reference.to_string(),
        locales,
        findings,
        summary,
    })
}

fn file_findings(file: &LocaleFile) -> Vec<Finding> {
    let mut findings = Vec::new();
    if !is_valid_locale_code(&file.code) {
        findings.push(Finding::new(
            FindingKind::InvalidLocaleCode,
            &file.code,
            file.path.clone(),
            format!("'{}' is not a valid locale code", file.code),
        ));
    }
    for (parent, name) in keys::ambiguous_members(&file.tree) {
        let path = if parent.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", parent, name)
        };
        findings.push(
            Finding::new(
                FindingKind::AmbiguousKey,
                &file.code,
                file.path.clone(),
                format!("member name '{}' contains the key separator", name),
            )
            .with_key(path),
        );
    }
    findings
}

fn audit_reference(file: &LocaleFile, rules: &Rules) -> (LocaleCoverage, Vec<Finding>) {
    let mut findings = file_findings(file);
    let entries: Vec<_> = flatten(&file.tree)
        .into_iter()
        .filter(|(key, _)| !rules.is_ignored(key))
        .collect();

    let mut empty = 0;
    for (key, value) in &entries {
        for issue in quality::check_standalone(value, rules) {
            if issue.kind == FindingKind::EmptyValue {
                empty += 1;
            }
            findings.push(
                Finding::new(issue.kind, &file.code, file.path.clone(), issue.message)
                    .with_key(key.clone())
                    .with_line(file.line_of(key)),
            );
        }
    }

    let total = entries.len();
    let coverage = LocaleCoverage {
        locale: file.code.clone(),
        language: language_name(&file.code).map(str::to_string),
        file: file.path.clone(),
        total_keys: total,
        reference_keys: total,
        present: total,
        missing: 0,
        extra: 0,
        untranslated: 0,
        empty,
        coverage: 100.0,
        translated: percentage(total.saturating_sub(empty), total),
        digest: file.digest(),
        is_reference: true,
    };
    (coverage, findings)
}

fn audit_locale(
    file: &LocaleFile,
    reference: &LocaleFile,
    rules: &Rules,
) -> (LocaleCoverage, Vec<Finding>) {
    let mut findings = file_findings(file);
    let diff = KeyDiff::compute(&reference.tree, &file.tree, rules);
    let finding = |kind: FindingKind, key: &str, message: String| {
        Finding::new(kind, &file.code, file.path.clone(), message).with_key(key)
    };

    for key in &diff.shape_mismatches {
        let reference_is_object = get_path(&reference.tree, key).is_some_and(|v| v.is_object());
        let message = if reference_is_object {
            "reference has a group of keys here, locale has a single value"
        } else {
            "reference has a single value here, locale has a group of keys"
        };
        findings.push(
            finding(FindingKind::ShapeMismatch, key, message.to_string())
                .with_line(file.line_of(key)),
        );
    }
    for key in &diff.missing {
        findings.push(finding(
            FindingKind::MissingKey,
            key,
            format!("missing key (reference: {})", preview(reference, key)),
        ));
    }
    for key in &diff.extra {
        findings.push(
            finding(
                FindingKind::ExtraKey,
                key,
                "key does not exist in the reference locale".to_string(),
            )
            .with_line(file.line_of(key)),
        );
    }

    let mut untranslated = 0;
    let mut empty = 0;
    for key in &diff.shared {
        let (Some(value), Some(reference_value)) =
            (get_path(&file.tree, key), get_path(&reference.tree, key))
        else {
            continue;
        };
        for issue in quality::check_against_reference(key, value, reference_value, rules) {
            match issue.kind {
                FindingKind::Untranslated => untranslated += 1,
                FindingKind::EmptyValue => empty += 1,
                _ => {}
            }
            findings.push(
                finding(issue.kind, key, issue.message).with_line(file.line_of(key)),
            );
        }
    }

    let reference_keys =
        diff.shared.len() + diff.missing.len() + leaves_under(&diff, reference, rules);
    let present = diff.shared.len();
    let coverage = LocaleCoverage {
        locale: file.code.clone(),
        language: language_name(&file.code).map(str::to_string),
        file: file.path.clone(),
        total_keys: present + diff.extra.len() + leaves_under(&diff, file, rules),
        reference_keys,
        present,
        missing: reference_keys.saturating_sub(present),
        extra: diff.extra.len(),
        untranslated,
        empty,
        coverage: percentage(present, reference_keys),
        translated: percentage(
            present.saturating_sub(untranslated + empty),
            reference_keys,
        ),
        digest: file.digest(),
        is_reference: false,
    };
    (coverage, findings)
}

/// Leaves of `file` hidden beneath shape mismatches, minus ignored keys
fn leaves_under(diff: &KeyDiff, file: &LocaleFile, rules: &Rules) -> usize {
    diff.shape_mismatches
        .iter()
        .filter_map(|path| get_path(&file.tree, path).map(|value| (path, value)))
        .map(|(path, value)| {
            if value.is_object() {
                flatten(value)
                    .into_iter()
                    .filter(|(key, _)| !rules.is_ignored(&format!("{}.{}", path, key)))
                    .count()
            } else {
                1
            }
        })
        .sum()
}

fn preview(reference: &LocaleFile, key: &str) -> String {
    const MAX_CHARS: usize = 60;
    match get_path(&reference.tree, key) {
        Some(serde_json::Value::String(text)) => {
            let mut short: String = text.chars().take(MAX_CHARS).collect();
            if text.chars().count() > MAX_CHARS {
                short.push('…');
            }
            format!("\"{}\"", short)
        }
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        (part as f64 / whole as f64 * 1000.0).round() / 10.0
    }
}
