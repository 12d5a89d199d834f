// SPDX-License-Identifier: PMPL-1.0-or-later

//! Diff utilities for audit reports.

use crate::types::*;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Findings listed individually before the rest is summarised
const LISTED_FINDINGS: usize = 20;

pub fn load_report(path: &Path) -> Result<AuditReport> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading report {}", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing yaml report {}", path.display())),
        _ => serde_json::from_str(&content)
            .with_context(|| format!("parsing json report {}", path.display())),
    }
}

pub fn format_diff(
    base: &AuditReport,
    compare: &AuditReport,
    base_label: &str,
    compare_label: &str,
) -> String {
    let mut lines = Vec::new();
    lines.push("=== LOCALE AUDIT REPORT DIFF ===".to_string());
    lines.push(format!("Base: {}", base_label));
    lines.push(format!("Compare: {}", compare_label));
    if base.reference != compare.reference {
        lines.push(format!(
            "Reference changed: {} -> {}",
            base.reference, compare.reference
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "Total findings: {} -> {} ({})",
        base.summary.total(),
        compare.summary.total(),
        fmt_delta(base.summary.total(), compare.summary.total())
    ));
    for severity in Severity::all() {
        let before = base.summary.count(severity);
        let after = compare.summary.count(severity);
        if before > 0 || after > 0 {
            lines.push(format!(
                "  {}: {} -> {} ({})",
                severity,
                before,
                after,
                fmt_delta(before, after)
            ));
        }
    }

    lines.push(String::new());
    lines.extend(format_coverage(base, compare));
    lines.push(String::new());
    lines.extend(format_kinds(base, compare));
    lines.push(String::new());
    lines.extend(format_changed_findings(base, compare));

    lines.join("\n")
}

fn format_coverage(base: &AuditReport, compare: &AuditReport) -> Vec<String> {
    let mut lines = vec!["Coverage:".to_string()];
    let locales: BTreeSet<&str> = base
        .locales
        .iter()
        .chain(&compare.locales)
        .map(|entry| entry.locale.as_str())
        .collect();

    for locale in locales {
        match (base.coverage_for(locale), compare.coverage_for(locale)) {
            (Some(before), Some(after)) => {
                let changed = if before.digest != after.digest {
                    " [content changed]"
                } else {
                    ""
                };
                lines.push(format!(
                    "  {}: {:.1}% -> {:.1}% ({:+.1}), missing {} -> {} ({}){}",
                    locale,
                    before.coverage,
                    after.coverage,
                    after.coverage - before.coverage,
                    before.missing,
                    after.missing,
                    fmt_delta(before.missing, after.missing),
                    changed
                ));
            }
            (None, Some(after)) => {
                lines.push(format!("  {}: added ({:.1}%)", locale, after.coverage));
            }
            (Some(before), None) => {
                lines.push(format!("  {}: removed (was {:.1}%)", locale, before.coverage));
            }
            (None, None) => {}
        }
    }
    lines
}

fn format_kinds(base: &AuditReport, compare: &AuditReport) -> Vec<String> {
    let mut lines = vec!["Findings by kind:".to_string()];
    let before = count_kinds(&base.findings);
    let after = count_kinds(&compare.findings);
    for kind in FindingKind::all() {
        let b = *before.get(&kind).unwrap_or(&0);
        let a = *after.get(&kind).unwrap_or(&0);
        if b > 0 || a > 0 {
            lines.push(format!("  {}: {} -> {} ({})", kind, b, a, fmt_delta(b, a)));
        }
    }
    if lines.len() == 1 {
        lines.push("  -".to_string());
    }
    lines
}

fn format_changed_findings(base: &AuditReport, compare: &AuditReport) -> Vec<String> {
    let before: BTreeSet<_> = base.findings.iter().map(Finding::identity).collect();
    let after: BTreeSet<_> = compare.findings.iter().map(Finding::identity).collect();

    let introduced: Vec<_> = after.difference(&before).collect();
    let resolved: Vec<_> = before.difference(&after).collect();

    let mut lines = Vec::new();
    lines.push(format!("Introduced findings: {}", introduced.len()));
    lines.extend(list_identities(&introduced, "+"));
    lines.push(format!("Resolved findings: {}", resolved.len()));
    lines.extend(list_identities(&resolved, "-"));
    lines
}

fn list_identities(items: &[&(FindingKind, String, String)], sign: &str) -> Vec<String> {
    let mut lines: Vec<String> = items
        .iter()
        .take(LISTED_FINDINGS)
        .map(|(kind, locale, key)| {
            let key = if key.is_empty() { "-" } else { key.as_str() };
            format!("  {} {} {} {}", sign, locale, kind, key)
        })
        .collect();
    if items.len() > LISTED_FINDINGS {
        lines.push(format!("  ... and {} more", items.len() - LISTED_FINDINGS));
    }
    lines
}

fn fmt_delta(before: usize, after: usize) -> String {
    let delta = after as i64 - before as i64;
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn count_kinds(findings: &[Finding]) -> BTreeMap<FindingKind, usize> {
    let mut map = BTreeMap::new();
    for finding in findings {
        *map.entry(finding.kind).or_insert(0) += 1;
    }
    map
}
