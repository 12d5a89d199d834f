// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::types::*;
use anyhow::Result;
use colored::*;
use std::fs;
use std::path::Path;

/// Findings listed per locale before the rest is summarised
const DEFAULT_FINDING_LIMIT: usize = 25;

pub struct ReportFormatter {
    finding_limit: usize,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self {
            finding_limit: DEFAULT_FINDING_LIMIT,
        }
    }

    pub fn with_finding_limit(mut self, limit: usize) -> Self {
        self.finding_limit = limit;
        self
    }

    pub fn print(&self, report: &AuditReport) {
        println!("\n{}", "=== LOCALE AUDIT REPORT ===".bold().cyan());
        println!("  Directory: {}", report.directory.display());
        println!("  Reference: {}", report.reference);
        println!();

        self.print_coverage(&report.locales);
        println!();

        self.print_findings(report);
        println!();

        self.print_summary(&report.summary);
        println!();
    }

    fn print_coverage(&self, locales: &[LocaleCoverage]) {
        println!("{}", "COVERAGE".bold().yellow());
        println!(
            "  {:<8} {:<12} {:>7} {:>7} {:>7} {:>7} {:>9} {:>11}",
            "Locale", "Language", "Keys", "Missing", "Extra", "Same", "Coverage", "Translated"
        );
        println!("  {}", "-".repeat(76));

        for entry in locales {
            let language = entry.language.as_deref().unwrap_or("?");
            let coverage = format!("{:.1}%", entry.coverage).color(percent_color(entry.coverage));
            let translated =
                format!("{:.1}%", entry.translated).color(percent_color(entry.translated));
            let locale = if entry.is_reference {
                format!("{}*", entry.locale).bold()
            } else {
                entry.locale.normal()
            };
            println!(
                "  {:<8} {:<12} {:>7} {:>7} {:>7} {:>7} {:>9} {:>11}",
                locale,
                language,
                entry.total_keys,
                entry.missing,
                entry.extra,
                entry.untranslated,
                coverage,
                translated
            );
        }
        println!("  {}", "* reference locale".dimmed());
    }

    fn print_findings(&self, report: &AuditReport) {
        if report.findings.is_empty() {
            println!("{}", "No findings".green());
            return;
        }

        println!("{}", "FINDINGS".bold().yellow());
        for entry in &report.locales {
            let findings: Vec<&Finding> = report.findings_for(&entry.locale).collect();
            if findings.is_empty() {
                continue;
            }
            println!("  {} ({} findings)", entry.locale.bold(), findings.len());
            for finding in findings.iter().take(self.finding_limit) {
                let key = finding.key.as_deref().unwrap_or("-");
                let location = match finding.line {
                    Some(line) => format!(" [line {}]", line),
                    None => String::new(),
                };
                println!(
                    "    [{}] {} {} - {}{}",
                    severity_label(finding.severity),
                    finding.kind.to_string().bold(),
                    key,
                    finding.message,
                    location.dimmed()
                );
            }
            if findings.len() > self.finding_limit {
                println!(
                    "    ... and {} more",
                    findings.len() - self.finding_limit
                );
            }
        }
    }

    fn print_summary(&self, summary: &SeveritySummary) {
        println!("{}", "SUMMARY".bold().yellow());
        for severity in Severity::all() {
            println!(
                "  {:<9} {}",
                severity_label(severity),
                summary.count(severity)
            );
        }
        println!("  {:<9} {}", "total", summary.total());
    }

    /// Markdown rendering for pull request comments and wikis
    pub fn markdown(&self, report: &AuditReport) -> String {
        let mut lines = Vec::new();
        lines.push("# Locale audit".to_string());
        lines.push(String::new());
        lines.push(format!(
            "Directory `{}`, reference locale `{}`, generated {}.",
            report.directory.display(),
            report.reference,
            report.created_at
        ));
        lines.push(String::new());
        lines.push("| Locale | Language | Keys | Missing | Extra | Identical | Coverage | Translated |".to_string());
        lines.push("|---|---|---:|---:|---:|---:|---:|---:|".to_string());
        for entry in &report.locales {
            let marker = if entry.is_reference { " (reference)" } else { "" };
            lines.push(format!(
                "| `{}`{} | {} | {} | {} | {} | {} | {:.1}% | {:.1}% |",
                entry.locale,
                marker,
                entry.language.as_deref().unwrap_or("?"),
                entry.total_keys,
                entry.missing,
                entry.extra,
                entry.untranslated,
                entry.coverage,
                entry.translated
            ));
        }
        lines.push(String::new());

        if report.findings.is_empty() {
            lines.push("No findings.".to_string());
        } else {
            lines.push(format!("## Findings ({})", report.summary.total()));
            lines.push(String::new());
            lines.push("| Severity | Kind | Locale | Key | Message |".to_string());
            lines.push("|---|---|---|---|---|".to_string());
            for finding in &report.findings {
                lines.push(format!(
                    "| {} | {} | `{}` | {} | {} |",
                    finding.severity,
                    finding.kind,
                    finding.locale,
                    finding
                        .key
                        .as_deref()
                        .map(|key| format!("`{}`", key))
                        .unwrap_or_else(|| "-".to_string()),
                    markdown_escape(&finding.message)
                ));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn save<P: AsRef<Path>>(&self, report: &AuditReport, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path.as_ref(), json)?;
        println!("Report saved to: {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_color(value: f64) -> &'static str {
    if value >= 99.95 {
        "green"
    } else if value >= 80.0 {
        "yellow"
    } else {
        "red"
    }
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let text = severity.to_string();
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.blue(),
    }
}

/// Escape characters that would break a markdown table cell
pub fn markdown_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn markdown_escapes_table_breakers() {
        assert_eq!(markdown_escape("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn markdown_lists_locales_and_findings() {
        let report = AuditReport {
            created_at: "2026-01-01T00:00:00Z".to_string(),
            directory: PathBuf::from("locales"),
            reference: "pl".to_string(),
            locales: vec![LocaleCoverage {
                locale: "en".to_string(),
                language: Some("English".to_string()),
                coverage: 50.0,
                ..Default::default()
            }],
            findings: vec![Finding::new(
                FindingKind::MissingKey,
                "en",
                PathBuf::from("locales/en.json"),
                "missing key".to_string(),
            )
            .with_key("nav.home")],
            summary: SeveritySummary {
                high: 1,
                ..Default::default()
            },
        };
        let md = ReportFormatter::new().markdown(&report);
        assert!(md.contains("| `en` | English |"));
        assert!(md.contains("50.0%"));
        assert!(md.contains("| high | missing-key | `en` | `nav.home` | missing key |"));
    }
}
