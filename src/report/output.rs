// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::formatter::ReportFormatter;
use crate::report::sarif;
use crate::types::AuditReport;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Text,
    Json,
    Yaml,
    Markdown,
    Sarif,
}

impl ReportOutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportOutputFormat::Text => "txt",
            ReportOutputFormat::Json => "json",
            ReportOutputFormat::Yaml => "yaml",
            ReportOutputFormat::Markdown => "md",
            ReportOutputFormat::Sarif => "sarif",
        }
    }

    pub fn serialize(&self, report: &AuditReport) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            ReportOutputFormat::Markdown => Ok(ReportFormatter::new().markdown(report)),
            ReportOutputFormat::Sarif => sarif::to_sarif_json(report),
            // Plain text mirrors the terminal table without colour codes.
            ReportOutputFormat::Text => Ok(format_plain(report)),
        }
    }
}

fn format_plain(report: &AuditReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "locale-audit {} (reference {})",
        report.directory.display(),
        report.reference
    ));
    for entry in &report.locales {
        lines.push(format!(
            "{:<8} keys={} missing={} extra={} identical={} coverage={:.1}% translated={:.1}%",
            entry.locale,
            entry.total_keys,
            entry.missing,
            entry.extra,
            entry.untranslated,
            entry.coverage,
            entry.translated
        ));
    }
    for finding in &report.findings {
        lines.push(format!(
            "{}:{}: {} [{}] {} {}",
            finding.file.display(),
            finding.line.unwrap_or(0),
            finding.severity,
            finding.kind,
            finding.key.as_deref().unwrap_or("-"),
            finding.message
        ));
    }
    lines.push(format!("{} findings", report.summary.total()));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_distinct() {
        let all = ReportOutputFormat::value_variants();
        let mut extensions: Vec<_> = all.iter().map(|f| f.extension()).collect();
        extensions.sort();
        extensions.dedup();
        assert_eq!(extensions.len(), all.len());
    }
}
