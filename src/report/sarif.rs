// SPDX-License-Identifier: PMPL-1.0-or-later

//! SARIF 2.1.0 output for code-scanning integrations
//!
//! Converts audit findings into OASIS SARIF format.
//! See: https://docs.oasis-open.org/sarif/sarif/v2.1.0/sarif-v2.1.0.html

use crate::types::{AuditReport, FindingKind, Severity};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Top-level SARIF log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

/// A single SARIF run (one tool execution)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifTool {
    pub driver: SarifToolComponent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifToolComponent {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifMessage,
    pub default_configuration: SarifConfiguration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifConfiguration {
    pub level: String,
}

/// A single finding
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: u32,
}

/// Map FindingKind to a stable rule ID
fn rule_id(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::ShapeMismatch => "LA001",
        FindingKind::MissingKey => "LA002",
        FindingKind::ExtraKey => "LA003",
        FindingKind::EmptyValue => "LA004",
        FindingKind::LeftoverMarker => "LA005",
        FindingKind::PlaceholderMismatch => "LA006",
        FindingKind::TypeMismatch => "LA007",
        FindingKind::Untranslated => "LA008",
        FindingKind::WhitespaceMismatch => "LA009",
        FindingKind::AmbiguousKey => "LA010",
        FindingKind::InvalidLocaleCode => "LA011",
    }
}

fn rule_description(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::ShapeMismatch => "Key is a single value in one locale and a group in the other",
        FindingKind::MissingKey => "Reference key missing from locale",
        FindingKind::ExtraKey => "Locale key not present in the reference",
        FindingKind::EmptyValue => "Translation is empty",
        FindingKind::LeftoverMarker => "Translation still contains a work-in-progress marker",
        FindingKind::PlaceholderMismatch => "Placeholders differ from the reference",
        FindingKind::TypeMismatch => "JSON type differs from the reference",
        FindingKind::Untranslated => "Translation is identical to the reference text",
        FindingKind::WhitespaceMismatch => "Leading or trailing whitespace differs from the reference",
        FindingKind::AmbiguousKey => "Member name contains the key separator",
        FindingKind::InvalidLocaleCode => "File name is not a valid locale code",
    }
}

/// Map Severity to SARIF level
fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "error",
        Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low => "note",
    }
}

/// Artifact URI relative to the working directory when possible
fn artifact_uri(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

/// Convert an AuditReport to a SARIF log
pub fn to_sarif(report: &AuditReport) -> SarifLog {
    let kinds: BTreeSet<FindingKind> = report.findings.iter().map(|f| f.kind).collect();
    let rules = kinds
        .into_iter()
        .map(|kind| SarifRule {
            id: rule_id(kind).to_string(),
            name: kind.slug().to_string(),
            short_description: SarifMessage {
                text: rule_description(kind).to_string(),
            },
            default_configuration: SarifConfiguration {
                level: sarif_level(kind.default_severity()).to_string(),
            },
        })
        .collect();

    let results = report
        .findings
        .iter()
        .map(|finding| {
            let text = match &finding.key {
                Some(key) => format!("{} ({}): {}", key, finding.locale, finding.message),
                None => format!("{}: {}", finding.locale, finding.message),
            };
            SarifResult {
                rule_id: rule_id(finding.kind).to_string(),
                level: sarif_level(finding.severity).to_string(),
                message: SarifMessage { text },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: artifact_uri(&finding.file),
                        },
                        region: finding.line.map(|start_line| SarifRegion { start_line }),
                    },
                }],
            }
        })
        .collect();

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifToolComponent {
                    name: "locale-audit".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Serialize a SARIF log to JSON string
pub fn to_sarif_json(report: &AuditReport) -> Result<String> {
    let log = to_sarif(report);
    let json = serde_json::to_string_pretty(&log)?;
    Ok(json)
}
