// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for locale-audit reports

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Finding severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn all() -> [Severity; 4] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
    }

    /// Numeric weight, higher is worse.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn at_least(self, threshold: Severity) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(label)
    }
}

/// Kind of problem detected in a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A path is a leaf in one locale and an object in the other
    ShapeMismatch,
    MissingKey,
    ExtraKey,
    EmptyValue,
    LeftoverMarker,
    PlaceholderMismatch,
    TypeMismatch,
    Untranslated,
    WhitespaceMismatch,
    /// Member name contains the key separator
    AmbiguousKey,
    InvalidLocaleCode,
}

impl FindingKind {
    pub fn all() -> [FindingKind; 11] {
        [
            FindingKind::ShapeMismatch,
            FindingKind::MissingKey,
            FindingKind::ExtraKey,
            FindingKind::EmptyValue,
            FindingKind::LeftoverMarker,
            FindingKind::PlaceholderMismatch,
            FindingKind::TypeMismatch,
            FindingKind::Untranslated,
            FindingKind::WhitespaceMismatch,
            FindingKind::AmbiguousKey,
            FindingKind::InvalidLocaleCode,
        ]
    }

    pub fn default_severity(self) -> Severity {
        match self {
            FindingKind::ShapeMismatch => Severity::Critical,
            FindingKind::MissingKey
            | FindingKind::EmptyValue
            | FindingKind::PlaceholderMismatch => Severity::High,
            FindingKind::LeftoverMarker
            | FindingKind::TypeMismatch
            | FindingKind::AmbiguousKey
            | FindingKind::InvalidLocaleCode => Severity::Medium,
            FindingKind::ExtraKey | FindingKind::Untranslated | FindingKind::WhitespaceMismatch => {
                Severity::Low
            }
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            FindingKind::ShapeMismatch => "shape-mismatch",
            FindingKind::MissingKey => "missing-key",
            FindingKind::ExtraKey => "extra-key",
            FindingKind::EmptyValue => "empty-value",
            FindingKind::LeftoverMarker => "leftover-marker",
            FindingKind::PlaceholderMismatch => "placeholder-mismatch",
            FindingKind::TypeMismatch => "type-mismatch",
            FindingKind::Untranslated => "untranslated",
            FindingKind::WhitespaceMismatch => "whitespace-mismatch",
            FindingKind::AmbiguousKey => "ambiguous-key",
            FindingKind::InvalidLocaleCode => "invalid-locale-code",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A single problem in one locale file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
    /// Catalog file the finding belongs to
    pub file: PathBuf,
    /// 1-based line in `file`, when the key could be located
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Finding {
    pub fn new(kind: FindingKind, locale: &str, file: PathBuf, message: String) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            locale: locale.to_string(),
            key: None,
            message,
            file,
            line: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Stable identity used when diffing two reports
    pub fn identity(&self) -> (FindingKind, String, String) {
        (
            self.kind,
            self.locale.clone(),
            self.key.clone().unwrap_or_default(),
        )
    }
}

/// Per-locale coverage relative to the reference locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LocaleCoverage {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub file: PathBuf,
    pub total_keys: usize,
    pub reference_keys: usize,
    pub present: usize,
    pub missing: usize,
    pub extra: usize,
    pub untranslated: usize,
    pub empty: usize,
    /// Percentage of reference keys present
    pub coverage: f64,
    /// Percentage of reference keys present, non-empty and not identical to the reference
    pub translated: f64,
    pub digest: String,
    pub is_reference: bool,
}

/// Finding counts per severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeveritySummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = SeveritySummary::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Complete audit of one catalog directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub created_at: String,
    pub directory: PathBuf,
    pub reference: String,
    pub locales: Vec<LocaleCoverage>,
    pub findings: Vec<Finding>,
    pub summary: SeveritySummary,
}

impl AuditReport {
    /// True when any finding is at or above `threshold`
    pub fn exceeds(&self, threshold: Severity) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity.at_least(threshold))
    }

    pub fn findings_for<'a>(&'a self, locale: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings
            .iter()
            .filter(move |finding| finding.locale == locale)
    }

    pub fn coverage_for(&self, locale: &str) -> Option<&LocaleCoverage> {
        self.locales.iter().find(|entry| entry.locale == locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_threshold_ordering() {
        assert!(Severity::Critical.at_least(Severity::High));
        assert!(Severity::High.at_least(Severity::High));
        assert!(!Severity::Low.at_least(Severity::Medium));
    }

    #[test]
    fn summary_counts_each_severity() {
        let file = PathBuf::from("de.json");
        let findings = vec![
            Finding::new(FindingKind::MissingKey, "de", file.clone(), "m".into()),
            Finding::new(FindingKind::ExtraKey, "de", file.clone(), "e".into()),
            Finding::new(FindingKind::ShapeMismatch, "de", file, "s".into()),
        ];
        let summary = SeveritySummary::from_findings(&findings);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn finding_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FindingKind::PlaceholderMismatch).unwrap();
        assert_eq!(json, "\"placeholder-mismatch\"");
    }
}
