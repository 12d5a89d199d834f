// SPDX-License-Identifier: PMPL-1.0-or-later

//! Value-level checks for keys present in both a locale and the reference.
//!
//! Only language-agnostic signals are used. A value is "untranslated" when
//! it is byte-identical to the reference text, never because of guesses
//! about which language a string looks like.

use crate::config::Rules;
use crate::types::FindingKind;
use serde_json::Value;

/// One problem with a single value, before it is attached to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: FindingKind,
    pub message: String,
}

impl Issue {
    fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks that apply to any value, the reference included
pub fn check_standalone(value: &Value, rules: &Rules) -> Vec<Issue> {
    let mut issues = Vec::new();
    if let Value::String(text) = value {
        if text.trim().is_empty() {
            issues.push(Issue::new(FindingKind::EmptyValue, "value is empty"));
        } else if let Some(marker) = rules.marker_in(text) {
            issues.push(Issue::new(
                FindingKind::LeftoverMarker,
                format!("value contains marker '{}'", marker),
            ));
        }
    }
    issues
}

/// Checks comparing a locale value with the reference value for `key`
pub fn check_against_reference(
    key: &str,
    value: &Value,
    reference: &Value,
    rules: &Rules,
) -> Vec<Issue> {
    let mut issues = check_standalone(value, rules);

    let (text, reference_text) = match (value, reference) {
        (Value::String(text), Value::String(reference_text)) => (text, reference_text),
        _ => {
            if json_type(value) != json_type(reference) {
                issues.push(Issue::new(
                    FindingKind::TypeMismatch,
                    format!(
                        "value is {} but reference is {}",
                        json_type(value),
                        json_type(reference)
                    ),
                ));
            }
            return issues;
        }
    };

    if text.trim().is_empty() {
        return issues;
    }

    let found = rules.placeholders.extract(text);
    let expected = rules.placeholders.extract(reference_text);
    if found != expected {
        let missing: Vec<&str> = expected.difference(&found).map(String::as_str).collect();
        let unexpected: Vec<&str> = found.difference(&expected).map(String::as_str).collect();
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing {{{}}}", missing.join("}, {")));
        }
        if !unexpected.is_empty() {
            parts.push(format!("unexpected {{{}}}", unexpected.join("}, {")));
        }
        issues.push(Issue::new(
            FindingKind::PlaceholderMismatch,
            format!("placeholders differ from reference: {}", parts.join("; ")),
        ));
    }

    if text == reference_text && looks_translatable(text, rules) && !rules.allows_identical(key) {
        issues.push(Issue::new(
            FindingKind::Untranslated,
            "value is identical to the reference",
        ));
    }

    if edge_whitespace(text) != edge_whitespace(reference_text) {
        issues.push(Issue::new(
            FindingKind::WhitespaceMismatch,
            "leading/trailing whitespace differs from reference",
        ));
    }

    issues
}

fn looks_translatable(text: &str, rules: &Rules) -> bool {
    let without_placeholders = rules.placeholders.strip(text);
    without_placeholders.chars().count() >= rules.min_identical_len
        && without_placeholders.chars().any(char::is_alphabetic)
}

fn edge_whitespace(text: &str) -> (bool, bool) {
    (
        text.starts_with(char::is_whitespace),
        text.ends_with(char::is_whitespace),
    )
}

pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(issues: &[Issue]) -> Vec<FindingKind> {
        issues.iter().map(|issue| issue.kind).collect()
    }

    #[test]
    fn empty_and_marker_values() {
        let rules = Rules::default();
        assert_eq!(
            kinds(&check_standalone(&json!("  "), &rules)),
            vec![FindingKind::EmptyValue]
        );
        assert_eq!(
            kinds(&check_standalone(&json!("TODO Kontener"), &rules)),
            vec![FindingKind::LeftoverMarker]
        );
        assert!(check_standalone(&json!("Container"), &rules).is_empty());
    }

    #[test]
    fn placeholder_mismatch_reported() {
        let rules = Rules::default();
        let issues = check_against_reference(
            "calc.total",
            &json!("Total: {amount} EUR"),
            &json!("Razem: {sum} PLN"),
            &rules,
        );
        assert_eq!(kinds(&issues), vec![FindingKind::PlaceholderMismatch]);
        assert!(issues[0].message.contains("missing {sum}"));
        assert!(issues[0].message.contains("unexpected {amount}"));
    }

    #[test]
    fn identical_text_is_untranslated_unless_short_or_allowed() {
        let rules = Rules::default();
        assert_eq!(
            kinds(&check_against_reference(
                "hero.title",
                &json!("Kontenery morskie"),
                &json!("Kontenery morskie"),
                &rules
            )),
            vec![FindingKind::Untranslated]
        );
        assert!(check_against_reference("unit", &json!("m²"), &json!("m²"), &rules).is_empty());

        let config = crate::config::Config {
            allow_identical: vec!["^brand\\.".to_string()],
            ..Default::default()
        };
        let rules = config.rules().unwrap();
        assert!(check_against_reference(
            "brand.name",
            &json!("BoxConfig Pro"),
            &json!("BoxConfig Pro"),
            &rules
        )
        .is_empty());
    }

    #[test]
    fn placeholders_do_not_count_towards_length() {
        let rules = Rules::default();
        assert!(check_against_reference("x", &json!("{count} m"), &json!("{count} m"), &rules)
            .is_empty());
    }

    #[test]
    fn type_mismatch_reported() {
        let rules = Rules::default();
        assert_eq!(
            kinds(&check_against_reference("max", &json!("40"), &json!(40), &rules)),
            vec![FindingKind::TypeMismatch]
        );
        assert!(check_against_reference("max", &json!(45), &json!(40), &rules).is_empty());
    }

    #[test]
    fn whitespace_mismatch_reported() {
        let rules = Rules::default();
        assert_eq!(
            kinds(&check_against_reference(
                "label",
                &json!("Price "),
                &json!("Cena"),
                &rules
            )),
            vec![FindingKind::WhitespaceMismatch]
        );
    }
}
