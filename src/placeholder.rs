// SPDX-License-Identifier: PMPL-1.0-or-later

//! Placeholder extraction and interpolation for translation values.

use anyhow::{bail, Context, Result};
use regex::{Captures, Regex};
use std::collections::BTreeSet;

/// Matches `{name}` and `{{name}}`, capturing `name`.
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = r"\{\{?\s*([A-Za-z0-9_.]+)\s*\}?\}";

#[derive(Debug, Clone)]
pub struct Placeholders {
    pattern: Regex,
}

impl Placeholders {
    /// Compile a placeholder pattern. The first capture group is the name.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("invalid placeholder pattern: {}", pattern))?;
        if pattern.captures_len() < 2 {
            bail!("placeholder pattern needs a capture group for the name");
        }
        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Text with every placeholder removed
    pub fn strip(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }

    pub fn interpolate(&self, text: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return text.to_string();
        }
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PLACEHOLDER_PATTERN)
                .unwrap_or_else(|_| unreachable!("default placeholder pattern compiles")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_and_double_braces() {
        let placeholders = Placeholders::default();
        let names = placeholders.extract("Cena {price} PLN za {{ count }} szt.");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["count".to_string(), "price".to_string()]
        );
    }

    #[test]
    fn interpolate_leaves_unknown_names() {
        let placeholders = Placeholders::default();
        let out = placeholders.interpolate("{length} x {width} m", &[("length", "6.06")]);
        assert_eq!(out, "6.06 x {width} m");
    }

    #[test]
    fn strip_removes_all_placeholders() {
        let placeholders = Placeholders::default();
        assert_eq!(placeholders.strip("{a} x {{b}}"), " x ");
    }

    #[test]
    fn pattern_without_group_rejected() {
        assert!(Placeholders::new(r"%s").is_err());
        assert!(Placeholders::new(r"%\{(\w+)\}").is_ok());
    }
}
