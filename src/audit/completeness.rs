// SPDX-License-Identifier: PMPL-1.0-or-later

//! Key-set comparison between a locale and the reference locale

use crate::catalog::{key_set, object_paths, SEPARATOR};
use crate::config::Rules;
use serde_json::Value;
use std::collections::BTreeSet;

/// Result of comparing the key structure of two trees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    /// Reference leaves absent from the locale
    pub missing: BTreeSet<String>,
    /// Locale leaves absent from the reference
    pub extra: BTreeSet<String>,
    /// Paths that are a leaf on one side and an object on the other
    pub shape_mismatches: BTreeSet<String>,
    /// Leaves present on both sides
    pub shared: BTreeSet<String>,
}

impl KeyDiff {
    pub fn compute(reference: &Value, locale: &Value, rules: &Rules) -> Self {
        let keep = |key: &String| !rules.is_ignored(key);

        let reference_leaves: BTreeSet<String> =
            key_set(reference).into_iter().filter(keep).collect();
        let locale_leaves: BTreeSet<String> = key_set(locale).into_iter().filter(keep).collect();
        let reference_objects: BTreeSet<String> =
            object_paths(reference).into_iter().filter(keep).collect();
        let locale_objects: BTreeSet<String> =
            object_paths(locale).into_iter().filter(keep).collect();

        let shape_mismatches: BTreeSet<String> = reference_leaves
            .intersection(&locale_objects)
            .chain(locale_leaves.intersection(&reference_objects))
            .cloned()
            .collect();

        let under_mismatch = |key: &String| {
            shape_mismatches.iter().any(|path| is_within(key, path))
        };

        let missing = reference_leaves
            .difference(&locale_leaves)
            .filter(|key| !under_mismatch(*key))
            .cloned()
            .collect();
        let extra = locale_leaves
            .difference(&reference_leaves)
            .filter(|key| !under_mismatch(*key))
            .cloned()
            .collect();
        let shared = reference_leaves
            .intersection(&locale_leaves)
            .cloned()
            .collect();

        Self {
            missing,
            extra,
            shape_mismatches,
            shared,
        }
    }
}

/// `key` equals `path` or lies beneath it
fn is_within(key: &str, path: &str) -> bool {
    key == path
        || (key.len() > path.len()
            && key.starts_with(path)
            && key[path.len()..].starts_with(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn missing_and_extra_keys() {
        let reference = json!({"a": "1", "b": {"c": "2", "d": "3"}});
        let locale = json!({"a": "1", "b": {"c": "2"}, "e": "4"});
        let diff = KeyDiff::compute(&reference, &locale, &Rules::default());
        assert_eq!(names(&diff.missing), vec!["b.d"]);
        assert_eq!(names(&diff.extra), vec!["e"]);
        assert_eq!(names(&diff.shared), vec!["a", "b.c"]);
        assert!(diff.shape_mismatches.is_empty());
    }

    #[test]
    fn shape_mismatch_suppresses_children() {
        let reference = json!({"price": {"net": "Netto", "gross": "Brutto"}});
        let locale = json!({"price": "Price"});
        let diff = KeyDiff::compute(&reference, &locale, &Rules::default());
        assert_eq!(names(&diff.shape_mismatches), vec!["price"]);
        assert!(diff.missing.is_empty());
        assert!(diff.extra.is_empty());
    }

    #[test]
    fn ignored_keys_are_skipped() {
        let config = crate::config::Config {
            ignore_keys: vec!["^_meta\\.".to_string()],
            ..Default::default()
        };
        let rules = config.rules().unwrap();
        let reference = json!({"_meta": {"author": "x"}, "a": "1"});
        let locale = json!({"a": "1"});
        let diff = KeyDiff::compute(&reference, &locale, &rules);
        assert!(diff.missing.is_empty());
    }

    #[test]
    fn ignored_groups_do_not_conflict() {
        let config = crate::config::Config {
            ignore_keys: vec!["^legacy".to_string()],
            ..Default::default()
        };
        let rules = config.rules().unwrap();
        let reference = json!({"legacy": {"title": "Stary"}, "a": "1"});
        let locale = json!({"legacy": "Old", "a": "1"});
        let diff = KeyDiff::compute(&reference, &locale, &rules);
        assert!(diff.shape_mismatches.is_empty());
        assert_eq!(names(&diff.shared), vec!["a"]);
    }

    #[test]
    fn within_requires_separator_boundary() {
        assert!(is_within("price.net", "price"));
        assert!(is_within("price", "price"));
        assert!(!is_within("prices.net", "price"));
    }
}
