// SPDX-License-Identifier: PMPL-1.0-or-later

//! Batch edits across every locale of a catalog.
//!
//! Operations mutate the loaded catalog in memory and mark touched files
//! dirty. Callers decide whether to write (`Catalog::save_dirty`) or just
//! print the summary for a dry run.

use crate::catalog::{
    align_order, flatten, flatten_segments, get_path, get_segments, join_segments, remove_path,
    remove_segments, set_path, set_segments, Catalog, CatalogError,
};
use crate::config::Rules;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Patch entry addressing every loaded locale
pub const ALL_LOCALES: &str = "*";

/// Per-locale change counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LocaleChanges {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl LocaleChanges {
    pub fn touched(&self) -> bool {
        self.added + self.updated + self.removed > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchSummary {
    pub operation: String,
    pub locales: BTreeMap<String, LocaleChanges>,
}

impl PatchSummary {
    fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            locales: BTreeMap::new(),
        }
    }

    fn entry(&mut self, locale: &str) -> &mut LocaleChanges {
        self.locales.entry(locale.to_string()).or_default()
    }

    pub fn total(&self) -> LocaleChanges {
        self.locales
            .values()
            .fold(LocaleChanges::default(), |acc, c| LocaleChanges {
                added: acc.added + c.added,
                updated: acc.updated + c.updated,
                removed: acc.removed + c.removed,
                unchanged: acc.unchanged + c.unchanged,
            })
    }

    pub fn print(&self, dry_run: bool) {
        let suffix = if dry_run { " (dry run, nothing written)" } else { "" };
        println!("{}{}", self.operation, suffix);
        for (locale, changes) in &self.locales {
            if changes.touched() {
                println!(
                    "  {:<8} +{} added  ~{} updated  -{} removed",
                    locale, changes.added, changes.updated, changes.removed
                );
            }
        }
        let total = self.total();
        println!(
            "  total    +{} added  ~{} updated  -{} removed",
            total.added, total.updated, total.removed
        );
    }
}

/// How `sync_missing` fills keys absent from a locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    /// Copy the reference value
    Reference,
    Empty,
    /// Reference text prefixed with a marker, e.g. `TODO: `
    Marker(String),
}

impl Fill {
    fn value_for(&self, reference: &Value) -> Value {
        match (self, reference) {
            (Fill::Reference, value) => value.clone(),
            (Fill::Empty, _) => Value::String(String::new()),
            (Fill::Marker(prefix), Value::String(text)) => Value::String(format!("{}{}", prefix, text)),
            (Fill::Marker(prefix), other) => Value::String(format!("{}{}", prefix, other)),
        }
    }
}

/// Parse a patch document from disk (JSON or YAML by extension)
pub fn load_patch(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading patch {}", path.display()))?;
    let value: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing yaml patch {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("parsing json patch {}", path.display()))?,
    };
    Ok(value)
}

/// Apply `{ "<locale>" | "*": { ...keys... } }` to the catalog.
///
/// Both nested objects and flat dotted keys are accepted inside each locale
/// entry. A locale's own entry wins over `"*"` for the same key. With
/// `overwrite` unset, keys that existed before the patch are left alone.
pub fn apply_patch(catalog: &mut Catalog, patch: &Value, overwrite: bool) -> Result<PatchSummary> {
    let Value::Object(entries) = patch else {
        bail!("patch must be an object keyed by locale code");
    };

    for (code, block) in entries {
        if code != ALL_LOCALES && !catalog.contains(code) {
            return Err(CatalogError::MissingLocale(code.clone()).into());
        }
        if !block.is_object() {
            bail!("patch entry for '{}' must be an object", code);
        }
    }

    let mut summary = PatchSummary::new("patch");
    let codes: Vec<String> = catalog.codes().into_iter().map(String::from).collect();
    for code in &codes {
        let mut leaves: Map<String, Value> = Map::new();
        for block in [entries.get(ALL_LOCALES), entries.get(code.as_str())]
            .into_iter()
            .flatten()
        {
            for (key, value) in flatten(block) {
                leaves.insert(key, value.clone());
            }
        }
        if leaves.is_empty() {
            continue;
        }

        let file = catalog
            .locale_mut(code)
            .ok_or_else(|| CatalogError::MissingLocale(code.clone()))?;
        let before = file.tree.clone();
        let changes = summary.entry(code);
        for (key, value) in leaves {
            match get_path(&before, &key) {
                Some(existing) if *existing == value => {
                    changes.unchanged += 1;
                    continue;
                }
                Some(_) if !overwrite => {
                    changes.unchanged += 1;
                    continue;
                }
                _ => {}
            }

            let previous = set_path(&mut file.tree, &key, value)
                .with_context(|| format!("patching {} in {}", key, code))?;
            if previous.is_some() {
                changes.updated += 1;
            } else {
                changes.added += 1;
            }
            file.mark_dirty();
            debug!(locale = %code, key = %key, "patched");
        }
    }

    info!(total = ?summary.total(), "patch applied");
    Ok(summary)
}

/// Insert every reference key missing from the other locales.
pub fn sync_missing(
    catalog: &mut Catalog,
    reference: &str,
    fill: &Fill,
    rules: &Rules,
) -> Result<PatchSummary> {
    let reference_tree = catalog.reference(reference)?.tree.clone();
    let reference_entries: Vec<(Vec<String>, Value)> = flatten_segments(&reference_tree)
        .into_iter()
        .filter(|(path, _)| !rules.is_ignored(&join_segments(path)))
        .map(|(path, value)| (path, value.clone()))
        .collect();

    let mut summary = PatchSummary::new("sync");
    for file in catalog.files_mut().filter(|file| file.code != reference) {
        let changes = summary.entry(&file.code);
        for (path, reference_value) in &reference_entries {
            if get_segments(&file.tree, path).is_some() {
                changes.unchanged += 1;
                continue;
            }
            match set_segments(&mut file.tree, path, fill.value_for(reference_value)) {
                Ok(_) => {
                    changes.added += 1;
                    file.mark_dirty();
                }
                // The locale holds a leaf where the reference has a group; leave it for a human.
                Err(CatalogError::PathConflict { key, .. }) => {
                    debug!(locale = %file.code, key = %key, "sync skipped: shape conflict");
                    changes.unchanged += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    info!(total = ?summary.total(), "missing keys synced");
    Ok(summary)
}

/// Remove locale keys that the reference does not have.
pub fn prune_extra(catalog: &mut Catalog, reference: &str, rules: &Rules) -> Result<PatchSummary> {
    let reference_tree = catalog.reference(reference)?.tree.clone();

    let mut summary = PatchSummary::new("prune");
    for file in catalog.files_mut().filter(|file| file.code != reference) {
        let extra: Vec<Vec<String>> = flatten_segments(&file.tree)
            .into_iter()
            .map(|(path, _)| path)
            .filter(|path| !rules.is_ignored(&join_segments(path)))
            .filter(|path| get_segments(&reference_tree, path).is_none())
            .filter(|path| !under_reference_leaf(&reference_tree, path))
            .collect();
        let changes = summary.entry(&file.code);
        for path in extra {
            if remove_segments(&mut file.tree, &path).is_some() {
                changes.removed += 1;
                file.mark_dirty();
            }
        }
    }

    info!(total = ?summary.total(), "extra keys pruned");
    Ok(summary)
}

/// True when some proper prefix of `path` is a leaf in the reference.
/// Such keys are shape mismatches and are not pruned.
fn under_reference_leaf(reference: &Value, path: &[String]) -> bool {
    (1..path.len())
        .any(|depth| matches!(get_segments(reference, &path[..depth]), Some(v) if !v.is_object()))
}

/// Reorder every locale to follow the reference member order.
pub fn align(catalog: &mut Catalog, reference: &str) -> Result<PatchSummary> {
    let reference_tree = catalog.reference(reference)?.tree.clone();
    let mut summary = PatchSummary::new("align");
    for file in catalog.files_mut().filter(|file| file.code != reference) {
        let changed = align_order(&mut file.tree, &reference_tree);
        let changes = summary.entry(&file.code);
        if changed {
            changes.updated += 1;
            file.mark_dirty();
        } else {
            changes.unchanged += 1;
        }
    }
    Ok(summary)
}

/// Text replacement inside string values
#[derive(Debug, Clone)]
pub struct Replacement {
    pub pattern: Regex,
    pub replacement: String,
    /// Only keys equal to or under this prefix
    pub prefix: Option<String>,
    /// Only these locales; empty means all
    pub locales: Vec<String>,
}

impl Replacement {
    /// Literal search text
    pub fn literal(find: &str, replacement: &str) -> Self {
        Self {
            pattern: Regex::new(&regex::escape(find))
                .unwrap_or_else(|_| unreachable!("escaped literal is a valid regex")),
            // `$` in a literal replacement must not expand capture groups.
            replacement: replacement.replace('$', "$$"),
            prefix: None,
            locales: Vec::new(),
        }
    }

    pub fn regex(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .with_context(|| format!("invalid replacement pattern: {}", pattern))?,
            replacement: replacement.to_string(),
            prefix: None,
            locales: Vec::new(),
        })
    }

    fn applies_to_key(&self, key: &str) -> bool {
        match &self.prefix {
            None => true,
            Some(prefix) => {
                key == prefix
                    || (key.starts_with(prefix.as_str())
                        && key[prefix.len()..].starts_with(crate::catalog::SEPARATOR))
            }
        }
    }

    fn applies_to_locale(&self, code: &str) -> bool {
        self.locales.is_empty() || self.locales.iter().any(|l| l == code)
    }
}

pub fn replace_text(catalog: &mut Catalog, edit: &Replacement) -> Result<PatchSummary> {
    for code in &edit.locales {
        if !catalog.contains(code) {
            return Err(CatalogError::MissingLocale(code.clone()).into());
        }
    }

    let mut summary = PatchSummary::new("replace");
    for file in catalog
        .files_mut()
        .filter(|file| edit.applies_to_locale(&file.code))
    {
        let targets: Vec<(Vec<String>, String)> = flatten_segments(&file.tree)
            .into_iter()
            .filter(|(path, _)| edit.applies_to_key(&join_segments(path)))
            .filter_map(|(path, value)| {
                let text = value.as_str()?;
                let replaced = edit.pattern.replace_all(text, edit.replacement.as_str());
                (replaced != text).then(|| (path, replaced.into_owned()))
            })
            .collect();

        let changes = summary.entry(&file.code);
        for (path, text) in targets {
            set_segments(&mut file.tree, &path, Value::String(text))?;
            changes.updated += 1;
            file.mark_dirty();
        }
    }

    info!(total = ?summary.total(), "text replaced");
    Ok(summary)
}

/// Move a key (leaf or subtree) to a new path in every locale that has it.
pub fn rename_key(catalog: &mut Catalog, from: &str, to: &str, overwrite: bool) -> Result<PatchSummary> {
    if from == to {
        bail!("source and destination keys are the same");
    }
    if to.starts_with(from) && to[from.len()..].starts_with(crate::catalog::SEPARATOR) {
        bail!("cannot move '{}' inside itself", from);
    }

    if !overwrite {
        for file in catalog.files() {
            if get_path(&file.tree, from).is_some() && get_path(&file.tree, to).is_some() {
                bail!(
                    "'{}' already exists in {} (use --overwrite to replace it)",
                    to,
                    file.code
                );
            }
        }
    }

    let mut summary = PatchSummary::new("rename");
    for file in catalog.files_mut() {
        let changes = summary.entry(&file.code);
        let Some(value) = remove_path(&mut file.tree, from) else {
            changes.unchanged += 1;
            continue;
        };
        set_path(&mut file.tree, to, value)
            .with_context(|| format!("renaming {} to {} in {}", from, to, file.code))?;
        changes.updated += 1;
        file.mark_dirty();
    }

    info!(from, to, total = ?summary.total(), "key renamed");
    Ok(summary)
}
