// SPDX-License-Identifier: PMPL-1.0-or-later

//! Dotted key paths over nested JSON objects.
//!
//! A key is the `.`-joined list of member names from the root object down to
//! a leaf. Anything that is not an object is a leaf, including arrays and
//! null. Empty objects have no keys.

use super::CatalogError;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const SEPARATOR: char = '.';

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", prefix, SEPARATOR, name)
    }
}

fn segments(key: &str) -> Result<Vec<&str>, CatalogError> {
    let parts: Vec<&str> = key.split(SEPARATOR).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(CatalogError::InvalidKey(key.to_string()));
    }
    Ok(parts)
}

/// Leaf entries in document order.
pub fn flatten(value: &Value) -> Vec<(String, &Value)> {
    flatten_segments(value)
        .into_iter()
        .map(|(path, leaf)| (join_segments(&path), leaf))
        .collect()
}

/// Leaf entries with the member names along their path.
///
/// Unlike the dotted form this stays exact when a member name itself
/// contains the separator, so edits should address leaves this way.
pub fn flatten_segments(value: &Value) -> Vec<(Vec<String>, &Value)> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    segments_into(&mut path, value, &mut out);
    out
}

fn segments_into<'a>(
    path: &mut Vec<String>,
    value: &'a Value,
    out: &mut Vec<(Vec<String>, &'a Value)>,
) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                path.push(name.clone());
                segments_into(path, child, out);
                path.pop();
            }
        }
        leaf if !path.is_empty() => out.push((path.clone(), leaf)),
        _ => {}
    }
}

/// Dotted form of a segment path
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(&SEPARATOR.to_string())
}

/// Sorted set of leaf keys.
pub fn key_set(value: &Value) -> BTreeSet<String> {
    flatten(value).into_iter().map(|(key, _)| key).collect()
}

/// Sorted set of intermediate object paths (the root is not included).
pub fn object_paths(value: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_objects("", value, &mut out);
    out
}

fn collect_objects(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    if let Value::Object(map) = value {
        if !prefix.is_empty() {
            out.insert(prefix.to_string());
        }
        for (name, child) in map {
            collect_objects(&join(prefix, name), child, out);
        }
    }
}

/// Member names that contain the separator, as (parent path, name).
pub fn ambiguous_members(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect_ambiguous("", value, &mut out);
    out
}

fn collect_ambiguous(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    if let Value::Object(map) = value {
        for (name, child) in map {
            if name.contains(SEPARATOR) {
                out.push((prefix.to_string(), name.clone()));
            }
            collect_ambiguous(&join(prefix, name), child, out);
        }
    }
}

/// Look up a dotted key. Returns objects too when the key names a subtree.
pub fn get_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let parts: Vec<&str> = key.split(SEPARATOR).collect();
    get_segments(root, &parts)
}

pub fn get_segments<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = root;
    for part in segments {
        current = current.as_object()?.get(part.as_ref())?;
    }
    Some(current)
}

/// Insert `value` at `key`, creating intermediate objects.
///
/// Returns the value previously stored at `key`.
pub fn set_path(root: &mut Value, key: &str, value: Value) -> Result<Option<Value>, CatalogError> {
    let parts = segments(key)?;
    set_parts(root, key, &parts, value)
}

/// [`set_path`] addressed by member names, as produced by [`flatten_segments`].
pub fn set_segments(
    root: &mut Value,
    segments: &[String],
    value: Value,
) -> Result<Option<Value>, CatalogError> {
    set_parts(root, &join_segments(segments), segments, value)
}

fn set_parts<S: AsRef<str>>(
    root: &mut Value,
    key: &str,
    parts: &[S],
    value: Value,
) -> Result<Option<Value>, CatalogError> {
    let (last, parents) = parts
        .split_last()
        .ok_or_else(|| CatalogError::InvalidKey(key.to_string()))?;

    let mut current = root;
    for (depth, part) in parents.iter().enumerate() {
        let map = current
            .as_object_mut()
            .ok_or_else(|| conflict(key, &parents[..depth]))?;
        current = map
            .entry(part.as_ref().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let map = current
        .as_object_mut()
        .ok_or_else(|| conflict(key, parents))?;
    Ok(map.insert(last.as_ref().to_string(), value))
}

fn conflict<S: AsRef<str>>(key: &str, at: &[S]) -> CatalogError {
    CatalogError::PathConflict {
        key: key.to_string(),
        at: join_segments(at),
    }
}

/// Remove a leaf or subtree, pruning parents left empty.
pub fn remove_path(root: &mut Value, key: &str) -> Option<Value> {
    let parts: Vec<&str> = key.split(SEPARATOR).collect();
    remove_segments(root, &parts)
}

pub fn remove_segments<S: AsRef<str>>(node: &mut Value, parts: &[S]) -> Option<Value> {
    let map = node.as_object_mut()?;
    match parts {
        [] => None,
        [last] => map.shift_remove(last.as_ref()),
        [head, rest @ ..] => {
            let child = map.get_mut(head.as_ref())?;
            let removed = remove_segments(child, rest)?;
            if child.as_object().is_some_and(Map::is_empty) {
                map.shift_remove(head.as_ref());
            }
            Some(removed)
        }
    }
}

/// Reorder objects in `target` so members known to `reference` come first,
/// in reference order. Remaining members keep their relative order.
pub fn align_order(target: &mut Value, reference: &Value) -> bool {
    let (Value::Object(map), Value::Object(reference_map)) = (target, reference) else {
        return false;
    };

    let before: Vec<String> = map.keys().cloned().collect();
    let mut old = std::mem::take(map);
    let mut changed = false;

    for (name, reference_child) in reference_map {
        if let Some(mut child) = old.shift_remove(name) {
            changed |= align_order(&mut child, reference_child);
            map.insert(name.clone(), child);
        }
    }
    for (name, child) in old {
        map.insert(name, child);
    }

    changed || map.keys().ne(before.iter())
}
