// SPDX-License-Identifier: PMPL-1.0-or-later

//! Reading, writing and fingerprinting locale files

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;

const UTF8_BOM: &str = "\u{feff}";

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Decode file bytes: UTF-8 (BOM stripped) first, then Windows-1252.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            if had_errors {
                bail!("neither UTF-8 nor Windows-1252 text");
            }
            cow.into_owned()
        }
    };
    Ok(text
        .strip_prefix(UTF8_BOM)
        .map(str::to_string)
        .unwrap_or(text))
}

/// Pretty JSON with `indent` spaces, non-ASCII kept as-is, trailing newline.
pub fn render(tree: &Value, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tree.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

pub fn digest(tree: &Value) -> String {
    let mut hasher = Sha256::new();
    // Serialising a Value cannot fail: keys are always strings.
    let bytes = serde_json::to_vec(tree).unwrap_or_default();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// Best-effort 1-based line of `key` in raw JSON text.
///
/// Each segment is searched as a quoted member name followed by `:`,
/// starting after the match for the previous segment. Good enough for
/// pointing editors at a location; not a JSON parser.
pub fn locate_key(text: &str, key: &str) -> Option<u32> {
    let mut offset = 0;
    for segment in key.split(super::SEPARATOR) {
        let needle = format!("\"{}\"", escape(segment));
        let mut found = None;
        let mut search_from = offset;
        while let Some(pos) = text[search_from..].find(&needle) {
            let start = search_from + pos;
            let after = start + needle.len();
            if text[after..].trim_start().starts_with(':') {
                found = Some(after);
                break;
            }
            search_from = after;
        }
        offset = found?;
    }
    let line = text[..offset].matches('\n').count() + 1;
    u32::try_from(line).ok()
}

fn escape(segment: &str) -> String {
    let quoted = serde_json::to_string(segment).unwrap_or_default();
    quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(segment)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_strips_bom() {
        let bytes = "\u{feff}{\"a\": \"b\"}".as_bytes();
        assert_eq!(decode(bytes).unwrap(), "{\"a\": \"b\"}");
    }

    #[test]
    fn decode_falls_back_to_windows_1252() {
        // "Caf\xe9" is not valid UTF-8
        let bytes = b"{\"a\": \"Caf\xe9\"}";
        assert_eq!(decode(bytes).unwrap(), "{\"a\": \"Café\"}");
    }

    #[test]
    fn render_keeps_unicode_and_order() {
        let tree: Value = serde_json::from_str(r#"{"z": "Żółw", "a": {"b": "ą"}}"#).unwrap();
        let out = render(&tree, 2).unwrap();
        assert_eq!(out, "{\n  \"z\": \"Żółw\",\n  \"a\": {\n    \"b\": \"ą\"\n  }\n}\n");
    }

    #[test]
    fn render_respects_indent() {
        let out = render(&json!({"a": "b"}), 4).unwrap();
        assert_eq!(out, "{\n    \"a\": \"b\"\n}\n");
    }

    #[test]
    fn digest_changes_with_content() {
        let a = digest(&json!({"a": "1"}));
        let b = digest(&json!({"a": "2"}));
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn locate_key_follows_nesting() {
        let text = "{\n  \"title\": \"x\",\n  \"nav\": {\n    \"title\": \"y\"\n  }\n}\n";
        assert_eq!(locate_key(text, "title"), Some(2));
        assert_eq!(locate_key(text, "nav.title"), Some(4));
        assert_eq!(locate_key(text, "nav.missing"), None);
    }

    #[test]
    fn locate_key_skips_values_equal_to_name() {
        let text = "{\n  \"a\": \"b\",\n  \"b\": \"c\"\n}";
        assert_eq!(locate_key(text, "b"), Some(3));
    }
}
