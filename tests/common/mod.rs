// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `<code>.json` files into a fresh temporary directory.
pub fn catalog_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_locales(dir.path(), files);
    dir
}

pub fn write_locales(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (code, body) in files {
        fs::write(dir.join(format!("{code}.json")), body).unwrap();
    }
}

pub const PL: &str = r#"{
  "nav": {
    "home": "Strona główna",
    "about": "O nas"
  },
  "greeting": "Cześć {name}"
}
"#;

pub const EN: &str = r#"{
  "nav": {
    "home": "Home"
  },
  "greeting": "Hi {user}",
  "legacy": "Old text"
}
"#;
