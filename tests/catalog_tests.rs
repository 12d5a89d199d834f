// SPDX-License-Identifier: PMPL-1.0-or-later

//! Loading, lookup and write-back of locale directories

mod common;

use locale_audit::catalog::{flatten, Catalog, CatalogError};
use std::fs;

#[test]
fn test_load_keys_by_file_stem() {
    let dir = common::catalog_dir(&[("pl", common::PL), ("en", common::EN)]);
    fs::write(dir.path().join("notes.txt"), "not a locale").unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    assert_eq!(catalog.codes(), vec!["en", "pl"]);
    assert_eq!(
        catalog.locale("pl").unwrap().get("nav.about").unwrap(),
        "O nas"
    );
}

#[test]
fn test_flatten_keeps_document_order() {
    let dir = common::catalog_dir(&[("pl", common::PL)]);
    let catalog = Catalog::load(dir.path()).unwrap();
    let keys: Vec<String> = flatten(&catalog.locale("pl").unwrap().tree)
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(keys, vec!["nav.home", "nav.about", "greeting"]);
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(Catalog::load(&dir.path().join("nope")).is_err());
}

#[test]
fn test_non_object_root_is_rejected() {
    let dir = common::catalog_dir(&[("pl", "[1, 2, 3]")]);
    let err = Catalog::load(dir.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::NotAnObject { .. })
    ));
}

#[test]
fn test_unknown_reference_locale() {
    let dir = common::catalog_dir(&[("en", common::EN)]);
    let catalog = Catalog::load(dir.path()).unwrap();
    assert_eq!(
        catalog.reference("pl").unwrap_err(),
        CatalogError::MissingLocale("pl".to_string())
    );
}

#[test]
fn test_save_only_touches_dirty_files() {
    let dir = common::catalog_dir(&[("pl", common::PL), ("en", common::EN)]);
    let mut catalog = Catalog::load(dir.path()).unwrap();

    let en = catalog.locale_mut("en").unwrap();
    locale_audit::catalog::set_path(&mut en.tree, "nav.about", "About".into()).unwrap();
    en.mark_dirty();

    let written = catalog.save_dirty(2).unwrap();
    assert_eq!(written, vec![dir.path().join("en.json")]);
    assert!(catalog.dirty_codes().is_empty());

    let expected = r#"{
  "nav": {
    "home": "Home",
    "about": "About"
  },
  "greeting": "Hi {user}",
  "legacy": "Old text"
}
"#;
    assert_eq!(fs::read_to_string(dir.path().join("en.json")).unwrap(), expected);
    assert_eq!(fs::read_to_string(dir.path().join("pl.json")).unwrap(), common::PL);
}

#[test]
fn test_unchanged_file_round_trips_byte_for_byte() {
    let dir = common::catalog_dir(&[("pl", common::PL)]);
    let mut catalog = Catalog::load(dir.path()).unwrap();
    catalog.locale_mut("pl").unwrap().mark_dirty();
    catalog.save_dirty(2).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("pl.json")).unwrap(), common::PL);
}

#[test]
fn test_windows_1252_file_is_decoded() {
    let dir = tempfile::TempDir::new().unwrap();
    // "Café" with 0xE9 for é
    fs::write(dir.path().join("fr.json"), b"{\"menu\": \"Caf\xe9\"}").unwrap();
    let catalog = Catalog::load(dir.path()).unwrap();
    assert_eq!(catalog.locale("fr").unwrap().get("menu").unwrap(), "Café");
}
