// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale code validation and display metadata.
//!
//! Catalog files are named after their locale (`pl.json`, `pt-BR.json`), so
//! the file stem is the only source of truth for which language a file
//! holds. This module decides whether a stem is a well-formed locale code
//! and maps it to a human-readable language name for reports.
//!
//! ## Accepted shape
//!
//! | Part     | Form                         | Example   |
//! |----------|------------------------------|-----------|
//! | language | ISO 639-1, lowercase         | `pt`      |
//! | script   | 4 letters, title case        | `Hant`    |
//! | region   | 2 uppercase letters/3 digits | `BR`, `419` |
//!
//! Subtags may be joined with `-` or `_`.

mod iso639;

pub use iso639::{
    is_valid_iso639_1, is_valid_locale_code, language_name, native_name, primary_language,
};
