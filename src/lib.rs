// SPDX-License-Identifier: PMPL-1.0-or-later

//! locale-audit: completeness checks and batch maintenance for
//! per-locale JSON translation catalogs.
//!
//! A catalog is a directory of `<code>.json` files. One locale is the
//! reference (source of truth); every other locale is measured against it.
//!
//! ENGINE PILLARS:
//! 1. **Catalog**: load, flatten to dotted keys, edit by path, write back
//!    with member order intact.
//! 2. **Audit**: missing/extra keys, shape conflicts and value-level
//!    problems (empty values, leftover markers, placeholder drift, text
//!    identical to the reference).
//! 3. **Patch**: re-runnable batch edits (apply patch files, sync missing
//!    keys, prune extras, replace text, rename keys).
//! 4. **Resolve**: `t()`-style lookup with a locale fallback chain.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod i18n;
pub mod patch;
pub mod placeholder;
pub mod report;
pub mod resolve;
pub mod storage;
pub mod sweep;
pub mod types;
