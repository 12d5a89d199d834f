// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalogs: one JSON file per locale in a directory.
//!
//! Loading reads every `*.json` file in the directory (not recursive) and
//! keys it by file stem. Member order is preserved, so writing a file back
//! only changes what an operation actually touched.

pub mod io;
pub mod keys;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use keys::{
    align_order, flatten, flatten_segments, get_path, get_segments, join_segments, key_set,
    object_paths, remove_path, remove_segments, set_path, set_segments, SEPARATOR,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{path}: root of a locale file must be a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("cannot set '{key}': '{at}' is not an object")]
    PathConflict { key: String, at: String },
    #[error("locale '{0}' is not loaded")]
    MissingLocale(String),
    #[error("invalid key '{0}': empty segment")]
    InvalidKey(String),
}

/// One locale file
#[derive(Debug, Clone)]
pub struct LocaleFile {
    pub code: String,
    pub path: PathBuf,
    pub tree: Value,
    /// Text as read from disk, used to locate keys for reports
    pub source: String,
    dirty: bool,
}

impl LocaleFile {
    pub fn parse(code: &str, path: PathBuf, source: String) -> Result<Self> {
        let tree: Value = serde_json::from_str(&source)
            .with_context(|| format!("parsing locale file {}", path.display()))?;
        if !tree.is_object() {
            return Err(CatalogError::NotAnObject { path }.into());
        }
        Ok(Self {
            code: code.to_string(),
            path,
            tree,
            source,
            dirty: false,
        })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let code = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("locale file without a usable name: {}", path.display()))?;
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let source = io::decode(&bytes)
            .with_context(|| format!("decoding {}", path.display()))?;
        Self::parse(code, path.to_path_buf(), source)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        get_path(&self.tree, key)
    }

    /// SHA-256 of the parsed tree, hex encoded
    pub fn digest(&self) -> String {
        io::digest(&self.tree)
    }

    pub fn line_of(&self, key: &str) -> Option<u32> {
        io::locate_key(&self.source, key)
    }

    pub fn save(&mut self, indent: usize) -> Result<()> {
        let text = io::render(&self.tree, indent)?;
        fs::write(&self.path, &text).with_context(|| format!("writing {}", self.path.display()))?;
        self.source = text;
        self.dirty = false;
        Ok(())
    }
}

/// All locale files of one directory, ordered by code
#[derive(Debug, Clone)]
pub struct Catalog {
    pub dir: PathBuf,
    locales: BTreeMap<String, LocaleFile>,
}

impl Catalog {
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_matching(dir, |_| true)
    }

    /// Load only the `*.json` files of `dir` accepted by `keep`.
    pub fn load_matching(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("locale directory not found: {}", dir.display());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("listing {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && io::is_json(path) && keep(path.as_path()))
            .collect();
        paths.sort();

        let files: Vec<LocaleFile> = paths
            .par_iter()
            .map(|path| LocaleFile::read(path))
            .collect::<Result<_>>()?;

        let locales: BTreeMap<String, LocaleFile> = files
            .into_iter()
            .map(|file| (file.code.clone(), file))
            .collect();
        info!(dir = %dir.display(), locales = locales.len(), "catalog loaded");

        Ok(Self {
            dir: dir.to_path_buf(),
            locales,
        })
    }

    /// Build a catalog from in-memory files, mostly for tests and tooling.
    pub fn from_files(dir: PathBuf, files: Vec<LocaleFile>) -> Self {
        let locales = files
            .into_iter()
            .map(|file| (file.code.clone(), file))
            .collect();
        Self { dir, locales }
    }

    pub fn codes(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.locales.contains_key(code)
    }

    pub fn locale(&self, code: &str) -> Option<&LocaleFile> {
        self.locales.get(code)
    }

    pub fn locale_mut(&mut self, code: &str) -> Option<&mut LocaleFile> {
        self.locales.get_mut(code)
    }

    /// Like [`Catalog::locale`] but a missing locale is an error
    pub fn reference(&self, code: &str) -> Result<&LocaleFile, CatalogError> {
        self.locale(code)
            .ok_or_else(|| CatalogError::MissingLocale(code.to_string()))
    }

    pub fn files(&self) -> impl Iterator<Item = &LocaleFile> {
        self.locales.values()
    }

    pub fn files_mut(&mut self) -> impl Iterator<Item = &mut LocaleFile> {
        self.locales.values_mut()
    }

    pub fn dirty_codes(&self) -> Vec<&str> {
        self.files()
            .filter(|file| file.is_dirty())
            .map(|file| file.code.as_str())
            .collect()
    }

    /// Write every modified locale file, returning the written paths
    pub fn save_dirty(&mut self, indent: usize) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in self.files_mut().filter(|file| file.is_dirty()) {
            file.save(indent)?;
            debug!(path = %file.path.display(), "locale written");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}
