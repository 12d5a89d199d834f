// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration loading
//!
//! Settings come from an optional YAML file. Lookup order is the explicit
//! `--config` path, then `$LOCALE_AUDIT_CONFIG`, then `locale-audit.yaml` in
//! the working directory. When none exists the defaults below apply.

use crate::placeholder::{Placeholders, DEFAULT_PLACEHOLDER_PATTERN};
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "LOCALE_AUDIT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "locale-audit.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding `<code>.json` catalog files
    pub locales_dir: PathBuf,
    /// Canonical locale every other locale is compared against
    pub reference: String,
    /// Extra locales tried between the requested one and the reference
    pub fallbacks: Vec<String>,
    /// Regexes for keys excluded from every check
    pub ignore_keys: Vec<String>,
    /// Regexes for keys allowed to keep the reference text (brand names, units)
    pub allow_identical: Vec<String>,
    /// Tokens that mark a value as not yet translated
    pub markers: Vec<String>,
    pub placeholder_pattern: String,
    /// Shorter identical values are not reported as untranslated
    pub min_identical_len: usize,
    /// Indentation used when writing catalog files
    pub indent: usize,
    pub reports_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales_dir: PathBuf::from("locales"),
            reference: "pl".to_string(),
            fallbacks: Vec::new(),
            ignore_keys: Vec::new(),
            allow_identical: Vec::new(),
            markers: ["TODO", "FIXME", "TRANSLATE", "XXX"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            placeholder_pattern: DEFAULT_PLACEHOLDER_PATTERN.to_string(),
            min_identical_len: 4,
            indent: 2,
            reports_dir: PathBuf::from("reports"),
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve and load the configuration, returning where it came from.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())));
        }

        if let Ok(value) = env::var(CONFIG_ENV) {
            if !value.trim().is_empty() {
                let path = PathBuf::from(value);
                debug!(path = %path.display(), "config from {}", CONFIG_ENV);
                return Ok((Self::from_file(&path)?, ConfigSource::File(path)));
            }
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            debug!(path = %local.display(), "config from working directory");
            return Ok((Self::from_file(&local)?, ConfigSource::File(local)));
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    pub fn rules(&self) -> Result<Rules> {
        Rules::compile(self)
    }
}

/// Compiled form of the pattern-based settings
#[derive(Debug, Clone)]
pub struct Rules {
    pub ignore_keys: Vec<Regex>,
    pub allow_identical: Vec<Regex>,
    pub markers: Vec<String>,
    pub placeholders: Placeholders,
    pub min_identical_len: usize,
}

impl Rules {
    pub fn compile(config: &Config) -> Result<Self> {
        Ok(Self {
            ignore_keys: compile_all(&config.ignore_keys, "ignore_keys")?,
            allow_identical: compile_all(&config.allow_identical, "allow_identical")?,
            markers: config
                .markers
                .iter()
                .filter(|m| !m.trim().is_empty())
                .cloned()
                .collect(),
            placeholders: Placeholders::new(&config.placeholder_pattern)?,
            min_identical_len: config.min_identical_len,
        })
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_keys.iter().any(|re| re.is_match(key))
    }

    pub fn allows_identical(&self, key: &str) -> bool {
        self.allow_identical.iter().any(|re| re.is_match(key))
    }

    /// First configured marker found in `text`, matched on word boundaries
    pub fn marker_in<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.markers
            .iter()
            .find(|marker| contains_word(text, marker))
            .map(String::as_str)
    }
}

impl Default for Rules {
    fn default() -> Self {
        // The default config only holds patterns that are known to compile.
        Rules {
            ignore_keys: Vec::new(),
            allow_identical: Vec::new(),
            markers: Config::default().markers,
            placeholders: Placeholders::default(),
            min_identical_len: Config::default().min_identical_len,
        }
    }
}

fn compile_all(patterns: &[String], field: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).with_context(|| format!("invalid regex in {}: {}", field, pattern))
        })
        .collect()
}

fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
