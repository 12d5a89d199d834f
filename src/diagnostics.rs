// SPDX-License-Identifier: PMPL-1.0-or-later

//! `doctor`: environment and catalog self-checks

use crate::catalog::{io::is_json, LocaleFile};
use crate::config::{Config, ConfigSource};
use crate::i18n::is_valid_locale_code;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn run_self_diagnostics(config: &Config, source: &ConfigSource) -> Result<()> {
    println!("locale-audit self-diagnostics");

    let checks = collect_checks(config, source);

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks
        .iter()
        .any(|entry| matches!(entry.level, Level::Error))
    {
        Err(anyhow!("self-diagnostics reported issues"))
    } else {
        Ok(())
    }
}

pub fn collect_checks(config: &Config, source: &ConfigSource) -> Vec<Diagnostic> {
    let mut checks = Vec::new();
    checks.push(Diagnostic::ok(
        "version",
        format!("locale-audit {}", env!("CARGO_PKG_VERSION")),
    ));
    checks.push(check_config(config, source));
    checks.push(check_directory(
        "locales directory",
        &config.locales_dir,
        Level::Error,
    ));

    let files = locale_files(&config.locales_dir);
    checks.push(check_reference(config, &files));
    checks.push(check_parse(&files));
    checks.push(check_codes(&files));
    checks.push(check_directory(
        "reports directory",
        &config.reports_dir,
        Level::Warn,
    ));
    checks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

#[derive(Debug)]
pub struct Diagnostic {
    pub label: &'static str,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:22} {}", self.level.tag(), self.label, self.detail);
    }
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERR",
        }
    }
}

fn locale_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|iter| {
            iter.filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && is_json(path))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

fn check_config(config: &Config, source: &ConfigSource) -> Diagnostic {
    match config.rules() {
        Ok(_) => Diagnostic::ok("configuration", format!("{} (reference {})", source, config.reference)),
        Err(err) => Diagnostic::error("configuration", format!("{}: {:#}", source, err)),
    }
}

fn check_directory(label: &'static str, path: &Path, missing_level: Level) -> Diagnostic {
    if path.is_dir() {
        Diagnostic::ok(label, format!("{} exists", path.display()))
    } else if path.exists() {
        Diagnostic::warning(
            label,
            format!("{} exists but is not a directory", path.display()),
        )
    } else if missing_level == Level::Error {
        Diagnostic::error(label, format!("{} missing", path.display()))
    } else {
        Diagnostic::warning(
            label,
            format!(
                "{} missing (create with mkdir -p {})",
                path.display(),
                path.display()
            ),
        )
    }
}

fn check_reference(config: &Config, files: &[PathBuf]) -> Diagnostic {
    if files.iter().any(|path| stem(path) == config.reference) {
        Diagnostic::ok(
            "reference locale",
            format!("{}.json present", config.reference),
        )
    } else {
        Diagnostic::error(
            "reference locale",
            format!(
                "{}.json not found in {}",
                config.reference,
                config.locales_dir.display()
            ),
        )
    }
}

fn check_parse(files: &[PathBuf]) -> Diagnostic {
    if files.is_empty() {
        return Diagnostic::warning("locale files", "no *.json files found".to_string());
    }

    let failures: Vec<String> = files
        .iter()
        .filter_map(|path| {
            LocaleFile::read(path)
                .with_context(|| stem(path).to_string())
                .err()
                .map(|err| format!("{:#}", err))
        })
        .collect();

    if failures.is_empty() {
        Diagnostic::ok("locale files", format!("{} files parse", files.len()))
    } else {
        Diagnostic::error("locale files", failures.join("; "))
    }
}

fn check_codes(files: &[PathBuf]) -> Diagnostic {
    let invalid: Vec<&str> = files
        .iter()
        .map(|path| stem(path))
        .filter(|code| !is_valid_locale_code(code))
        .collect();
    if invalid.is_empty() {
        Diagnostic::ok("locale codes", "all file names are locale codes".to_string())
    } else {
        Diagnostic::warning("locale codes", format!("not locale codes: {}", invalid.join(", ")))
    }
}
