// SPDX-License-Identifier: PMPL-1.0-or-later

//! locale-audit: completeness checks and batch maintenance for per-locale
//! JSON translation catalogs.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use locale_audit::catalog::{flatten, key_set, Catalog};
use locale_audit::config::{Config, ConfigSource};
use locale_audit::patch::{self, Fill, Replacement};
use locale_audit::report::{diff, ReportFormatter, ReportOutputFormat};
use locale_audit::resolve::{Resolver, Source};
use locale_audit::types::Severity;
use locale_audit::{audit, diagnostics, storage, sweep};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "locale-audit")]
#[command(version)]
#[command(about = "Completeness checks and batch maintenance for JSON translation catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Locale directory, overrides the configuration
    #[arg(long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Reference locale, overrides the configuration
    #[arg(long, global = true, value_name = "CODE")]
    reference: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every locale against the reference locale
    Check {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportOutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also store JSON and markdown copies in the reports directory
        #[arg(long)]
        store: bool,

        /// Exit with an error when a finding reaches this severity
        #[arg(long, value_enum)]
        fail_on: Option<SeverityArg>,

        /// Findings printed per locale in text output
        #[arg(long, default_value = "25")]
        limit: usize,
    },

    /// List the flattened keys of a locale
    Keys {
        /// Locale to list (default: reference)
        #[arg(value_name = "LOCALE")]
        locale: Option<String>,

        /// Print values next to keys
        #[arg(long)]
        values: bool,

        /// Only keys missing from this locale
        #[arg(long, value_name = "LOCALE")]
        missing_in: Option<String>,
    },

    /// Resolve a key with locale fallback
    Get {
        /// Dotted key
        #[arg(value_name = "KEY")]
        key: String,

        /// Requested locale
        #[arg(short, long)]
        locale: String,

        /// Placeholder value, name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Show which locale answered
        #[arg(long)]
        explain: bool,
    },

    /// Apply a patch file ({"<locale>" | "*": {...}})
    Patch {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep existing values, only add new keys
        #[arg(long)]
        no_overwrite: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Add reference keys missing from other locales
    Sync {
        /// Value used for inserted keys
        #[arg(long, value_enum, default_value = "reference")]
        fill: FillArg,

        /// Prefix for --fill marker
        #[arg(long, default_value = "TODO: ")]
        marker: String,

        /// Also reorder keys to follow the reference
        #[arg(long)]
        align: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Remove keys the reference locale does not have
    Prune {
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace text inside translation values
    Replace {
        #[arg(value_name = "FIND")]
        find: String,

        #[arg(value_name = "REPLACEMENT")]
        replacement: String,

        /// Treat FIND as a regular expression ($1 etc. expand in REPLACEMENT)
        #[arg(long)]
        regex: bool,

        /// Only keys under this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Only these locales (repeatable)
        #[arg(short, long = "locale")]
        locales: Vec<String>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Rename a key in every locale
    Rename {
        #[arg(value_name = "FROM")]
        from: String,

        #[arg(value_name = "TO")]
        to: String,

        /// Replace an existing destination key
        #[arg(long)]
        overwrite: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Compare two stored audit reports
    Diff {
        #[arg(value_name = "BASE")]
        base: Option<PathBuf>,

        #[arg(value_name = "COMPARE")]
        compare: Option<PathBuf>,

        /// Use the two newest reports in the reports directory
        #[arg(long)]
        latest: bool,
    },

    /// Audit every catalog directory under a root
    Sweep {
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        #[arg(long, default_value = "6")]
        max_depth: usize,

        /// Only list catalogs with findings
        #[arg(long)]
        findings_only: bool,

        #[arg(long, default_value = "0")]
        min_findings: usize,

        /// Write the sweep report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        quiet: bool,
    },

    /// Check configuration and catalog health
    Doctor,
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SeverityArg {
    Critical,
    High,
    Medium,
    Low,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FillArg {
    Reference,
    Empty,
    Marker,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "locale_audit=warn",
        1 => "locale_audit=debug",
        _ => "locale_audit=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<(Config, ConfigSource)> {
    let (mut config, source) = Config::discover(cli.config.as_deref())?;
    if let Some(dir) = &cli.dir {
        config.locales_dir = dir.clone();
    }
    if let Some(reference) = &cli.reference {
        config.reference = reference.clone();
    }
    debug!(source = %source, dir = %config.locales_dir.display(), reference = %config.reference, "configuration");
    Ok((config, source))
}

fn finish_patch(
    catalog: &mut Catalog,
    summary: &patch::PatchSummary,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    summary.print(dry_run);
    if !dry_run {
        let written = catalog.save_dirty(config.indent)?;
        for path in &written {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let (config, source) = load_config(&cli)?;

    match cli.command {
        Commands::Check {
            format,
            output,
            store,
            fail_on,
            limit,
        } => {
            let rules = config.rules()?;
            let catalog = Catalog::load(&config.locales_dir)?;
            let audit_report = audit::run(&catalog, &config.reference, &rules)?;

            match (format, &output) {
                (ReportOutputFormat::Text, None) => ReportFormatter::new()
                    .with_finding_limit(limit)
                    .print(&audit_report),
                (format, Some(path)) => {
                    std::fs::write(path, format.serialize(&audit_report)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Report saved to: {}", path.display());
                }
                (format, None) => println!("{}", format.serialize(&audit_report)?),
            }

            if store {
                let stored = storage::persist_report(
                    &audit_report,
                    &config.reports_dir,
                    &[ReportOutputFormat::Json, ReportOutputFormat::Markdown],
                )?;
                for path in stored {
                    println!("Stored {}", path.display());
                }
            }

            if let Some(threshold) = fail_on {
                let threshold = Severity::from(threshold);
                if audit_report.exceeds(threshold) {
                    bail!(
                        "findings at or above '{}' severity ({} total findings)",
                        threshold,
                        audit_report.summary.total()
                    );
                }
            }
        }

        Commands::Keys {
            locale,
            values,
            missing_in,
        } => {
            let catalog = Catalog::load(&config.locales_dir)?;
            let code = locale.unwrap_or_else(|| config.reference.clone());
            let file = catalog.reference(&code)?;
            let skip = match &missing_in {
                Some(other) => key_set(&catalog.reference(other)?.tree),
                None => Default::default(),
            };
            for (key, value) in flatten(&file.tree) {
                if skip.contains(&key) {
                    continue;
                }
                if values {
                    println!("{}\t{}", key, value);
                } else {
                    println!("{}", key);
                }
            }
        }

        Commands::Get {
            key,
            locale,
            params,
            explain,
        } => {
            let rules = config.rules()?;
            let catalog = Catalog::load(&config.locales_dir)?;
            let resolver = Resolver::new(&catalog, &config.reference, &config.fallbacks)
                .with_placeholders(rules.placeholders.clone());
            let pairs: Vec<(&str, &str)> = params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            println!("{}", resolver.t(&locale, &key, &pairs));
            if explain {
                let resolution = resolver.resolve(&locale, &key);
                let origin = match &resolution.source {
                    Source::Requested => format!("found in {}", locale),
                    Source::Fallback(code) => format!("fallback to {}", code),
                    Source::Key => "not found, key returned".to_string(),
                };
                eprintln!("{} (chain: {})", origin, resolver.chain(&locale).join(" -> "));
            }
        }

        Commands::Patch {
            file,
            no_overwrite,
            dry_run,
        } => {
            let mut catalog = Catalog::load(&config.locales_dir)?;
            let document = patch::load_patch(&file)?;
            let summary = patch::apply_patch(&mut catalog, &document, !no_overwrite)?;
            finish_patch(&mut catalog, &summary, dry_run, &config)?;
        }

        Commands::Sync {
            fill,
            marker,
            align,
            dry_run,
        } => {
            let rules = config.rules()?;
            let mut catalog = Catalog::load(&config.locales_dir)?;
            let fill = match fill {
                FillArg::Reference => Fill::Reference,
                FillArg::Empty => Fill::Empty,
                FillArg::Marker => Fill::Marker(marker),
            };
            let summary = patch::sync_missing(&mut catalog, &config.reference, &fill, &rules)?;
            finish_patch(&mut catalog, &summary, dry_run, &config)?;
            if align {
                let summary = patch::align(&mut catalog, &config.reference)?;
                finish_patch(&mut catalog, &summary, dry_run, &config)?;
            }
        }

        Commands::Prune { dry_run } => {
            let rules = config.rules()?;
            let mut catalog = Catalog::load(&config.locales_dir)?;
            let summary = patch::prune_extra(&mut catalog, &config.reference, &rules)?;
            finish_patch(&mut catalog, &summary, dry_run, &config)?;
        }

        Commands::Replace {
            find,
            replacement,
            regex,
            prefix,
            locales,
            dry_run,
        } => {
            let mut catalog = Catalog::load(&config.locales_dir)?;
            let mut edit = if regex {
                Replacement::regex(&find, &replacement)?
            } else {
                Replacement::literal(&find, &replacement)
            };
            edit.prefix = prefix;
            edit.locales = locales;
            let summary = patch::replace_text(&mut catalog, &edit)?;
            finish_patch(&mut catalog, &summary, dry_run, &config)?;
        }

        Commands::Rename {
            from,
            to,
            overwrite,
            dry_run,
        } => {
            let mut catalog = Catalog::load(&config.locales_dir)?;
            let summary = patch::rename_key(&mut catalog, &from, &to, overwrite)?;
            finish_patch(&mut catalog, &summary, dry_run, &config)?;
        }

        Commands::Diff {
            base,
            compare,
            latest,
        } => {
            let (base_path, compare_path) = match (base, compare, latest) {
                (Some(base), Some(compare), _) => (base, compare),
                (None, None, true) => {
                    let paths = storage::latest_reports(&config.reports_dir, 2)?;
                    (paths[0].clone(), paths[1].clone())
                }
                _ => bail!("pass two report paths or --latest"),
            };
            let base_report = diff::load_report(&base_path)?;
            let compare_report = diff::load_report(&compare_path)?;
            println!(
                "{}",
                diff::format_diff(
                    &base_report,
                    &compare_report,
                    &base_path.display().to_string(),
                    &compare_path.display().to_string(),
                )
            );
        }

        Commands::Sweep {
            root,
            max_depth,
            findings_only,
            min_findings,
            output,
            quiet,
        } => {
            let rules = config.rules()?;
            let sweep_config = sweep::SweepConfig {
                root,
                reference: config.reference.clone(),
                max_depth,
                findings_only,
                min_findings,
            };
            let sweep_report = sweep::run(&sweep_config, &rules)?;
            sweep::print_summary(&sweep_report, quiet);
            if let Some(path) = output {
                sweep::write_report(&sweep_report, &path)?;
                println!("Sweep report saved to: {}", path.display());
            }
        }

        Commands::Doctor => {
            diagnostics::run_self_diagnostics(&config, &source)?;
        }
    }

    Ok(())
}
