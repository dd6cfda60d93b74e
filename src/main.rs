// SPDX-License-Identifier: PMPL-1.0-or-later

//! lproj-locator: resolve UI locators against an app bundle's localizations
//!
//! Looks up which `Localizable.strings` keys could have produced a piece of
//! on-screen text, and renders those keys in another language.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use lproj_locator::config::Config;
use lproj_locator::{
    load_available, load_bundle, ConverterKind, LanguageDictionary, LocaleTable, MatchResult,
    PatternMode,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lproj-locator")]
#[command(version)]
#[command(about = "Resolve reference-language UI locators against localized app strings")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// How literal template text is matched
    #[arg(long, global = true, value_enum)]
    pattern_mode: Option<PatternModeArg>,

    /// Which tool converts compiled .strings files
    #[arg(long, global = true, value_enum)]
    converter: Option<ConverterArg>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported locales in both naming conventions
    Locales,

    /// List the localization resource files of an app bundle
    Files {
        /// App bundle directory (e.g. Demo.app)
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,
    },

    /// Print the key/value table of one resource file
    Dump {
        /// Path to <locale>.lproj/Localizable.strings
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Find every key whose template matches the given text
    Match {
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,

        /// Text as seen on screen
        #[arg(value_name = "TEXT")]
        text: String,

        /// Language to search (legacy or modern name); all languages when omitted
        #[arg(short, long)]
        lang: Option<String>,

        /// Fail on the first folder that cannot be loaded instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Render text written in one language into another
    Translate {
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,

        /// Text in the source language
        #[arg(value_name = "TEXT")]
        text: String,

        /// Source language (legacy or modern name)
        #[arg(long)]
        from: String,

        /// Target language (legacy or modern name)
        #[arg(long)]
        to: String,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum PatternModeArg {
    Verbatim,
    Escaped,
}

impl From<PatternModeArg> for PatternMode {
    fn from(arg: PatternModeArg) -> Self {
        match arg {
            PatternModeArg::Verbatim => PatternMode::Verbatim,
            PatternModeArg::Escaped => PatternMode::Escaped,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ConverterArg {
    Auto,
    Plutil,
    Text,
}

impl From<ConverterArg> for ConverterKind {
    fn from(arg: ConverterArg) -> Self {
        match arg {
            ConverterArg::Auto => ConverterKind::Auto,
            ConverterArg::Plutil => ConverterKind::Plutil,
            ConverterArg::Text => ConverterKind::Text,
        }
    }
}

#[derive(Serialize)]
struct Translation {
    key: String,
    source: String,
    target: String,
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = cli.pattern_mode {
        config.pattern_mode = mode.into();
    }
    if let Some(kind) = cli.converter {
        config.converter = kind.into();
    }
    let table = config.locale_table()?;

    match cli.command {
        Commands::Locales => {
            println!("{}", "SUPPORTED LOCALES".bold().cyan());
            for locale in table.locales() {
                println!(
                    "  {:10} {}",
                    locale.new_name().bold(),
                    locale.legacy_name()
                );
            }
        }

        Commands::Files { bundle } => {
            let files =
                LanguageDictionary::l10n_resource_files_named(&bundle, &config.resource_file_name)
                    .with_context(|| format!("listing localizations of {}", bundle.display()))?;
            for file in files {
                println!("{}", file.display());
            }
        }

        Commands::Dump { file, json } => {
            let converter = config.converter();
            let dictionary =
                LanguageDictionary::from_resource_file_with_table(&file, converter.as_ref(), &table)
                    .with_context(|| format!("loading {}", file.display()))?;
            if json {
                let entries: std::collections::BTreeMap<_, _> = dictionary.entries().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!(
                    "{} ({} entries, {} naming)",
                    dictionary.locale().to_string().bold().cyan(),
                    dictionary.len(),
                    if dictionary.is_legacy_format() { "legacy" } else { "modern" }
                );
                for (key, template) in dictionary.entries() {
                    println!("  {} = {}", key.yellow(), template);
                }
            }
        }

        Commands::Match {
            bundle,
            text,
            lang,
            strict,
            json,
        } => {
            let dictionaries = match lang {
                Some(lang) => vec![load_language(&bundle, &lang, &config, &table)?],
                None => {
                    let converter = config.converter();
                    let load = if strict { load_bundle } else { load_available };
                    load(
                        &bundle,
                        converter.as_ref(),
                        &table,
                        &config.resource_file_name,
                    )?
                    .into_iter()
                    .collect()
                }
            };

            let matches: Vec<MatchResult> = dictionaries
                .iter()
                .flat_map(|d| d.find_matches_with(&text, config.pattern_mode))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else if matches.is_empty() {
                println!("{} {:?}", "No match for".red(), text);
            } else {
                println!("{} {:?}", "Matches for".bold().green(), text);
                for m in &matches {
                    println!("  [{}] {} = {:?}", m.locale, m.key.yellow(), m.template);
                }
            }
        }

        Commands::Translate {
            bundle,
            text,
            from,
            to,
            json,
        } => {
            let source = load_language(&bundle, &from, &config, &table)?;
            let target = load_language(&bundle, &to, &config, &table)?;

            let mut translations = Vec::new();
            for found in source.find_matches_with(&text, config.pattern_mode) {
                let found = source.capture_args(found, config.pattern_mode)?;
                match target.translate(&found) {
                    Ok(rendered) => translations.push(Translation {
                        key: found.key,
                        source: found.template,
                        target: rendered,
                        args: found.captured_args,
                    }),
                    Err(e) => warn!(key = %found.key, error = %e, "cannot render in {}", to),
                }
            }

            if translations.is_empty() {
                bail!("no translation of {:?} from {} to {}", text, from, to);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&translations)?);
            } else {
                for t in &translations {
                    println!("{}  ({})", t.target.bold().green(), t.key.yellow());
                }
            }
        }
    }

    Ok(())
}

fn load_language(
    bundle: &Path,
    language: &str,
    config: &Config,
    table: &LocaleTable,
) -> Result<LanguageDictionary> {
    let locale = LanguageDictionary::with_table(language, table)?.locale().clone();
    let file =
        LanguageDictionary::locate_resource_file(bundle, &locale, &config.resource_file_name)?;
    let converter = config.converter();
    LanguageDictionary::from_resource_file_with_table(&file, converter.as_ref(), table)
        .with_context(|| format!("loading {}", file.display()))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
