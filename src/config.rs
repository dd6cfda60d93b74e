// SPDX-License-Identifier: PMPL-1.0-or-later

//! Run configuration loaded from JSON or YAML.

use crate::convert::{Converter, ConverterKind};
use crate::dictionary::pattern::PatternMode;
use crate::dictionary::RESOURCE_FILE_NAME;
use crate::locale::LocaleTable;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File expected inside every `.lproj` folder.
    pub resource_file_name: String,
    pub converter: ConverterKind,
    pub plutil_path: PathBuf,
    pub pattern_mode: PatternMode,
    /// Replacement for the builtin locale table.
    pub locale_table: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_file_name: RESOURCE_FILE_NAME.to_string(),
            converter: ConverterKind::default(),
            plutil_path: PathBuf::from("plutil"),
            pattern_mode: PatternMode::default(),
            locale_table: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json config {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml config {}", path.display())),
            _ => Err(anyhow!("unsupported config extension for {}", path.display())),
        }
    }

    pub fn converter(&self) -> Box<dyn Converter> {
        self.converter.build(&self.plutil_path)
    }

    /// The configured locale table, or the builtin one.
    pub fn locale_table(&self) -> Result<LocaleTable> {
        match &self.locale_table {
            Some(path) => LocaleTable::from_path(path)
                .with_context(|| format!("loading locale table {}", path.display())),
            None => Ok(LocaleTable::builtin().clone()),
        }
    }
}
