// SPDX-License-Identifier: PMPL-1.0-or-later

//! Conversion of `.strings` resources into a flat JSON object.
//!
//! Compiled app bundles usually ship `Localizable.strings` as a binary
//! property list. Reading it needs a conversion step, modelled here as the
//! [`Converter`] trait: given a source file and a destination path, write
//! a UTF-8 JSON object of `key: value` strings at the destination.

mod strings;

pub use strings::StringsTextConverter;

use crate::error::{L10nError, L10nResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Converter {
    fn convert(&self, source: &Path, destination: &Path) -> L10nResult<()>;
}

/// Runs `plutil -convert json -o <destination> <source>`.
#[derive(Debug, Clone)]
pub struct PlutilConverter {
    program: PathBuf,
}

impl PlutilConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PlutilConverter {
    fn default() -> Self {
        Self::new("plutil")
    }
}

impl Converter for PlutilConverter {
    fn convert(&self, source: &Path, destination: &Path) -> L10nResult<()> {
        debug!(
            program = %self.program.display(),
            source = %source.display(),
            destination = %destination.display(),
            "converting l10n resource"
        );

        let output = Command::new(&self.program)
            .arg("-convert")
            .arg("json")
            .arg("-o")
            .arg(destination)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                L10nError::conversion(
                    source,
                    format!("failed to run {}: {}", self.program.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(L10nError::conversion(
                source,
                format!(
                    "{} exited with {:?}: {}",
                    self.program.display(),
                    output.status.code(),
                    detail
                ),
            ));
        }
        Ok(())
    }
}

/// Adapts a closure into a [`Converter`].
pub struct FnConverter<F>(pub F);

impl<F> Converter for FnConverter<F>
where
    F: Fn(&Path, &Path) -> L10nResult<()>,
{
    fn convert(&self, source: &Path, destination: &Path) -> L10nResult<()> {
        (self.0)(source, destination)
    }
}

/// Which converter a run should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// `plutil` when it is on `PATH`, the text parser otherwise.
    #[default]
    Auto,
    Plutil,
    Text,
}

impl ConverterKind {
    pub fn build(self, plutil: &Path) -> Box<dyn Converter> {
        match self {
            ConverterKind::Plutil => Box::new(PlutilConverter::new(plutil)),
            ConverterKind::Text => Box::new(StringsTextConverter),
            ConverterKind::Auto => {
                if find_program(plutil).is_some() {
                    Box::new(PlutilConverter::new(plutil))
                } else {
                    debug!(program = %plutil.display(), "not found, using text .strings parser");
                    Box::new(StringsTextConverter)
                }
            }
        }
    }
}

/// Resolve a program name against `PATH`. Paths with a directory component are checked directly.
pub fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
