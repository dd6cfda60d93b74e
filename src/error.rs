// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for locale recognition, resource loading and translation

use std::path::PathBuf;
use thiserror::Error;

pub type L10nResult<T> = Result<T, L10nError>;

#[derive(Debug, Error)]
pub enum L10nError {
    /// Name matches neither the legacy nor the modern naming convention
    #[error("{name} isn't recognized as a legacy or modern locale name")]
    UnrecognizedLocale { name: String },

    /// An `.lproj` folder does not contain the expected resource file
    #[error("expected a l10n file here: {}", path.display())]
    MissingResource { path: PathBuf },

    /// The binary-to-text step failed or produced unreadable output
    #[error("failed to convert {}: {reason}", path.display())]
    ConversionFailure { path: PathBuf, reason: String },

    /// Converted content is not a flat object of strings
    #[error("malformed l10n content in {}: {reason}", path.display())]
    MalformedContent { path: PathBuf, reason: String },

    #[error("no template for key {key:?}")]
    MissingKey { key: String },

    #[error("template {key:?} has {expected} placeholder(s) but {actual} argument(s) were supplied")]
    ArgumentCountMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid locale table: {reason}")]
    InvalidLocaleTable { reason: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl L10nError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        L10nError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn conversion(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        L10nError::ConversionFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        L10nError::MalformedContent {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
