// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared result types

use crate::locale::Locale;
use serde::Serialize;

/// One key whose localized template could have produced the candidate text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub locale: Locale,
    pub key: String,
    pub template: String,
    pub candidate: String,
    /// Placeholder substitutions, filled by `LanguageDictionary::capture_args`
    /// or by the caller before translating into another language.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub captured_args: Vec<String>,
}

impl MatchResult {
    pub fn new(
        locale: Locale,
        key: impl Into<String>,
        template: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            locale,
            key: key.into(),
            template: template.into(),
            candidate: candidate.into(),
            captured_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.captured_args = args.into_iter().map(Into::into).collect();
        self
    }
}
