// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale identifiers and `.lproj` folder naming.
//!
//! A [`Locale`] is one supported display language. It knows both of its
//! folder names: the legacy verbose form (`German`) and the modern short
//! code (`de`). Recognition is exact and case-sensitive, and a name is
//! never valid in both vocabularies (see [`LocaleTable`]).

mod table;

pub use table::{LocaleEntry, LocaleTable};

use crate::error::L10nResult;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Suffix of the per-language resource folders inside an app bundle.
pub const LPROJ_SUFFIX: &str = ".lproj";

#[derive(Debug, Clone)]
pub struct Locale {
    legacy: String,
    modern: String,
}

impl Locale {
    pub(crate) fn new(legacy: impl Into<String>, modern: impl Into<String>) -> Self {
        Self {
            legacy: legacy.into(),
            modern: modern.into(),
        }
    }

    /// Resolve a legacy verbose name against the builtin table.
    pub fn from_legacy_name(name: &str) -> L10nResult<Self> {
        LocaleTable::builtin().locale_for_legacy_name(name)
    }

    /// Resolve a modern short code against the builtin table.
    pub fn from_new_name(name: &str) -> L10nResult<Self> {
        LocaleTable::builtin().locale_for_new_name(name)
    }

    pub fn legacy_name(&self) -> &str {
        &self.legacy
    }

    pub fn new_name(&self) -> &str {
        &self.modern
    }

    /// Folder name for this locale in either naming convention, e.g. `German.lproj`.
    pub fn folder_name(&self, legacy: bool) -> String {
        let name = if legacy { &self.legacy } else { &self.modern };
        format!("{}{}", name, LPROJ_SUFFIX)
    }
}

// Identity is the modern code; two tables agreeing on it describe one language.
impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.modern == other.modern
    }
}

impl Eq for Locale {}

impl Hash for Locale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modern.hash(state);
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.modern)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.modern)
    }
}

pub fn is_legacy_name(name: &str) -> bool {
    LocaleTable::builtin().is_legacy_name(name)
}

pub fn is_new_name(name: &str) -> bool {
    LocaleTable::builtin().is_new_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::L10nError;

    #[test]
    fn both_forms_resolve_to_the_same_locale() {
        let legacy = Locale::from_legacy_name("German").unwrap();
        let modern = Locale::from_new_name("de").unwrap();
        assert_eq!(legacy, modern);
        assert_eq!(legacy.legacy_name(), "German");
        assert_eq!(legacy.new_name(), "de");
    }

    #[test]
    fn folder_names_follow_each_convention() {
        let locale = Locale::from_new_name("fr").unwrap();
        assert_eq!(locale.folder_name(true), "French.lproj");
        assert_eq!(locale.folder_name(false), "fr.lproj");
    }

    #[test]
    fn recognizers_are_mutually_exclusive() {
        assert!(is_legacy_name("Japanese"));
        assert!(!is_new_name("Japanese"));
        assert!(is_new_name("ja"));
        assert!(!is_legacy_name("ja"));
        assert!(!is_legacy_name("Base"));
        assert!(!is_new_name("Base"));
    }

    #[test]
    fn unrecognized_names_fail() {
        assert!(matches!(
            Locale::from_legacy_name("de"),
            Err(L10nError::UnrecognizedLocale { .. })
        ));
        assert!(matches!(
            Locale::from_new_name("German"),
            Err(L10nError::UnrecognizedLocale { .. })
        ));
    }

    #[test]
    fn serializes_as_modern_code() {
        let locale = Locale::from_legacy_name("Italian").unwrap();
        assert_eq!(serde_json::to_string(&locale).unwrap(), "\"it\"");
        assert_eq!(locale.to_string(), "it");
    }
}
