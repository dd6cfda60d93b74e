// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bidirectional legacy/modern locale name table.
//!
//! Xcode historically named localization folders after the language in
//! English (`English.lproj`, `German.lproj`). Newer projects use short
//! codes (`en.lproj`, `de.lproj`). The table maps both vocabularies onto
//! the same [`Locale`] so either folder name resolves to one language.
//!
//! The builtin table is plain data below. A replacement table can be
//! loaded from a JSON or YAML file with [`LocaleTable::from_path`].

use super::Locale;
use crate::error::{L10nError, L10nResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// `(legacy verbose name, modern short code)` pairs shipped with the crate.
const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("English", "en"),
    ("British English", "en-GB"),
    ("French", "fr"),
    ("German", "de"),
    ("Japanese", "ja"),
    ("Dutch", "nl"),
    ("Italian", "it"),
    ("Spanish", "es"),
    ("Portuguese", "pt"),
    ("European Portuguese", "pt-PT"),
    ("Danish", "da"),
    ("Finnish", "fi"),
    ("Norwegian", "nb"),
    ("Swedish", "sv"),
    ("Korean", "ko"),
    ("Chinese", "zh-Hans"),
    ("Traditional Chinese", "zh-Hant"),
    ("Russian", "ru"),
    ("Polish", "pl"),
    ("Turkish", "tr"),
    ("Ukrainian", "uk"),
    ("Arabic", "ar"),
    ("Croatian", "hr"),
    ("Czech", "cs"),
    ("Greek", "el"),
    ("Hebrew", "he"),
    ("Romanian", "ro"),
    ("Slovak", "sk"),
    ("Thai", "th"),
    ("Indonesian", "id"),
    ("Malay", "ms"),
    ("Catalan", "ca"),
    ("Hungarian", "hu"),
    ("Vietnamese", "vi"),
];

static BUILTIN: OnceLock<LocaleTable> = OnceLock::new();

/// One row of a loadable table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    pub legacy: String,
    pub modern: String,
}

#[derive(Debug, Clone)]
pub struct LocaleTable {
    locales: Vec<Locale>,
    by_legacy: HashMap<String, usize>,
    by_modern: HashMap<String, usize>,
}

impl LocaleTable {
    /// The process-wide table, built on first use.
    pub fn builtin() -> &'static LocaleTable {
        BUILTIN.get_or_init(|| {
            Self::build(
                BUILTIN_LOCALES
                    .iter()
                    .map(|(legacy, modern)| Locale::new(*legacy, *modern)),
            )
        })
    }

    /// Build a table, rejecting duplicates and names shared by both vocabularies.
    pub fn from_pairs<I, L, M>(pairs: I) -> L10nResult<Self>
    where
        I: IntoIterator<Item = (L, M)>,
        L: Into<String>,
        M: Into<String>,
    {
        let locales: Vec<Locale> = pairs
            .into_iter()
            .map(|(legacy, modern)| Locale::new(legacy, modern))
            .collect();
        validate(&locales)?;
        Ok(Self::build(locales))
    }

    pub fn from_entries(entries: Vec<LocaleEntry>) -> L10nResult<Self> {
        Self::from_pairs(entries.into_iter().map(|e| (e.legacy, e.modern)))
    }

    /// Load a table from a `.json`, `.yaml` or `.yml` list of `{ legacy, modern }` rows.
    pub fn from_path(path: &Path) -> L10nResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| L10nError::io(path, e))?;
        let entries: Vec<LocaleEntry> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                L10nError::InvalidLocaleTable {
                    reason: format!("{}: {}", path.display(), e),
                }
            })?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                L10nError::InvalidLocaleTable {
                    reason: format!("{}: {}", path.display(), e),
                }
            })?,
            _ => {
                return Err(L10nError::InvalidLocaleTable {
                    reason: format!("unsupported table extension for {}", path.display()),
                })
            }
        };
        Self::from_entries(entries)
    }

    fn build<I: IntoIterator<Item = Locale>>(locales: I) -> Self {
        let locales: Vec<Locale> = locales.into_iter().collect();
        let mut by_legacy = HashMap::with_capacity(locales.len());
        let mut by_modern = HashMap::with_capacity(locales.len());
        for (idx, locale) in locales.iter().enumerate() {
            by_legacy.insert(locale.legacy_name().to_string(), idx);
            by_modern.insert(locale.new_name().to_string(), idx);
        }
        Self {
            locales,
            by_legacy,
            by_modern,
        }
    }

    pub fn is_legacy_name(&self, name: &str) -> bool {
        self.by_legacy.contains_key(name)
    }

    pub fn is_new_name(&self, name: &str) -> bool {
        self.by_modern.contains_key(name)
    }

    pub fn locale_for_legacy_name(&self, name: &str) -> L10nResult<Locale> {
        self.by_legacy
            .get(name)
            .map(|&idx| self.locales[idx].clone())
            .ok_or_else(|| L10nError::UnrecognizedLocale {
                name: name.to_string(),
            })
    }

    pub fn locale_for_new_name(&self, name: &str) -> L10nResult<Locale> {
        self.by_modern
            .get(name)
            .map(|&idx| self.locales[idx].clone())
            .ok_or_else(|| L10nError::UnrecognizedLocale {
                name: name.to_string(),
            })
    }

    /// All locales, in table order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

fn validate(locales: &[Locale]) -> L10nResult<()> {
    let mut seen: HashMap<&str, &'static str> = HashMap::new();
    for locale in locales {
        for (name, vocabulary) in [
            (locale.legacy_name(), "legacy"),
            (locale.new_name(), "modern"),
        ] {
            if name.is_empty() {
                return Err(L10nError::InvalidLocaleTable {
                    reason: format!("empty {} name", vocabulary),
                });
            }
            if let Some(previous) = seen.insert(name, vocabulary) {
                return Err(L10nError::InvalidLocaleTable {
                    reason: format!(
                        "{:?} appears as a {} name and again as a {} name",
                        name, previous, vocabulary
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_well_formed() {
        let table = LocaleTable::builtin();
        assert!(validate(table.locales()).is_ok());
        assert_eq!(table.len(), BUILTIN_LOCALES.len());
    }

    #[test]
    fn every_builtin_name_is_recognized_by_exactly_one_vocabulary() {
        let table = LocaleTable::builtin();
        for (legacy, modern) in BUILTIN_LOCALES {
            assert!(table.is_legacy_name(legacy) && !table.is_new_name(legacy));
            assert!(table.is_new_name(modern) && !table.is_legacy_name(modern));
            let a = table.locale_for_legacy_name(legacy).unwrap();
            let b = table.locale_for_new_name(modern).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn recognition_is_case_sensitive_and_whole_string() {
        let table = LocaleTable::builtin();
        assert!(!table.is_legacy_name("english"));
        assert!(!table.is_new_name("EN"));
        assert!(!table.is_new_name("en "));
        assert!(!table.is_legacy_name("Englis"));
    }

    #[test]
    fn unknown_name_fails_construction() {
        let table = LocaleTable::builtin();
        let err = table.locale_for_new_name("Klingon").unwrap_err();
        assert!(matches!(err, L10nError::UnrecognizedLocale { ref name } if name == "Klingon"));
    }

    #[test]
    fn overlapping_vocabularies_are_rejected() {
        let err = LocaleTable::from_pairs([("English", "en"), ("en", "xx")]).unwrap_err();
        assert!(matches!(err, L10nError::InvalidLocaleTable { .. }));

        let err = LocaleTable::from_pairs([("German", "de"), ("Deutsch", "de")]).unwrap_err();
        assert!(matches!(err, L10nError::InvalidLocaleTable { .. }));
    }

    #[test]
    fn table_loads_from_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("locales.yaml");
        fs::write(
            &path,
            "- legacy: Esperanto\n  modern: eo\n- legacy: Welsh\n  modern: cy\n",
        )
        .unwrap();
        let table = LocaleTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.locale_for_legacy_name("Welsh").unwrap().new_name(), "cy");
    }

    #[test]
    fn table_rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("locales.txt");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            LocaleTable::from_path(&path),
            Err(L10nError::InvalidLocaleTable { .. })
        ));
    }
}
