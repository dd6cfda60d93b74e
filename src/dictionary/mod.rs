// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language dictionaries: one locale's `key -> template` table.
//!
//! A dictionary is built for one locale, loaded once from that locale's
//! `Localizable.strings`, then queried read-only. Given text observed on
//! screen, [`LanguageDictionary::find_matches`] returns every key whose
//! template could have produced it.
//!
//! Two dictionaries are equal when they are for the same locale, whatever
//! their content. A `HashSet<LanguageDictionary>` therefore holds at most
//! one dictionary per language.

pub mod pattern;

use crate::convert::Converter;
use crate::error::{L10nError, L10nResult};
use crate::locale::{Locale, LocaleTable, LPROJ_SUFFIX};
use crate::types::MatchResult;
use pattern::{
    normalize, placeholder_count, render_literal, split_template, PatternMode, TemplatePattern,
};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resource file expected inside every `.lproj` folder.
pub const RESOURCE_FILE_NAME: &str = "Localizable.strings";

#[derive(Debug, Clone)]
pub struct LanguageDictionary {
    locale: Locale,
    legacy_format: bool,
    content: BTreeMap<String, String>,
}

impl LanguageDictionary {
    /// Create an empty dictionary for a legacy (`German`) or modern (`de`) name.
    pub fn new(language: &str) -> L10nResult<Self> {
        Self::with_table(language, LocaleTable::builtin())
    }

    /// Like [`LanguageDictionary::new`], resolving the name against `table`.
    /// Legacy names are tried first.
    pub fn with_table(language: &str, table: &LocaleTable) -> L10nResult<Self> {
        let (locale, legacy_format) = if table.is_legacy_name(language) {
            (table.locale_for_legacy_name(language)?, true)
        } else if table.is_new_name(language) {
            (table.locale_for_new_name(language)?, false)
        } else {
            return Err(L10nError::UnrecognizedLocale {
                name: language.to_string(),
            });
        };
        Ok(Self {
            locale,
            legacy_format,
            content: BTreeMap::new(),
        })
    }

    /// Load `<bundle>/<name>.lproj/Localizable.strings`, naming the locale after the folder.
    pub fn from_resource_file(file: &Path, converter: &dyn Converter) -> L10nResult<Self> {
        Self::from_resource_file_with_table(file, converter, LocaleTable::builtin())
    }

    pub fn from_resource_file_with_table(
        file: &Path,
        converter: &dyn Converter,
        table: &LocaleTable,
    ) -> L10nResult<Self> {
        let name = extract_language_name(file)?;
        let mut dictionary = Self::with_table(&name, table)?;
        let text = read_converted(file, converter)?;
        dictionary.load_json_from(&text, file)?;
        debug!(
            locale = %dictionary.locale,
            legacy = dictionary.legacy_format,
            entries = dictionary.content.len(),
            file = %file.display(),
            "loaded language dictionary"
        );
        Ok(dictionary)
    }

    /// Resource files of every `.lproj` folder directly inside `bundle`, sorted by path.
    ///
    /// Fails on the first folder that lacks the resource file.
    pub fn l10n_resource_files(bundle: &Path) -> L10nResult<Vec<PathBuf>> {
        Self::l10n_resource_files_named(bundle, RESOURCE_FILE_NAME)
    }

    pub fn l10n_resource_files_named(bundle: &Path, file_name: &str) -> L10nResult<Vec<PathBuf>> {
        let folders = lproj_folders(bundle)?;
        let mut files = Vec::with_capacity(folders.len());
        for folder in folders {
            let resource = folder.join(file_name);
            if !resource.is_file() {
                return Err(L10nError::MissingResource { path: resource });
            }
            files.push(resource);
        }
        Ok(files)
    }

    /// The resource file for `locale` in `bundle`, under either folder naming convention.
    pub fn locate_resource_file(
        bundle: &Path,
        locale: &Locale,
        file_name: &str,
    ) -> L10nResult<PathBuf> {
        let modern = bundle.join(locale.folder_name(false)).join(file_name);
        if modern.is_file() {
            return Ok(modern);
        }
        let legacy = bundle.join(locale.folder_name(true)).join(file_name);
        if legacy.is_file() {
            return Ok(legacy);
        }
        Err(L10nError::MissingResource { path: modern })
    }

    /// Replace the content with a flat JSON object of strings.
    pub fn load_json(&mut self, json: &str) -> L10nResult<()> {
        self.load_json_from(&normalize(json), Path::new("<memory>"))
    }

    fn load_json_from(&mut self, json: &str, origin: &Path) -> L10nResult<()> {
        let content: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| L10nError::malformed(origin, e.to_string()))?;
        self.content = content;
        Ok(())
    }

    /// Replace the content wholesale.
    pub fn load_content<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.content = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Every key whose template matches `candidate` as a whole string.
    pub fn find_matches(&self, candidate: &str) -> Vec<MatchResult> {
        self.find_matches_with(candidate, PatternMode::default())
    }

    pub fn find_matches_with(&self, candidate: &str, mode: PatternMode) -> Vec<MatchResult> {
        let normalized = normalize(candidate);
        let mut matches = Vec::new();

        for (key, template) in &self.content {
            let pattern = match TemplatePattern::try_compile(&normalize(template), mode) {
                Ok(pattern) => pattern,
                Err(e) => {
                    debug!(locale = %self.locale, key = %key, error = %e, "skipping template");
                    continue;
                }
            };
            if pattern.is_match(&normalized) {
                matches.push(MatchResult::new(
                    self.locale.clone(),
                    key.as_str(),
                    template.as_str(),
                    candidate,
                ));
            }
        }

        matches
    }

    /// Fill `captured_args` with the text each placeholder consumed in the candidate.
    ///
    /// Leaves the arguments empty when the template no longer matches.
    pub fn capture_args(&self, result: MatchResult, mode: PatternMode) -> L10nResult<MatchResult> {
        let template = self.template_for(&result.key)?;
        let args = TemplatePattern::compile(&normalize(template), mode)
            .and_then(|pattern| pattern.captures(&normalize(&result.candidate)))
            .unwrap_or_default();
        Ok(result.with_args(args))
    }

    /// Render this dictionary's template for `result.key` with `result.captured_args`.
    pub fn translate(&self, result: &MatchResult) -> L10nResult<String> {
        let template = self.template_for(&result.key)?;
        let expected = placeholder_count(template);
        if expected != result.captured_args.len() {
            return Err(L10nError::ArgumentCountMismatch {
                key: result.key.clone(),
                expected,
                actual: result.captured_args.len(),
            });
        }

        let mut out = String::with_capacity(template.len());
        for (idx, segment) in split_template(template).iter().enumerate() {
            if idx > 0 {
                out.push_str(&result.captured_args[idx - 1]);
            }
            out.push_str(&render_literal(segment));
        }
        Ok(out)
    }

    fn template_for(&self, key: &str) -> L10nResult<&str> {
        self.content
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| L10nError::MissingKey {
                key: key.to_string(),
            })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Whether the folder used the legacy verbose name (`German.lproj`).
    pub fn is_legacy_format(&self) -> bool {
        self.legacy_format
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.content.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.content.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl PartialEq for LanguageDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl Eq for LanguageDictionary {}

impl Hash for LanguageDictionary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.locale.hash(state);
    }
}

/// Load every localization of an app bundle, one dictionary per locale.
///
/// When a locale has folders in both conventions, the first in path order wins.
pub fn load_bundle(
    bundle: &Path,
    converter: &dyn Converter,
    table: &LocaleTable,
    resource_file_name: &str,
) -> L10nResult<HashSet<LanguageDictionary>> {
    let files = LanguageDictionary::l10n_resource_files_named(bundle, resource_file_name)?;
    let mut dictionaries = HashSet::with_capacity(files.len());
    for file in files {
        let dictionary = LanguageDictionary::from_resource_file_with_table(&file, converter, table)?;
        if !dictionaries.insert(dictionary) {
            debug!(file = %file.display(), "locale already loaded, ignoring duplicate folder");
        }
    }
    info!(
        bundle = %bundle.display(),
        languages = dictionaries.len(),
        "loaded app bundle localizations"
    );
    Ok(dictionaries)
}

/// Load every `.lproj` folder that can be loaded, skipping the rest with a warning.
///
/// Folders such as `Base.lproj` carry no string table or no recognizable
/// locale; they are skipped instead of failing the whole bundle. Only a
/// bundle directory that cannot be read is an error.
pub fn load_available(
    bundle: &Path,
    converter: &dyn Converter,
    table: &LocaleTable,
    resource_file_name: &str,
) -> L10nResult<HashSet<LanguageDictionary>> {
    let mut dictionaries = HashSet::new();
    for folder in lproj_folders(bundle)? {
        let resource = folder.join(resource_file_name);
        if !resource.is_file() {
            warn!(folder = %folder.display(), "no {} here, skipping", resource_file_name);
            continue;
        }
        match LanguageDictionary::from_resource_file_with_table(&resource, converter, table) {
            Ok(dictionary) => {
                dictionaries.insert(dictionary);
            }
            Err(e) => warn!(folder = %folder.display(), error = %e, "skipping localization"),
        }
    }
    info!(
        bundle = %bundle.display(),
        languages = dictionaries.len(),
        "loaded available app bundle localizations"
    );
    Ok(dictionaries)
}

/// `.lproj` folders directly inside `bundle`, sorted by path.
fn lproj_folders(bundle: &Path) -> L10nResult<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(bundle).map_err(|e| L10nError::io(bundle, e))? {
        let path = entry.map_err(|e| L10nError::io(bundle, e))?.path();
        let is_lproj = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(LPROJ_SUFFIX))
            .unwrap_or(false);
        if is_lproj && path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();
    Ok(folders)
}

/// Locale name encoded in the resource file's parent folder (`de.lproj` -> `de`).
pub fn extract_language_name(file: &Path) -> L10nResult<String> {
    let folder = file
        .parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .ok_or_else(|| L10nError::UnrecognizedLocale {
            name: file.display().to_string(),
        })?;
    Ok(folder.strip_suffix(LPROJ_SUFFIX).unwrap_or(folder).to_string())
}

/// Run the converter into a scratch file and read it back as NFKC-normalized text.
fn read_converted(file: &Path, converter: &dyn Converter) -> L10nResult<String> {
    let scratch = tempfile::Builder::new()
        .prefix("lproj-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| L10nError::io(std::env::temp_dir(), e))?;

    converter.convert(file, scratch.path())?;
    let raw = fs::read(scratch.path()).map_err(|e| L10nError::conversion(file, e.to_string()))?;
    let text = String::from_utf8(raw)
        .map_err(|e| L10nError::conversion(file, format!("output is not UTF-8: {}", e)))?;
    Ok(normalize(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn german(entries: &[(&str, &str)]) -> LanguageDictionary {
        let mut dictionary = LanguageDictionary::new("de").unwrap();
        dictionary.load_content(entries.iter().copied());
        dictionary
    }

    #[test]
    fn construction_records_naming_convention() {
        let legacy = LanguageDictionary::new("German").unwrap();
        assert!(legacy.is_legacy_format());
        let modern = LanguageDictionary::new("de").unwrap();
        assert!(!modern.is_legacy_format());
        assert_eq!(legacy.locale(), modern.locale());
    }

    #[test]
    fn unrecognized_language_fails() {
        let err = LanguageDictionary::new("Base").unwrap_err();
        assert!(matches!(err, L10nError::UnrecognizedLocale { ref name } if name == "Base"));
    }

    #[test]
    fn equality_is_by_locale_only() {
        let a = german(&[("greeting", "Hallo %@")]);
        let b = german(&[("bye", "Tschüss")]);
        let c = LanguageDictionary::new("fr").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn extracts_language_from_parent_folder() {
        let file = Path::new("/apps/Demo.app/de.lproj/Localizable.strings");
        assert_eq!(extract_language_name(file).unwrap(), "de");
        let file = Path::new("/apps/Demo.app/German.lproj/Localizable.strings");
        assert_eq!(extract_language_name(file).unwrap(), "German");
    }

    #[test]
    fn literal_template_matches_only_itself() {
        let dictionary = german(&[("ok", "Fertig")]);
        assert_eq!(dictionary.find_matches("Fertig").len(), 1);
        assert!(dictionary.find_matches("Fertik").is_empty());
        assert!(dictionary.find_matches("Fertig!").is_empty());
    }

    #[test]
    fn returns_every_matching_key() {
        let dictionary = german(&[
            ("greeting", "Hallo %@"),
            ("greeting.world", "Hallo Welt"),
            ("bye", "Tschüss %@"),
        ]);
        let mut keys: Vec<_> = dictionary
            .find_matches("Hallo Welt")
            .into_iter()
            .map(|m| m.key)
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["greeting", "greeting.world"]);
    }

    #[test]
    fn matching_normalizes_both_sides() {
        let dictionary = german(&[("file", "ﬁle %@")]);
        let matches = dictionary.find_matches("file Ｘ");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].template, "ﬁle %@");
        assert_eq!(matches[0].candidate, "file Ｘ");
        assert!(matches[0].captured_args.is_empty());
    }

    #[test]
    fn malformed_template_is_skipped() {
        let dictionary = german(&[("broken", "Preis (%@"), ("price", "Preis: %@")]);
        let matches = dictionary.find_matches("Preis: 5 €");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].key, "price");
        assert!(dictionary.find_matches("Preis (5").is_empty());
    }

    #[test]
    fn escaped_mode_matches_metacharacters_literally() {
        let dictionary = german(&[("broken", "Preis (%@")]);
        let matches = dictionary.find_matches_with("Preis (5", PatternMode::Escaped);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn translate_substitutes_in_order() {
        let dictionary = german(&[("inbox", "%@ hat dir %d Nachrichten geschickt")]);
        let result = MatchResult::new(dictionary.locale().clone(), "inbox", "", "")
            .with_args(["Anna", "3"]);
        let text = dictionary.translate(&result).unwrap();
        assert_eq!(text, "Anna hat dir 3 Nachrichten geschickt");
        assert!(!text.contains("%@") && !text.contains("%d"));
    }

    #[test]
    fn translate_renders_percent_escapes() {
        let dictionary = german(&[("battery", "Akku %d%%"), ("sale", "%%%d Rabatt auf %@")]);
        let battery = MatchResult::new(dictionary.locale().clone(), "battery", "", "")
            .with_args(["50"]);
        assert_eq!(dictionary.translate(&battery).unwrap(), "Akku 50%");

        let sale = MatchResult::new(dictionary.locale().clone(), "sale", "", "")
            .with_args(["20", "Schuhe"]);
        let text = dictionary.translate(&sale).unwrap();
        assert_eq!(text, "%20 Rabatt auf Schuhe");
        assert!(!text.contains("%%") && !text.contains("%@") && !text.contains("%d"));
    }

    #[test]
    fn unbalanced_template_cannot_match_by_prefix() {
        let mut dictionary = german(&[]);
        dictionary.load_json(r#"{"k": "Yes)|(No", "ok": "Ja"}"#).unwrap();
        assert!(dictionary.find_matches("Yes and lots more text").is_empty());
        assert!(dictionary.find_matches("No").is_empty());
        assert_eq!(dictionary.find_matches("Ja").len(), 1);
    }

    #[test]
    fn translate_rejects_missing_key_and_wrong_arity() {
        let dictionary = german(&[("greeting", "Hallo %@")]);
        let missing = MatchResult::new(dictionary.locale().clone(), "nope", "", "");
        assert!(matches!(
            dictionary.translate(&missing),
            Err(L10nError::MissingKey { .. })
        ));

        let result = MatchResult::new(dictionary.locale().clone(), "greeting", "", "")
            .with_args(["a", "b"]);
        assert!(matches!(
            dictionary.translate(&result),
            Err(L10nError::ArgumentCountMismatch {
                expected: 1,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn capture_then_translate_across_languages() {
        let mut english = LanguageDictionary::new("en").unwrap();
        english.load_content([("shipping", "Shipping from: %@")]);
        let german = german(&[("shipping", "Versand ab: %@")]);

        let found = english.find_matches("Shipping from: Berlin");
        assert_eq!(found.len(), 1);
        let found = english
            .capture_args(found.into_iter().next().unwrap(), PatternMode::Escaped)
            .unwrap();
        assert_eq!(found.captured_args, vec!["Berlin"]);
        assert_eq!(german.translate(&found).unwrap(), "Versand ab: Berlin");
    }

    #[test]
    fn load_json_replaces_content_wholesale() {
        let mut dictionary = german(&[("old", "Alt")]);
        dictionary.load_json(r#"{"new": "Neu"}"#).unwrap();
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.get("new"), Some("Neu"));
        assert_eq!(dictionary.get("old"), None);
    }

    #[test]
    fn load_json_rejects_non_string_values_and_keeps_content() {
        let mut dictionary = german(&[("old", "Alt")]);
        for bad in [r#"{"n": 1}"#, r#"{"nested": {"a": "b"}}"#, r#"["a"]"#, "not json"] {
            assert!(matches!(
                dictionary.load_json(bad),
                Err(L10nError::MalformedContent { .. })
            ));
        }
        assert_eq!(dictionary.get("old"), Some("Alt"));
    }
}
