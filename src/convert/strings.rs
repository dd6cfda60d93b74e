// SPDX-License-Identifier: PMPL-1.0-or-later

//! Text `.strings` conversion for hosts without `plutil`.
//!
//! Parsing is done by `langcodec`, which reads the source form Xcode
//! writes before compiling (`"greeting" = "Hallo %@";` with comments).
//! UTF-16 files with a byte order mark are transcoded to UTF-8 first.
//! Binary property lists are rejected; those still need
//! [`super::PlutilConverter`].

use super::Converter;
use crate::error::{L10nError, L10nResult};
use crate::locale::LPROJ_SUFFIX;
use langcodec::{Codec, Translation};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

const BINARY_PLIST_MAGIC: &[u8] = b"bplist";

#[derive(Debug, Clone, Copy, Default)]
pub struct StringsTextConverter;

impl Converter for StringsTextConverter {
    fn convert(&self, source: &Path, destination: &Path) -> L10nResult<()> {
        let raw = fs::read(source).map_err(|e| L10nError::io(source, e))?;
        if raw.starts_with(BINARY_PLIST_MAGIC) {
            return Err(L10nError::conversion(
                source,
                "binary property list; convert it with plutil",
            ));
        }

        let entries = match transcode_utf16(&raw, source)? {
            Some(utf8) => {
                let mut scratch = tempfile::Builder::new()
                    .prefix("lproj-utf8-")
                    .suffix(".strings")
                    .tempfile()
                    .map_err(|e| L10nError::io(std::env::temp_dir(), e))?;
                scratch
                    .write_all(utf8.as_bytes())
                    .map_err(|e| L10nError::io(scratch.path(), e))?;
                read_entries(scratch.path(), source)?
            }
            None => read_entries(source, source)?,
        };

        let json = serde_json::to_string(&entries)
            .map_err(|e| L10nError::conversion(source, e.to_string()))?;
        fs::write(destination, json).map_err(|e| L10nError::io(destination, e))
    }
}

/// UTF-8 text for a UTF-16 file with a byte order mark, `None` when no transcoding is needed.
fn transcode_utf16(raw: &[u8], source: &Path) -> L10nResult<Option<String>> {
    match encoding_rs::Encoding::for_bom(raw) {
        Some((encoding, bom_len)) if encoding != encoding_rs::UTF_8 => {
            let (text, had_errors) = encoding.decode_without_bom_handling(&raw[bom_len..]);
            if had_errors {
                return Err(L10nError::conversion(
                    source,
                    format!("resource is not valid {}", encoding.name()),
                ));
            }
            Ok(Some(text.into_owned()))
        }
        _ => Ok(None),
    }
}

/// Parse `path` with langcodec. Errors are reported against `origin`.
fn read_entries(path: &Path, origin: &Path) -> L10nResult<BTreeMap<String, String>> {
    let mut codec = Codec::new();
    codec
        .read_file_by_extension(path, language_hint(origin))
        .map_err(|e| L10nError::conversion(origin, e.to_string()))?;

    let mut entries = BTreeMap::new();
    for resource in codec.resources.iter() {
        for entry in &resource.entries {
            match &entry.value {
                Translation::Singular(value) => {
                    entries.insert(entry.id.clone(), value.clone());
                }
                _ => debug!(key = %entry.id, "skipping non-singular .strings entry"),
            }
        }
    }
    Ok(entries)
}

/// Language taken from the enclosing `<name>.lproj` folder, if any.
fn language_hint(origin: &Path) -> Option<String> {
    origin
        .parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(LPROJ_SUFFIX))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn convert_text(dir: &TempDir, raw: &[u8]) -> L10nResult<BTreeMap<String, String>> {
        let folder = dir.path().join("de.lproj");
        fs::create_dir_all(&folder).unwrap();
        let source = folder.join("Localizable.strings");
        let out = dir.path().join("out.json");
        fs::write(&source, raw).unwrap();
        StringsTextConverter.convert(&source, &out)?;
        Ok(serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap())
    }

    #[test]
    fn converts_quoted_pairs_and_comments() {
        let dir = TempDir::new().unwrap();
        let text = "/* Home screen */\n\"greeting\" = \"Hallo %@\";\n\n/* Cart */\n\"shipping.from\" = \"Versand ab: %@\";\n";
        let entries = convert_text(&dir, text.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["greeting"], "Hallo %@");
        assert_eq!(entries["shipping.from"], "Versand ab: %@");
    }

    #[test]
    fn surrogate_pair_escapes_do_not_reject_the_file() {
        let dir = TempDir::new().unwrap();
        let text = "\"smile\" = \"\\UD83D\\UDE00\";\n\"ok\" = \"OK\";\n";
        let entries = convert_text(&dir, text.as_bytes()).unwrap();
        assert!(entries.contains_key("smile"));
        assert_eq!(entries["ok"], "OK");
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let dir = TempDir::new().unwrap();
        let mut raw = vec![0xFF, 0xFE];
        for unit in "\"k\" = \"Grüße\";\n".encode_utf16() {
            raw.extend_from_slice(&unit.to_le_bytes());
        }
        let entries = convert_text(&dir, &raw).unwrap();
        assert_eq!(entries["k"], "Grüße");
    }

    #[test]
    fn rejects_binary_plists() {
        let dir = TempDir::new().unwrap();
        let err = convert_text(&dir, b"bplist00\xd1\x01\x02").unwrap_err();
        assert!(matches!(err, L10nError::ConversionFailure { .. }));
    }

    #[test]
    fn language_hint_comes_from_lproj_folder() {
        assert_eq!(
            language_hint(Path::new("/a/Demo.app/fr.lproj/Localizable.strings")),
            Some("fr".to_string())
        );
        assert_eq!(language_hint(Path::new("/tmp/Localizable.strings")), None);
    }
}
