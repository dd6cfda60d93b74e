// SPDX-License-Identifier: PMPL-1.0-or-later

//! lproj-locator: find on-screen iOS elements by their reference-language label.
//!
//! A UI test is written against one language ("Shipping from: Berlin") but
//! the device may display another ("Versand ab: Berlin"). This crate loads
//! the app bundle's `Localizable.strings` tables and works out which
//! localization keys could have produced a given piece of text, so the
//! locator can be rewritten into whatever language the device shows.
//!
//! PIECES:
//! 1. **Locale**: legacy (`German.lproj`) and modern (`de.lproj`) folder names.
//! 2. **Convert**: turns compiled `.strings` resources into flat JSON.
//! 3. **Dictionary**: one locale's templates, with placeholder-tolerant
//!    matching and reverse formatting.

pub mod config;
pub mod convert;
pub mod dictionary;
pub mod error;
pub mod locale;
pub mod types;

pub use convert::{Converter, ConverterKind, FnConverter, PlutilConverter, StringsTextConverter};
pub use dictionary::pattern::{normalize, PatternMode, TemplatePattern};
pub use dictionary::{load_available, load_bundle, LanguageDictionary, RESOURCE_FILE_NAME};
pub use error::{L10nError, L10nResult};
pub use locale::{is_legacy_name, is_new_name, Locale, LocaleTable};
pub use types::MatchResult;
