//! # Glossa i18n
//!
//! Gettext-style runtime translation engine: given a source-language message
//! key, an optional plural counterpart, a count, and named placeholder
//! values, it resolves the localized string for the active locale and
//! interpolates the placeholders into it.
//!
//! The engine is single-locale-at-a-time, synchronous, and in-process: a
//! [`TranslationCatalog`] is loaded and validated once, a [`Translator`] is
//! activated for one locale, and every lookup is a pure read over the
//! immutable catalog.
//!
//! ## Quick start
//!
//! ```
//! use glossa_i18n::{LocaleEntry, TranslationCatalog, Translator};
//!
//! let mut de = LocaleEntry::new("nplurals=2; plural=n != 1;");
//! de.add_singular("i am #name#", "ich bin #name#");
//! de.add_plural("flower", "flowers", vec!["Blume".into(), "Blumen".into()]);
//!
//! let mut catalog = TranslationCatalog::default();
//! catalog.add_locale("de_DE", de);
//!
//! let translator = Translator::new(catalog, "de_DE").unwrap();
//! assert_eq!(translator.translate("i am #name#", &[("name", "Ada")]), "ich bin Ada");
//! assert_eq!(translator.translate_plural("flower", "flowers", 5, &[]), "Blumen");
//! ```
//!
//! ## Module organization
//!
//! - [`catalog`]: the loaded data model and its validation
//! - [`plural`]: `Plural-Forms` rule parsing and sandboxed evaluation
//! - [`template`]: placeholder substitution
//! - [`translator`]: the active-locale session and its two API levels
//! - [`po`]: gettext `.po` parsing for the offline catalog compiler

pub mod catalog;
pub mod error;
pub mod plural;
pub mod po;
pub mod template;
pub mod translator;

pub use catalog::{LocaleEntry, ResolvedEntry, TranslationCatalog, TranslationEntry};
pub use error::{CatalogError, RuleError, TranslateError};
pub use plural::PluralRule;
pub use po::{PoParseError, parse_po};
pub use template::{DEFAULT_PATTERN, TemplatePattern};
pub use translator::{CollectingSink, DiagnosticsSink, TracingSink, Translator};
