//! Translation catalog: the loaded, immutable locale bundle
//!
//! A catalog mirrors the JSON data format produced by the offline compiler:
//!
//! ```json
//! {
//! 	"config": {"template": {"pattern": "(^|.|\\r|\\n)(#(\\w+)#)"}},
//! 	"locales": {
//! 		"de_DE": {
//! 			"pluralForms": "nplurals=2; plural=n != 1;",
//! 			"translations": {
//! 				"flower": ["flowers", "Blume", "Blumen"]
//! 			}
//! 		}
//! 	}
//! }
//! ```
//!
//! Each translation entry is a positional array: slot 0 holds the source
//! plural message (or `null` when the key has no plural), slots 1..N hold
//! the localized renderings for plural-form indexes 0..N-1. Slot 1 doubles
//! as the singular/default rendering.
//!
//! Validation is deliberately lazy: [`TranslationCatalog::validate`] only
//! gates the top-level shape. Locale- and entry-level defects (missing
//! plural rule, malformed entry arrays) surface at lookup time as
//! [`TranslateError`]s, so one bad entry cannot poison an otherwise usable
//! catalog.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, TranslateError};
use crate::template::DEFAULT_PATTERN;

/// Root entity: one loaded locale bundle
///
/// Constructed once (from serialized data or in-process) and treated as
/// immutable afterwards; lookups never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCatalog {
	config: CatalogConfig,
	locales: HashMap<String, LocaleEntry>,
}

/// Catalog-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
	template: TemplateConfig,
}

/// Serialized template settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
	pattern: String,
}

impl Default for TranslationCatalog {
	fn default() -> Self {
		Self::new(DEFAULT_PATTERN)
	}
}

impl TranslationCatalog {
	/// Create an empty catalog with the given template pattern
	pub fn new(pattern: impl Into<String>) -> Self {
		Self {
			config: CatalogConfig {
				template: TemplateConfig {
					pattern: pattern.into(),
				},
			},
			locales: HashMap::new(),
		}
	}

	/// Load a catalog from a JSON string and validate its top-level shape
	pub fn from_json_str(data: &str) -> Result<Self, CatalogError> {
		let catalog: Self = serde_json::from_str(data)?;
		catalog.validate()?;
		Ok(catalog)
	}

	/// Load a catalog from a reader and validate its top-level shape
	pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
		let catalog: Self = serde_json::from_reader(reader)?;
		catalog.validate()?;
		Ok(catalog)
	}

	/// Load a catalog from a JSON file and validate its top-level shape
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
		let file = File::open(path)?;
		Self::from_reader(file)
	}

	/// Check the top-level catalog shape
	///
	/// True top-level requirements only: a non-empty template pattern and a
	/// locales mapping (possibly empty). Everything below locale level is
	/// validated lazily at lookup time.
	pub fn validate(&self) -> Result<(), CatalogError> {
		if self.config.template.pattern.is_empty() {
			return Err(CatalogError::InvalidCatalog(
				"config.template.pattern is empty".to_string(),
			));
		}
		Ok(())
	}

	/// The configured placeholder pattern string
	pub fn template_pattern(&self) -> &str {
		&self.config.template.pattern
	}

	/// Register a locale
	pub fn add_locale(&mut self, name: impl Into<String>, entry: LocaleEntry) {
		self.locales.insert(name.into(), entry);
	}

	/// Look up a locale entry
	pub fn locale(&self, name: &str) -> Option<&LocaleEntry> {
		self.locales.get(name)
	}

	/// Whether the locale is registered in this catalog
	pub fn has_locale(&self, name: &str) -> bool {
		self.locales.contains_key(name)
	}

	/// All registered locale identifiers
	pub fn locale_names(&self) -> impl Iterator<Item = &str> {
		self.locales.keys().map(String::as_str)
	}
}

/// Translations and plural rule for a single locale
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleEntry {
	#[serde(rename = "pluralForms", default)]
	plural_forms: String,
	#[serde(default)]
	translations: HashMap<String, TranslationEntry>,
}

impl LocaleEntry {
	/// Create an empty locale with the given `Plural-Forms` rule string
	pub fn new(plural_forms: impl Into<String>) -> Self {
		Self {
			plural_forms: plural_forms.into(),
			translations: HashMap::new(),
		}
	}

	/// The raw `nplurals=<N>; plural=<expr>;` rule string
	pub fn plural_forms(&self) -> &str {
		&self.plural_forms
	}

	/// Add a singular-only translation
	pub fn add_singular(&mut self, key: impl Into<String>, text: impl Into<String>) {
		self.translations
			.insert(key.into(), TranslationEntry::singular(text));
	}

	/// Add a plural-capable translation
	///
	/// `forms` holds the localized renderings for plural-form indexes
	/// 0..N-1; `forms[0]` doubles as the singular/default rendering.
	pub fn add_plural(
		&mut self,
		key: impl Into<String>,
		source_plural: impl Into<String>,
		forms: Vec<String>,
	) {
		self.translations
			.insert(key.into(), TranslationEntry::plural(source_plural, forms));
	}

	/// Look up the raw entry for a source message
	///
	/// Keys match verbatim, including leading/trailing whitespace.
	pub fn entry(&self, key: &str) -> Option<&TranslationEntry> {
		self.translations.get(key)
	}

	/// Number of translations registered for this locale
	pub fn len(&self) -> usize {
		self.translations.len()
	}

	/// Whether the locale has no translations
	pub fn is_empty(&self) -> bool {
		self.translations.is_empty()
	}
}

/// One translation entry in its verbatim serialized shape
///
/// Kept as a raw JSON value so that a malformed entry loads fine and only
/// fails the lookups that touch it. [`TranslationEntry::resolve`] decodes
/// it into the tagged [`ResolvedEntry`] view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationEntry(Value);

impl TranslationEntry {
	/// Build a singular-only entry: `[null, text]`
	pub fn singular(text: impl Into<String>) -> Self {
		Self(Value::Array(vec![
			Value::Null,
			Value::String(text.into()),
		]))
	}

	/// Build a plural-capable entry: `[source_plural, forms...]`
	pub fn plural(source_plural: impl Into<String>, forms: Vec<String>) -> Self {
		let mut slots = Vec::with_capacity(forms.len() + 1);
		slots.push(Value::String(source_plural.into()));
		slots.extend(forms.into_iter().map(Value::String));
		Self(Value::Array(slots))
	}

	/// Decode the raw slots into the tagged singular/plural view
	///
	/// `key` is only used to label the error.
	pub fn resolve(&self, key: &str) -> Result<ResolvedEntry<'_>, TranslateError> {
		let corrupt = |reason: &str| TranslateError::CorruptEntry {
			key: key.to_string(),
			reason: reason.to_string(),
		};

		let slots = self.0.as_array().ok_or_else(|| corrupt("not an array"))?;
		if slots.len() < 2 {
			return Err(corrupt("fewer than two slots"));
		}

		match &slots[0] {
			Value::Null => {
				let text = slots[1]
					.as_str()
					.ok_or_else(|| corrupt("singular rendering is not a string"))?;
				Ok(ResolvedEntry::Singular(text))
			}
			Value::String(source_plural) => {
				let forms = slots[1..]
					.iter()
					.map(|slot| {
						slot.as_str()
							.ok_or_else(|| corrupt("plural rendering is not a string"))
					})
					.collect::<Result<Vec<_>, _>>()?;
				Ok(ResolvedEntry::Plural {
					source_plural,
					forms,
				})
			}
			_ => Err(corrupt("slot 0 is neither null nor a string")),
		}
	}
}

/// Decoded view of a translation entry
///
/// `Singular` entries carry no plural source form; requesting a plural
/// translation for one is an error. `Plural` entries keep the source plural
/// message only to validate plural requests; it is never used as output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEntry<'a> {
	/// A key with a single localized rendering
	Singular(&'a str),
	/// A key with one rendering per plural-form index
	Plural {
		source_plural: &'a str,
		forms: Vec<&'a str>,
	},
}

impl<'a> ResolvedEntry<'a> {
	/// The singular/default rendering
	pub fn default_text(&self) -> &'a str {
		match self {
			Self::Singular(text) => text,
			// resolve() guarantees at least one form
			Self::Plural { forms, .. } => forms[0],
		}
	}
}
