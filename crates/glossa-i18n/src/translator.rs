//! Translation session: lookup resolution against one active locale
//!
//! A [`Translator`] is created in two phases, mirroring the explicit
//! load-then-activate lifecycle: first a [`TranslationCatalog`] is loaded
//! (which may fail), then [`Translator::new`] activates it for one locale
//! (which validates the catalog, the locale, and the template pattern).
//!
//! Two API levels exist:
//!
//! - **Strict**: [`Translator::gettext`] and [`Translator::ngettext`]
//!   surface every [`TranslateError`] to the caller.
//! - **Convenience**: [`Translator::translate`] and
//!   [`Translator::translate_plural`] never fail: lookup errors are
//!   recorded on the diagnostics sink and the original source message is
//!   returned unchanged (without placeholder substitution).

use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::catalog::{LocaleEntry, ResolvedEntry, TranslationCatalog};
use crate::error::{CatalogError, TranslateError};
use crate::plural::PluralRule;
use crate::template::TemplatePattern;

/// Receiver for translation failures swallowed at the convenience boundary
pub trait DiagnosticsSink: Send + Sync {
	/// Record one failed lookup
	fn record(&self, error: &TranslateError);
}

/// Default sink: emits a `tracing` warning per swallowed failure
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
	fn record(&self, error: &TranslateError) {
		tracing::warn!(%error, "translation fell back to source message");
	}
}

/// Sink that collects failures in memory, for tests and offline auditing
#[derive(Debug, Default)]
pub struct CollectingSink {
	errors: Mutex<Vec<TranslateError>>,
}

impl CollectingSink {
	/// Create an empty sink
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything recorded so far
	pub fn errors(&self) -> Vec<TranslateError> {
		self.errors.lock().map(|guard| guard.clone()).unwrap_or_default()
	}
}

impl DiagnosticsSink for CollectingSink {
	fn record(&self, error: &TranslateError) {
		if let Ok(mut guard) = self.errors.lock() {
			guard.push(error.clone());
		}
	}
}

/// Synchronous, single-locale translation engine
///
/// # Example
/// ```
/// use glossa_i18n::{LocaleEntry, TranslationCatalog, Translator};
///
/// let mut locale = LocaleEntry::new("nplurals=2; plural=n != 1;");
/// locale.add_plural("flower", "flowers", vec!["Blume".into(), "Blumen".into()]);
/// locale.add_singular("i am #name#", "ich bin #name#");
///
/// let mut catalog = TranslationCatalog::default();
/// catalog.add_locale("de_DE", locale);
///
/// let translator = Translator::new(catalog, "de_DE").unwrap();
/// assert_eq!(translator.translate_plural("flower", "flowers", 1, &[]), "Blume");
/// assert_eq!(translator.translate_plural("flower", "flowers", 5, &[]), "Blumen");
/// assert_eq!(translator.translate("i am #name#", &[("name", "Ada")]), "ich bin Ada");
/// ```
pub struct Translator {
	catalog: TranslationCatalog,
	locale: String,
	pattern: TemplatePattern,
	rule: OnceCell<PluralRule>,
	diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Translator {
	/// Activate `catalog` for `locale`
	///
	/// Validates the catalog's top-level shape, compiles its template
	/// pattern, and checks that the locale is registered. All of these are
	/// configuration-time failures and abort construction.
	pub fn new(catalog: TranslationCatalog, locale: &str) -> Result<Self, CatalogError> {
		Self::with_diagnostics(catalog, locale, Arc::new(TracingSink))
	}

	/// Like [`Translator::new`] with a caller-supplied diagnostics sink
	pub fn with_diagnostics(
		catalog: TranslationCatalog,
		locale: &str,
		diagnostics: Arc<dyn DiagnosticsSink>,
	) -> Result<Self, CatalogError> {
		catalog.validate()?;
		let pattern = TemplatePattern::parse(catalog.template_pattern())?;
		if !catalog.has_locale(locale) {
			return Err(CatalogError::UnknownLocale(locale.to_string()));
		}
		Ok(Self {
			catalog,
			locale: locale.to_string(),
			pattern,
			rule: OnceCell::new(),
			diagnostics,
		})
	}

	/// The active locale identifier
	pub fn locale(&self) -> &str {
		&self.locale
	}

	/// Whether `locale` is registered in the underlying catalog
	pub fn has_locale(&self, locale: &str) -> bool {
		self.catalog.has_locale(locale)
	}

	/// Switch the active locale
	///
	/// The switch is a single atomic swap behind `&mut self`; no lookup can
	/// observe a partially-updated state. The cached plural rule is reset.
	pub fn set_locale(&mut self, locale: &str) -> Result<(), CatalogError> {
		if !self.catalog.has_locale(locale) {
			return Err(CatalogError::UnknownLocale(locale.to_string()));
		}
		self.locale = locale.to_string();
		self.rule = OnceCell::new();
		Ok(())
	}

	/// Translate a singular message, raising on any failure
	///
	/// Returns the singular/default rendering for `key` in the active
	/// locale.
	pub fn gettext(&self, key: &str) -> Result<&str, TranslateError> {
		let entry = self
			.active_locale()
			.entry(key)
			.ok_or_else(|| TranslateError::NotFound(key.to_string()))?;
		Ok(entry.resolve(key)?.default_text())
	}

	/// Translate a plural message, raising on any failure
	///
	/// An empty `plural_key` means no plural form was requested; the
	/// singular rendering is returned for singular-only entries. A missing
	/// count is normalized to `1`.
	pub fn ngettext(
		&self,
		key: &str,
		plural_key: &str,
		n: Option<u64>,
	) -> Result<&str, TranslateError> {
		let entry = self
			.active_locale()
			.entry(key)
			.ok_or_else(|| TranslateError::NotFound(key.to_string()))?;

		match entry.resolve(key)? {
			ResolvedEntry::Singular(_) if !plural_key.is_empty() => {
				Err(TranslateError::PluralNotDefined(key.to_string()))
			}
			ResolvedEntry::Singular(text) => Ok(text),
			ResolvedEntry::Plural { forms, .. } => {
				let form = self.rule()?.select_form(n)?;
				forms
					.get(form)
					.copied()
					.ok_or_else(|| TranslateError::PluralFormNotFound {
						key: key.to_string(),
						form,
					})
			}
		}
	}

	/// Translate a singular message and substitute placeholders
	///
	/// Never fails: lookup errors are recorded on the diagnostics sink and
	/// the original `message` is returned unchanged.
	pub fn translate(&self, message: &str, replacements: &[(&str, &str)]) -> String {
		match self.gettext(message) {
			Ok(text) => self.pattern.substitute(text, replacements),
			Err(error) => {
				self.diagnostics.record(&error);
				message.to_string()
			}
		}
	}

	/// Translate a plural message and substitute placeholders
	///
	/// Never fails: lookup errors are recorded on the diagnostics sink and
	/// the original `singular` message is returned unchanged.
	pub fn translate_plural(
		&self,
		singular: &str,
		plural: &str,
		count: u64,
		replacements: &[(&str, &str)],
	) -> String {
		match self.ngettext(singular, plural, Some(count)) {
			Ok(text) => self.pattern.substitute(text, replacements),
			Err(error) => {
				self.diagnostics.record(&error);
				singular.to_string()
			}
		}
	}

	fn active_locale(&self) -> &LocaleEntry {
		self.catalog
			.locale(&self.locale)
			.expect("active locale is validated on construction and on switch")
	}

	fn rule(&self) -> Result<&PluralRule, TranslateError> {
		if let Some(rule) = self.rule.get() {
			return Ok(rule);
		}
		// Parse failures are reported per call and intentionally not cached
		let parsed = PluralRule::parse(self.active_locale().plural_forms())?;
		Ok(self.rule.get_or_init(|| parsed))
	}
}
