//! Error types for catalog loading, rule evaluation, and translation lookup

/// Errors raised while parsing or evaluating a `Plural-Forms` rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
	/// The rule string does not match `nplurals=<N>; plural=<expr>;`
	/// or the expression is not part of the gettext plural grammar
	#[error("plural rule '{rule}' could not be parsed: {reason}")]
	Parse { rule: String, reason: String },

	/// The expression parsed but could not be evaluated for the given count
	#[error("plural rule expression could not be evaluated: {0}")]
	Evaluation(String),
}

/// Errors raised by the strict translation lookups
///
/// The convenience methods on [`Translator`](crate::Translator) catch all of
/// these, record them on the diagnostics sink, and fall back to the source
/// message. [`Translator::gettext`](crate::Translator::gettext) and
/// [`Translator::ngettext`](crate::Translator::ngettext) surface them to the
/// caller instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
	/// The key is absent from the active locale's translations
	#[error("translation for '{0}' not found")]
	NotFound(String),

	/// The stored entry exists but is not a valid translation entry
	#[error("translation entry for '{key}' is corrupt: {reason}")]
	CorruptEntry { key: String, reason: String },

	/// A plural translation was requested for a singular-only entry
	#[error("plural translation for '{0}' not defined")]
	PluralNotDefined(String),

	/// The rule selected a plural form the entry does not supply
	#[error("plural form {form} not found for '{key}'")]
	PluralFormNotFound { key: String, form: usize },

	/// The active locale's plural rule is malformed or failed to evaluate
	#[error(transparent)]
	Rule(#[from] RuleError),
}

/// Configuration-time errors: catalog loading, validation, locale selection
///
/// Unlike [`TranslateError`], these are never swallowed: a session without
/// a usable catalog or locale cannot proceed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	/// The top-level catalog shape is invalid
	#[error("invalid catalog: {0}")]
	InvalidCatalog(String),

	/// The requested locale is not registered in the catalog
	#[error("locale '{0}' is not defined in the catalog")]
	UnknownLocale(String),

	/// Catalog data could not be read
	#[error("failed to read catalog: {0}")]
	Io(#[from] std::io::Error),

	/// Catalog data could not be deserialized
	#[error("failed to parse catalog: {0}")]
	Json(#[from] serde_json::Error),
}
