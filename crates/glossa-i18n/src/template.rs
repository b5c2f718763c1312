//! Placeholder substitution driven by a configurable 3-group pattern
//!
//! A template pattern captures (1) an optional preceding character, (2) the
//! full placeholder token including delimiters, and (3) the bare placeholder
//! name. The default pattern recognizes `#name#` tokens. Substitution keeps
//! the captured prefix verbatim and replaces the token with the caller's
//! value; tokens whose name has no replacement are left as-is.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CatalogError;

/// The default placeholder syntax: `#name#`, optionally preceded by any
/// single character (which is preserved on substitution)
pub const DEFAULT_PATTERN: &str = r"(^|.|\r|\n)(#(\w+)#)";

static DEFAULT_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(DEFAULT_PATTERN).expect("Invalid default template pattern"));

/// A compiled placeholder pattern with exactly three capture groups
///
/// The pattern may arrive as a literal string (as transported in serialized
/// catalog data) via [`TemplatePattern::parse`], or precompiled via
/// [`TemplatePattern::from_regex`] when the data originates in-process.
///
/// # Example
/// ```
/// use glossa_i18n::TemplatePattern;
///
/// let pattern = TemplatePattern::default();
/// let rendered = pattern.substitute("singular place #holder# lala", &[("holder", "X")]);
/// assert_eq!(rendered, "singular place X lala");
/// ```
#[derive(Debug, Clone)]
pub struct TemplatePattern {
	regex: Regex,
}

impl Default for TemplatePattern {
	fn default() -> Self {
		Self {
			regex: DEFAULT_RE.clone(),
		}
	}
}

impl TemplatePattern {
	/// Compile a pattern from its serialized string form
	pub fn parse(pattern: &str) -> Result<Self, CatalogError> {
		if pattern.is_empty() {
			return Err(CatalogError::InvalidCatalog(
				"template pattern is empty".to_string(),
			));
		}
		let regex = Regex::new(pattern).map_err(|err| {
			CatalogError::InvalidCatalog(format!("template pattern does not compile: {err}"))
		})?;
		Self::from_regex(regex)
	}

	/// Wrap an already compiled matcher
	pub fn from_regex(regex: Regex) -> Result<Self, CatalogError> {
		// captures_len() counts the implicit whole-match group
		if regex.captures_len() != 4 {
			return Err(CatalogError::InvalidCatalog(format!(
				"template pattern must have exactly 3 capture groups, found {}",
				regex.captures_len() - 1
			)));
		}
		Ok(Self { regex })
	}

	/// Substitute placeholder tokens in `message` with the given values
	///
	/// Every non-overlapping match is inspected: when the captured name is
	/// present in `replacements`, the full token (group 2) is replaced by
	/// the value and the preceding character (group 1) is emitted verbatim.
	/// Unknown names are left untouched. An empty replacement list returns
	/// the message unchanged.
	pub fn substitute(&self, message: &str, replacements: &[(&str, &str)]) -> String {
		if replacements.is_empty() {
			return message.to_string();
		}

		self.regex
			.replace_all(message, |caps: &regex::Captures<'_>| {
				let name = caps.get(3).map_or("", |m| m.as_str());
				let prefix = caps.get(1).map_or("", |m| m.as_str());
				match replacements.iter().find(|(key, _)| *key == name) {
					Some((_, value)) => format!("{prefix}{value}"),
					None => caps[0].to_string(),
				}
			})
			.into_owned()
	}
}
