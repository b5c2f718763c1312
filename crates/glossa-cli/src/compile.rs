//! Catalog compilation: `.po` trees in, runtime JSON out
//!
//! Scans a gettext-style locale directory (`<dir>/<locale>/LC_MESSAGES/
//! <domain>.po`, one first-level subdirectory per locale), parses every
//! catalog, and assembles the single JSON file the runtime engine loads.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use glossa_i18n::po::PoParseError;
use glossa_i18n::{CatalogError, TranslationCatalog, parse_po};

/// Errors raised while compiling a locale tree
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
	#[error("locale dir '{path}' is not usable: {source}")]
	LocaleDir {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("no locales found in '{0}'")]
	NoLocales(PathBuf),
	#[error("failed to read '{path}': {source}")]
	Read {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse '{path}': {source}")]
	Po {
		path: PathBuf,
		source: PoParseError,
	},
	#[error(transparent)]
	Catalog(#[from] CatalogError),
	#[error("failed to write '{path}': {source}")]
	Write {
		path: PathBuf,
		source: std::io::Error,
	},
}

/// One compiled locale, for progress reporting
pub struct CompiledLocale {
	pub name: String,
	pub messages: usize,
}

/// Compile every locale under `locale_dir` into one catalog file
///
/// Returns the compiled locales in deterministic (sorted) order.
pub fn compile(
	locale_dir: &Path,
	domain: &str,
	output: &Path,
	pattern: &str,
) -> Result<Vec<CompiledLocale>, CompileError> {
	let locales = scan_locales(locale_dir)?;
	if locales.is_empty() {
		return Err(CompileError::NoLocales(locale_dir.to_path_buf()));
	}

	let mut catalog = TranslationCatalog::new(pattern);
	let mut compiled = Vec::with_capacity(locales.len());

	for locale in locales {
		let po_path = locale_dir
			.join(&locale)
			.join("LC_MESSAGES")
			.join(format!("{domain}.po"));

		let file = File::open(&po_path).map_err(|source| CompileError::Read {
			path: po_path.clone(),
			source,
		})?;
		let entry = parse_po(file).map_err(|source| CompileError::Po {
			path: po_path,
			source,
		})?;

		compiled.push(CompiledLocale {
			name: locale.clone(),
			messages: entry.len(),
		});
		catalog.add_locale(locale, entry);
	}

	catalog.validate()?;

	let json = serde_json::to_string_pretty(&catalog).map_err(CatalogError::from)?;
	fs::write(output, json).map_err(|source| CompileError::Write {
		path: output.to_path_buf(),
		source,
	})?;

	Ok(compiled)
}

/// First-level subdirectories of the locale dir, sorted by name
fn scan_locales(locale_dir: &Path) -> Result<Vec<String>, CompileError> {
	let entries = fs::read_dir(locale_dir).map_err(|source| CompileError::LocaleDir {
		path: locale_dir.to_path_buf(),
		source,
	})?;

	let mut locales = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|source| CompileError::LocaleDir {
			path: locale_dir.to_path_buf(),
			source,
		})?;
		if entry.path().is_dir() {
			locales.push(entry.file_name().to_string_lossy().into_owned());
		}
	}
	locales.sort_unstable();
	Ok(locales)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const GERMAN_PO: &str = r#"
msgid ""
msgstr "Plural-Forms: nplurals=2; plural=n != 1;\n"

msgid "flower"
msgid_plural "flowers"
msgstr[0] "Blume"
msgstr[1] "Blumen"

msgid "first"
msgstr "erster"
"#;

	fn write_po(root: &Path, locale: &str, content: &str) {
		let dir = root.join(locale).join("LC_MESSAGES");
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("messages.po"), content).unwrap();
	}

	#[rstest]
	fn test_compile_builds_loadable_catalog() {
		// Arrange
		let tmp = tempfile::tempdir().unwrap();
		write_po(tmp.path(), "de_DE", GERMAN_PO);
		let output = tmp.path().join("translations.json");

		// Act
		let compiled = compile(
			tmp.path(),
			"messages",
			&output,
			glossa_i18n::DEFAULT_PATTERN,
		)
		.unwrap();

		// Assert: the output round-trips through the runtime loader
		assert_eq!(compiled.len(), 1);
		assert_eq!(compiled[0].name, "de_DE");
		assert_eq!(compiled[0].messages, 2);

		let catalog = TranslationCatalog::from_path(&output).unwrap();
		let translator = glossa_i18n::Translator::new(catalog, "de_DE").unwrap();
		assert_eq!(translator.translate_plural("flower", "flowers", 5, &[]), "Blumen");
		assert_eq!(translator.translate("first", &[]), "erster");
	}

	#[rstest]
	fn test_compile_sorts_locales_deterministically() {
		// Arrange
		let tmp = tempfile::tempdir().unwrap();
		write_po(tmp.path(), "ru_RU", GERMAN_PO);
		write_po(tmp.path(), "de_DE", GERMAN_PO);
		let output = tmp.path().join("translations.json");

		// Act
		let compiled = compile(
			tmp.path(),
			"messages",
			&output,
			glossa_i18n::DEFAULT_PATTERN,
		)
		.unwrap();

		// Assert
		let names: Vec<&str> = compiled.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["de_DE", "ru_RU"]);
	}

	#[rstest]
	fn test_compile_fails_when_no_locales_found() {
		// Arrange
		let tmp = tempfile::tempdir().unwrap();
		let output = tmp.path().join("translations.json");

		// Act
		let result = compile(
			tmp.path(),
			"messages",
			&output,
			glossa_i18n::DEFAULT_PATTERN,
		);

		// Assert
		assert!(matches!(result, Err(CompileError::NoLocales(_))));
	}

	#[rstest]
	fn test_compile_fails_when_po_file_missing() {
		// Arrange: locale dir exists but has no .po for the domain
		let tmp = tempfile::tempdir().unwrap();
		fs::create_dir_all(tmp.path().join("de_DE").join("LC_MESSAGES")).unwrap();
		let output = tmp.path().join("translations.json");

		// Act
		let result = compile(
			tmp.path(),
			"messages",
			&output,
			glossa_i18n::DEFAULT_PATTERN,
		);

		// Assert
		assert!(matches!(result, Err(CompileError::Read { .. })));
	}

	#[rstest]
	fn test_compile_rejects_empty_pattern() {
		// Arrange
		let tmp = tempfile::tempdir().unwrap();
		write_po(tmp.path(), "de_DE", GERMAN_PO);
		let output = tmp.path().join("translations.json");

		// Act
		let result = compile(tmp.path(), "messages", &output, "");

		// Assert
		assert!(matches!(result, Err(CompileError::Catalog(_))));
	}
}
