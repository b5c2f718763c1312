//! Gettext `.po` catalog parser
//!
//! Parses the subset of the `.po` format needed to compile translation
//! catalogs: `msgid`, `msgid_plural`, `msgstr`, `msgstr[n]`, quoted
//! continuation lines, comments, and the usual escape sequences. The header
//! entry (empty `msgid`) contributes the `Plural-Forms:` value, which
//! becomes the locale's plural rule string.
//!
//! Context-qualified entries (`msgctxt`) have no counterpart in the runtime
//! data format and are skipped.

use std::io::{BufRead, BufReader, Read};

use crate::catalog::LocaleEntry;

/// Errors that can occur while parsing a `.po` file
#[derive(Debug, thiserror::Error)]
pub enum PoParseError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("parse error at line {line}: {message}")]
	Malformed { line: usize, message: String },
	#[error("header has no Plural-Forms entry")]
	MissingPluralForms,
}

/// Which field a bare continuation string appends to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
	Msgid,
	MsgidPlural,
	Msgstr(usize),
}

/// One entry under construction
#[derive(Debug, Default)]
struct PoEntry {
	has_context: bool,
	msgid: Option<String>,
	msgid_plural: Option<String>,
	msgstr: Vec<String>,
}

impl PoEntry {
	fn started(&self) -> bool {
		self.has_context || self.msgid.is_some()
	}

	fn append(&mut self, field: Field, text: &str) {
		match field {
			Field::Msgid => {
				self.msgid.get_or_insert_with(String::new).push_str(text);
			}
			Field::MsgidPlural => {
				self.msgid_plural
					.get_or_insert_with(String::new)
					.push_str(text);
			}
			Field::Msgstr(index) => {
				while self.msgstr.len() <= index {
					self.msgstr.push(String::new());
				}
				self.msgstr[index].push_str(text);
			}
		}
	}
}

/// Parse a `.po` catalog into a [`LocaleEntry`]
///
/// The header's `Plural-Forms:` value becomes the locale's rule string;
/// a header without one is an error.
///
/// # Examples
///
/// ```
/// use glossa_i18n::po::parse_po;
///
/// let po = r#"
/// msgid ""
/// msgstr "Plural-Forms: nplurals=2; plural=n != 1;\n"
///
/// msgid "flower"
/// msgid_plural "flowers"
/// msgstr[0] "Blume"
/// msgstr[1] "Blumen"
/// "#;
///
/// let locale = parse_po(po.as_bytes()).unwrap();
/// assert_eq!(locale.plural_forms(), "nplurals=2; plural=n != 1;");
/// ```
pub fn parse_po<R: Read>(reader: R) -> Result<LocaleEntry, PoParseError> {
	let buf_reader = BufReader::new(reader);

	let mut plural_forms: Option<String> = None;
	let mut entries: Vec<PoEntry> = Vec::new();
	let mut current = PoEntry::default();
	let mut field: Option<Field> = None;

	for (number, line) in buf_reader.lines().enumerate() {
		let line = line?;
		let trimmed = line.trim();

		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}

		if keyword_value(trimmed, "msgctxt").is_some() {
			// Contexts are parsed for entry boundaries but not retained
			if current.started() {
				entries.push(std::mem::take(&mut current));
			}
			current.has_context = true;
			field = None;
		} else if let Some(value) = keyword_value(trimmed, "msgid_plural") {
			current.msgid_plural = Some(unescape(&value));
			field = Some(Field::MsgidPlural);
		} else if let Some(value) = keyword_value(trimmed, "msgid") {
			if current.msgid.is_some() {
				entries.push(std::mem::take(&mut current));
			}
			current.msgid = Some(unescape(&value));
			field = Some(Field::Msgid);
		} else if let Some((index, value)) = indexed_msgstr(trimmed) {
			current.append(Field::Msgstr(index), &unescape(&value));
			field = Some(Field::Msgstr(index));
		} else if let Some(value) = keyword_value(trimmed, "msgstr") {
			current.msgstr = vec![unescape(&value)];
			field = Some(Field::Msgstr(0));
		} else if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
			let value = unescape(&trimmed[1..trimmed.len() - 1]);
			match field {
				Some(field) => current.append(field, &value),
				None => {
					return Err(PoParseError::Malformed {
						line: number + 1,
						message: "continuation string outside an entry".to_string(),
					});
				}
			}
		} else {
			return Err(PoParseError::Malformed {
				line: number + 1,
				message: format!("unrecognized line '{trimmed}'"),
			});
		}
	}
	if current.started() {
		entries.push(current);
	}

	for entry in &entries {
		// The header entry carries metadata, not a translation
		if entry.msgid.as_deref() == Some("") {
			if let Some(value) = header_value(entry.msgstr.first().map_or("", String::as_str)) {
				plural_forms = Some(value);
			}
		}
	}

	let mut locale = LocaleEntry::new(plural_forms.ok_or(PoParseError::MissingPluralForms)?);

	for entry in entries {
		let Some(msgid) = entry.msgid else { continue };
		if msgid.is_empty() || entry.has_context {
			continue;
		}
		match entry.msgid_plural {
			Some(msgid_plural) => locale.add_plural(msgid, msgid_plural, entry.msgstr),
			None => {
				if let Some(translation) = entry.msgstr.into_iter().next() {
					locale.add_singular(msgid, translation);
				}
			}
		}
	}

	Ok(locale)
}

/// Extract the `Plural-Forms:` value from a header msgstr
fn header_value(header: &str) -> Option<String> {
	header.lines().find_map(|line| {
		let (name, value) = line.split_once(':')?;
		if name.trim().eq_ignore_ascii_case("plural-forms") {
			Some(value.trim().to_string())
		} else {
			None
		}
	})
}

/// Match `<keyword> "<value>"`, returning the raw quoted value
fn keyword_value(line: &str, keyword: &str) -> Option<String> {
	let rest = line.strip_prefix(keyword)?.trim_start();
	if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') {
		Some(rest[1..rest.len() - 1].to_string())
	} else {
		None
	}
}

/// Match `msgstr[<index>] "<value>"`
fn indexed_msgstr(line: &str) -> Option<(usize, String)> {
	let rest = line.strip_prefix("msgstr[")?;
	let close = rest.find(']')?;
	let index: usize = rest[..close].parse().ok()?;
	let value = rest[close + 1..].trim_start();
	if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
		Some((index, value[1..value.len() - 1].to_string()))
	} else {
		None
	}
}

/// Resolve `\n`, `\t`, `\r`, `\"`, and `\\` escape sequences
fn unescape(raw: &str) -> String {
	let mut result = String::with_capacity(raw.len());
	let mut chars = raw.chars();

	while let Some(ch) = chars.next() {
		if ch != '\\' {
			result.push(ch);
			continue;
		}
		match chars.next() {
			Some('n') => result.push('\n'),
			Some('t') => result.push('\t'),
			Some('r') => result.push('\r'),
			Some('"') => result.push('"'),
			Some('\\') => result.push('\\'),
			Some(other) => {
				result.push('\\');
				result.push(other);
			}
			None => result.push('\\'),
		}
	}

	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const HEADER: &str = r#"
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=n != 1;\n"
"#;

	#[rstest]
	fn test_parse_singular_entries() {
		// Arrange
		let po = format!(
			"{HEADER}
msgid \"first\"
msgstr \"erster\"

msgid \"Hello\"
msgstr \"Hallo\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();

		// Assert
		assert_eq!(locale.len(), 2);
		assert_eq!(
			locale.entry("first").unwrap().resolve("first").unwrap(),
			crate::catalog::ResolvedEntry::Singular("erster")
		);
	}

	#[rstest]
	fn test_parse_plural_entry_keeps_source_plural() {
		// Arrange
		let po = format!(
			"{HEADER}
msgid \"flower\"
msgid_plural \"flowers\"
msgstr[0] \"Blume\"
msgstr[1] \"Blumen\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();
		let resolved = locale.entry("flower").unwrap().resolve("flower").unwrap();

		// Assert
		assert_eq!(
			resolved,
			crate::catalog::ResolvedEntry::Plural {
				source_plural: "flowers",
				forms: vec!["Blume", "Blumen"],
			}
		);
	}

	#[rstest]
	fn test_plural_forms_extracted_from_header() {
		// Act
		let locale = parse_po(HEADER.as_bytes()).unwrap();

		// Assert
		assert_eq!(locale.plural_forms(), "nplurals=2; plural=n != 1;");
		assert!(locale.is_empty());
	}

	#[rstest]
	fn test_missing_plural_forms_header_is_an_error() {
		// Arrange
		let po = "
msgid \"\"
msgstr \"Content-Type: text/plain\\n\"

msgid \"first\"
msgstr \"erster\"
";

		// Act
		let result = parse_po(po.as_bytes());

		// Assert
		assert!(matches!(result, Err(PoParseError::MissingPluralForms)));
	}

	#[rstest]
	fn test_multiline_strings_are_joined() {
		// Arrange
		let po = format!(
			"{HEADER}
msgid \"a long \"
\"message\"
msgstr \"eine lange \"
\"Nachricht\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();

		// Assert
		assert!(locale.entry("a long message").is_some());
	}

	#[rstest]
	fn test_escape_sequences_resolved() {
		// Arrange
		let po = format!(
			"{HEADER}
msgid \"Line 1\\nLine 2\\tTabbed\"
msgstr \"Zeile 1\\nZeile 2\\tTab\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();

		// Assert
		assert!(locale.entry("Line 1\nLine 2\tTabbed").is_some());
	}

	#[rstest]
	fn test_comments_are_skipped() {
		// Arrange
		let po = format!(
			"{HEADER}
# translator comment
#. extracted comment
#: somewhere.rs:10
#, fuzzy
msgid \"Hello\"
msgstr \"Hallo\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();

		// Assert
		assert!(locale.entry("Hello").is_some());
	}

	#[rstest]
	fn test_context_entries_are_skipped() {
		// Arrange
		let po = format!(
			"{HEADER}
msgctxt \"menu\"
msgid \"File\"
msgstr \"Datei\"

msgid \"Hello\"
msgstr \"Hallo\"
"
		);

		// Act
		let locale = parse_po(po.as_bytes()).unwrap();

		// Assert
		assert!(locale.entry("File").is_none());
		assert!(locale.entry("Hello").is_some());
	}

	#[rstest]
	fn test_unrecognized_line_reports_position() {
		// Arrange
		let po = "msgid \"x\"\nwhat is this\n";

		// Act
		let result = parse_po(po.as_bytes());

		// Assert
		assert!(matches!(
			result,
			Err(PoParseError::Malformed { line: 2, .. })
		));
	}

	#[rstest]
	fn test_unescape() {
		// Act & Assert
		assert_eq!(unescape("Hello\\nWorld"), "Hello\nWorld");
		assert_eq!(unescape("Tab\\there"), "Tab\there");
		assert_eq!(unescape("Quote\\\"here"), "Quote\"here");
		assert_eq!(unescape("Backslash\\\\here"), "Backslash\\here");
	}
}
