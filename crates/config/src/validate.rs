//! Well-formedness check for configuration files.
//!
//! Every non-blank line must be either a section header whose name is ASCII
//! alphanumeric, or a `key=value` pair whose key is ASCII alphanumeric. There is
//! no other legal line shape. Files are streamed; nothing is retained.

use std::fs::File;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::decode::DecodedLines;
use crate::document::is_blank;
use crate::error::{ConfigError, Result};

/// Shape of a single configuration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
	/// Empty or whitespace-only line.
	Blank,
	/// `[name]` with an alphanumeric name.
	Header(&'a str),
	/// `key=value` with an alphanumeric key. The value is verbatim and may be empty.
	Entry { key: &'a str, value: &'a str },
	/// Anything else.
	Invalid,
}

/// Classifies one line according to the file grammar.
pub fn classify_line(line: &str) -> LineKind<'_> {
	if is_blank(line) {
		return LineKind::Blank;
	}
	if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
		let name = &line[1..line.len() - 1];
		return if is_identifier(name) {
			LineKind::Header(name)
		} else {
			LineKind::Invalid
		};
	}
	match line.split_once('=') {
		Some((key, value)) if is_identifier(key) => LineKind::Entry { key, value },
		_ => LineKind::Invalid,
	}
}

/// True for non-empty strings made only of ASCII letters and digits.
pub fn is_identifier(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Checks in-memory text against the line grammar.
pub fn is_valid_text(text: &str) -> bool {
	let text = text.strip_prefix('\u{feff}').unwrap_or(text);
	text.lines()
		.all(|line| classify_line(line) != LineKind::Invalid)
}

/// Checks a UTF-8 (or BOM-marked) file against the line grammar.
pub fn is_valid_file(path: impl AsRef<Path>) -> Result<bool> {
	is_valid_file_with(path, UTF_8)
}

/// Checks a file decoded with `encoding` against the line grammar.
///
/// Stops at the first offending line. A missing file is an error rather than
/// an invalid file.
pub fn is_valid_file_with(path: impl AsRef<Path>, encoding: &'static Encoding) -> Result<bool> {
	let path = path.as_ref();
	if path.as_os_str().is_empty() {
		return Err(ConfigError::InvalidArgument(
			"configuration path is empty".to_string(),
		));
	}
	let file = File::open(path).map_err(|e| ConfigError::from_io(path, e))?;
	for (number, line) in DecodedLines::new(file, encoding).enumerate() {
		let line = line.map_err(|e| ConfigError::from_io(path, e))?;
		if classify_line(&line) == LineKind::Invalid {
			tracing::trace!(path = %path.display(), line = number + 1, "rejected configuration line");
			return Ok(false);
		}
	}
	Ok(true)
}
