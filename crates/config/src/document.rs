//! Line buffer and section index for a configuration file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};

use crate::decode::DecodedLines;
use crate::error::{ConfigError, Result};

/// The non-blank lines of a configuration file plus the positions of its section headers.
///
/// Built in one pass and never mutated afterwards. Reloading a file produces a new
/// document rather than updating an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
	lines: Vec<String>,
	sections: Vec<usize>,
}

impl ConfigDocument {
	/// Builds a document from in-memory text.
	pub fn parse(text: &str) -> Self {
		let text = text.strip_prefix('\u{feff}').unwrap_or(text);
		let mut document = Self::default();
		for line in text.lines() {
			document.push(line.to_owned());
		}
		document
	}

	pub(crate) fn read<R: Read>(reader: R, encoding: &'static Encoding) -> std::io::Result<Self> {
		let mut document = Self::default();
		for line in DecodedLines::new(reader, encoding) {
			document.push(line?);
		}
		Ok(document)
	}

	fn push(&mut self, line: String) {
		if is_blank(&line) {
			return;
		}
		if line.starts_with('[') {
			self.sections.push(self.lines.len());
		}
		self.lines.push(line);
	}

	/// All retained lines in file order.
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	pub fn line(&self, position: usize) -> Option<&str> {
		self.lines.get(position).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Buffer positions of every line starting with `[`, strictly increasing.
	pub fn section_index(&self) -> &[usize] {
		&self.sections
	}

	pub fn section_count(&self) -> usize {
		self.sections.len()
	}

	/// Header names in document order, one per recorded header (repeats included).
	pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.sections
			.iter()
			.map(|&position| header_name(&self.lines[position]))
	}
}

/// Returns true for lines that are empty or whitespace only.
pub(crate) fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

/// Text between the leading `[` and an optional trailing `]`.
pub(crate) fn header_name(line: &str) -> &str {
	let inner = line.strip_prefix('[').unwrap_or(line);
	inner.strip_suffix(']').unwrap_or(inner)
}

/// A resolved configuration file location and the codec used to read it.
#[derive(Debug, Clone)]
pub struct ConfigSource {
	path: PathBuf,
	encoding: &'static Encoding,
}

impl ConfigSource {
	/// Resolves `path` to an absolute location.
	///
	/// The containing directory must exist now. The file itself is only required
	/// when [`ConfigSource::load`] runs.
	pub fn new(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if path.as_os_str().is_empty() {
			return Err(ConfigError::InvalidArgument(
				"configuration path is empty".to_string(),
			));
		}
		let path = std::path::absolute(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let Some(dir) = path.parent() else {
			return Err(ConfigError::InvalidArgument(format!(
				"{} does not name a file",
				path.display()
			)));
		};
		if !dir.is_dir() {
			return Err(ConfigError::DirectoryNotFound(dir.to_path_buf()));
		}
		Ok(Self {
			path,
			encoding: UTF_8,
		})
	}

	/// Reads the file with `encoding` unless a BOM says otherwise.
	pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
		self.encoding = encoding;
		self
	}

	/// The resolved absolute file name.
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn encoding(&self) -> &'static Encoding {
		self.encoding
	}

	/// Reads the file into a fresh [`ConfigDocument`].
	pub fn load(&self) -> Result<ConfigDocument> {
		let file = File::open(&self.path).map_err(|e| ConfigError::from_io(&self.path, e))?;
		let document =
			ConfigDocument::read(file, self.encoding).map_err(|e| ConfigError::from_io(&self.path, e))?;
		tracing::debug!(
			path = %self.path.display(),
			encoding = self.encoding.name(),
			lines = document.len(),
			sections = document.section_count(),
			"loaded configuration"
		);
		Ok(document)
	}

	/// Checks the file against the line grammar without keeping its contents.
	pub fn is_valid_file(&self) -> Result<bool> {
		crate::validate::is_valid_file_with(&self.path, self.encoding)
	}
}
