//! Typed, validating access to one named section.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;

use crate::document::ConfigDocument;
use crate::find::{self, SectionRange};
use crate::validate::{self, LineKind};
use crate::value;

/// Typed getters over the lines of one section.
///
/// The reader holds the document of the load that created it and keeps
/// answering from that document after the owning registry reloads.
#[derive(Debug, Clone)]
pub struct SectionReader {
	name: String,
	document: Arc<ConfigDocument>,
}

impl SectionReader {
	pub fn new(name: impl Into<String>, document: Arc<ConfigDocument>) -> Self {
		Self {
			name: name.into(),
			document,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn document(&self) -> &Arc<ConfigDocument> {
		&self.document
	}

	/// Range of the first section with this name.
	pub fn range(&self) -> Option<SectionRange> {
		find::find_range(&self.document, &self.name)
	}

	/// Lines following the header, up to the next header.
	pub fn lines(&self) -> &[String] {
		match self.range() {
			Some(range) => &self.document.lines()[range.start + 1..range.end()],
			None => &[],
		}
	}

	/// `key=value` pairs in file order. Lines without `=` are skipped.
	pub fn entries(&self) -> Vec<(&str, &str)> {
		self.lines()
			.iter()
			.filter_map(|line| line.split_once('='))
			.collect()
	}

	pub fn try_read_value(&self, key: &str) -> Option<&str> {
		find::try_read_value(&self.document, &self.name, key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.try_read_value(key).is_some()
	}

	pub fn get_string(&self, key: &str) -> Option<&str> {
		self.try_read_value(key)
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.try_read_value(key).and_then(value::parse_bool)
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		self.try_read_value(key).and_then(value::parse_int)
	}

	/// Parses the trimmed value with [`FromStr`].
	pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
		self.try_read_value(key)?.trim().parse().ok()
	}

	/// `;`-separated list. Missing or empty values yield an empty list.
	pub fn get_list(&self, key: &str) -> Vec<String> {
		self.get_list_with(key, value::LIST_SEPARATOR)
	}

	pub fn get_list_with(&self, key: &str, separator: char) -> Vec<String> {
		self.try_read_value(key)
			.map(|raw| value::parse_list(raw, separator))
			.unwrap_or_default()
	}

	pub fn get_regex(&self, key: &str) -> Option<Regex> {
		self.try_read_value(key).and_then(value::parse_regex)
	}

	pub fn get_duration(&self, key: &str) -> Option<Duration> {
		self.try_read_value(key).and_then(value::parse_duration)
	}
}

/// Outcome of checking one field of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
	pub section: String,
	pub field: String,
	pub valid: bool,
	pub message: String,
}

impl fmt::Display for FieldReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let status = if self.valid { "ok" } else { "invalid" };
		write!(f, "[{}] {}: {status} ({})", self.section, self.field, self.message)
	}
}

/// Collects field reports for one section without stopping at the first failure.
#[derive(Debug)]
pub struct Validation {
	section: String,
	reports: Vec<FieldReport>,
}

impl Validation {
	pub fn new(section: &str) -> Self {
		Self {
			section: section.to_string(),
			reports: Vec::new(),
		}
	}

	pub fn check(&mut self, field: &str, valid: bool, message: impl Into<String>) -> &mut Self {
		self.reports.push(FieldReport {
			section: self.section.clone(),
			field: field.to_string(),
			valid,
			message: message.into(),
		});
		self
	}

	pub fn finish(self) -> Vec<FieldReport> {
		self.reports
	}
}

/// Upcast to [`Any`] so registries can hand out concrete section types.
pub trait AsAny: Any {
	fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// A concrete section type built on a [`SectionReader`].
///
/// Implementors define their own field rules in [`Section::validate`]. The
/// default [`Section::is_valid`] accepts a section when every report passes;
/// override it for rules that are not expressed as field reports.
pub trait Section: AsAny + fmt::Debug + Send + Sync {
	fn reader(&self) -> &SectionReader;

	fn name(&self) -> &str {
		self.reader().name()
	}

	/// Checks every field and reports each outcome.
	fn validate(&self) -> Vec<FieldReport>;

	fn is_valid(&self) -> bool {
		self.validate().iter().all(|report| report.valid)
	}
}

impl dyn Section {
	/// Returns the section as `T` if that is its concrete type.
	pub fn downcast_ref<T: Section>(&self) -> Option<&T> {
		AsAny::as_any(self).downcast_ref::<T>()
	}
}

/// Schema-less section: every body line must be a well-formed `key=value` pair.
#[derive(Debug, Clone)]
pub struct GenericSection {
	reader: SectionReader,
}

impl GenericSection {
	pub fn new(reader: SectionReader) -> Self {
		Self { reader }
	}
}

impl Section for GenericSection {
	fn reader(&self) -> &SectionReader {
		&self.reader
	}

	fn validate(&self) -> Vec<FieldReport> {
		let mut validation = Validation::new(self.name());
		validation.check(
			"name",
			validate::is_identifier(self.name()),
			"section name must be ASCII letters and digits",
		);
		for line in self.reader.lines() {
			match validate::classify_line(line) {
				LineKind::Entry { key, .. } => {
					validation.check(key, true, "well-formed entry");
				}
				_ => {
					validation.check(line, false, "expected key=value with an alphanumeric key");
				}
			}
		}
		validation.finish()
	}
}

#[cfg(test)]
mod tests;
