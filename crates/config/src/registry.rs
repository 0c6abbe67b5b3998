//! Section registries: one typed reader per section header.
//!
//! A [`ConfigRegistry`] loads a file and builds a reader for every header in
//! document order through a [`SectionFactories`] table. A [`DynamicRegistry`]
//! additionally splits readers into static sections (declared names, looked up
//! by name) and dynamic sections (operator-chosen names, addressed by position).

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::Encoding;
use regex::Regex;

use crate::document::{ConfigDocument, ConfigSource};
use crate::error::{ConfigError, Result};
use crate::section::{FieldReport, GenericSection, Section, SectionReader};

/// Builds a boxed section from a reader.
pub type SectionConstructor = Box<dyn Fn(SectionReader) -> Box<dyn Section> + Send + Sync>;

fn boxed<F, S>(ctor: F) -> SectionConstructor
where
	F: Fn(SectionReader) -> S + Send + Sync + 'static,
	S: Section,
{
	Box::new(move |reader| -> Box<dyn Section> { Box::new(ctor(reader)) })
}

/// Maps section names to constructors.
///
/// Resolution order: exact names, then patterns in registration order, then the
/// fallback. A name nothing matches produces no reader.
#[derive(Default)]
pub struct SectionFactories {
	exact: Vec<(String, SectionConstructor)>,
	patterns: Vec<(Regex, SectionConstructor)>,
	fallback: Option<SectionConstructor>,
}

impl SectionFactories {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn exact<F, S>(mut self, name: impl Into<String>, ctor: F) -> Self
	where
		F: Fn(SectionReader) -> S + Send + Sync + 'static,
		S: Section,
	{
		self.exact.push((name.into(), boxed(ctor)));
		self
	}

	/// Registers a constructor for names matching `pattern` in full.
	pub fn pattern<F, S>(mut self, pattern: &str, ctor: F) -> Result<Self>
	where
		F: Fn(SectionReader) -> S + Send + Sync + 'static,
		S: Section,
	{
		let regex = Regex::new(&format!("^(?:{pattern})$"))?;
		self.patterns.push((regex, boxed(ctor)));
		Ok(self)
	}

	pub fn fallback<F, S>(mut self, ctor: F) -> Self
	where
		F: Fn(SectionReader) -> S + Send + Sync + 'static,
		S: Section,
	{
		self.fallback = Some(boxed(ctor));
		self
	}

	/// Uses [`GenericSection`] for every otherwise unmatched name.
	pub fn generic_fallback(self) -> Self {
		self.fallback(GenericSection::new)
	}

	pub fn resolve(&self, name: &str) -> Option<&SectionConstructor> {
		self.exact
			.iter()
			.find(|(exact, _)| exact == name)
			.map(|(_, ctor)| ctor)
			.or_else(|| {
				self.patterns
					.iter()
					.find(|(regex, _)| regex.is_match(name))
					.map(|(_, ctor)| ctor)
			})
			.or(self.fallback.as_ref())
	}

	pub fn build(&self, reader: SectionReader) -> Option<Box<dyn Section>> {
		self.resolve(reader.name()).map(|ctor| ctor(reader))
	}
}

impl fmt::Debug for SectionFactories {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SectionFactories")
			.field("exact", &self.exact.iter().map(|(name, _)| name).collect::<Vec<_>>())
			.field(
				"patterns",
				&self.patterns.iter().map(|(re, _)| re.as_str()).collect::<Vec<_>>(),
			)
			.field("fallback", &self.fallback.is_some())
			.finish()
	}
}

/// Factories plus the sections a document must contain.
#[derive(Debug, Default)]
pub struct Schema {
	factories: SectionFactories,
	mandatory: Vec<String>,
}

impl Schema {
	pub fn new(factories: SectionFactories) -> Self {
		Self {
			factories,
			mandatory: Vec::new(),
		}
	}

	pub fn mandatory(mut self, names: impl IntoIterator<Item: Into<String>>) -> Self {
		self.mandatory.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn factories(&self) -> &SectionFactories {
		&self.factories
	}

	pub fn mandatory_sections(&self) -> &[String] {
		&self.mandatory
	}
}

/// Loads a configuration file and exposes one reader per section header.
#[derive(Debug)]
pub struct ConfigRegistry {
	source: ConfigSource,
	schema: Schema,
	document: Arc<ConfigDocument>,
	sections: Vec<Box<dyn Section>>,
}

impl ConfigRegistry {
	/// Binds a registry to `path`. The containing directory must already exist.
	pub fn new(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
		Ok(Self::from_source(ConfigSource::new(path)?, schema))
	}

	pub fn from_source(source: ConfigSource, schema: Schema) -> Self {
		Self {
			source,
			schema,
			document: Arc::default(),
			sections: Vec::new(),
		}
	}

	pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
		self.source = self.source.with_encoding(encoding);
		self
	}

	/// The resolved absolute file name.
	pub fn path(&self) -> &Path {
		self.source.path()
	}

	pub fn source(&self) -> &ConfigSource {
		&self.source
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// Checks the bound file against the line grammar.
	pub fn is_valid_file(&self) -> Result<bool> {
		self.source.is_valid_file()
	}

	/// Reads the file and rebuilds every reader.
	///
	/// On failure the previously loaded state stays in place.
	pub fn load_file(&mut self) -> Result<()> {
		let document = self.source.load()?;
		self.load_document(document);
		Ok(())
	}

	/// Replaces the current document and rebuilds every reader from it.
	pub fn load_document(&mut self, document: ConfigDocument) {
		let document = Arc::new(document);
		let sections = build_sections(&self.schema.factories, &document);
		tracing::debug!(
			path = %self.source.path().display(),
			sections = sections.len(),
			"built section readers"
		);
		self.document = document;
		self.sections = sections;
	}

	pub fn document(&self) -> &Arc<ConfigDocument> {
		&self.document
	}

	/// Readers in document order.
	pub fn sections(&self) -> impl Iterator<Item = &dyn Section> + '_ {
		self.sections.iter().map(|section| &**section as &dyn Section)
	}

	pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.sections.iter().map(|section| section.name())
	}

	pub fn len(&self) -> usize {
		self.sections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	pub fn has_section(&self, name: &str) -> bool {
		self.section(name).is_some()
	}

	/// First reader with this name.
	pub fn section(&self, name: &str) -> Option<&dyn Section> {
		self.sections().find(|section| section.name() == name)
	}

	pub fn section_as<T: Section>(&self, name: &str) -> Option<&T> {
		self.section(name)?.downcast_ref::<T>()
	}

	/// Mandatory section names with no reader.
	pub fn missing_mandatory(&self) -> Vec<&str> {
		self.schema
			.mandatory
			.iter()
			.map(String::as_str)
			.filter(|name| !self.has_section(name))
			.collect()
	}

	/// True when every mandatory section exists and every reader is valid.
	pub fn is_valid(&self) -> bool {
		self.missing_mandatory().is_empty() && self.sections.iter().all(|section| section.is_valid())
	}

	/// Reports mandatory-section presence followed by every reader's field reports.
	pub fn validate(&self) -> Vec<FieldReport> {
		let mut reports: Vec<FieldReport> = self
			.schema
			.mandatory
			.iter()
			.map(|name| {
				let present = self.has_section(name);
				FieldReport {
					section: name.clone(),
					field: "section".to_string(),
					valid: present,
					message: if present {
						"mandatory section present".to_string()
					} else {
						"mandatory section missing".to_string()
					},
				}
			})
			.collect();
		for section in &self.sections {
			reports.extend(section.validate());
		}
		reports
	}
}

fn build_sections(factories: &SectionFactories, document: &Arc<ConfigDocument>) -> Vec<Box<dyn Section>> {
	document
		.section_names()
		.filter_map(|name| {
			let section = factories.build(SectionReader::new(name, Arc::clone(document)));
			if section.is_none() {
				tracing::warn!(section = name, "no section factory matches; section ignored");
			}
			section
		})
		.collect()
}

/// A [`ConfigRegistry`] whose sections are split into static and dynamic ones.
///
/// Static sections carry names declared up front. Every other section is
/// dynamic and is reachable only through [`DynamicRegistry::dynamic_section`].
#[derive(Debug)]
pub struct DynamicRegistry {
	base: ConfigRegistry,
	static_names: Vec<String>,
	static_slots: Vec<usize>,
	dynamic_slots: Vec<usize>,
}

impl DynamicRegistry {
	pub fn new(
		path: impl AsRef<Path>,
		schema: Schema,
		static_names: impl IntoIterator<Item: Into<String>>,
	) -> Result<Self> {
		Ok(Self::from_registry(ConfigRegistry::new(path, schema)?, static_names))
	}

	pub fn from_registry(base: ConfigRegistry, static_names: impl IntoIterator<Item: Into<String>>) -> Self {
		let mut registry = Self {
			base,
			static_names: static_names.into_iter().map(Into::into).collect(),
			static_slots: Vec::new(),
			dynamic_slots: Vec::new(),
		};
		registry.partition();
		registry
	}

	pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
		self.base = self.base.with_encoding(encoding);
		self
	}

	pub fn load_file(&mut self) -> Result<()> {
		self.base.load_file()?;
		self.partition();
		Ok(())
	}

	pub fn load_document(&mut self, document: ConfigDocument) {
		self.base.load_document(document);
		self.partition();
	}

	fn partition(&mut self) {
		let (static_slots, dynamic_slots): (Vec<usize>, Vec<usize>) = (0..self.base.sections.len())
			.partition(|&slot| self.is_static_name(self.base.sections[slot].name()));
		tracing::debug!(
			static_sections = static_slots.len(),
			dynamic_sections = dynamic_slots.len(),
			"partitioned sections"
		);
		self.static_slots = static_slots;
		self.dynamic_slots = dynamic_slots;
	}

	pub fn is_static_name(&self, name: &str) -> bool {
		self.static_names.iter().any(|declared| declared == name)
	}

	pub fn static_names(&self) -> &[String] {
		&self.static_names
	}

	/// The underlying registry, which still answers name lookups for every section.
	pub fn registry(&self) -> &ConfigRegistry {
		&self.base
	}

	pub fn path(&self) -> &Path {
		self.base.path()
	}

	pub fn document(&self) -> &Arc<ConfigDocument> {
		self.base.document()
	}

	pub fn is_valid_file(&self) -> Result<bool> {
		self.base.is_valid_file()
	}

	pub fn is_valid(&self) -> bool {
		self.base.is_valid()
	}

	pub fn validate(&self) -> Vec<FieldReport> {
		self.base.validate()
	}

	/// Every reader in document order, static and dynamic alike.
	pub fn sections(&self) -> impl Iterator<Item = &dyn Section> + '_ {
		self.base.sections()
	}

	pub fn static_sections(&self) -> impl Iterator<Item = &dyn Section> + '_ {
		self.static_slots
			.iter()
			.map(|&slot| &*self.base.sections[slot] as &dyn Section)
	}

	pub fn dynamic_sections(&self) -> impl Iterator<Item = &dyn Section> + '_ {
		self.dynamic_slots
			.iter()
			.map(|&slot| &*self.base.sections[slot] as &dyn Section)
	}

	pub fn dynamic_count(&self) -> usize {
		self.dynamic_slots.len()
	}

	/// Static section by name. Dynamic sections are never found here.
	pub fn section(&self, name: &str) -> Option<&dyn Section> {
		self.static_sections().find(|section| section.name() == name)
	}

	pub fn has_section(&self, name: &str) -> bool {
		self.section(name).is_some()
	}

	pub fn section_as<T: Section>(&self, name: &str) -> Option<&T> {
		self.section(name)?.downcast_ref::<T>()
	}

	/// The `index`-th dynamic section in document order.
	pub fn dynamic_section(&self, index: usize) -> Result<&dyn Section> {
		self.dynamic_slots
			.get(index)
			.map(|&slot| &*self.base.sections[slot] as &dyn Section)
			.ok_or(ConfigError::DynamicIndexOutOfRange {
				index,
				count: self.dynamic_slots.len(),
			})
	}

	/// The `index`-th dynamic section as `T`, or `None` when it has another type.
	pub fn dynamic_section_as<T: Section>(&self, index: usize) -> Result<Option<&T>> {
		Ok(self.dynamic_section(index)?.downcast_ref::<T>())
	}
}
