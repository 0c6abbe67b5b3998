//! Sectioned key/value configuration files.
//!
//! A configuration file is a sequence of lines, each either a section header or
//! a `key=value` pair:
//!
//! ```text
//! [General]
//! name=nightly
//!
//! [Backup1]
//! source=/srv/data
//! interval=01:00
//! exclude=*.tmp;*.log
//! ```
//!
//! Section and key names are ASCII letters and digits. Values run verbatim to
//! the end of the line. Blank lines are ignored; there are no comments, no
//! escapes and no nesting.
//!
//! # Layers
//!
//! - [`ConfigSource`] resolves the file and loads it into a [`ConfigDocument`]:
//!   the non-blank lines plus the positions of every header.
//! - [`validate`] checks a file against the line grammar without keeping it.
//! - [`find`] resolves section ranges and keys over a document.
//! - [`SectionReader`] offers typed getters for one section. Values that are
//!   missing or do not parse come back as `None`, never as errors.
//! - [`ConfigRegistry`] builds one [`Section`] per header through a
//!   [`SectionFactories`] table. [`DynamicRegistry`] additionally separates
//!   declared (static) sections from operator-named (dynamic) ones, which are
//!   addressed by position.
//!
//! # Example
//!
//! ```no_run
//! use quire_config::{DynamicRegistry, Schema, Section, SectionFactories};
//!
//! let schema = Schema::new(SectionFactories::new().generic_fallback()).mandatory(["General"]);
//! let mut registry = DynamicRegistry::new("/etc/backup/jobs.cfg", schema, ["General"])?;
//! registry.load_file()?;
//!
//! for index in 0..registry.dynamic_count() {
//! 	let job = registry.dynamic_section(index)?;
//! 	let interval = job.reader().get_duration("interval");
//! 	println!("{}: every {interval:?}", job.name());
//! }
//! # Ok::<(), quire_config::ConfigError>(())
//! ```

mod decode;
pub mod document;
pub mod error;
pub mod find;
pub mod registry;
pub mod section;
pub mod validate;
pub mod value;

pub use document::{ConfigDocument, ConfigSource};
pub use error::{ConfigError, Result};
pub use find::SectionRange;
pub use registry::{ConfigRegistry, DynamicRegistry, Schema, SectionConstructor, SectionFactories};
pub use section::{FieldReport, GenericSection, Section, SectionReader, Validation};
pub use validate::{is_valid_file, is_valid_file_with, is_valid_text};

/// Re-exported so callers can name codecs without depending on `encoding_rs` directly.
pub use encoding_rs::Encoding;
