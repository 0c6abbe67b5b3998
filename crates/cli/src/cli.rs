use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Check and query sectioned key/value configuration files")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Encoding used when the file carries no BOM (utf-8, utf-16le, windows-1252, ...)
	#[arg(long, short = 'e', global = true, default_value = "utf-8")]
	pub encoding: String,

	/// Verbose logging
	#[arg(long, short, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Check every line against the file grammar
	Check {
		/// Configuration file
		file: PathBuf,
	},
	/// List section headers with their line ranges
	Sections {
		/// Configuration file
		file: PathBuf,
	},
	/// Read one value from a section
	Get {
		/// Configuration file
		file: PathBuf,
		/// Section name, without brackets
		section: String,
		/// Key inside the section
		key: String,
		/// Conversion applied to the raw value
		#[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
		kind: ValueKind,
		/// Separator for list values
		#[arg(long, default_value_t = ';')]
		separator: char,
	},
	/// Load the file and report every section's field checks
	Validate {
		/// Configuration file
		file: PathBuf,
		/// Section names declared up front (comma-separated); others are dynamic
		#[arg(long = "static", value_delimiter = ',')]
		static_names: Vec<String>,
		/// Sections that must be present (comma-separated)
		#[arg(long, value_delimiter = ',')]
		mandatory: Vec<String>,
	},
}

/// Typed conversions offered by `get`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
	String,
	Bool,
	Int,
	List,
	Regex,
	Duration,
}
