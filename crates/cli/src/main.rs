//! `quire` command-line tool.
//!
//! Thin wrapper over `quire-config`: grammar checks, section listings, typed
//! lookups and schema-less validation of a single file.

mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, ValueKind};
use quire_config::{
	ConfigRegistry, ConfigSource, DynamicRegistry, Encoding, Schema, SectionFactories, SectionReader, find,
};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let encoding = Encoding::for_label(cli.encoding.as_bytes())
		.with_context(|| format!("unknown encoding label '{}'", cli.encoding))?;
	let ok = run(&cli.command, encoding, &mut std::io::stdout().lock())?;
	Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes one subcommand, writing its report to `out`.
///
/// Returns `false` when the file is invalid or the requested value is absent.
fn run(command: &Command, encoding: &'static Encoding, out: &mut impl Write) -> anyhow::Result<bool> {
	match command {
		Command::Check { file } => check(file, encoding, out),
		Command::Sections { file } => sections(file, encoding, out),
		Command::Get {
			file,
			section,
			key,
			kind,
			separator,
		} => get(file, encoding, section, key, *kind, *separator, out),
		Command::Validate {
			file,
			static_names,
			mandatory,
		} => validate(file, encoding, static_names, mandatory, out),
	}
}

fn open(file: &Path, encoding: &'static Encoding) -> anyhow::Result<ConfigSource> {
	let source = ConfigSource::new(file).with_context(|| format!("cannot use {}", file.display()))?;
	Ok(source.with_encoding(encoding))
}

fn check(file: &Path, encoding: &'static Encoding, out: &mut impl Write) -> anyhow::Result<bool> {
	let source = open(file, encoding)?;
	let valid = source
		.is_valid_file()
		.with_context(|| format!("cannot check {}", source.path().display()))?;
	writeln!(
		out,
		"{}: {}",
		source.path().display(),
		if valid { "valid" } else { "invalid" }
	)?;
	Ok(valid)
}

fn sections(file: &Path, encoding: &'static Encoding, out: &mut impl Write) -> anyhow::Result<bool> {
	let source = open(file, encoding)?;
	let document = source
		.load()
		.with_context(|| format!("cannot load {}", source.path().display()))?;

	let index = document.section_index();
	for (slot, (name, &start)) in document.section_names().zip(index).enumerate() {
		let end = index.get(slot + 1).copied().unwrap_or(document.len());
		let shadowed = find::find_range(&document, name).is_some_and(|range| range.start != start);
		write!(out, "[{name}] line {start} ({} lines)", end - start)?;
		if shadowed {
			write!(out, " shadowed by earlier [{name}]")?;
		}
		writeln!(out)?;
	}
	Ok(true)
}

fn get(
	file: &Path,
	encoding: &'static Encoding,
	section: &str,
	key: &str,
	kind: ValueKind,
	separator: char,
	out: &mut impl Write,
) -> anyhow::Result<bool> {
	let source = open(file, encoding)?;
	let document = source
		.load()
		.with_context(|| format!("cannot load {}", source.path().display()))?;
	let reader = SectionReader::new(section, Arc::new(document));

	let value = match kind {
		ValueKind::String => reader.get_string(key).map(str::to_owned),
		ValueKind::Bool => reader.get_bool(key).map(|v| v.to_string()),
		ValueKind::Int => reader.get_int(key).map(|v| v.to_string()),
		ValueKind::Regex => reader.get_regex(key).map(|re| re.as_str().to_owned()),
		ValueKind::Duration => reader.get_duration(key).map(|d| format!("{d:?}")),
		ValueKind::List => {
			for entry in reader.get_list_with(key, separator) {
				writeln!(out, "{entry}")?;
			}
			return Ok(true);
		}
	};

	match value {
		Some(value) => {
			writeln!(out, "{value}")?;
			Ok(true)
		}
		None => {
			tracing::debug!(section, key, ?kind, "no value");
			writeln!(out, "(no value)")?;
			Ok(false)
		}
	}
}

fn validate(
	file: &Path,
	encoding: &'static Encoding,
	static_names: &[String],
	mandatory: &[String],
	out: &mut impl Write,
) -> anyhow::Result<bool> {
	let source = open(file, encoding)?;
	let schema = Schema::new(SectionFactories::new().generic_fallback()).mandatory(mandatory.iter().cloned());
	let mut registry =
		DynamicRegistry::from_registry(ConfigRegistry::from_source(source, schema), static_names.iter().cloned());
	registry
		.load_file()
		.with_context(|| format!("cannot load {}", registry.path().display()))?;

	for report in registry.validate() {
		writeln!(out, "{report}")?;
	}
	for index in 0..registry.dynamic_count() {
		let section = registry.dynamic_section(index)?;
		writeln!(out, "dynamic[{index}] = [{}]", section.name())?;
	}

	let valid = registry.is_valid();
	writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
	Ok(valid)
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("quire=debug,quire_config=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
