use pretty_assertions::assert_eq;

use super::*;

const CONFIG: &str = "\
[Server]
host=localhost
port=8080
debug=yes
timeout=00:00:30
retry=5m
allow=10.0.0.1;;10.0.0.2;
tags=a,b,,c
filter=^api/.*$
broken=(oops
empty=
[Other]
port=1
";

fn reader(name: &str) -> SectionReader {
	SectionReader::new(name, Arc::new(ConfigDocument::parse(CONFIG)))
}

#[test]
fn typed_getters_convert_present_values() {
	let server = reader("Server");
	assert_eq!(server.get_string("host"), Some("localhost"));
	assert_eq!(server.get_int("port"), Some(8080));
	assert_eq!(server.get_bool("debug"), Some(true));
	assert_eq!(server.get_duration("timeout"), Some(Duration::from_secs(30)));
	assert_eq!(server.get_duration("retry"), Some(Duration::from_secs(300)));
	assert_eq!(server.get_parsed::<u16>("port"), Some(8080));
	assert!(server.get_regex("filter").is_some_and(|re| re.is_match("api/users")));
}

#[test]
fn absent_and_unparseable_values_are_none() {
	let server = reader("Server");
	assert_eq!(server.get_int("missing"), None);
	assert_eq!(server.get_int("host"), None);
	assert_eq!(server.get_bool("port"), None);
	assert_eq!(server.get_duration("host"), None);
	assert!(server.get_regex("broken").is_none());
	assert!(server.get_regex("missing").is_none());
	assert_eq!(server.get_parsed::<u8>("port"), None);
}

#[test]
fn lists_are_never_absent() {
	let server = reader("Server");
	assert_eq!(server.get_list("allow"), ["10.0.0.1", "10.0.0.2"]);
	assert_eq!(server.get_list_with("tags", ','), ["a", "b", "c"]);
	assert!(server.get_list("missing").is_empty());
	assert!(server.get_list("empty").is_empty());
}

#[test]
fn lookups_do_not_cross_into_next_section() {
	let server = reader("Server");
	let other = reader("Other");
	assert_eq!(other.get_int("port"), Some(1));
	assert!(!other.contains_key("host"));
	assert_eq!(server.get_int("port"), Some(8080));
}

#[test]
fn missing_section_reads_nothing() {
	let ghost = reader("Ghost");
	assert_eq!(ghost.range(), None);
	assert!(ghost.lines().is_empty());
	assert!(ghost.entries().is_empty());
	assert_eq!(ghost.get_string("host"), None);
}

#[test]
fn entries_preserve_file_order() {
	let other = reader("Other");
	assert_eq!(other.entries(), [("port", "1")]);
	assert_eq!(reader("Server").entries().len(), 10);
}

#[test]
fn validation_collects_every_field() {
	let mut validation = Validation::new("Server");
	validation
		.check("host", false, "host must be set")
		.check("port", true, "port in range")
		.check("mode", false, "unknown mode");
	let reports = validation.finish();

	assert_eq!(reports.len(), 3);
	assert_eq!(
		reports.iter().filter(|r| !r.valid).map(|r| r.field.as_str()).collect::<Vec<_>>(),
		["host", "mode"]
	);
	assert_eq!(reports[1].to_string(), "[Server] port: ok (port in range)");
}

#[test]
fn generic_section_flags_malformed_lines() {
	let doc = Arc::new(ConfigDocument::parse("[Ok]\na=1\n[Bad]\na=1\nloose text\nsnake_key=2\n"));
	let good = GenericSection::new(SectionReader::new("Ok", Arc::clone(&doc)));
	let bad = GenericSection::new(SectionReader::new("Bad", doc));

	assert!(good.is_valid());
	assert!(!bad.is_valid());

	let failed: Vec<_> = bad
		.validate()
		.into_iter()
		.filter(|r| !r.valid)
		.map(|r| r.field)
		.collect();
	assert_eq!(failed, ["loose text", "snake_key=2"]);
}

#[test]
fn generic_section_checks_its_name() {
	let doc = Arc::new(ConfigDocument::parse("[my section]\na=1\n"));
	let section = GenericSection::new(SectionReader::new("my section", doc));
	assert!(!section.is_valid());
}

#[test]
fn downcast_recovers_concrete_type() {
	let boxed: Box<dyn Section> = Box::new(GenericSection::new(reader("Server")));
	assert!(boxed.downcast_ref::<GenericSection>().is_some());
	assert_eq!(boxed.name(), "Server");
}
