//! Key and section lookup over a [`ConfigDocument`].

use crate::document::ConfigDocument;

/// A block of buffer lines belonging to one section, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
	/// Buffer position of the header line.
	pub start: usize,
	/// Number of lines up to the next recorded header or the end of the buffer.
	pub count: usize,
}

impl SectionRange {
	/// One past the last line of the section.
	pub fn end(&self) -> usize {
		self.start + self.count
	}
}

/// Finds the first line in `lines[start..start + count]` that defines `key`.
///
/// A line defines `key` only when it starts with `key` immediately followed by
/// `=`, so `ab` does not match `abc=1`. The window is clamped to the buffer.
pub fn find_key<S: AsRef<str>>(lines: &[S], key: &str, start: usize, count: usize) -> Option<usize> {
	let end = start.saturating_add(count).min(lines.len());
	(start.min(end)..end).find(|&position| defines_key(lines[position].as_ref(), key))
}

fn defines_key(line: &str, key: &str) -> bool {
	line.strip_prefix(key).is_some_and(|rest| rest.starts_with('='))
}

/// Resolves the range of the first section whose header is exactly `[name]`.
///
/// Repeated headers are not merged. Later occurrences are never returned here,
/// but they still terminate the range of whatever section precedes them.
pub fn find_range(document: &ConfigDocument, name: &str) -> Option<SectionRange> {
	let header = format!("[{name}]");
	let index = document.section_index();
	let lines = document.lines();
	let (slot, &start) = index
		.iter()
		.enumerate()
		.find(|&(_, &position)| lines[position] == header)?;
	let end = index.get(slot + 1).copied().unwrap_or(lines.len());
	Some(SectionRange {
		start,
		count: end - start,
	})
}

/// Reads the raw value of `key` inside `section`.
pub fn try_read_value<'a>(document: &'a ConfigDocument, section: &str, key: &str) -> Option<&'a str> {
	let range = find_range(document, section)?;
	let position = find_key(document.lines(), key, range.start, range.count)?;
	Some(&document.lines()[position][key.len() + 1..])
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn find_key_rejects_prefix_collisions() {
		let lines = ["abc=1"];
		assert_eq!(find_key(&lines, "ab", 0, 1), None);
		assert_eq!(find_key(&lines, "abc", 0, 1), Some(0));
	}

	#[test]
	fn find_key_first_occurrence_wins() {
		let lines = ["[A]", "k=1", "k=2"];
		assert_eq!(find_key(&lines, "k", 0, 3), Some(1));
	}

	#[test]
	fn find_key_respects_window() {
		let lines = ["k=0", "[A]", "k=1", "[B]", "k=2"];
		assert_eq!(find_key(&lines, "k", 3, 2), Some(4));
		assert_eq!(find_key(&lines, "k", 1, 1), None);
		assert_eq!(find_key(&lines, "k", 3, 100), Some(4));
		assert_eq!(find_key(&lines, "k", 10, 5), None);
	}

	#[test]
	fn find_range_runs_to_next_header() {
		let doc = ConfigDocument::parse("[A]\na=1\nb=2\n[B]\nc=3\n");
		assert_eq!(find_range(&doc, "A"), Some(SectionRange { start: 0, count: 3 }));
	}

	#[test]
	fn find_range_last_section_runs_to_end() {
		let doc = ConfigDocument::parse("[A]\na=1\n[B]\nc=3\nd=4\n");
		let range = find_range(&doc, "B").expect("B exists");
		assert_eq!(range, SectionRange { start: 2, count: 3 });
		assert_eq!(range.end(), doc.len());
	}

	#[test]
	fn find_range_is_case_sensitive_and_exact() {
		let doc = ConfigDocument::parse("[Server]\n[Server2]\n");
		assert_eq!(find_range(&doc, "server"), None);
		assert_eq!(find_range(&doc, "Serv"), None);
		assert_eq!(find_range(&doc, "Server2").map(|r| r.start), Some(1));
	}

	#[test]
	fn duplicate_headers_resolve_to_first_block() {
		let doc = ConfigDocument::parse("[Server]\nhost=localhost\nport=8080\n[Server]\nport=9090\n");
		assert_eq!(find_range(&doc, "Server"), Some(SectionRange { start: 0, count: 3 }));
		assert_eq!(try_read_value(&doc, "Server", "port"), Some("8080"));
		assert_eq!(try_read_value(&doc, "Server", "host"), Some("localhost"));
	}

	#[test]
	fn key_lookup_stays_inside_section() {
		let doc = ConfigDocument::parse("[A]\nx=1\n[B]\ny=2\n");
		assert_eq!(try_read_value(&doc, "A", "y"), None);
		assert_eq!(try_read_value(&doc, "B", "y"), Some("2"));
		assert_eq!(try_read_value(&doc, "C", "y"), None);
	}

	#[test]
	fn value_is_verbatim_after_first_equals() {
		let doc = ConfigDocument::parse("[A]\nexpr=a=b \nempty=\n");
		assert_eq!(try_read_value(&doc, "A", "expr"), Some("a=b "));
		assert_eq!(try_read_value(&doc, "A", "empty"), Some(""));
	}
}
