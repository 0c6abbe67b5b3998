//! Streaming line decoder over any `encoding_rs` codec.

use std::io::{self, Read};

use encoding_rs::{Decoder, Encoding};

const CHUNK_SIZE: usize = 8 * 1024;

/// Yields decoded lines from a byte stream without buffering the whole input.
///
/// The decoder sniffs a leading BOM, which overrides the requested encoding.
/// Line terminators (`\n` or `\r\n`) are stripped. Malformed byte sequences are
/// replaced with U+FFFD.
pub(crate) struct DecodedLines<R> {
	reader: R,
	decoder: Decoder,
	pending: String,
	chunk: Box<[u8]>,
	finished: bool,
}

impl<R: Read> DecodedLines<R> {
	pub(crate) fn new(reader: R, encoding: &'static Encoding) -> Self {
		Self {
			reader,
			decoder: encoding.new_decoder(),
			pending: String::new(),
			chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
			finished: false,
		}
	}

	fn take_line(&mut self) -> Option<String> {
		let end = self.pending.find('\n')?;
		let mut line: String = self.pending.drain(..=end).collect();
		line.pop();
		if line.ends_with('\r') {
			line.pop();
		}
		Some(line)
	}

	fn fill(&mut self) -> io::Result<()> {
		let read = loop {
			match self.reader.read(&mut self.chunk) {
				Ok(n) => break n,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e),
			}
		};
		let last = read == 0;
		let input = &self.chunk[..read];
		let needed = self
			.decoder
			.max_utf8_buffer_length(input.len())
			.ok_or_else(|| io::Error::other("decoded chunk exceeds addressable size"))?;
		self.pending.reserve(needed);
		let _ = self.decoder.decode_to_string(input, &mut self.pending, last);
		self.finished = last;
		Ok(())
	}
}

impl<R: Read> Iterator for DecodedLines<R> {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(line) = self.take_line() {
				return Some(Ok(line));
			}
			if self.finished {
				if self.pending.is_empty() {
					return None;
				}
				let mut line = std::mem::take(&mut self.pending);
				if line.ends_with('\r') {
					line.pop();
				}
				return Some(Ok(line));
			}
			if let Err(e) = self.fill() {
				self.finished = true;
				self.pending.clear();
				return Some(Err(e));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use encoding_rs::{UTF_8, UTF_16LE, WINDOWS_1252};

	use super::*;

	fn collect(bytes: &[u8], encoding: &'static Encoding) -> Vec<String> {
		DecodedLines::new(bytes, encoding)
			.collect::<io::Result<Vec<_>>>()
			.expect("in-memory read cannot fail")
	}

	#[test]
	fn splits_lf_and_crlf() {
		let lines = collect(b"[A]\r\nkey=1\nlast=2", UTF_8);
		assert_eq!(lines, ["[A]", "key=1", "last=2"]);
	}

	#[test]
	fn keeps_empty_lines_for_the_caller() {
		let lines = collect(b"a=1\n\nb=2\n", UTF_8);
		assert_eq!(lines, ["a=1", "", "b=2"]);
	}

	#[test]
	fn strips_utf8_bom() {
		let lines = collect(b"\xEF\xBB\xBF[A]\n", UTF_8);
		assert_eq!(lines, ["[A]"]);
	}

	#[test]
	fn bom_overrides_requested_encoding() {
		let mut bytes = vec![0xFF, 0xFE];
		for unit in "[A]\nk=v".encode_utf16() {
			bytes.extend_from_slice(&unit.to_le_bytes());
		}
		assert_eq!(collect(&bytes, WINDOWS_1252), ["[A]", "k=v"]);
		assert_eq!(collect(&bytes, UTF_16LE), ["[A]", "k=v"]);
	}

	#[test]
	fn decodes_legacy_codec() {
		let lines = collect(b"name=caf\xE9", WINDOWS_1252);
		assert_eq!(lines, ["name=café"]);
	}

	#[test]
	fn lines_spanning_chunks_are_joined() {
		let long = "x".repeat(CHUNK_SIZE * 2 + 17);
		let text = format!("[A]\nk={long}\nz=1\n");
		let lines = collect(text.as_bytes(), UTF_8);
		assert_eq!(lines.len(), 3);
		assert_eq!(lines[1].len(), long.len() + 2);
		assert_eq!(lines[2], "z=1");
	}
}
