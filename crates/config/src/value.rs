//! Conversions from raw value text to typed values.
//!
//! Every conversion returns `None` (or an empty list) when the text does not
//! parse. Callers decide through section validation whether that is acceptable.

use std::time::Duration;

use regex::Regex;

/// Default separator for list values.
pub const LIST_SEPARATOR: char = ';';

/// Parse a boolean value from common string representations.
pub fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Parse a decimal integer, ignoring surrounding whitespace.
pub fn parse_int(value: &str) -> Option<i64> {
	value.trim().parse().ok()
}

/// Splits on `separator`, dropping empty entries.
pub fn parse_list(value: &str, separator: char) -> Vec<String> {
	value
		.split(separator)
		.filter(|entry| !entry.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Compiles a non-empty pattern.
pub fn parse_regex(value: &str) -> Option<Regex> {
	if value.is_empty() {
		return None;
	}
	Regex::new(value).ok()
}

/// Parses a time span.
///
/// Accepts clock notation `[d.]hh:mm[:ss[.fraction]]` (`01:30`, `2.04:00:00`,
/// `00:00:01.5`) and humantime notation (`90s`, `1h 30m`).
pub fn parse_duration(value: &str) -> Option<Duration> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	if value.contains(':') {
		parse_clock(value)
	} else {
		humantime::parse_duration(value).ok()
	}
}

fn parse_clock(value: &str) -> Option<Duration> {
	let parts: Vec<&str> = value.split(':').collect();
	let (head, minutes, seconds) = match parts.as_slice() {
		[head, minutes] => (*head, *minutes, None),
		[head, minutes, seconds] => (*head, *minutes, Some(*seconds)),
		_ => return None,
	};

	let (days, hours) = match head.split_once('.') {
		Some((days, hours)) => (parse_digits(days)?, parse_digits(hours)?),
		None => (0, parse_digits(head)?),
	};
	let minutes = parse_digits(minutes)?;
	if hours > 23 || minutes > 59 {
		return None;
	}

	let mut secs = days
		.checked_mul(86_400)?
		.checked_add(hours * 3_600 + minutes * 60)?;
	let mut nanos = 0;
	if let Some(seconds) = seconds {
		let (whole, fraction) = match seconds.split_once('.') {
			Some((whole, fraction)) => (whole, Some(fraction)),
			None => (seconds, None),
		};
		let whole = parse_digits(whole)?;
		if whole > 59 {
			return None;
		}
		secs = secs.checked_add(whole)?;
		if let Some(fraction) = fraction {
			nanos = parse_fraction(fraction)?;
		}
	}
	Some(Duration::new(secs, nanos))
}

fn parse_digits(s: &str) -> Option<u64> {
	if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	s.parse().ok()
}

/// Fractional seconds as nanoseconds, up to nine digits.
fn parse_fraction(s: &str) -> Option<u32> {
	if s.is_empty() || s.len() > 9 || !s.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let digits: u32 = s.parse().ok()?;
	Some(digits * 10u32.pow(9 - s.len() as u32))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("true", Some(true))]
	#[case("YES", Some(true))]
	#[case(" on ", Some(true))]
	#[case("0", Some(false))]
	#[case("Off", Some(false))]
	#[case("maybe", None)]
	#[case("", None)]
	fn bools(#[case] input: &str, #[case] expected: Option<bool>) {
		assert_eq!(parse_bool(input), expected);
	}

	#[rstest]
	#[case("42", Some(42))]
	#[case(" -7 ", Some(-7))]
	#[case("abc", None)]
	#[case("4.2", None)]
	#[case("", None)]
	fn ints(#[case] input: &str, #[case] expected: Option<i64>) {
		assert_eq!(parse_int(input), expected);
	}

	#[test]
	fn list_drops_empty_entries_but_keeps_spacing() {
		assert_eq!(parse_list("a;;b; c;", ';'), ["a", "b", " c"]);
		assert_eq!(parse_list("x,y", ','), ["x", "y"]);
		assert!(parse_list("", ';').is_empty());
		assert!(parse_list(";;;", ';').is_empty());
	}

	#[test]
	fn regex_swallows_compile_errors() {
		assert!(parse_regex("^job[0-9]+$").is_some_and(|re| re.is_match("job12")));
		assert!(parse_regex("(unclosed").is_none());
		assert!(parse_regex("").is_none());
	}

	#[rstest]
	#[case("01:30", Some(Duration::from_secs(90 * 60)))]
	#[case("00:00:45", Some(Duration::from_secs(45)))]
	#[case("2.04:00:00", Some(Duration::from_secs(2 * 86_400 + 4 * 3_600)))]
	#[case("00:00:01.5", Some(Duration::from_millis(1_500)))]
	#[case("90s", Some(Duration::from_secs(90)))]
	#[case("1h 30m", Some(Duration::from_secs(5_400)))]
	#[case("25:00", None)]
	#[case("00:61", None)]
	#[case("00:00:99", None)]
	#[case("1:2:3:4", None)]
	#[case("-01:00", None)]
	#[case("soon", None)]
	#[case("", None)]
	fn durations(#[case] input: &str, #[case] expected: Option<Duration>) {
		assert_eq!(parse_duration(input), expected);
	}
}
