//! String formatting utilities.
//!
//! Provides functions for shortening base58 identifiers in log fields and
//! joining program logs into a readable block.

/// Truncates a base58 identifier (signature, public key) for display.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Joins program log lines into a single block, one line per entry.
///
/// Order is preserved exactly as the cluster returned it.
pub fn format_log_block<S: AsRef<str>>(logs: &[S]) -> String {
	logs.iter()
		.map(|line| line.as_ref())
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("abc"), "abc");
		assert_eq!(truncate_id("12345678"), "12345678");
		assert_eq!(
			truncate_id("5h2kXzQ9ba7cJ1pRcLtk3s8vVm4Ys9mB"),
			"5h2kXzQ9.."
		);
	}

	#[test]
	fn test_format_log_block() {
		let logs = vec!["Program log: a", "Program log: b"];
		assert_eq!(format_log_block(&logs), "Program log: a\nProgram log: b");

		let empty: Vec<String> = Vec::new();
		assert_eq!(format_log_block(&empty), "");
	}
}
