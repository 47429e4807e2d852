//! Line classifier.
//!
//! Source files are read one physical line at a time. Each line is measured
//! (leading whitespace), stripped of its trailing comment, trimmed, and put in
//! exactly one [`LineCategory`]. The checks run in a fixed order and the first
//! one that matches wins:
//!
//! |Order|Category|Rule
//! --|--|--
//! 1|Empty|nothing left after stripping
//! 2|Function|starts with `plot` or `plan` and whitespace
//! 3|Conditional|starts with `if` or `elif` and whitespace, or is `else:`
//! 4|Loop|starts with `loop` and whitespace
//! 5|Binding|contains `=`
//! 6|Expression|anything else
//!
//! Comment markers are found without looking at string literals, so
//! `files "#1"` loses everything from the `#` on.

mod line;

pub use line::{ClassifiedLine, LineCategory};
use tracing::trace;

use crate::utils::leading_whitespace;

/// Start a line comment.
pub const COMMENT_MARKERS: [&str; 2] = ["//", "#"];
/// Open a function header.
pub const FUNCTION_KEYWORDS: [&str; 2] = ["plot", "plan"];
/// Open a conditional header, `else:` aside.
pub const CONDITIONAL_KEYWORDS: [&str; 2] = ["if", "elif"];
pub const ELSE_HEADER: &str = "else:";
pub const LOOP_KEYWORD: &str = "loop";

/// Classify one physical line. Never fails.
pub fn classify(line: &str) -> ClassifiedLine {
	let indent = leading_whitespace(line);
	let cleaned = strip_comment(line).trim().to_string();

	let category = if cleaned.is_empty() {
		LineCategory::Empty
	} else if FUNCTION_KEYWORDS.iter().any(|keyword| starts_with_keyword(&cleaned, keyword)) {
		LineCategory::Function
	} else if CONDITIONAL_KEYWORDS.iter().any(|keyword| starts_with_keyword(&cleaned, keyword)) || cleaned == ELSE_HEADER
	{
		LineCategory::Conditional
	} else if starts_with_keyword(&cleaned, LOOP_KEYWORD) {
		LineCategory::Loop
	} else if cleaned.contains('=') {
		LineCategory::Binding
	} else {
		LineCategory::Expression
	};

	trace!(indent, %category, "classified {cleaned:?}");
	ClassifiedLine { original: line.to_string(), cleaned, indent, category }
}

/// Classify every line of `source`. A trailing newline does not add a line.
pub fn classify_source(source: &str) -> Vec<ClassifiedLine> { source.lines().map(classify).collect() }

/// Cut the line at the first comment marker.
fn strip_comment(line: &str) -> &str {
	let cut = COMMENT_MARKERS.iter().filter_map(|marker| line.find(*marker)).min();
	match cut {
		Some(index) => &line[..index],
		None => line,
	}
}

/// `keyword` followed by whitespace, so `plotting = 1` is not a header.
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
	text.strip_prefix(keyword).is_some_and(|rest| rest.starts_with(char::is_whitespace))
}
