//! Translator.
//!
//! Turns classified source lines into host lines, one for one. Nothing here
//! looks at more than the current line: block structure comes from the
//! explicit close markers the source writer puts in, and indentation only
//! decides how the output is laid out.
//!
//! |Category|Output
//! --|--
//! Empty|blank line
//! Function|`function name(params) {`
//! Conditional|`if (c) {`, `} else if (c) {`, `} else {`
//! Loop|`for (const item of items) {`
//! Binding|`const <text>;`
//! Expression|`}` for a close marker, otherwise `<text>;`
//!
//! A header that does not have the expected shape becomes a host comment and
//! is reported with `warn!`, so one bad line never stops a translation.

mod program;
pub mod tables;

pub use program::TranslatedProgram;
pub use tables::TokenTable;
use tables::{ELIF_HEADER, FUNCTION_HEADER, IF_HEADER, LOOP_HEADER};
use tracing::{debug, trace, warn};

use crate::classifier::{ClassifiedLine, ELSE_HEADER, LineCategory, classify_source};

/// Source indentation per nesting level.
pub const INDENT_UNIT: usize = 2;
/// Source lines that close the innermost open block.
pub const CLOSE_MARKERS: [&str; 2] = ["end", "}"];
/// Name bound to each element by a translated loop.
pub const LOOP_BINDING: &str = "item";

/// Translate a whole program. Never fails.
pub fn translate(lines: &[ClassifiedLine]) -> TranslatedProgram {
	let table = TokenTable::get();
	let output = lines.iter().map(|line| translate_line(table, line)).collect::<Vec<_>>();
	debug!(lines = output.len(), "translated program");
	TranslatedProgram::new(output)
}

/// Classify and translate `source` in one step.
pub fn translate_source(source: &str) -> TranslatedProgram { translate(&classify_source(source)) }

fn translate_line(table: &TokenTable, line: &ClassifiedLine) -> String {
	let text = line.cleaned.as_str();
	let body = match line.category {
		LineCategory::Empty => return String::new(),
		LineCategory::Function => function_header(text),
		LineCategory::Conditional => conditional_header(table, text),
		LineCategory::Loop => loop_header(table, text),
		LineCategory::Binding => statement(format!("const {}", table.substitute(text))),
		LineCategory::Expression if CLOSE_MARKERS.contains(&text) => Some("}".to_string()),
		LineCategory::Expression => statement(table.substitute(&table.rewrite_print(text))),
	};
	let body = body.unwrap_or_else(|| {
		warn!(category = %line.category, "malformed header {text:?}, emitted as a comment");
		format!("// invalid {} syntax: {text}", line.category)
	});

	let translated = format!("{}{body}", " ".repeat(line.indent / INDENT_UNIT));
	trace!("{text:?} -> {translated:?}");
	translated
}

fn statement(text: String) -> Option<String> {
	if text.ends_with(';') { Some(text) } else { Some(text + ";") }
}

fn function_header(text: &str) -> Option<String> {
	let captures = FUNCTION_HEADER.captures(text)?;
	Some(format!("function {}({}) {{", &captures[1], captures[2].trim()))
}

fn conditional_header(table: &TokenTable, text: &str) -> Option<String> {
	if text == ELSE_HEADER {
		return Some("} else {".to_string());
	}
	if let Some(captures) = ELIF_HEADER.captures(text) {
		return Some(format!("}} else if ({}) {{", table.substitute(&captures[1])));
	}
	let captures = IF_HEADER.captures(text)?;
	Some(format!("if ({}) {{", table.substitute(&captures[1])))
}

fn loop_header(table: &TokenTable, text: &str) -> Option<String> {
	let captures = LOOP_HEADER.captures(text)?;
	Some(format!("for (const {LOOP_BINDING} of {}) {{", table.substitute(&captures[1])))
}
