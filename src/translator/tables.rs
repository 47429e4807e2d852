//! Token substitution tables and header patterns.
//!
//! Every pattern is compiled once, on first use, and shared read-only for the
//! rest of the process. Substitutions match whole words only, so `truthful`
//! keeps its `truth`.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Source keywords and the host tokens they become.
pub const KEYWORDS: [(&str, &str); 9] = [
	("truth", "true"),
	("lie", "false"),
	("alibi", "null"),
	("universe", "null"),
	("suicide", "return"),
	("escape", "break"),
	("and", "&&"),
	("or", "||"),
	("not", "!"),
];

/// The print function and its host spelling.
pub const PRINT_FUNCTION: (&str, &str) = ("files", "console.log");

/// Conversion functions, rewritten only when called: `deal(x)`.
pub const TYPE_CONSTRUCTORS: [(&str, &str); 8] = [
	("deal", "String"),
	("ghost", "String"),
	("power", "parseInt"),
	("time", "parseInt"),
	("theory", "parseFloat"),
	("risk", "parseFloat"),
	("money", "Boolean"),
	("light", "Boolean"),
];

/// Collection literals: the name disappears in front of its bracket, so
/// `crew["a"]` is the array `["a"]`.
pub const COLLECTION_CONSTRUCTORS: [(&str, &str); 8] = [
	("island", "["),
	("weapon", "["),
	("crew", "["),
	("mission", "["),
	("girl", "{"),
	("enemy", "{"),
	("government", "{"),
	("agenda", "{"),
];

/// `plot name(params):` / `plan name(params):`
pub(crate) static FUNCTION_HEADER: LazyLock<Regex> =
	LazyLock::new(|| compile(r"^(?:plot|plan)\s+([A-Za-z_$][\w$]*)\s*\(([^()]*)\)\s*:$"));
/// `loop items:`
pub(crate) static LOOP_HEADER: LazyLock<Regex> = LazyLock::new(|| compile(r"^loop\s+(.+?)\s*:$"));
/// `if cond:`
pub(crate) static IF_HEADER: LazyLock<Regex> = LazyLock::new(|| compile(r"^if\s+(.+?)\s*:$"));
/// `elif cond:`
pub(crate) static ELIF_HEADER: LazyLock<Regex> = LazyLock::new(|| compile(r"^elif\s+(.+?)\s*:$"));

static TABLE: LazyLock<TokenTable> = LazyLock::new(TokenTable::build);

struct Rule {
	pattern:     Regex,
	replacement: String,
}

impl Rule {
	fn new(pattern: &str, replacement: &str) -> Self {
		Self { pattern: compile(pattern), replacement: replacement.to_string() }
	}
}

/// The compiled substitution rules, built once per process.
pub struct TokenTable {
	rules:           Vec<Rule>,
	print_statement: Regex,
}

impl TokenTable {
	/// The shared table.
	pub fn get() -> &'static TokenTable { &TABLE }

	fn build() -> Self {
		let (print, console_log) = PRINT_FUNCTION;
		let mut rules = Vec::new();
		for (name, replacement) in KEYWORDS {
			rules.push(Rule::new(&format!(r"\b{}\b", regex::escape(name)), replacement));
		}
		rules.push(Rule::new(&call_pattern(print), &format!("{console_log}(")));
		for (name, function) in TYPE_CONSTRUCTORS {
			rules.push(Rule::new(&call_pattern(name), &format!("{function}(")));
		}
		for (name, bracket) in COLLECTION_CONSTRUCTORS {
			rules.push(Rule::new(&format!(r"\b{}{}", regex::escape(name), regex::escape(bracket)), bracket));
		}
		let print_statement = compile(&format!(r"^{}\s+(.+)$", regex::escape(print)));
		Self { rules, print_statement }
	}

	/// Apply every rule over the whole line.
	pub fn substitute(&self, text: &str) -> String {
		self.rules.iter().fold(text.to_string(), |text, rule| {
			rule.pattern.replace_all(&text, NoExpand(&rule.replacement)).into_owned()
		})
	}

	/// `files <args>` as a statement becomes a print call.
	pub fn rewrite_print(&self, text: &str) -> String {
		let (_, console_log) = PRINT_FUNCTION;
		match self.print_statement.captures(text) {
			Some(captures) if !captures[1].starts_with('(') => {
				format!("{console_log}({})", &captures[1])
			}
			_ => text.to_string(),
		}
	}
}

/// `name(`, spaces before the parenthesis allowed.
fn call_pattern(name: &str) -> String { format!(r"\b{}\s*\(", regex::escape(name)) }

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|error| panic!("invalid built-in pattern {pattern:?}: {error}"))
}
