/// What kind of source line this is. The translator picks its rewrite rule
/// from this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCategory {
	/// Blank, whitespace-only or comment-only.
	Empty,
	/// `plot name(params):` or `plan name(params):`
	Function,
	/// `if cond:`, `elif cond:` or `else:`
	Conditional,
	/// `loop items:`
	Loop,
	/// Anything containing `=` that is not a header.
	Binding,
	/// Everything else, close markers included.
	Expression,
}

/// One physical source line after classification. Never changes once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
	/// The raw line, exactly as read.
	pub original: String,
	/// Comment stripped and trimmed.
	pub cleaned:  String,
	/// Leading whitespace characters of `original`.
	pub indent:   usize,
	pub category: LineCategory,
}

impl std::fmt::Display for LineCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LineCategory::Empty => "empty",
			LineCategory::Function => "function",
			LineCategory::Conditional => "conditional",
			LineCategory::Loop => "loop",
			LineCategory::Binding => "binding",
			LineCategory::Expression => "expression",
		})
	}
}
