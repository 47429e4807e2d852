/// The translator's output: one host line per source line, blank lines kept,
/// so a host error on line `n` points at source line `n`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedProgram {
	lines: Vec<String>,
}

impl TranslatedProgram {
	pub(crate) fn new(lines: Vec<String>) -> Self { Self { lines } }

	pub fn lines(&self) -> &[String] { &self.lines }

	pub fn len(&self) -> usize { self.lines.len() }

	pub fn is_empty(&self) -> bool { self.lines.is_empty() }

	/// The whole program as one string, ready for execution.
	pub fn code(&self) -> String { self.lines.join("\n") }
}

impl std::fmt::Display for TranslatedProgram {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.code()) }
}
