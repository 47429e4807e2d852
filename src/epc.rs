use std::{fs::read_to_string, path::Path};

use anyhow::{Context, bail, ensure};
use tracing::debug;

use crate::{
	adapter::ExecutionAdapter,
	classifier::classify_source,
	error::EpcError,
	translator::{TranslatedProgram, translate},
};

/// Extension every script file must carry.
pub const EXTENSION: &str = "epc";

/// Epc drives the whole pipeline: load, classify, translate, execute.
pub struct Epc {
	adapter: ExecutionAdapter,
}

impl Epc {
	/// A driver printing to stdout.
	pub fn new() -> Self { Self { adapter: ExecutionAdapter::new() } }

	/// A driver executing through `adapter`, e.g. one writing to an
	/// [`OutputCapture`](crate::OutputCapture).
	pub fn with_adapter(adapter: ExecutionAdapter) -> Self { Self { adapter } }

	/// For adding built-ins before running.
	pub fn adapter_mut(&mut self) -> &mut ExecutionAdapter { &mut self.adapter }

	/// Resolve, check and read a script file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<String, EpcError> { Ok(read_script(path.as_ref())?) }

	/// Classify and translate source text. Never fails.
	pub fn compile(source: &str) -> TranslatedProgram {
		let lines = classify_source(source);
		debug!(lines = lines.len(), "classified source");
		translate(&lines)
	}

	/// Run an already translated program.
	pub fn execute(&self, program: &TranslatedProgram) -> Result<(), EpcError> {
		Ok(self.adapter.execute(&program.code())?)
	}

	/// Translate and run `source`, handing back what was run.
	pub fn run_source(&self, source: &str) -> Result<TranslatedProgram, EpcError> {
		let program = Self::compile(source);
		self.execute(&program)?;
		Ok(program)
	}

	/// Load, translate and run a script file.
	pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<TranslatedProgram, EpcError> {
		let source = Self::load(path)?;
		self.run_source(&source)
	}
}

impl Default for Epc {
	fn default() -> Self { Self::new() }
}

fn read_script(path: &Path) -> anyhow::Result<String> {
	if path.extension().and_then(|extension| extension.to_str()) != Some(EXTENSION) {
		bail!("{} is not a .{EXTENSION} file", path.display());
	}
	let resolved = path.canonicalize().with_context(|| format!("Failed to resolve {}", path.display()))?;
	ensure!(resolved.is_file(), "{} is not a file", resolved.display());
	let source = read_to_string(&resolved).with_context(|| format!("Failed to read {}", resolved.display()))?;
	debug!(path = %resolved.display(), bytes = source.len(), "loaded script");
	Ok(source)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::OutputCapture;

	fn epc() -> (Epc, OutputCapture) {
		let capture = OutputCapture::new();
		(Epc::with_adapter(ExecutionAdapter::with_output(capture.clone())), capture)
	}

	#[test]
	fn runs_source() {
		let (epc, capture) = epc();
		let program = epc.run_source("target = \"Island\"\nif truth:\n    files target\nend\n").unwrap();
		assert_eq!(program.len(), 4);
		assert_eq!(capture.contents(), "Island\n");
	}

	#[test]
	fn execution_failure_is_reported() {
		let (epc, capture) = epc();
		let err = epc.run_source("files \"before\"\nmissing_function()").unwrap_err();
		assert!(matches!(err, EpcError::Execution(_)));
		assert_eq!(err.to_string(), "Execution failed: line 2: ReferenceError: missing_function is not defined");
		assert_eq!(capture.contents(), "before\n");
	}

	#[test]
	fn deep_nesting_is_a_syntax_error() {
		let (epc, capture) = epc();
		let err = epc.run_source(&format!("x = {}1{}", "(".repeat(5000), ")".repeat(5000))).unwrap_err();
		assert_eq!(err.title(), "SYNTAX ERROR");
		assert_eq!(err.to_string(), "Execution failed: SyntaxError: line 1: Maximum nesting depth exceeded");
		assert_eq!(capture.contents(), "");
	}

	#[test]
	fn loop_body_cannot_read_its_own_binding_early() {
		let (epc, capture) = epc();
		let err = epc.run_source("total = 0\nloop range(3):\n  total = total + item\n  files total\nend").unwrap_err();
		assert_eq!(err.title(), "RUNTIME ERROR");
		assert_eq!(err.to_string(), "Execution failed: line 3: ReferenceError: Cannot access 'total' before initialization");
		assert_eq!(capture.contents(), "");

		epc.run_source("total = 0\nloop range(3):\n  step = total + item\n  files step\nend").unwrap();
		assert_eq!(capture.contents(), "0\n1\n2\n");
	}

	#[test]
	fn wrong_extension_is_a_load_error() {
		let err = Epc::load("mission.txt").unwrap_err();
		assert!(matches!(err, EpcError::Load(_)));
		assert_eq!(err.to_string(), "Load error: mission.txt is not a .epc file");
	}

	#[test]
	fn added_builtins_are_visible() {
		let (mut epc, capture) = epc();
		epc.adapter_mut().define("agency", "CIA".into());
		epc.run_source("files agency").unwrap();
		assert_eq!(capture.contents(), "CIA\n");
	}
}
