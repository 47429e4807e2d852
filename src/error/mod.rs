pub mod execution;
pub mod interpreter;
pub mod parser;
pub mod scanner;

/// EpcError is the top-level error type of the load → translate → execute
/// pipeline. Classification and translation never fail, so only the two ends
/// show up here.
#[derive(thiserror::Error, Debug)]
pub enum EpcError {
	/// The script could not be resolved or read
	#[error("Load error: {0:#}")]
	Load(#[from] anyhow::Error),
	/// The translated program failed while being evaluated
	#[error(transparent)]
	Execution(#[from] execution::ExecutionError),
}

impl EpcError {
	/// Headline for the failure banner.
	pub fn title(&self) -> &'static str {
		match self {
			EpcError::Load(_) => "LOAD ERROR",
			EpcError::Execution(error) if error.is_syntax_error() => "SYNTAX ERROR",
			EpcError::Execution(_) => "RUNTIME ERROR",
		}
	}
}
