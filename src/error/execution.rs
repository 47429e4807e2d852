use crate::{
	error::{interpreter::InterpreterError, parser::ParseError, scanner::ScanError},
	interpreter::value::Value,
};

/// The single failure surfaced by the execution adapter. The underlying cause
/// is kept as the error source.
#[derive(thiserror::Error, Debug)]
#[error("Execution failed: {cause}")]
pub struct ExecutionError {
	#[source]
	cause: ExecutionCause,
}

/// What went wrong inside an execution.
#[derive(thiserror::Error, Debug)]
pub enum ExecutionCause {
	/// Generated code failed to scan
	#[error("SyntaxError: {0}")]
	Scan(ScanError),
	/// Generated code failed to parse
	#[error("SyntaxError: {0}")]
	Parse(ParseError),
	/// Evaluation raised an error or a thrown value
	#[error(transparent)]
	Runtime(InterpreterError),
}

impl ExecutionError {
	pub fn cause(&self) -> &ExecutionCause { &self.cause }

	/// The value passed to `throw`, if that is how the execution failed.
	pub fn thrown(&self) -> Option<&Value> {
		match &self.cause {
			ExecutionCause::Runtime(InterpreterError::Thrown { value, .. }) => Some(value),
			_ => None,
		}
	}

	/// Line of the generated code the failure points at. Translation keeps
	/// one line per source line, so this is the source line too.
	pub fn line(&self) -> usize {
		match &self.cause {
			ExecutionCause::Scan(error) => error.line(),
			ExecutionCause::Parse(error) => error.line(),
			ExecutionCause::Runtime(error) => error.line(),
		}
	}

	/// True when the generated code never started running.
	pub fn is_syntax_error(&self) -> bool { matches!(self.cause, ExecutionCause::Scan(_) | ExecutionCause::Parse(_)) }
}

impl From<ScanError> for ExecutionError {
	fn from(error: ScanError) -> Self { Self { cause: ExecutionCause::Scan(error) } }
}

impl From<ParseError> for ExecutionError {
	fn from(error: ParseError) -> Self { Self { cause: ExecutionCause::Parse(error) } }
}

impl From<InterpreterError> for ExecutionError {
	fn from(error: InterpreterError) -> Self { Self { cause: ExecutionCause::Runtime(error) } }
}
