use crate::interpreter::value::Value;

/// Errors that can occur while evaluating host code
#[derive(thiserror::Error, Debug, Clone)]
pub enum InterpreterError {
	/// Read of or assignment to a name no scope defines
	#[error("line {line}: ReferenceError: {name} is not defined")]
	UndefinedVariable { name: String, line: usize },
	/// Use of a block's declaration before the declaration has run
	#[error("line {line}: ReferenceError: Cannot access '{name}' before initialization")]
	Uninitialized { name: String, line: usize },
	/// Operation applied to a value of the wrong kind
	#[error("line {line}: TypeError: {message}")]
	TypeError { message: String, line: usize },
	/// Call depth limit reached
	#[error("line {line}: RangeError: Maximum call stack size exceeded")]
	StackOverflow { line: usize },
	/// A value raised by a `throw` statement, carried unchanged
	#[error("Uncaught {}", .value.error_summary())]
	Thrown { value: Value, line: usize },
}

impl InterpreterError {
	pub fn type_error(line: usize, message: impl Into<String>) -> Self {
		Self::TypeError { message: message.into(), line }
	}

	pub fn undefined(line: usize, name: impl Into<String>) -> Self {
		Self::UndefinedVariable { name: name.into(), line }
	}

	pub fn uninitialized(line: usize, name: impl Into<String>) -> Self {
		Self::Uninitialized { name: name.into(), line }
	}

	/// Host code line the error was raised on.
	pub fn line(&self) -> usize {
		match self {
			Self::UndefinedVariable { line, .. }
			| Self::Uninitialized { line, .. }
			| Self::TypeError { line, .. }
			| Self::StackOverflow { line }
			| Self::Thrown { line, .. } => *line,
		}
	}
}
