//! Runs translated host code.
//!
//! Every execution sees three layers of names, innermost first: the program's
//! own declarations, the caller's overrides, and the built-ins created once
//! per adapter. An override therefore hides a built-in of the same name
//! without touching it.

use std::{collections::HashMap, io::Write};

use tracing::{debug, warn};

use crate::{
	environment::Environment,
	error::execution::ExecutionError,
	interpreter::{Interpreter, natives, value::Value},
	parser::Parser,
	scanner::Scanner,
	utils::RcCell,
};

/// Extra names supplied for one execution.
pub type Bindings = HashMap<String, Value>;

/// How the code handed to [`ExecutionAdapter::run`] is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// A program run for its side effects. The result is `undefined`.
	#[default]
	Statement,
	/// A single expression whose value is the result.
	Expression,
}

/// Evaluates host code against a fixed set of built-ins.
pub struct ExecutionAdapter {
	globals: RcCell<Environment>,
	output:  natives::Output,
}

impl ExecutionAdapter {
	/// Built-ins printing to stdout.
	pub fn new() -> Self { Self::with_output(std::io::stdout()) }

	/// Built-ins printing to `output`.
	pub fn with_output(output: impl Write + 'static) -> Self {
		let output: natives::Output = RcCell::new(Box::new(output));
		let mut globals = Environment::new();
		natives::install(&mut globals, &output);
		Self { globals: RcCell::new(globals), output }
	}

	/// Add or replace a built-in for every later execution.
	pub fn define(&mut self, name: impl Into<String>, value: Value) { self.globals.borrow_mut().define(name, value, false) }

	/// Evaluate `code` with `bindings` layered over the built-ins.
	pub fn run(&self, code: &str, bindings: &Bindings, mode: Mode) -> Result<Value, ExecutionError> {
		debug!(?mode, bytes = code.len(), overrides = bindings.len(), "executing host code");

		let overrides = Environment::enclosed(self.globals.clone());
		for (name, value) in bindings {
			overrides.borrow_mut().define(name.clone(), value.clone(), false);
		}
		let mut interpreter = Interpreter::new(Environment::enclosed(overrides));

		let result = Scanner::new(code).scan_tokens().map_err(ExecutionError::from).and_then(|tokens| {
			let parser = Parser::new(tokens);
			match mode {
				Mode::Statement => {
					let statements = parser.parse()?;
					interpreter.interpret(&statements)?;
					Ok(Value::Undefined)
				}
				Mode::Expression => {
					let expression = parser.parse_expression()?;
					Ok(interpreter.evaluate_expression(&expression)?)
				}
			}
		});

		if let Err(error) = self.output.borrow_mut().flush() {
			warn!(%error, "failed to flush program output");
		}
		if let Err(error) = &result {
			debug!(%error, "host code failed");
		}
		result
	}

	/// Run a program with no overrides.
	pub fn execute(&self, code: &str) -> Result<(), ExecutionError> {
		self.run(code, &Bindings::new(), Mode::Statement).map(|_| ())
	}

	/// Evaluate one expression with no overrides.
	pub fn evaluate(&self, code: &str) -> Result<Value, ExecutionError> { self.run(code, &Bindings::new(), Mode::Expression) }
}

impl Default for ExecutionAdapter {
	fn default() -> Self { Self::new() }
}

/// An in-memory output sink. Clones share the same buffer, so one handle can
/// be given to the adapter and the other read afterwards.
#[derive(Debug, Clone, Default)]
pub struct OutputCapture {
	buffer: RcCell<Vec<u8>>,
}

impl OutputCapture {
	pub fn new() -> Self { Self::default() }

	/// Everything written so far.
	pub fn contents(&self) -> String { String::from_utf8_lossy(&self.buffer.borrow()).into_owned() }

	pub fn clear(&self) { self.buffer.borrow_mut().clear() }
}

impl Write for OutputCapture {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.buffer.borrow_mut().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}
