use std::collections::HashMap;

use crate::{error::interpreter::InterpreterError, interpreter::value::Value, utils::RcCell};

/// A name bound in one scope. `value` stays `None` from the start of the
/// declaring block until the declaration runs.
#[derive(Debug, Clone)]
struct Binding {
	value:   Option<Value>,
	mutable: bool,
}

/// One scope in the chain. Clone the RcCell, it's shallow copy, so a closure
/// keeps seeing later changes to the scope it captured.
#[derive(Default, Debug)]
pub(crate) struct Environment {
	variables: HashMap<String, Binding>,
	outer:     Option<RcCell<Environment>>,
}

impl Environment {
	pub fn new() -> Self { Self::default() }

	/// A fresh scope whose lookups fall through to `outer`.
	pub fn enclosed(outer: RcCell<Environment>) -> RcCell<Self> {
		RcCell::new(Self { variables: HashMap::new(), outer: Some(outer) })
	}

	/// Bind `name` in this scope, replacing any binding of the same name here.
	pub fn define(&mut self, name: impl Into<String>, value: Value, mutable: bool) {
		self.variables.insert(name.into(), Binding { value: Some(value), mutable });
	}

	/// Reserve `name` in this scope without a value, so reads hit this scope
	/// and fail instead of reaching an outer binding. A name already bound here
	/// is left alone.
	pub fn declare(&mut self, name: &str) {
		if !self.variables.contains_key(name) {
			self.variables.insert(name.to_string(), Binding { value: None, mutable: true });
		}
	}

	/// Resolve `name`, searching outwards.
	pub fn lookup(&self, name: &str, line: usize) -> Result<Value, InterpreterError> {
		match self.variables.get(name) {
			Some(Binding { value: Some(value), .. }) => Ok(value.clone()),
			Some(Binding { value: None, .. }) => Err(InterpreterError::uninitialized(line, name)),
			None => match self.outer.as_ref() {
				Some(outer) => outer.borrow().lookup(name, line),
				None => Err(InterpreterError::undefined(line, name)),
			},
		}
	}

	/// Value of `name` if it is bound and initialized.
	pub fn get(&self, name: &str) -> Option<Value> { self.lookup(name, 0).ok() }

	/// Assign a value to an existing binding, searching outwards.
	pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), InterpreterError> {
		if let Some(binding) = self.variables.get_mut(name) {
			if binding.value.is_none() {
				return Err(InterpreterError::uninitialized(line, name));
			}
			if !binding.mutable {
				return Err(InterpreterError::type_error(line, "Assignment to constant variable."));
			}
			binding.value = Some(value);
			return Ok(());
		}
		match self.outer.as_ref() {
			Some(outer) => outer.borrow_mut().assign(name, value, line),
			None => Err(InterpreterError::undefined(line, name)),
		}
	}

	#[cfg(test)]
	pub fn contains(&self, name: &str) -> bool { self.variables.contains_key(name) }
}
