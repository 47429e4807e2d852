use std::{fmt::Debug, rc::Rc};

use crate::{environment::Environment, interpreter::value::Value, statement::Function, utils::RcCell};

type NativeFunction = Box<dyn Fn(&[Value]) -> Result<Value, String>>;

/// A function value: either Rust code or a host function with the scope it
/// was declared in.
pub struct CallableValue {
	name:            String,
	pub(crate) body: CallableType,
}

pub(crate) enum CallableType {
	Native(NativeFunction),
	Script { function: Rc<Function>, closure: RcCell<Environment> },
}

impl Debug for CallableValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let kind = match self.body {
			CallableType::Native(_) => "Native",
			CallableType::Script { .. } => "Script",
		};
		f.debug_struct("CallableValue").field("name", &self.name).field("kind", &kind).finish()
	}
}

impl CallableValue {
	pub fn native(name: &str, body: impl Fn(&[Value]) -> Result<Value, String> + 'static) -> Self {
		Self { name: name.to_string(), body: CallableType::Native(Box::new(body)) }
	}

	pub(crate) fn script(function: Rc<Function>, closure: RcCell<Environment>) -> Self {
		Self { name: function.name.clone(), body: CallableType::Script { function, closure } }
	}

	pub fn name(&self) -> &str { &self.name }

	/// What `String(f)` shows for a function.
	pub fn source_text(&self) -> String {
		match &self.body {
			CallableType::Native(_) => format!("function {}() {{ [native code] }}", self.name),
			CallableType::Script { function, .. } => {
				let parameters = function.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
				format!("function {}({parameters}) {{ ... }}", self.name)
			}
		}
	}
}
