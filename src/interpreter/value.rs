use std::{fmt::Display, rc::Rc};

use Value::*;

use super::{callable::CallableValue, natives};
use crate::{scanner::TokenType, utils::RcCell};

/// Nested containers deeper than this print as `[Array]` / `[Object]`.
const INSPECT_DEPTH: usize = 2;
/// Longest array an index or `length` write may grow to.
pub(crate) const MAX_ARRAY_LENGTH: usize = 1 << 20;
pub(crate) const INVALID_ARRAY_LENGTH: &str = "Invalid array length";

/// A runtime value of host code.
///
/// Arrays and objects are shared: cloning a `Value` clones the handle, not the
/// contents, the same way two host variables can refer to one array.
#[derive(Debug, Clone, Default)]
pub enum Value {
	#[default]
	Undefined,
	Null,
	Bool(bool),
	Num(f64),
	Str(String),
	Array(RcCell<Vec<Value>>),
	Object(RcCell<Properties>),
	Function(Rc<CallableValue>),
}

/// Insertion-ordered property list of an object value.
#[derive(Debug, Clone, Default)]
pub struct Properties {
	kind:    ObjectKind,
	entries: Vec<(String, Value)>,
}

/// Objects built by `Error(...)` print and convert like errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectKind {
	#[default]
	Plain,
	Error,
}

impl Properties {
	pub fn new(kind: ObjectKind) -> Self { Self { kind, entries: Vec::new() } }

	pub fn kind(&self) -> ObjectKind { self.kind }

	pub fn get(&self, key: &str) -> Option<&Value> { self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v) }

	pub fn set(&mut self, key: impl Into<String>, value: Value) {
		let key = key.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, slot)) => *slot = value,
			None => self.entries.push((key, value)),
		}
	}

	pub fn entries(&self) -> &[(String, Value)] { &self.entries }

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Value {
	pub fn array(items: Vec<Value>) -> Self { Array(RcCell::new(items)) }

	pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
		let mut object = Properties::new(ObjectKind::Plain);
		for (key, value) in entries {
			object.set(key, value);
		}
		Object(RcCell::new(object))
	}

	/// An error object with `name` and `message` properties.
	pub fn error(name: &str, message: impl Into<String>) -> Self {
		let mut object = Properties::new(ObjectKind::Error);
		object.set("name", Str(name.to_string()));
		object.set("message", Str(message.into()));
		Object(RcCell::new(object))
	}

	/// A function implemented in Rust. An `Err` becomes a `TypeError` at the
	/// call site.
	pub fn native(name: &str, function: impl Fn(&[Value]) -> Result<Value, String> + 'static) -> Self {
		Function(Rc::new(CallableValue::native(name, function)))
	}

	/// The `typeof` of this value.
	pub fn type_of(&self) -> &'static str {
		match self {
			Undefined => "undefined",
			Null | Array(_) | Object(_) => "object",
			Bool(_) => "boolean",
			Num(_) => "number",
			Str(_) => "string",
			Function(_) => "function",
		}
	}

	/// Determines if the value is considered "true" in a boolean context.
	pub fn is_truthy(&self) -> bool {
		match self {
			Undefined | Null => false,
			Bool(b) => *b,
			Num(n) => *n != 0.0 && !n.is_nan(),
			Str(s) => !s.is_empty(),
			Array(_) | Object(_) | Function(_) => true,
		}
	}

	/// Numeric conversion as done by unary `+` and arithmetic.
	pub fn to_number(&self) -> f64 {
		match self {
			Undefined => f64::NAN,
			Null => 0.0,
			Bool(b) => f64::from(u8::from(*b)),
			Num(n) => *n,
			Str(s) => string_to_number(s),
			Array(_) => string_to_number(&self.coerce_string()),
			Object(_) | Function(_) => f64::NAN,
		}
	}

	/// String conversion as done by `String(x)`, `+` and `join`.
	pub fn coerce_string(&self) -> String {
		match self {
			Undefined => "undefined".to_string(),
			Null => "null".to_string(),
			Bool(b) => b.to_string(),
			Num(n) => format_number(*n),
			Str(s) => s.clone(),
			Array(items) => join_items(items, ",", &mut Vec::new()),
			Object(object) => {
				let object = object.borrow();
				match object.kind {
					ObjectKind::Error => error_text(&object).unwrap_or_else(|| "Error".to_string()),
					ObjectKind::Plain => "[object Object]".to_string(),
				}
			}
			Function(callable) => callable.source_text(),
		}
	}

	/// `===`
	pub fn strict_equals(&self, other: &Self) -> bool {
		match (self, other) {
			(Undefined, Undefined) | (Null, Null) => true,
			(Bool(l), Bool(r)) => l == r,
			(Num(l), Num(r)) => l == r,
			(Str(l), Str(r)) => l == r,
			(Array(l), Array(r)) => l.ptr_eq(r),
			(Object(l), Object(r)) => l.ptr_eq(r),
			(Function(l), Function(r)) => Rc::ptr_eq(l, r),
			_ => false,
		}
	}

	/// `==`
	pub fn loose_equals(&self, other: &Self) -> bool {
		match (self, other) {
			(Undefined | Null, Undefined | Null) => true,
			(Undefined | Null, _) | (_, Undefined | Null) => false,
			(Num(_), Str(_)) | (Str(_), Num(_)) => self.to_number() == other.to_number(),
			(Bool(_), _) => Num(self.to_number()).loose_equals(other),
			(_, Bool(_)) => self.loose_equals(&Num(other.to_number())),
			(Array(_) | Object(_) | Function(_), Num(_) | Str(_)) => Str(self.coerce_string()).loose_equals(other),
			(Num(_) | Str(_), Array(_) | Object(_) | Function(_)) => self.loose_equals(&Str(other.coerce_string())),
			_ => self.strict_equals(other),
		}
	}

	/// Equality used by `includes`, where `NaN` finds `NaN`.
	pub fn same_value_zero(&self, other: &Self) -> bool {
		match (self, other) {
			(Num(l), Num(r)) if l.is_nan() && r.is_nan() => true,
			_ => self.strict_equals(other),
		}
	}

	/// Performs a binary operation between two values.
	pub(crate) fn binary_op(&self, op: &TokenType, right: &Self) -> Option<Value> {
		use crate::scanner::TokenType::*;

		let value = match op {
			Plus => self.plus(right),
			Minus => Num(self.to_number() - right.to_number()),
			Star => Num(self.to_number() * right.to_number()),
			Slash => Num(self.to_number() / right.to_number()),
			Percent => Num(self.to_number() % right.to_number()),
			Greater => Bool(right.less_than(self)),
			GreaterEqual => Bool(self.at_least(right)),
			Less => Bool(self.less_than(right)),
			LessEqual => Bool(right.at_least(self)),
			EqualEqual => Bool(self.loose_equals(right)),
			BangEqual => Bool(!self.loose_equals(right)),
			EqualEqualEqual => Bool(self.strict_equals(right)),
			BangEqualEqual => Bool(!self.strict_equals(right)),
			_ => return None,
		};
		Some(value)
	}

	/// `+` concatenates as soon as either side is not a primitive number-ish.
	fn plus(&self, other: &Self) -> Value {
		let concatenates = |v: &Value| matches!(v, Str(_) | Array(_) | Object(_) | Function(_));
		if concatenates(self) || concatenates(other) {
			Str(format!("{}{}", self.coerce_string(), other.coerce_string()))
		} else {
			Num(self.to_number() + other.to_number())
		}
	}

	fn less_than(&self, other: &Self) -> bool {
		match (self, other) {
			(Str(l), Str(r)) => l < r,
			_ => self.to_number() < other.to_number(),
		}
	}

	/// `>=`, false whenever either side is `NaN`.
	fn at_least(&self, other: &Self) -> bool {
		match (self, other) {
			(Str(l), Str(r)) => l >= r,
			_ => self.to_number() >= other.to_number(),
		}
	}

	/// Read a property. Arrays and strings expose their methods here too.
	pub fn property(&self, key: &str) -> Result<Value, String> {
		match self {
			Undefined | Null => Err(format!("Cannot read properties of {self} (reading '{key}')")),
			Array(items) => Ok(match key.parse::<usize>() {
				Ok(index) => items.borrow().get(index).cloned().unwrap_or_default(),
				Err(_) if key == "length" => Num(items.borrow().len() as f64),
				Err(_) => natives::array_method(items, key).unwrap_or_default(),
			}),
			Str(s) => Ok(match key.parse::<usize>() {
				Ok(index) => s.chars().nth(index).map(|c| Str(c.to_string())).unwrap_or_default(),
				Err(_) if key == "length" => Num(s.encode_utf16().count() as f64),
				Err(_) => natives::string_method(s, key).unwrap_or_default(),
			}),
			Object(object) => Ok(object.borrow().get(key).cloned().unwrap_or_default()),
			Function(callable) if key == "name" => Ok(Str(callable.name().to_string())),
			Bool(_) | Num(_) | Function(_) => Ok(Undefined),
		}
	}

	/// Write a property. Writes to primitives are dropped.
	pub fn set_property(&self, key: &str, value: Value) -> Result<(), String> {
		match self {
			Undefined | Null => Err(format!("Cannot set properties of {self} (setting '{key}')")),
			Array(items) => {
				let mut items = items.borrow_mut();
				if let Ok(index) = key.parse::<usize>() {
					if index >= items.len() {
						let length = index
							.checked_add(1)
							.filter(|length| *length <= MAX_ARRAY_LENGTH)
							.ok_or_else(|| INVALID_ARRAY_LENGTH.to_string())?;
						items.resize(length, Undefined);
					}
					items[index] = value;
				} else if key == "length" {
					let length = value.to_number();
					if length < 0.0 || length.fract() != 0.0 || !(length <= MAX_ARRAY_LENGTH as f64) {
						return Err(INVALID_ARRAY_LENGTH.to_string());
					}
					items.resize(length as usize, Undefined);
				}
				Ok(())
			}
			Object(object) => {
				object.borrow_mut().set(key, value);
				Ok(())
			}
			Bool(_) | Num(_) | Str(_) | Function(_) => Ok(()),
		}
	}

	/// One-line description of a thrown value: `name: message` for errors.
	pub fn error_summary(&self) -> String {
		match self {
			Object(object) => error_text(&object.borrow()).unwrap_or_else(|| self.to_string()),
			_ => self.to_string(),
		}
	}

	/// Formats the value the way `console.log` shows a nested value.
	pub fn inspect(&self) -> String {
		let mut out = String::new();
		self.inspect_into(&mut out, 0, &mut Vec::new());
		out
	}

	fn inspect_into(&self, out: &mut String, depth: usize, seen: &mut Vec<usize>) {
		match self {
			Str(s) => out.push_str(&quote(s)),
			Array(items) => {
				if seen.contains(&items.addr()) {
					return out.push_str("[Circular]");
				}
				let items_ref = items.borrow();
				if items_ref.is_empty() {
					return out.push_str("[]");
				}
				if depth > INSPECT_DEPTH {
					return out.push_str("[Array]");
				}
				seen.push(items.addr());
				out.push_str("[ ");
				for (i, item) in items_ref.iter().enumerate() {
					if i > 0 {
						out.push_str(", ");
					}
					item.inspect_into(out, depth + 1, seen);
				}
				out.push_str(" ]");
				seen.pop();
			}
			Object(object) => {
				if seen.contains(&object.addr()) {
					return out.push_str("[Circular]");
				}
				let object_ref = object.borrow();
				if object_ref.kind == ObjectKind::Error {
					let text = error_text(&object_ref).unwrap_or_else(|| "Error".to_string());
					return out.push_str(&if depth == 0 { text } else { format!("[{text}]") });
				}
				if object_ref.is_empty() {
					return out.push_str("{}");
				}
				if depth > INSPECT_DEPTH {
					return out.push_str("[Object]");
				}
				seen.push(object.addr());
				out.push_str("{ ");
				for (i, (key, value)) in object_ref.entries.iter().enumerate() {
					if i > 0 {
						out.push_str(", ");
					}
					if is_identifier(key) {
						out.push_str(key);
					} else {
						out.push_str(&quote(key));
					}
					out.push_str(": ");
					value.inspect_into(out, depth + 1, seen);
				}
				out.push_str(" }");
				seen.pop();
			}
			Function(callable) if callable.name().is_empty() => out.push_str("[Function (anonymous)]"),
			Function(callable) => out.push_str(&format!("[Function: {}]", callable.name())),
			Undefined | Null | Bool(_) | Num(_) => out.push_str(&self.coerce_string()),
		}
	}
}

/// Top-level `console.log` form: strings print raw, everything else as
/// [`Value::inspect`].
impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Str(s) => write!(f, "{s}"),
			_ => write!(f, "{}", self.inspect()),
		}
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self { Num(n) }
}

impl From<bool> for Value {
	fn from(b: bool) -> Self { Bool(b) }
}

impl From<&str> for Value {
	fn from(s: &str) -> Self { Str(s.to_string()) }
}

impl From<String> for Value {
	fn from(s: String) -> Self { Str(s) }
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self { Value::array(items) }
}

/// Integers print without a fraction, `1e21` and up keep Rust's float form.
pub fn format_number(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
	} else if n == 0.0 {
		"0".to_string()
	} else if n.fract() == 0.0 && n.abs() < 1e21 {
		format!("{n:.0}")
	} else {
		format!("{n}")
	}
}

/// `Number("...")`: whitespace-trimmed decimal, hex or `Infinity`, else `NaN`.
fn string_to_number(s: &str) -> f64 {
	let text = s.trim();
	match text {
		"" => return 0.0,
		"Infinity" | "+Infinity" => return f64::INFINITY,
		"-Infinity" => return f64::NEG_INFINITY,
		_ => {}
	}
	if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
	}
	if text.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
		text.parse().unwrap_or(f64::NAN)
	} else {
		f64::NAN
	}
}

fn join_items(items: &RcCell<Vec<Value>>, separator: &str, seen: &mut Vec<usize>) -> String {
	if seen.contains(&items.addr()) {
		return String::new();
	}
	seen.push(items.addr());
	let joined = items
		.borrow()
		.iter()
		.map(|item| match item {
			Undefined | Null => String::new(),
			Array(inner) => join_items(inner, ",", seen),
			other => other.coerce_string(),
		})
		.collect::<Vec<_>>()
		.join(separator);
	seen.pop();
	joined
}

/// `join` for arrays, with `null` and `undefined` as empty strings.
pub(crate) fn join(items: &RcCell<Vec<Value>>, separator: &str) -> String { join_items(items, separator, &mut Vec::new()) }

/// `name: message` when both are strings.
fn error_text(object: &Properties) -> Option<String> {
	match (object.get("name"), object.get("message")) {
		(Some(Str(name)), Some(Str(message))) if message.is_empty() => Some(name.clone()),
		(Some(Str(name)), Some(Str(message))) => Some(format!("{name}: {message}")),
		_ => None,
	}
}

fn is_identifier(key: &str) -> bool {
	let mut chars = key.chars();
	chars.next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
		&& chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Single-quoted unless the text itself holds a single quote.
fn quote(s: &str) -> String {
	let escaped = s.replace('\\', "\\\\").replace('\n', "\\n").replace('\t', "\\t");
	if s.contains('\'') && !s.contains('"') {
		format!("\"{escaped}\"")
	} else {
		format!("'{}'", escaped.replace('\'', "\\'"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers_format_like_the_host() {
		assert_eq!(format_number(3.0), "3");
		assert_eq!(format_number(-0.0), "0");
		assert_eq!(format_number(2.5), "2.5");
		assert_eq!(format_number(1.0 / 0.0), "Infinity");
		assert_eq!(format_number(f64::NAN), "NaN");
		assert_eq!(format_number(1e6), "1000000");
	}

	#[test]
	fn truthiness() {
		assert!(!Undefined.is_truthy());
		assert!(!Null.is_truthy());
		assert!(!Num(0.0).is_truthy());
		assert!(!Num(f64::NAN).is_truthy());
		assert!(!Str(String::new()).is_truthy());
		assert!(Str("0".into()).is_truthy());
		assert!(Value::array(vec![]).is_truthy());
		assert!(Value::object(Vec::<(String, Value)>::new()).is_truthy());
	}

	#[test]
	fn conversions() {
		assert_eq!(Str(" 42 ".into()).to_number(), 42.0);
		assert_eq!(Str("".into()).to_number(), 0.0);
		assert_eq!(Str("0x1f".into()).to_number(), 31.0);
		assert!(Str("inf".into()).to_number().is_nan());
		assert!(Str("12px".into()).to_number().is_nan());
		assert_eq!(Bool(true).to_number(), 1.0);
		assert_eq!(Null.to_number(), 0.0);
		assert!(Undefined.to_number().is_nan());
		assert_eq!(Value::array(vec![Num(1.0), Null, Str("a".into())]).coerce_string(), "1,,a");
		assert_eq!(Value::object([("a", Num(1.0))]).coerce_string(), "[object Object]");
		assert_eq!(Value::error("Error", "boom").coerce_string(), "Error: boom");
	}

	#[test]
	fn arithmetic_and_concatenation() {
		let op = |l: Value, op: TokenType, r: Value| l.binary_op(&op, &r).unwrap().to_string();
		assert_eq!(op(Num(1.0), TokenType::Plus, Num(2.0)), "3");
		assert_eq!(op(Str("a".into()), TokenType::Plus, Num(1.0)), "a1");
		assert_eq!(op(Num(1.0), TokenType::Plus, Bool(true)), "2");
		assert_eq!(op(Num(1.0), TokenType::Slash, Num(0.0)), "Infinity");
		assert_eq!(op(Num(-7.0), TokenType::Percent, Num(3.0)), "-1");
		assert_eq!(op(Str("10".into()), TokenType::Star, Str("2".into())), "20");
		assert_eq!(op(Str("b".into()), TokenType::Greater, Str("a".into())), "true");
		assert_eq!(op(Num(f64::NAN), TokenType::LessEqual, Num(1.0)), "false");
		assert!(Num(1.0).binary_op(&TokenType::Comma, &Num(2.0)).is_none());
	}

	#[test]
	fn equality() {
		assert!(Null.loose_equals(&Undefined));
		assert!(!Null.strict_equals(&Undefined));
		assert!(Num(1.0).loose_equals(&Str("1".into())));
		assert!(Bool(true).loose_equals(&Num(1.0)));
		assert!(!Num(f64::NAN).strict_equals(&Num(f64::NAN)));
		assert!(Num(f64::NAN).same_value_zero(&Num(f64::NAN)));
		let crew = Value::array(vec![]);
		assert!(crew.strict_equals(&crew.clone()));
		assert!(!crew.strict_equals(&Value::array(vec![])));
		assert!(!Null.loose_equals(&Num(0.0)));
	}

	#[test]
	fn inspect_nested_values() {
		let value = Value::array(vec![Num(1.0), Str("two".into()), Value::object([("ok", Bool(true))]), Null]);
		assert_eq!(value.to_string(), "[ 1, 'two', { ok: true }, null ]");
		assert_eq!(Str("raw".into()).to_string(), "raw");
		assert_eq!(Value::object([("first name", Num(1.0))]).to_string(), "{ 'first name': 1 }");
		assert_eq!(Value::array(vec![]).to_string(), "[]");
		assert_eq!(Str("it's".into()).inspect(), "\"it's\"");
		let deep = Value::array(vec![Value::array(vec![Value::array(vec![Value::array(vec![Num(1.0)])])])]);
		assert_eq!(deep.to_string(), "[ [ [ [Array] ] ] ]");
	}

	#[test]
	fn inspect_cycles() {
		let crew = Value::array(vec![Num(1.0)]);
		crew.set_property("1", crew.clone()).unwrap();
		assert_eq!(crew.to_string(), "[ 1, [Circular] ]");
		assert_eq!(crew.coerce_string(), "1,");
	}

	#[test]
	fn errors_summarize() {
		let error = Value::error("Error", "boom");
		assert_eq!(error.to_string(), "Error: boom");
		assert_eq!(Value::array(vec![error.clone()]).to_string(), "[ [Error: boom] ]");
		assert_eq!(error.error_summary(), "Error: boom");
		assert_eq!(Value::object([("name", Str("Custom".into())), ("message", Str("x".into()))]).error_summary(), "Custom: x");
		assert_eq!(Str("plain".into()).error_summary(), "plain");
		assert_eq!(Num(7.0).error_summary(), "7");
	}

	#[test]
	fn properties() {
		let crew = Value::array(vec![Str("a".into()), Str("b".into())]);
		assert_eq!(crew.property("length").unwrap().to_string(), "2");
		assert_eq!(crew.property("1").unwrap().to_string(), "b");
		assert!(matches!(crew.property("5").unwrap(), Undefined));
		crew.set_property("3", Num(1.0)).unwrap();
		assert_eq!(crew.to_string(), "[ 'a', 'b', undefined, 1 ]");
		crew.set_property("length", Num(1.0)).unwrap();
		assert_eq!(crew.to_string(), "[ 'a' ]");

		assert_eq!(Str("héllo".into()).property("length").unwrap().to_string(), "5");
		assert_eq!(Str("abc".into()).property("1").unwrap().to_string(), "b");

		let agenda = Value::object([("x", Num(1.0))]);
		agenda.set_property("y", Num(2.0)).unwrap();
		agenda.set_property("x", Num(3.0)).unwrap();
		assert_eq!(agenda.to_string(), "{ x: 3, y: 2 }");

		assert_eq!(Null.property("x").unwrap_err(), "Cannot read properties of null (reading 'x')");
		assert_eq!(Undefined.set_property("x", Null).unwrap_err(), "Cannot set properties of undefined (setting 'x')");
		assert!(Num(1.0).set_property("x", Null).is_ok());
	}

	#[test]
	fn array_writes_are_bounded() {
		let list = Value::array(vec![]);
		assert_eq!(list.set_property("1000000000000000", Num(1.0)).unwrap_err(), "Invalid array length");
		assert_eq!(list.set_property(&usize::MAX.to_string(), Num(1.0)).unwrap_err(), "Invalid array length");
		assert_eq!(list.set_property("length", Num(1e15)).unwrap_err(), "Invalid array length");
		assert_eq!(list.set_property("length", Num(f64::INFINITY)).unwrap_err(), "Invalid array length");
		assert_eq!(list.set_property("length", Num(-1.0)).unwrap_err(), "Invalid array length");
		assert_eq!(list.property("length").unwrap().to_string(), "0");

		list.set_property(&(MAX_ARRAY_LENGTH - 1).to_string(), Num(1.0)).unwrap();
		assert_eq!(list.property("length").unwrap().to_string(), MAX_ARRAY_LENGTH.to_string());
		list.set_property("length", Num(2.0)).unwrap();
		assert_eq!(list.to_string(), "[ undefined, undefined ]");
	}
}
