//! Built-in bindings and the methods of arrays and strings.

use std::io::Write;

use super::value::{self, Value};
use crate::{environment::Environment, utils::RcCell};

/// Where `console.log` and `files` write.
pub(crate) type Output = RcCell<Box<dyn Write>>;

/// Define every built-in binding in `env`. Built-ins are constants.
pub(crate) fn install(env: &mut Environment, output: &Output) {
	let mut define = |name: &str, value: Value| env.define(name, value, false);

	define("console", Value::object([("log", print("log", output.clone()))]));
	define("files", print("files", output.clone()));
	define("String", Value::native("String", |args| Ok(Value::Str(args.first().map_or(String::new(), Value::coerce_string)))));
	define("Number", Value::native("Number", |args| Ok(Value::Num(args.first().map_or(0.0, Value::to_number)))));
	define("Boolean", Value::native("Boolean", |args| Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))));
	define(
		"parseInt",
		Value::native("parseInt", |args| {
			let radix = args.get(1).map(Value::to_number);
			Ok(Value::Num(parse_int(&argument(args, 0).coerce_string(), radix)))
		}),
	);
	define("parseFloat", Value::native("parseFloat", |args| Ok(Value::Num(parse_float(&argument(args, 0).coerce_string())))));
	define("truth", Value::Bool(true));
	define("lie", Value::Bool(false));
	define("alibi", Value::Null);
	define("universe", Value::Null);
	define(
		"Error",
		Value::native("Error", |args| {
			let message = match argument(args, 0) {
				Value::Undefined => String::new(),
				message => message.coerce_string(),
			};
			Ok(Value::error("Error", message))
		}),
	);
	define("len", Value::native("len", |args| len(&argument(args, 0))));
	define("range", Value::native("range", range));
}

fn argument(args: &[Value], index: usize) -> Value { args.get(index).cloned().unwrap_or_default() }

/// Arguments joined by a space, one line per call.
fn print(name: &str, output: Output) -> Value {
	Value::native(name, move |args| {
		let line = args.iter().map(Value::to_string).collect::<Vec<_>>().join(" ");
		writeln!(output.borrow_mut(), "{line}").map_err(|e| format!("cannot write output: {e}"))?;
		Ok(Value::Undefined)
	})
}

fn len(value: &Value) -> Result<Value, String> {
	let length = match value {
		Value::Str(s) => s.encode_utf16().count(),
		Value::Array(items) => items.borrow().len(),
		Value::Object(object) => object.borrow().len(),
		other => return Err(format!("object of type '{}' has no len()", other.type_of())),
	};
	Ok(Value::Num(length as f64))
}

/// `range(stop)`, `range(start, stop)` or `range(start, stop, step)`.
fn range(args: &[Value]) -> Result<Value, String> {
	let numbers = args.iter().map(Value::to_number).collect::<Vec<_>>();
	let (start, stop, step) = match numbers.as_slice() {
		[] => return Err("range expected at least 1 argument, got 0".to_string()),
		[stop] => (0.0, *stop, 1.0),
		[start, stop] => (*start, *stop, 1.0),
		[start, stop, step, ..] => (*start, *stop, *step),
	};
	if step == 0.0 {
		return Err("range() arg 3 must not be zero".to_string());
	}
	if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
		return Err("range() arguments must be finite numbers".to_string());
	}
	if (stop - start) / step > value::MAX_ARRAY_LENGTH as f64 {
		return Err(value::INVALID_ARRAY_LENGTH.to_string());
	}
	let mut items = Vec::new();
	let mut current = start;
	while (step > 0.0 && current < stop) || (step < 0.0 && current > stop) {
		items.push(Value::Num(current));
		current += step;
	}
	Ok(Value::array(items))
}

/// Longest prefix of digits in `radix`, `0x` switching to base 16.
pub(crate) fn parse_int(text: &str, radix: Option<f64>) -> f64 {
	let text = text.trim_start();
	let (sign, text) = match text.as_bytes().first() {
		Some(b'-') => (-1.0, &text[1..]),
		Some(b'+') => (1.0, &text[1..]),
		_ => (1.0, text),
	};
	let mut radix = match radix {
		Some(r) if r.is_finite() && r.trunc() != 0.0 => {
			let r = r.trunc();
			if !(2.0..=36.0).contains(&r) {
				return f64::NAN;
			}
			r as u32
		}
		_ => 0,
	};
	let mut text = text;
	if (radix == 0 || radix == 16) && (text.starts_with("0x") || text.starts_with("0X")) {
		text = &text[2..];
		radix = 16;
	}
	if radix == 0 {
		radix = 10;
	}
	let digits = text.chars().map_while(|c| c.to_digit(radix)).collect::<Vec<_>>();
	if digits.is_empty() {
		return f64::NAN;
	}
	sign * digits.into_iter().fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
}

/// Longest prefix that reads as a decimal literal.
pub(crate) fn parse_float(text: &str) -> f64 {
	let text = text.trim_start();
	let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
	if unsigned.starts_with("Infinity") {
		return if text.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
	}

	let bytes = text.as_bytes();
	let mut end = text.len() - unsigned.len();
	let digits_from = |mut i: usize| {
		while bytes.get(i).is_some_and(u8::is_ascii_digit) {
			i += 1;
		}
		i
	};
	let integer_end = digits_from(end);
	let mut seen_digits = integer_end > end;
	end = integer_end;
	if bytes.get(end) == Some(&b'.') {
		let fraction_end = digits_from(end + 1);
		seen_digits |= fraction_end > end + 1;
		end = fraction_end;
	}
	if !seen_digits {
		return f64::NAN;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exponent = end + 1;
		if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
			exponent += 1;
		}
		let exponent_end = digits_from(exponent);
		if exponent_end > exponent {
			end = exponent_end;
		}
	}
	text[..end].parse().unwrap_or(f64::NAN)
}

/// Bound method of an array, or `None` when it has no such method.
pub(crate) fn array_method(items: &RcCell<Vec<Value>>, name: &str) -> Option<Value> {
	let items = items.clone();
	let method = match name {
		"push" => Value::native(name, move |args| {
			let mut items = items.borrow_mut();
			items.extend(args.iter().cloned());
			Ok(Value::Num(items.len() as f64))
		}),
		"pop" => Value::native(name, move |_| Ok(items.borrow_mut().pop().unwrap_or_default())),
		"join" => Value::native(name, move |args| {
			let separator = match argument(args, 0) {
				Value::Undefined => ",".to_string(),
				separator => separator.coerce_string(),
			};
			Ok(Value::Str(value::join(&items, &separator)))
		}),
		"includes" => Value::native(name, move |args| {
			let needle = argument(args, 0);
			Ok(Value::Bool(items.borrow().iter().any(|item| item.same_value_zero(&needle))))
		}),
		"indexOf" => Value::native(name, move |args| {
			let needle = argument(args, 0);
			let index = items.borrow().iter().position(|item| item.strict_equals(&needle));
			Ok(Value::Num(index.map_or(-1.0, |i| i as f64)))
		}),
		_ => return None,
	};
	Some(method)
}

/// Bound method of a string, or `None` when it has no such method.
pub(crate) fn string_method(text: &str, name: &str) -> Option<Value> {
	let text = text.to_string();
	let method = match name {
		"toUpperCase" => Value::native(name, move |_| Ok(Value::Str(text.to_uppercase()))),
		"toLowerCase" => Value::native(name, move |_| Ok(Value::Str(text.to_lowercase()))),
		"trim" => Value::native(name, move |_| Ok(Value::Str(text.trim().to_string()))),
		"includes" => {
			Value::native(name, move |args| Ok(Value::Bool(text.contains(argument(args, 0).coerce_string().as_str()))))
		}
		"split" => Value::native(name, move |args| {
			let parts = match argument(args, 0) {
				Value::Undefined => vec![Value::Str(text.clone())],
				separator => {
					let separator = separator.coerce_string();
					if separator.is_empty() {
						text.chars().map(|c| Value::Str(c.to_string())).collect()
					} else {
						text.split(separator.as_str()).map(Value::from).collect()
					}
				}
			};
			Ok(Value::array(parts))
		}),
		_ => return None,
	};
	Some(method)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::OutputCapture;

	fn call(value: &Value, args: &[Value]) -> Result<Value, String> {
		let Value::Function(callable) = value else { panic!("not a function: {value}") };
		match &callable.body {
			crate::interpreter::callable::CallableType::Native(f) => f(args),
			_ => panic!("not native"),
		}
	}

	fn globals() -> (Environment, OutputCapture) {
		let capture = OutputCapture::new();
		let output: Output = RcCell::new(Box::new(capture.clone()));
		let mut env = Environment::new();
		install(&mut env, &output);
		(env, capture)
	}

	#[test]
	fn print_writes_one_line_per_call() {
		let (env, capture) = globals();
		let files = env.get("files").unwrap();
		call(&files, &[Value::from("Approved"), Value::from(2.0)]).unwrap();
		let log = env.get("console").unwrap().property("log").unwrap();
		call(&log, &[Value::array(vec![Value::from("a")])]).unwrap();
		call(&log, &[]).unwrap();
		assert_eq!(capture.contents(), "Approved 2\n[ 'a' ]\n\n");
	}

	#[test]
	fn constant_bindings() {
		let (env, _) = globals();
		assert_eq!(env.get("truth").unwrap().to_string(), "true");
		assert_eq!(env.get("lie").unwrap().to_string(), "false");
		assert_eq!(env.get("alibi").unwrap().to_string(), "null");
		assert_eq!(env.get("universe").unwrap().to_string(), "null");
	}

	#[test]
	fn conversion_functions() {
		let (env, _) = globals();
		let run = |name: &str, args: &[Value]| call(&env.get(name).unwrap(), args).unwrap().to_string();
		assert_eq!(run("String", &[Value::from(42.0)]), "42");
		assert_eq!(run("String", &[]), "");
		assert_eq!(run("Number", &[Value::from("3.5")]), "3.5");
		assert_eq!(run("Boolean", &[Value::from("")]), "false");
		assert_eq!(run("Boolean", &[Value::from("no")]), "true");
		assert_eq!(run("parseInt", &[Value::from("42px")]), "42");
		assert_eq!(run("parseInt", &[Value::from("ff"), Value::from(16.0)]), "255");
		assert_eq!(run("parseFloat", &[Value::from("2.5e2 units")]), "250");
		assert_eq!(run("Error", &[Value::from("boom")]), "Error: boom");
	}

	#[test]
	fn parse_int_edges() {
		assert_eq!(parse_int("  -17.9", None), -17.0);
		assert_eq!(parse_int("0x1A", None), 26.0);
		assert_eq!(parse_int("101", Some(2.0)), 5.0);
		assert!(parse_int("abc", None).is_nan());
		assert!(parse_int("", None).is_nan());
		assert!(parse_int("1", Some(40.0)).is_nan());
		assert!(parse_int("12", Some(-5.0)).is_nan());
		assert!(parse_int("1", Some(1.0)).is_nan());
		assert_eq!(parse_int("12", Some(0.5)), 12.0);
		assert_eq!(parse_int("z", Some(36.9)), 35.0);
	}

	#[test]
	fn parse_float_edges() {
		assert_eq!(parse_float(".5"), 0.5);
		assert_eq!(parse_float("-1.25abc"), -1.25);
		assert_eq!(parse_float("3e"), 3.0);
		assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
		assert!(parse_float(".").is_nan());
		assert!(parse_float("x1").is_nan());
	}

	#[test]
	fn len_and_range() {
		assert_eq!(len(&Value::from("abc")).unwrap().to_string(), "3");
		assert_eq!(len(&Value::array(vec![Value::Null; 4])).unwrap().to_string(), "4");
		assert_eq!(len(&Value::from(1.0)).unwrap_err(), "object of type 'number' has no len()");
		assert_eq!(range(&[Value::from(3.0)]).unwrap().to_string(), "[ 0, 1, 2 ]");
		assert_eq!(range(&[Value::from(5.0), Value::from(1.0), Value::from(-2.0)]).unwrap().to_string(), "[ 5, 3 ]");
		assert_eq!(range(&[Value::from(2.0), Value::from(2.0)]).unwrap().to_string(), "[]");
		assert!(range(&[Value::from(0.0), Value::from(3.0), Value::from(0.0)]).is_err());
		assert!(range(&[]).is_err());
		assert_eq!(range(&[Value::from(1e12)]).unwrap_err(), "Invalid array length");
		assert_eq!(range(&[Value::from(-1e12)]).unwrap().to_string(), "[]");
	}

	#[test]
	fn array_methods() {
		let crew = Value::array(vec![Value::from("a")]);
		let Value::Array(items) = &crew else { unreachable!() };
		let push = array_method(items, "push").unwrap();
		assert_eq!(call(&push, &[Value::from("b"), Value::from("c")]).unwrap().to_string(), "3");
		let pop = array_method(items, "pop").unwrap();
		assert_eq!(call(&pop, &[]).unwrap().to_string(), "c");
		let join = array_method(items, "join").unwrap();
		assert_eq!(call(&join, &[]).unwrap().to_string(), "a,b");
		assert_eq!(call(&join, &[Value::from(" & ")]).unwrap().to_string(), "a & b");
		let includes = array_method(items, "includes").unwrap();
		assert_eq!(call(&includes, &[Value::from("b")]).unwrap().to_string(), "true");
		let index_of = array_method(items, "indexOf").unwrap();
		assert_eq!(call(&index_of, &[Value::from("z")]).unwrap().to_string(), "-1");
		assert!(array_method(items, "map").is_none());
	}

	#[test]
	fn string_methods() {
		let run = |text: &str, name: &str, args: &[Value]| call(&string_method(text, name).unwrap(), args).unwrap().to_string();
		assert_eq!(run("Agent", "toUpperCase", &[]), "AGENT");
		assert_eq!(run("Agent", "toLowerCase", &[]), "agent");
		assert_eq!(run("  x  ", "trim", &[]), "x");
		assert_eq!(run("classified", "includes", &[Value::from("ass")]), "true");
		assert_eq!(run("a,b,c", "split", &[Value::from(",")]), "[ 'a', 'b', 'c' ]");
		assert_eq!(run("ab", "split", &[Value::from("")]), "[ 'a', 'b' ]");
		assert_eq!(run("ab", "split", &[]), "[ 'ab' ]");
	}
}
