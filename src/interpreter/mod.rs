//! Host code interpreter.
//!
//! The interpreter walks the abstract syntax tree (AST) produced by the parser,
//! executing statements and recursively evaluating each expression to its
//! runtime value.
//!
//! # Scopes
//!
//! Every block, loop iteration and call gets a fresh [`Environment`] enclosed
//! by the current one. Function declarations are hoisted: a block defines all
//! of its functions before running its first statement, so a function can be
//! called above the line that declares it.

pub(crate) mod callable;
pub(crate) mod natives;
pub(crate) mod value;

use std::rc::Rc;

use Expression::*;
use callable::{CallableType, CallableValue};
use value::Value;

use crate::{
	environment::Environment,
	error::interpreter::InterpreterError,
	parser::expression::{Expression, LiteralValue},
	scanner::TokenType,
	statement::{Function, Statement},
	utils::RcCell,
};

/// Nested host calls allowed before a `RangeError`.
pub(crate) const MAX_CALL_DEPTH: usize = 128;

/// How a statement finished.
#[derive(Debug)]
enum Flow {
	Normal,
	Return(Value),
	Break,
}

/// Interpreter that executes host statements.
pub(crate) struct Interpreter {
	environment: RcCell<Environment>,
	depth:       usize,
}

impl Interpreter {
	pub fn new(environment: RcCell<Environment>) -> Self { Self { environment, depth: 0 } }

	/// Run a program. A top-level `return` ends it early.
	pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), InterpreterError> {
		self.run_statements(statements)?;
		Ok(())
	}

	/// Evaluate a single expression in the current scope.
	pub fn evaluate_expression(&mut self, expression: &Expression) -> Result<Value, InterpreterError> {
		self.evaluate(expression)
	}

	fn hoist(&mut self, statements: &[Statement]) {
		for statement in statements {
			match statement {
				Statement::FunDecl(function) => {
					let callable = CallableValue::script(function.clone(), self.environment.clone());
					self.environment.borrow_mut().define(function.name.clone(), Value::Function(Rc::new(callable)), true);
				}
				// Uninitialized until the declaration itself runs.
				Statement::Declaration { name, .. } => self.environment.borrow_mut().declare(name),
				_ => {}
			}
		}
	}

	/// Run statements in the current scope until one of them leaves it.
	fn run_statements(&mut self, statements: &[Statement]) -> Result<Flow, InterpreterError> {
		self.hoist(statements);
		for statement in statements {
			match self.execute(statement)? {
				Flow::Normal => {}
				flow => return Ok(flow),
			}
		}
		Ok(Flow::Normal)
	}

	/// Run `f` with `environment` as the current scope, restoring the previous
	/// scope whether or not `f` fails.
	fn with_environment<T>(
		&mut self,
		environment: RcCell<Environment>,
		f: impl FnOnce(&mut Self) -> Result<T, InterpreterError>,
	) -> Result<T, InterpreterError> {
		let previous = std::mem::replace(&mut self.environment, environment);
		let result = f(self);
		self.environment = previous;
		result
	}

	fn execute(&mut self, statement: &Statement) -> Result<Flow, InterpreterError> {
		match statement {
			Statement::Expression(expression) => {
				self.evaluate(expression)?;
			}
			Statement::Declaration { kind, name, initializer, .. } => {
				let value = match initializer {
					Some(initializer) => self.evaluate(initializer)?,
					None => Value::Undefined,
				};
				self.environment.borrow_mut().define(name.clone(), value, kind.is_mutable());
			}
			// Defined when the enclosing block was entered.
			Statement::FunDecl(_) | Statement::Empty => {}
			Statement::If { condition, then_branch, else_branch } => {
				if self.evaluate(condition)?.is_truthy() {
					return self.execute(then_branch);
				} else if let Some(else_branch) = else_branch {
					return self.execute(else_branch);
				}
			}
			Statement::ForOf { kind, binding, iterable, line, body } => {
				let items = match self.evaluate(iterable)? {
					Value::Array(items) => {
						let snapshot = items.borrow().clone();
						snapshot
					}
					Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
					other => {
						return Err(InterpreterError::type_error(*line, format!("{} is not iterable", other.inspect())));
					}
				};
				for item in items {
					let scope = Environment::enclosed(self.environment.clone());
					scope.borrow_mut().define(binding.clone(), item, kind.is_mutable());
					match self.with_environment(scope, |this| this.execute(body))? {
						Flow::Normal => {}
						Flow::Break => break,
						flow @ Flow::Return(_) => return Ok(flow),
					}
				}
			}
			Statement::Return(value) => {
				let value = match value {
					Some(value) => self.evaluate(value)?,
					None => Value::Undefined,
				};
				return Ok(Flow::Return(value));
			}
			Statement::Break => return Ok(Flow::Break),
			Statement::Throw { value, line } => {
				return Err(InterpreterError::Thrown { value: self.evaluate(value)?, line: *line });
			}
			Statement::Block(statements) => {
				let scope = Environment::enclosed(self.environment.clone());
				return self.with_environment(scope, |this| this.run_statements(statements));
			}
		}
		Ok(Flow::Normal)
	}

	/// Evaluate the given expression and return its value.
	fn evaluate(&mut self, expression: &Expression) -> Result<Value, InterpreterError> {
		Ok(match expression {
			Literal(literal) => match literal {
				LiteralValue::Number(n) => Value::Num(*n),
				LiteralValue::Str(s) => Value::Str(s.clone()),
				LiteralValue::Boolean(b) => Value::Bool(*b),
				LiteralValue::Null => Value::Null,
				LiteralValue::Undefined => Value::Undefined,
			},
			Variable { name, line } => self.lookup(name, *line)?,
			Array(elements) => {
				let items = elements.iter().map(|element| self.evaluate(element)).collect::<Result<Vec<_>, _>>()?;
				Value::array(items)
			}
			Object(properties) => {
				let mut entries = Vec::with_capacity(properties.len());
				for (key, value) in properties {
					entries.push((key.clone(), self.evaluate(value)?));
				}
				Value::object(entries)
			}
			Unary { operator, right } => {
				// `typeof` of an undeclared name is "undefined", not an error.
				if let (TokenType::Typeof, Variable { name, line }) = (&operator.r#type, right.as_ref()) {
					let value = match self.lookup(name, *line) {
						Err(InterpreterError::UndefinedVariable { .. }) => Value::Undefined,
						result => result?,
					};
					return Ok(Value::Str(value.type_of().to_string()));
				}
				let value = self.evaluate(right)?;
				match operator.r#type {
					TokenType::Bang => Value::Bool(!value.is_truthy()),
					TokenType::Minus => Value::Num(-value.to_number()),
					TokenType::Plus => Value::Num(value.to_number()),
					TokenType::Typeof => Value::Str(value.type_of().to_string()),
					_ => {
						return Err(InterpreterError::type_error(
							operator.line,
							format!("unsupported unary operator '{}'", operator.lexeme),
						));
					}
				}
			}
			Binary { left, operator, right } => {
				let left_value = self.evaluate(left)?;
				let right_value = self.evaluate(right)?;
				left_value.binary_op(&operator.r#type, &right_value).ok_or_else(|| {
					InterpreterError::type_error(
						operator.line,
						format!("unsupported binary operator '{}'", operator.lexeme),
					)
				})?
			}
			Logical { left, operator, right } => {
				let left_value = self.evaluate(left)?;
				let short_circuits = match operator.r#type {
					TokenType::AndAnd => !left_value.is_truthy(),
					_ => left_value.is_truthy(),
				};
				if short_circuits { left_value } else { self.evaluate(right)? }
			}
			Ternary { condition, then_branch, else_branch } => {
				if self.evaluate(condition)?.is_truthy() {
					self.evaluate(then_branch)?
				} else {
					self.evaluate(else_branch)?
				}
			}
			Grouping(inner) => self.evaluate(inner)?,
			Assign { target, value, line } => {
				let value = self.evaluate(value)?;
				self.assign(target, value.clone(), *line)?;
				value
			}
			Call { callee, line, arguments } => {
				let function = self.evaluate(callee)?;
				let arguments = self.arguments(arguments)?;
				self.call_value(&function, arguments, *line, callee)?
			}
			New { callee, line, arguments } => {
				let function = self.evaluate(callee)?;
				let arguments = self.arguments(arguments)?;
				match self.call_value(&function, arguments, *line, callee)? {
					result @ (Value::Array(_) | Value::Object(_)) => result,
					_ if matches!(&function, Value::Function(f) if matches!(f.body, CallableType::Script { .. })) => {
						Value::object(Vec::<(String, Value)>::new())
					}
					result => result,
				}
			}
			Member { object, property, line } => {
				let object = self.evaluate(object)?;
				object.property(property).map_err(|message| InterpreterError::type_error(*line, message))?
			}
			Index { object, index, line } => {
				let object = self.evaluate(object)?;
				let key = self.evaluate(index)?.coerce_string();
				object.property(&key).map_err(|message| InterpreterError::type_error(*line, message))?
			}
		})
	}

	fn lookup(&self, name: &str, line: usize) -> Result<Value, InterpreterError> {
		self.environment.borrow().lookup(name, line)
	}

	fn assign(&mut self, target: &Expression, value: Value, line: usize) -> Result<(), InterpreterError> {
		match target {
			Variable { name, .. } => self.environment.borrow_mut().assign(name, value, line),
			Member { object, property, .. } => {
				let object = self.evaluate(object)?;
				object.set_property(property, value).map_err(|message| InterpreterError::type_error(line, message))
			}
			Index { object, index, .. } => {
				let object = self.evaluate(object)?;
				let key = self.evaluate(index)?.coerce_string();
				object.set_property(&key, value).map_err(|message| InterpreterError::type_error(line, message))
			}
			_ => Err(InterpreterError::type_error(line, "Invalid left-hand side in assignment")),
		}
	}

	fn arguments(&mut self, arguments: &[Expression]) -> Result<Vec<Value>, InterpreterError> {
		arguments.iter().map(|argument| self.evaluate(argument)).collect()
	}

	fn call_value(
		&mut self,
		function: &Value,
		arguments: Vec<Value>,
		line: usize,
		callee: &Expression,
	) -> Result<Value, InterpreterError> {
		let Value::Function(callable) = function else {
			return Err(InterpreterError::type_error(line, format!("{} is not a function", describe(callee))));
		};
		match &callable.body {
			CallableType::Native(native) => native(&arguments).map_err(|message| InterpreterError::type_error(line, message)),
			CallableType::Script { function, closure } => {
				if self.depth >= MAX_CALL_DEPTH {
					return Err(InterpreterError::StackOverflow { line });
				}
				let scope = Environment::enclosed(closure.clone());
				self.depth += 1;
				let result = self.with_environment(scope, |this| this.call_script(function, arguments));
				self.depth -= 1;
				result
			}
		}
	}

	/// Bind parameters in the current (fresh) scope and run the body.
	fn call_script(&mut self, function: &Function, arguments: Vec<Value>) -> Result<Value, InterpreterError> {
		let mut arguments = arguments.into_iter();
		for parameter in &function.parameters {
			let value = match (arguments.next(), &parameter.default) {
				(None | Some(Value::Undefined), Some(default)) => self.evaluate(default)?,
				(argument, _) => argument.unwrap_or_default(),
			};
			self.environment.borrow_mut().define(parameter.name.clone(), value, true);
		}
		match self.run_statements(&function.body)? {
			Flow::Return(value) => Ok(value),
			Flow::Normal | Flow::Break => Ok(Value::Undefined),
		}
	}
}

/// Source-like name of a callee for error messages.
fn describe(expression: &Expression) -> String {
	match expression {
		Variable { name, .. } => name.clone(),
		Member { object, property, .. } => format!("{}.{property}", describe(object)),
		Index { object, .. } => format!("{}[...]", describe(object)),
		Grouping(inner) => describe(inner),
		_ => "expression".to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{adapter::OutputCapture, interpreter::natives::Output, parser::Parser, scanner::Scanner};

	/// Run `input`, returning what it printed.
	fn run(input: &str) -> Result<String, InterpreterError> {
		let capture = OutputCapture::new();
		let output: Output = RcCell::new(Box::new(capture.clone()));
		let globals = RcCell::new(Environment::new());
		natives::install(&mut globals.borrow_mut(), &output);

		let statements = Parser::new(Scanner::new(input).scan_tokens().unwrap()).parse().unwrap();
		let mut interpreter = Interpreter::new(Environment::enclosed(globals));
		interpreter.interpret(&statements)?;
		Ok(capture.contents())
	}

	fn prints(input: &str, expected: &str) {
		assert_eq!(run(input).unwrap(), expected, "{input}");
	}

	fn fails(input: &str, message: &str) {
		assert_eq!(run(input).unwrap_err().to_string(), message, "{input}");
	}

	#[test]
	fn declarations_and_printing() {
		prints("const deal = \"Classified\";\nconsole.log(deal);", "Classified\n");
		prints("let x;\nconsole.log(x);\nx = 3;\nconsole.log(x * 2);", "undefined\n6\n");
		prints("var crew = ['a', 'b'];\nconsole.log(crew, crew.length);", "[ 'a', 'b' ] 2\n");
		prints("console.log({ name: 'Jeff', age: 66 });", "{ name: 'Jeff', age: 66 }\n");
	}

	#[test]
	fn conditionals() {
		prints("if (true) {\n  console.log(\"Approved\");\n}", "Approved\n");
		prints(
			"const n = 5;\nif (n < 3) {\n  console.log('low');\n} else if (n < 10) {\n  console.log('mid');\n} else {\n  console.log('high');\n}",
			"mid\n",
		);
		prints("console.log(alibi ? 'yes' : 'no');", "no\n");
	}

	#[test]
	fn loops() {
		prints("const crew = ['x', 'y', 'z'];\nfor (const item of crew) {\n  console.log(item);\n}", "x\ny\nz\n");
		prints("for (const item of [1, 2, 3, 4]) {\n  if (item == 3) {\n    break;\n  }\n  console.log(item);\n}", "1\n2\n");
		prints("for (const c of 'ab') {\n  console.log(c);\n}", "a\nb\n");
		prints("for (const n of range(3)) {\n  console.log(n);\n}", "0\n1\n2\n");
		fails("for (const n of 5) {\n}", "line 1: TypeError: 5 is not iterable");
	}

	#[test]
	fn functions() {
		prints("function add(a, b) {\n  return a + b;\n}\nconsole.log(add(2, 3));", "5\n");
		prints("console.log(early());\nfunction early() {\n  return 'hoisted';\n}", "hoisted\n");
		prints("function greet(name = 'agent') {\n  return 'hi ' + name;\n}\nconsole.log(greet(), greet('Bill'));", "hi agent hi Bill\n");
		prints("function noop() {\n}\nconsole.log(noop());", "undefined\n");
		prints(
			"function fact(n) {\n  if (n <= 1) {\n    return 1;\n  }\n  return n * fact(n - 1);\n}\nconsole.log(fact(10));",
			"3628800\n",
		);
		prints("function find(items) {\n  for (const i of items) {\n    return i;\n  }\n}\nconsole.log(find([7, 8]));", "7\n");
	}

	#[test]
	fn closures_share_scope() {
		prints(
			"function counter() {\n  let count = 0;\n  function next() {\n    count = count + 1;\n    return count;\n  }\n  return next;\n}\nconst tick = counter();\ntick();\nconsole.log(tick());",
			"2\n",
		);
	}

	#[test]
	fn block_scoping() {
		prints("let a = 1;\n{\n  let a = 2;\n  console.log(a);\n}\nconsole.log(a);", "2\n1\n");
		prints("let a = 1;\n{\n  a = 2;\n}\nconsole.log(a);", "2\n");
		fails("{\n  const hidden = 1;\n}\nconsole.log(hidden);", "line 4: ReferenceError: hidden is not defined");
	}

	#[test]
	fn top_level_return_stops_the_program() {
		prints("console.log(1);\nreturn;\nconsole.log(2);", "1\n");
	}

	#[test]
	fn members_and_methods() {
		prints("const crew = [];\ncrew.push('a', 'b');\nconsole.log(crew.join('-'), crew.indexOf('b'));", "a-b 1\n");
		prints("const agenda = {};\nagenda.plan = 'x';\nagenda['other'] = 2;\nconsole.log(agenda);", "{ plan: 'x', other: 2 }\n");
		prints("const s = ' Secret ';\nconsole.log(s.trim().toUpperCase());", "SECRET\n");
		prints("const m = [[1, 2], [3]];\nm[1][1] = 4;\nconsole.log(m[1], m[0][1]);", "[ 3, 4 ] 2\n");
		fails("const a = null;\na.b;", "line 2: TypeError: Cannot read properties of null (reading 'b')");
	}

	#[test]
	fn operators() {
		prints("console.log(1 + 2 * 3, (1 + 2) * 3, 7 % 4, 1 / 0);", "7 9 3 Infinity\n");
		prints("console.log('a' + 1, 1 + '1', '3' * '4');", "a1 11 12\n");
		prints("console.log(1 == '1', 1 === '1', null == undefined, 2 !== 2);", "true false true false\n");
		prints("console.log(0 || 'fallback', 1 && 'second', !'', -'5');", "fallback second true -5\n");
		prints("console.log(typeof 1, typeof 'x', typeof null, typeof missing, typeof console.log);", "number string object undefined function\n");
	}

	#[test]
	fn runtime_errors() {
		fails("const a = 1;\na = 2;", "line 2: TypeError: Assignment to constant variable.");
		fails("missing = 1;", "line 1: ReferenceError: missing is not defined");
		fails("console.log(ghost);", "line 1: ReferenceError: ghost is not defined");
		fails("const x = 1;\nx();", "line 2: TypeError: x is not a function");
		fails("console.nope();", "line 1: TypeError: console.nope is not a function");
		fails("truth = lie;", "line 1: TypeError: Assignment to constant variable.");
	}

	#[test]
	fn throw_carries_the_value() {
		let err = run("throw new Error('boom');").unwrap_err();
		match &err {
			InterpreterError::Thrown { value, .. } => assert_eq!(value.error_summary(), "Error: boom"),
			other => panic!("unexpected error {other:?}"),
		}
		assert_eq!(err.to_string(), "Uncaught Error: boom");
		fails("throw 'plain';", "Uncaught plain");
		assert_eq!(run("const a = 1;\n\nthrow a;").unwrap_err().line(), 3);
	}

	#[test]
	fn declarations_are_unusable_before_they_run() {
		let uninitialized = |line: usize, name: &str| {
			format!("line {line}: ReferenceError: Cannot access '{name}' before initialization")
		};
		fails("const total = 0;\n{\n  const total = total + 1;\n}", &uninitialized(3, "total"));
		fails(
			"const total = 0;\nfor (const item of [1, 2]) {\n  const total = total + item;\n  console.log(total);\n}",
			&uninitialized(3, "total"),
		);
		fails("console.log(later);\nlet later = 1;", &uninitialized(1, "later"));
		fails("later = 2;\nlet later = 1;", &uninitialized(1, "later"));
		fails("typeof later;\nlet later = 1;", &uninitialized(1, "later"));
		fails("function peek() {\n  return secret;\n}\npeek();\nconst secret = 1;", &uninitialized(2, "secret"));

		prints("function peek() {\n  return secret;\n}\nconst secret = 1;\nconsole.log(peek());", "1\n");
		prints("let a = 1;\n{\n  console.log(a);\n}", "1\n");
		prints("function f(a) {\n  var b = a + 1;\n  return b;\n}\nconsole.log(f(1));", "2\n");
	}

	#[test]
	fn new_with_script_function_yields_object() {
		prints("function Agent() {\n}\nconsole.log(new Agent());", "{}\n");
		prints("function Pair() {\n  return [1, 2];\n}\nconsole.log(new Pair());", "[ 1, 2 ]\n");
	}

	#[test]
	fn deep_recursion_is_a_range_error() {
		// Debug builds need more than the default test thread stack.
		let handle = std::thread::Builder::new()
			.stack_size(64 * 1024 * 1024)
			.spawn(|| run("function down(n) {\n  return down(n + 1);\n}\ndown(0);").unwrap_err().to_string())
			.unwrap();
		assert_eq!(handle.join().unwrap(), "line 2: RangeError: Maximum call stack size exceeded");
	}
}
