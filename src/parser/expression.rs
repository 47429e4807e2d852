//! Expression AST nodes
//!
//! An `Expression` is a tree structure representing code like
//! `console.log(crew[0] + "!")` as nested nodes.

use Expression::*;

use crate::scanner::Token;

/// Expression AST nodes
#[derive(Debug, Clone)]
pub(crate) enum Expression {
	Literal(LiteralValue),
	Variable { name: String, line: usize },
	Array(Vec<Expression>),
	Object(Vec<(String, Expression)>),
	Unary { operator: Token, right: Box<Expression> },
	Binary { left: Box<Expression>, operator: Token, right: Box<Expression> },
	Logical { left: Box<Expression>, operator: Token, right: Box<Expression> },
	Ternary { condition: Box<Expression>, then_branch: Box<Expression>, else_branch: Box<Expression> },
	Grouping(Box<Expression>),
	Assign { target: Box<Expression>, value: Box<Expression>, line: usize },
	Call { callee: Box<Expression>, line: usize, arguments: Vec<Expression> },
	New { callee: Box<Expression>, line: usize, arguments: Vec<Expression> },
	Member { object: Box<Expression>, property: String, line: usize },
	Index { object: Box<Expression>, index: Box<Expression>, line: usize },
}

impl Expression {
	pub fn unary(operator: Token, right: Box<Self>) -> Box<Self> { Box::new(Unary { operator, right }) }

	pub fn binary(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Binary { left, operator, right })
	}

	pub fn logical(left: Box<Self>, operator: Token, right: Box<Self>) -> Box<Self> {
		Box::new(Logical { left, operator, right })
	}

	pub fn ternary(condition: Box<Self>, then_branch: Box<Self>, else_branch: Box<Self>) -> Box<Self> {
		Box::new(Ternary { condition, then_branch, else_branch })
	}

	pub fn grouping(expr: Box<Self>) -> Box<Self> { Box::new(Grouping(expr)) }

	pub fn assign(target: Box<Self>, value: Box<Self>, line: usize) -> Box<Self> {
		Box::new(Assign { target, value, line })
	}

	pub fn call(callee: Box<Self>, line: usize, arguments: Vec<Self>) -> Box<Self> {
		Box::new(Call { callee, line, arguments })
	}

	pub fn new_instance(callee: Box<Self>, line: usize, arguments: Vec<Self>) -> Box<Self> {
		Box::new(New { callee, line, arguments })
	}

	pub fn member(object: Box<Self>, property: String, line: usize) -> Box<Self> {
		Box::new(Member { object, property, line })
	}

	pub fn index(object: Box<Self>, index: Box<Self>, line: usize) -> Box<Self> {
		Box::new(Index { object, index, line })
	}

	/// Only bindings and properties can be assigned to.
	pub fn is_assignable(&self) -> bool { matches!(self, Variable { .. } | Member { .. } | Index { .. }) }
}

/// Literal values in the AST
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LiteralValue {
	Number(f64),
	Str(String),
	Boolean(bool),
	Null,
	Undefined,
}

fn join(items: &[Expression]) -> String { items.iter().map(|arg| arg.to_string()).collect::<Vec<String>>().join(" ") }

impl std::fmt::Display for Expression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Literal(lit) => write!(f, "{lit}"),
			Variable { name, .. } => write!(f, "{name}"),
			Array(elements) => write!(f, "[{}]", join(elements)),
			Object(properties) => write!(
				f,
				"{{{}}}",
				properties.iter().map(|(key, value)| format!("{key}: {value}")).collect::<Vec<String>>().join(", ")
			),
			Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
			Binary { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Logical { left, operator, right } => write!(f, "({} {left} {right})", operator.lexeme),
			Ternary { condition, then_branch, else_branch } => {
				write!(f, "(? {condition} : {then_branch} {else_branch})")
			}
			Grouping(expression) => write!(f, "(group {expression})"),
			Assign { target, value, .. } => write!(f, "(= {target} {value})"),
			Call { callee, arguments, .. } => write!(f, "(call {callee} ({}))", join(arguments)),
			New { callee, arguments, .. } => write!(f, "(new {callee} ({}))", join(arguments)),
			Member { object, property, .. } => write!(f, "(. {object} {property})"),
			Index { object, index, .. } => write!(f, "([] {object} {index})"),
		}
	}
}

impl std::fmt::Display for LiteralValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LiteralValue::Number(n) => write!(f, "{n}"),
			LiteralValue::Str(s) => write!(f, "\"{s}\""),
			LiteralValue::Boolean(b) => write!(f, "{b}"),
			LiteralValue::Null => write!(f, "null"),
			LiteralValue::Undefined => write!(f, "undefined"),
		}
	}
}
