//! There is no place in the grammar where both an expression and a statement
//! are allowed. The operands of, say, `+` are always expressions, never
//! statements. The body of a `for` loop is always a statement.

use std::rc::Rc;

use crate::parser::expression::Expression;

/// A statement in host code.
#[derive(Debug, Clone)]
pub(crate) enum Statement {
	/// An expression used as a statement.
	Expression(Expression),
	/// `const`, `let` or `var` binding.
	Declaration {
		kind:        DeclarationKind,
		name:        String,
		initializer: Option<Expression>,
	},
	FunDecl(Rc<Function>),
	If {
		condition:   Expression,
		then_branch: Box<Statement>,
		else_branch: Option<Box<Statement>>,
	},
	/// `for (const item of items) body`
	ForOf {
		kind:     DeclarationKind,
		binding:  String,
		iterable: Expression,
		line:     usize,
		body:     Box<Statement>,
	},
	/// A return statement.
	Return(Option<Expression>),
	Break,
	Throw {
		value: Expression,
		line:  usize,
	},
	/// A block of statements.
	Block(Vec<Statement>),
	/// A lone `;`.
	Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclarationKind {
	Const,
	Let,
	Var,
}

impl DeclarationKind {
	pub fn is_mutable(self) -> bool { !matches!(self, DeclarationKind::Const) }
}

/// A function declaration or expression body.
#[derive(Debug)]
pub(crate) struct Function {
	pub name:       String,
	pub parameters: Vec<Parameter>,
	pub body:       Vec<Statement>,
}

/// A parameter with an optional default value, `name = expression`.
#[derive(Debug, Clone)]
pub(crate) struct Parameter {
	pub name:    String,
	pub default: Option<Expression>,
}

impl std::fmt::Display for DeclarationKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			DeclarationKind::Const => "const",
			DeclarationKind::Let => "let",
			DeclarationKind::Var => "var",
		})
	}
}

impl std::fmt::Display for Statement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Statement::Expression(expression) => write!(f, "{expression};"),
			Statement::Declaration { kind, name, initializer: Some(value), .. } => write!(f, "({kind} {name} {value})"),
			Statement::Declaration { kind, name, initializer: None, .. } => write!(f, "({kind} {name})"),
			Statement::FunDecl(function) => {
				let parameters = function.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(" ");
				write!(f, "(fun {} ({parameters}) ", function.name)?;
				write_block(f, &function.body)?;
				write!(f, ")")
			}
			Statement::If { condition, then_branch, else_branch: Some(else_branch) } => {
				write!(f, "(if {condition} {then_branch} {else_branch})")
			}
			Statement::If { condition, then_branch, else_branch: None } => write!(f, "(if {condition} {then_branch})"),
			Statement::ForOf { kind, binding, iterable, body, .. } => {
				write!(f, "(for ({kind} {binding}) {iterable} {body})")
			}
			Statement::Return(Some(value)) => write!(f, "(return {value})"),
			Statement::Return(None) => write!(f, "(return)"),
			Statement::Break => write!(f, "(break)"),
			Statement::Throw { value, .. } => write!(f, "(throw {value})"),
			Statement::Block(statements) => write_block(f, statements),
			Statement::Empty => write!(f, ";"),
		}
	}
}

fn write_block(f: &mut std::fmt::Formatter<'_>, statements: &[Statement]) -> std::fmt::Result {
	write!(f, "{{")?;
	for (i, statement) in statements.iter().enumerate() {
		if i > 0 {
			write!(f, " ")?;
		}
		write!(f, "{statement}")?;
	}
	write!(f, "}}")
}
