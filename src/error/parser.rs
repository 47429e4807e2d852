/// A syntax error in generated host code.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}: {type}")]
pub struct ParseError {
	line:   usize,
	r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, r#type: ParseErrorType) -> Self { Self { line, r#type } }

	pub fn line(&self) -> usize { self.line }

	pub fn error_type(&self) -> &ParseErrorType { &self.r#type }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
	/// Found something that cannot start an expression.
	ExpectedExpression(String),
	/// Expected one token, found another.
	UnexpectedToken { expected: &'static str, found: String },
	/// Ran out of tokens in the middle of a construct.
	UnexpectedEof,
	/// Left-hand side of `=` is not a binding or property.
	InvalidAssignmentTarget,
	/// A lexical declaration collides with another name in the same block.
	DuplicateDeclaration(String),
	/// `const` without `= value`.
	MissingInitializer(String),
	/// `break` outside of a loop body.
	IllegalBreak,
	/// Blocks or expressions nested past the parser's limit.
	NestingTooDeep,
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			ExpectedExpression(found) => write!(f, "Expected expression, found '{found}'"),
			UnexpectedToken { expected, found } => write!(f, "Expected {expected}, found '{found}'"),
			UnexpectedEof => write!(f, "Unexpected end of input"),
			InvalidAssignmentTarget => write!(f, "Invalid left-hand side in assignment"),
			DuplicateDeclaration(name) => write!(f, "Identifier '{name}' has already been declared"),
			MissingInitializer(name) => write!(f, "Missing initializer in const declaration '{name}'"),
			IllegalBreak => write!(f, "Illegal break statement"),
			NestingTooDeep => write!(f, "Maximum nesting depth exceeded"),
		}
	}
}
