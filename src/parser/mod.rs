//! The `Scanner` works on the lexical grammar, its alphabet is characters.
//! The `Parser` works on the syntactic grammar, its alphabet is tokens and
//! the strings it accepts are statements and expressions.
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assignment|=|Right
//! Ternary|?:|Right
//! Or|\|\||Left
//! And|&&|Left
//! Equality|== != === !==|Left
//! Comparison|< > <= >=|Left
//! Term|+ -|Left
//! Factor|* / %|Left
//! Unary|! - + typeof|Right
//!
//! Grammar:
//!
//! ``` BNF
//! program        → statement* EOF ;
//! statement      → block | declaration | function | if | for | return
//!                | break | throw | ";" | expression ";"? ;
//! declaration    → ( "const" | "let" | "var" ) IDENTIFIER ( "=" expression )? ";"? ;
//! function       → "function" IDENTIFIER "(" parameters? ")" block ;
//! if             → "if" "(" expression ")" statement ( "else" statement )? ;
//! for            → "for" "(" ( "const" | "let" | "var" ) IDENTIFIER "of" expression ")" statement ;
//! expression     → assignment ;
//! assignment     → ternary ( "=" assignment )? ;
//! ternary        → or ( "?" assignment ":" assignment )? ;
//! or             → and ( "||" and )* ;
//! and            → equality ( "&&" equality )* ;
//! equality       → comparison ( ( "!=" | "==" | "!==" | "===" ) comparison )* ;
//! comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
//! term           → factor ( ( "-" | "+" ) factor )* ;
//! factor         → unary ( ( "/" | "*" | "%" ) unary )* ;
//! unary          → ( "!" | "-" | "+" | "typeof" ) unary | call ;
//! call           → ( primary | "new" member arguments? ) ( arguments | "." WORD | "[" expression "]" )* ;
//! primary        → NUMBER | STRING | "true" | "false" | "null" | "undefined" | IDENTIFIER
//!                | "(" expression ")" | "[" elements? "]" | "{" properties? "}" ;
//! ```
//!
//! Semicolons are optional at a line break, before `}` and at the end of
//! input, which is all the automatic insertion generated code relies on.

pub(crate) mod expression;

use std::{collections::HashMap, iter::Peekable, rc::Rc, vec::IntoIter};

use TokenType::*;
use expression::{Expression, LiteralValue};

use crate::{
	error::parser::{ParseError, ParseErrorType},
	scanner::{Token, TokenType},
	statement::{DeclarationKind, Function, Parameter, Statement},
};

/// Statements, operators and calls nested inside each other before parsing
/// gives up.
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

/// How a name entered a scope, for redeclaration checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
	Lexical,
	Var,
	Function,
}

/// Recursive descent parser over the scanner's tokens.
pub(crate) struct Parser {
	/// The tokens to parse.
	tokens:        Peekable<IntoIter<Token>>,
	/// Line of the last consumed token.
	previous_line: usize,
	/// Names declared in each open block, innermost last.
	scopes:        Vec<HashMap<String, Binding>>,
	/// Loops enclosing the current statement within the current function.
	loop_depth:    usize,
	/// Current nesting, bounded by [`MAX_NESTING_DEPTH`].
	depth:         usize,
}

type ExprResult = Result<Box<Expression>, ParseError>;

impl Parser {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self {
			tokens:        tokens.into_iter().peekable(),
			previous_line: 1,
			scopes:        vec![HashMap::new()],
			loop_depth:    0,
			depth:         0,
		}
	}

	/// Parse a whole program.
	pub fn parse(mut self) -> Result<Vec<Statement>, ParseError> {
		let mut statements = Vec::new();
		while !self.check(&Eof) {
			statements.push(self.statement()?);
		}
		Ok(statements)
	}

	/// Parse input that must be exactly one expression, optionally followed by
	/// a semicolon.
	pub fn parse_expression(mut self) -> Result<Expression, ParseError> {
		let expression = self.expression()?;
		self.match_token(&Semicolon);
		if !self.check(&Eof) {
			return Err(self.unexpected("end of input"));
		}
		Ok(*expression)
	}

	fn statement(&mut self) -> Result<Statement, ParseError> { self.nested(Self::any_statement) }

	fn any_statement(&mut self) -> Result<Statement, ParseError> {
		let r#type = self.peek()?.r#type.clone();
		match r#type {
			LeftBrace => {
				self.advance()?;
				self.scopes.push(HashMap::new());
				let statements = self.block_body();
				self.scopes.pop();
				Ok(Statement::Block(statements?))
			}
			Const | Let | Var => self.declaration(),
			TokenType::Function => self.function(),
			If => self.if_statement(),
			For => self.for_statement(),
			Return => {
				self.advance()?;
				let value = if self.at_statement_end() { None } else { Some(*self.expression()?) };
				self.consume_semicolon()?;
				Ok(Statement::Return(value))
			}
			Break => {
				let line = self.advance()?.line;
				if self.loop_depth == 0 {
					return Err(ParseError::new(line, ParseErrorType::IllegalBreak));
				}
				self.consume_semicolon()?;
				Ok(Statement::Break)
			}
			Throw => {
				let line = self.advance()?.line;
				let value = *self.expression()?;
				self.consume_semicolon()?;
				Ok(Statement::Throw { value, line })
			}
			Semicolon => {
				self.advance()?;
				Ok(Statement::Empty)
			}
			_ => {
				let expression = *self.expression()?;
				self.consume_semicolon()?;
				Ok(Statement::Expression(expression))
			}
		}
	}

	/// Statements up to and including the closing `}`. The caller owns the
	/// scope.
	fn block_body(&mut self) -> Result<Vec<Statement>, ParseError> {
		let mut statements = Vec::new();
		while !self.check(&RightBrace) {
			if self.check(&Eof) {
				return Err(ParseError::new(self.peek()?.line, ParseErrorType::UnexpectedEof));
			}
			statements.push(self.statement()?);
		}
		self.advance()?; // consume '}'
		Ok(statements)
	}

	fn declaration(&mut self) -> Result<Statement, ParseError> {
		let kind = self.declaration_kind()?;
		let (name, line) = self.identifier("variable name")?;
		self.declare(&name, kind.into(), line)?;
		let initializer = if self.match_token(&Equal) { Some(*self.expression()?) } else { None };
		if kind == DeclarationKind::Const && initializer.is_none() {
			return Err(ParseError::new(line, ParseErrorType::MissingInitializer(name)));
		}
		self.consume_semicolon()?;
		Ok(Statement::Declaration { kind, name, initializer })
	}

	fn declaration_kind(&mut self) -> Result<DeclarationKind, ParseError> {
		let token = self.advance()?;
		match token.r#type {
			Const => Ok(DeclarationKind::Const),
			Let => Ok(DeclarationKind::Let),
			Var => Ok(DeclarationKind::Var),
			_ => Err(Self::unexpected_token(token, "'const', 'let' or 'var'")),
		}
	}

	fn function(&mut self) -> Result<Statement, ParseError> {
		self.advance()?; // consume 'function'
		let (name, line) = self.identifier("function name")?;
		self.declare(&name, Binding::Function, line)?;
		self.expect(&LeftParen, "'('")?;

		self.scopes.push(HashMap::new());
		let loop_depth = std::mem::take(&mut self.loop_depth);
		let result = self.function_rest(name);
		self.loop_depth = loop_depth;
		self.scopes.pop();

		Ok(Statement::FunDecl(Rc::new(result?)))
	}

	/// Parameters and body, the `(` already consumed.
	fn function_rest(&mut self, name: String) -> Result<Function, ParseError> {
		let mut parameters = Vec::new();
		while !self.check(&RightParen) {
			let (parameter, line) = self.identifier("parameter name")?;
			self.declare(&parameter, Binding::Var, line)?;
			let default = if self.match_token(&Equal) { Some(*self.assignment()?) } else { None };
			parameters.push(Parameter { name: parameter, default });
			if !self.match_token(&Comma) {
				break;
			}
		}
		self.expect(&RightParen, "')'")?;
		self.expect(&LeftBrace, "'{'")?;
		let body = self.block_body()?;
		Ok(Function { name, parameters, body })
	}

	fn if_statement(&mut self) -> Result<Statement, ParseError> {
		self.advance()?; // consume 'if'
		self.expect(&LeftParen, "'('")?;
		let condition = *self.expression()?;
		self.expect(&RightParen, "')'")?;
		let then_branch = Box::new(self.statement()?);
		let else_branch = if self.match_token(&Else) { Some(Box::new(self.statement()?)) } else { None };
		Ok(Statement::If { condition, then_branch, else_branch })
	}

	fn for_statement(&mut self) -> Result<Statement, ParseError> {
		let line = self.advance()?.line;
		self.expect(&LeftParen, "'('")?;
		let kind = self.declaration_kind()?;
		let (binding, binding_line) = self.identifier("loop variable")?;
		self.expect(&Of, "'of'")?;
		let iterable = *self.expression()?;
		self.expect(&RightParen, "')'")?;

		self.scopes.push(HashMap::new());
		self.loop_depth += 1;
		let body = self.declare(&binding, kind.into(), binding_line).and_then(|_| self.statement());
		self.loop_depth -= 1;
		self.scopes.pop();

		Ok(Statement::ForOf { kind, binding, iterable, line, body: Box::new(body?) })
	}

	/// Parse an expression.
	fn expression(&mut self) -> ExprResult { self.assignment() }

	fn assignment(&mut self) -> ExprResult { self.nested(Self::assignment_or_ternary) }

	fn assignment_or_ternary(&mut self) -> ExprResult {
		let target = self.ternary()?;
		if self.check(&Equal) {
			let line = self.advance()?.line;
			if !target.is_assignable() {
				return Err(ParseError::new(line, ParseErrorType::InvalidAssignmentTarget));
			}
			let value = self.assignment()?;
			return Ok(Expression::assign(target, value, line));
		}
		Ok(target)
	}

	fn ternary(&mut self) -> ExprResult {
		let condition = self.or()?;
		if self.match_token(&Question) {
			let then_branch = self.assignment()?;
			self.expect(&Colon, "':'")?;
			let else_branch = self.assignment()?;
			return Ok(Expression::ternary(condition, then_branch, else_branch));
		}
		Ok(condition)
	}

	fn or(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.and()?;
		while self.check(&OrOr) {
			self.deepen()?;
			expression = Expression::logical(expression, self.advance()?, self.and()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	fn and(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.equality()?;
		while self.check(&AndAnd) {
			self.deepen()?;
			expression = Expression::logical(expression, self.advance()?, self.equality()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse equality expressions.
	fn equality(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.comparison()?;
		while matches!(self.peek()?.r#type, BangEqual | EqualEqual | BangEqualEqual | EqualEqualEqual) {
			self.deepen()?;
			expression = Expression::binary(expression, self.advance()?, self.comparison()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse comparison expressions.
	fn comparison(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.term()?;
		while matches!(self.peek()?.r#type, Greater | GreaterEqual | Less | LessEqual) {
			self.deepen()?;
			expression = Expression::binary(expression, self.advance()?, self.term()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse term expressions.
	fn term(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.factor()?;
		while matches!(self.peek()?.r#type, Minus | Plus) {
			self.deepen()?;
			expression = Expression::binary(expression, self.advance()?, self.factor()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse factor expressions.
	fn factor(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = self.unary()?;
		while matches!(self.peek()?.r#type, Slash | Star | Percent) {
			self.deepen()?;
			expression = Expression::binary(expression, self.advance()?, self.unary()?)
		}
		self.depth = depth;
		Ok(expression)
	}

	/// Parse unary expressions.
	fn unary(&mut self) -> ExprResult {
		if matches!(self.peek()?.r#type, Bang | Minus | Plus | Typeof) {
			let operator = self.advance()?;
			return Ok(Expression::unary(operator, self.nested(Self::unary)?));
		}
		self.call()
	}

	/// Calls, member access and indexing, all left associative.
	fn call(&mut self) -> ExprResult {
		let depth = self.depth;
		let mut expression = if self.check(&New) { self.nested(Self::new_expression)? } else { self.primary()? };
		loop {
			let r#type = self.peek()?.r#type.clone();
			if matches!(r#type, LeftParen | Dot | LeftBracket) {
				self.deepen()?;
			}
			expression = match r#type {
				LeftParen => {
					let line = self.advance()?.line;
					Expression::call(expression, line, self.arguments()?)
				}
				Dot => {
					let line = self.advance()?.line;
					Expression::member(expression, self.property_name()?, line)
				}
				LeftBracket => {
					let line = self.advance()?.line;
					let index = self.expression()?;
					self.expect(&RightBracket, "']'")?;
					Expression::index(expression, index, line)
				}
				_ => break,
			};
		}
		self.depth = depth;
		Ok(expression)
	}

	/// `new Callee.path(arguments)`, the argument list may be omitted.
	fn new_expression(&mut self) -> ExprResult {
		let line = self.advance()?.line;
		let mut callee = if self.check(&New) { self.nested(Self::new_expression)? } else { self.primary()? };
		while self.check(&Dot) {
			let line = self.advance()?.line;
			callee = Expression::member(callee, self.property_name()?, line);
		}
		let arguments = if self.match_token(&LeftParen) { self.arguments()? } else { Vec::new() };
		Ok(Expression::new_instance(callee, line, arguments))
	}

	/// Comma separated arguments, the `(` already consumed.
	fn arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
		let mut arguments = Vec::new();
		while !self.check(&RightParen) {
			arguments.push(*self.assignment()?);
			if !self.match_token(&Comma) {
				break;
			}
		}
		self.expect(&RightParen, "')'")?;
		Ok(arguments)
	}

	/// Parse primary expressions.
	fn primary(&mut self) -> ExprResult {
		let token = self.advance()?;
		let expression = match token.r#type {
			False => Expression::Literal(LiteralValue::Boolean(false)),
			True => Expression::Literal(LiteralValue::Boolean(true)),
			Null => Expression::Literal(LiteralValue::Null),
			Undefined => Expression::Literal(LiteralValue::Undefined),
			NumberLiteral(n) => Expression::Literal(LiteralValue::Number(n)),
			StringLiteral(s) => Expression::Literal(LiteralValue::Str(s)),
			Identifier(name) => Expression::Variable { name, line: token.line },
			LeftParen => {
				let expression = self.expression()?;
				self.expect(&RightParen, "')'")?;
				return Ok(Expression::grouping(expression));
			}
			LeftBracket => {
				let mut elements = Vec::new();
				while !self.check(&RightBracket) {
					elements.push(*self.assignment()?);
					if !self.match_token(&Comma) {
						break;
					}
				}
				self.expect(&RightBracket, "']'")?;
				Expression::Array(elements)
			}
			LeftBrace => Expression::Object(self.properties()?),
			Eof => return Err(ParseError::new(token.line, ParseErrorType::UnexpectedEof)),
			_ => return Err(ParseError::new(token.line, ParseErrorType::ExpectedExpression(token.lexeme))),
		};
		Ok(Box::new(expression))
	}

	/// Object literal properties, the `{` already consumed.
	fn properties(&mut self) -> Result<Vec<(String, Expression)>, ParseError> {
		let mut properties = Vec::new();
		while !self.check(&RightBrace) {
			let token = self.advance()?;
			let key = match &token.r#type {
				StringLiteral(s) => Some(s.clone()),
				NumberLiteral(n) => Some(n.to_string()),
				r#type if r#type.is_word() => Some(token.lexeme.clone()),
				_ => None,
			};
			let Some(key) = key else {
				return Err(Self::unexpected_token(token, "property name"));
			};
			let value = if self.match_token(&Colon) {
				*self.assignment()?
			} else if matches!(token.r#type, Identifier(_)) {
				// `{ name }` shorthand
				Expression::Variable { name: key.clone(), line: token.line }
			} else {
				return Err(self.unexpected("':'"));
			};
			properties.push((key, value));
			if !self.match_token(&Comma) {
				break;
			}
		}
		self.expect(&RightBrace, "'}'")?;
		Ok(properties)
	}

	/// Identifiers and keywords are both allowed after `.`.
	fn property_name(&mut self) -> Result<String, ParseError> {
		let token = self.advance()?;
		if token.r#type.is_word() { Ok(token.lexeme) } else { Err(Self::unexpected_token(token, "property name")) }
	}

	fn identifier(&mut self, expected: &'static str) -> Result<(String, usize), ParseError> {
		let token = self.advance()?;
		match token.r#type {
			Identifier(name) => Ok((name, token.line)),
			_ => Err(Self::unexpected_token(token, expected)),
		}
	}

	/// One level deeper. Fails past [`MAX_NESTING_DEPTH`], before the stack
	/// runs out.
	fn deepen(&mut self) -> Result<(), ParseError> {
		if self.depth >= MAX_NESTING_DEPTH {
			return Err(ParseError::new(self.previous_line, ParseErrorType::NestingTooDeep));
		}
		self.depth += 1;
		Ok(())
	}

	/// Run `parse` one level deeper.
	fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
		self.deepen()?;
		let result = parse(self);
		self.depth -= 1;
		result
	}

	/// Record a declaration in the innermost scope. Lexical bindings may not
	/// share a name with anything else in the same block.
	fn declare(&mut self, name: &str, binding: Binding, line: usize) -> Result<(), ParseError> {
		let Some(scope) = self.scopes.last_mut() else {
			return Ok(());
		};
		let existing = scope.get(name).copied();
		if existing.is_some_and(|existing| existing == Binding::Lexical || binding == Binding::Lexical) {
			return Err(ParseError::new(line, ParseErrorType::DuplicateDeclaration(name.to_string())));
		}
		scope.insert(name.to_string(), binding);
		Ok(())
	}

	/// True where an optional `return` value can't start.
	fn at_statement_end(&mut self) -> bool {
		let previous_line = self.previous_line;
		self.peek().map_or(true, |token| {
			matches!(token.r#type, Semicolon | RightBrace | Eof) || token.line > previous_line
		})
	}

	/// A `;` is required only between two statements on the same line.
	fn consume_semicolon(&mut self) -> Result<(), ParseError> {
		if self.match_token(&Semicolon) || self.at_statement_end() {
			return Ok(());
		}
		Err(self.unexpected("';'"))
	}

	fn expect(&mut self, r#type: &TokenType, expected: &'static str) -> Result<Token, ParseError> {
		if self.check(r#type) {
			return self.advance();
		}
		Err(self.unexpected(expected))
	}

	fn unexpected(&mut self, expected: &'static str) -> ParseError {
		match self.peek() {
			Ok(token) => Self::unexpected_token(token.clone(), expected),
			Err(error) => error,
		}
	}

	fn unexpected_token(token: Token, expected: &'static str) -> ParseError {
		let r#type = match token.r#type {
			Eof => ParseErrorType::UnexpectedEof,
			_ => ParseErrorType::UnexpectedToken { expected, found: token.lexeme },
		};
		ParseError::new(token.line, r#type)
	}

	fn check(&mut self, r#type: &TokenType) -> bool { self.peek().is_ok_and(|token| &token.r#type == r#type) }

	fn match_token(&mut self, r#type: &TokenType) -> bool {
		if self.check(r#type) {
			// The token is known to be there.
			let _ = self.advance();
			return true;
		}
		false
	}

	/// Advance to the next token. `Eof` is never consumed, so the parser can
	/// always peek.
	fn advance(&mut self) -> Result<Token, ParseError> {
		let at_eof = self.peek()?.r#type == Eof;
		let next = if at_eof { self.tokens.peek().cloned() } else { self.tokens.next() };
		let token = next.ok_or_else(|| ParseError::new(self.previous_line, ParseErrorType::UnexpectedEof))?;
		self.previous_line = token.line;
		Ok(token)
	}

	/// Peek at the current token.
	fn peek(&mut self) -> Result<&Token, ParseError> {
		let line = self.previous_line;
		self.tokens.peek().ok_or_else(|| ParseError::new(line, ParseErrorType::UnexpectedEof))
	}
}

impl From<DeclarationKind> for Binding {
	fn from(kind: DeclarationKind) -> Self {
		match kind {
			DeclarationKind::Var => Binding::Var,
			DeclarationKind::Const | DeclarationKind::Let => Binding::Lexical,
		}
	}
}
