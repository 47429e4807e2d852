//! Scanner for host code, the JavaScript-like text the translator emits.
//!
//! The scanner groups characters into lexemes and remembers which kind of
//! lexeme each one is, so the parser can ask "is the next token `for`?"
//! without comparing strings. Literal lexemes are converted to their runtime
//! form here: string escapes are resolved and numbers parsed.
//!
//! Whitespace, newlines and comments are dropped. Generated code uses `//`
//! comments for lines the translator could not understand, so a file made of
//! nothing but those comments scans to a lone `Eof`.
//!
//! We can't tell a reserved word from an identifier until we've reached the
//! end of the word, this is `maximal munch`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
pub(crate) use token::*;

use crate::error::scanner::{ScanError, ScanErrorType};

/// A scanner for host source code
pub(crate) struct Scanner<'a> {
	/// Host source code
	source:      &'a str,
	/// Host source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points just past the character currently being considered
	cursor:      usize,
	/// Line the scanner is on, so tokens know their location.
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code. The first error stops the scan.
	pub fn scan_tokens(mut self) -> Result<Vec<Token>, ScanError> {
		let mut tokens = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			self.scan_token(&mut tokens)?;
		}
		tokens.push(Token::new(Eof, "", self.line));
		Ok(tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token>) -> Result<(), ScanError> {
		let Some(next_char) = self.advance() else {
			return Ok(());
		};
		let line = self.line;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'{' => LeftBrace,
			'}' => RightBrace,
			'[' => LeftBracket,
			']' => RightBracket,
			',' => Comma,
			'?' => Question,
			':' => Colon,
			'-' => Minus,
			'+' => Plus,
			';' => Semicolon,
			'*' => Star,
			'%' => Percent,
			'.' => if self.peek().is_some_and(|c| c.is_ascii_digit()) { self.number()? } else { Dot },
			'!' => if self.match_next('=') { if self.match_next('=') { BangEqualEqual } else { BangEqual } } else { Bang },
			'=' => if self.match_next('=') { if self.match_next('=') { EqualEqualEqual } else { EqualEqual } } else { Equal },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			'&' => if self.match_next('&') { AndAnd } else { return Err(ScanError::new(line, ScanErrorType::UnexpectedCharacter('&'))) },
			'|' => if self.match_next('|') { OrOr } else { return Err(ScanError::new(line, ScanErrorType::UnexpectedCharacter('|'))) },
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				Comment
			} else if self.match_next('*') {
				self.block_comment()?
			} else { Slash },
			' ' | '\r' | '\t' => EmptyChar,
			'\n' => { self.line += 1; NewLine }
			'"' | '\'' => self.string(next_char)?,
			c if c.is_ascii_digit() => self.number()?,
			c if c.is_alphabetic() || c == '_' || c == '$' => self.identifier(),
			c if c.is_whitespace() => EmptyChar,
			_ => return Err(ScanError::new(line, ScanErrorType::UnexpectedCharacter(next_char))),
		};

		if !r#type.is_ignored() {
			let lexeme = &self.source[self.start..self.cursor];
			tokens.push(Token::new(r#type, lexeme, line));
		}

		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Skip a `/* ... */` comment, the opening `/*` already consumed
	fn block_comment(&mut self) -> Result<TokenType, ScanError> {
		let opened_on = self.line;
		while let Some(c) = self.peek() {
			if c == '*' && self.peek_second() == Some('/') {
				self.advance(); // consume '*'
				self.advance(); // consume '/'
				return Ok(Comment);
			}
			if c == '\n' {
				self.line += 1;
			}
			self.advance();
		}
		Err(ScanError::new(opened_on, ScanErrorType::UnterminatedBlockComment))
	}

	/// Scan a string literal. Host strings may not span lines.
	fn string(&mut self, quote: char) -> Result<TokenType, ScanError> {
		let mut value = String::new();
		loop {
			match self.advance() {
				None | Some('\n') => return Err(ScanError::new(self.line, ScanErrorType::UnterminatedString)),
				Some(c) if c == quote => break,
				Some('\\') => {
					let escaped = self.advance().ok_or_else(|| ScanError::new(self.line, ScanErrorType::UnterminatedString))?;
					value.push(match escaped {
						'n' => '\n',
						't' => '\t',
						'r' => '\r',
						'0' => '\0',
						other => other,
					});
				}
				Some(c) => value.push(c),
			}
		}
		Ok(StringLiteral(value))
	}

	/// Scan a number literal, the first digit (or leading `.`) already consumed
	fn number(&mut self) -> Result<TokenType, ScanError> {
		let leading_dot = self.source[self.start..].starts_with('.');
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}

		// Look for a fractional part.
		if !leading_dot && self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
		}

		let s = &self.source[self.start..self.cursor];
		s.parse()
			.map(NumberLiteral)
			.map_err(|_| ScanError::new(self.line, ScanErrorType::InvalidNumber(s.to_string())))
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str, ok: bool) {
		let result = Scanner::new(input).scan_tokens();
		assert!(result.is_ok() == ok, "{input:?} => {result:?}");
	}

	fn types(input: &str) -> Vec<TokenType> {
		Scanner::new(input).scan_tokens().unwrap().into_iter().map(|t| t.r#type).collect()
	}

	#[test]
	fn scan_tokens() {
		scan("", true);
		scan("(", true);
		scan("(){}[]", true);
		scan(" ( ) ", true);
		scan("@", false);
		scan("你好", true);
		scan(r#""世界""#, true);
		scan("12345", true);
		scan(r#""/* not a comment */""#, true);
		scan("// Comment", true);
		scan("/* Unterminated comment ", false);
		scan("user", true);
		scan("return", true);
		scan("a & b", false);
		scan("a | b", false);
	}

	#[test]
	fn scan_operators() {
		assert_eq!(types("!"), vec![Bang, Eof]);
		assert_eq!(types("!="), vec![BangEqual, Eof]);
		assert_eq!(types("!=="), vec![BangEqualEqual, Eof]);
		assert_eq!(types("="), vec![Equal, Eof]);
		assert_eq!(types("=="), vec![EqualEqual, Eof]);
		assert_eq!(types("==="), vec![EqualEqualEqual, Eof]);
		assert_eq!(types("<= >= < >"), vec![LessEqual, GreaterEqual, Less, Greater, Eof]);
		assert_eq!(types("&& ||"), vec![AndAnd, OrOr, Eof]);
		assert_eq!(types("- + * / %"), vec![Minus, Plus, Star, Slash, Percent, Eof]);
		assert_eq!(types("; , . ? :"), vec![Semicolon, Comma, Dot, Question, Colon, Eof]);
	}

	#[test]
	fn scan_numbers() {
		assert_eq!(types("0"), vec![NumberLiteral(0.0), Eof]);
		assert_eq!(types("42"), vec![NumberLiteral(42.0), Eof]);
		assert_eq!(types("2.75"), vec![NumberLiteral(2.75), Eof]);
		assert_eq!(types(".5"), vec![NumberLiteral(0.5), Eof]);
		assert_eq!(types("1."), vec![NumberLiteral(1.0), Dot, Eof]);
		assert_eq!(types("crew.length"), vec![
			Identifier("crew".into()),
			Dot,
			Identifier("length".into()),
			Eof
		]);
	}

	#[test]
	fn scan_strings() {
		assert_eq!(types(r#""""#), vec![StringLiteral(String::new()), Eof]);
		assert_eq!(types(r#""hello world""#), vec![StringLiteral("hello world".into()), Eof]);
		assert_eq!(types("'single'"), vec![StringLiteral("single".into()), Eof]);
		assert_eq!(types(r#""say \"hi\"\n""#), vec![StringLiteral("say \"hi\"\n".into()), Eof]);
		assert_eq!(types(r#""it's""#), vec![StringLiteral("it's".into()), Eof]);
		scan("\"unterminated", false);
		scan("\"split\nacross\"", false);
	}

	#[test]
	fn scan_keywords() {
		assert_eq!(types("const let var"), vec![Const, Let, Var, Eof]);
		assert_eq!(types("function return break throw"), vec![Function, Return, Break, Throw, Eof]);
		assert_eq!(types("if else for of new typeof"), vec![If, Else, For, Of, New, Typeof, Eof]);
		assert_eq!(types("true false null undefined"), vec![True, False, Null, Undefined, Eof]);
		assert_eq!(types("constant"), vec![Identifier("constant".into()), Eof]);
	}

	#[test]
	fn scan_identifiers() {
		for name in ["x", "_name", "$el", "myVariable123", "snake_case", "CamelCase", "of1"] {
			assert_eq!(types(name), vec![Identifier(name.into()), Eof]);
		}
	}

	#[test]
	fn scan_comments() {
		scan("// single line comment", true);
		scan("// invalid function syntax: plot broken(x)", true);
		scan("/* block comment */", true);
		scan("/* multi\nline\ncomment */", true);
		scan("/** multi ** comment ***********/", true);
		scan("/* unterminated", false);
		assert_eq!(types("1 // trailing\n2"), vec![NumberLiteral(1.0), NumberLiteral(2.0), Eof]);
	}

	#[test]
	fn tracks_lines() {
		let tokens = Scanner::new("a\n\n/* x\n */ b").scan_tokens().unwrap();
		assert_eq!(tokens[0].line, 1);
		assert_eq!(tokens[1].line, 4);
		let err = Scanner::new("ok\n@").scan_tokens().unwrap_err();
		assert_eq!(err.line(), 2);
		assert_eq!(err.error_type(), &ScanErrorType::UnexpectedCharacter('@'));
	}

	#[test]
	fn scan_translated_line() {
		assert_eq!(types("for (const item of crew) {"), vec![
			For,
			LeftParen,
			Const,
			Identifier("item".into()),
			Of,
			Identifier("crew".into()),
			RightParen,
			LeftBrace,
			Eof
		]);
	}
}
