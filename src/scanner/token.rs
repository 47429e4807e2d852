/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
	pub r#type: TokenType,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(r#type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
		Self { r#type, lexeme: lexeme.into(), line }
	}
}

/// The different types of tokens in the host language subset
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenType {
	/// New Line Character `\n`.
	NewLine,
	/// Empty Character: ` `, `\r`, `\t`.
	EmptyChar,
	/// Comment `//` or /* ... */
	Comment,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Left bracket `[`.
	LeftBracket,
	/// Right bracket `]`.
	RightBracket,
	/// Comma `,`.
	Comma,
	/// Question mark `?`.
	Question,
	/// Colon `:`.
	Colon,
	/// Dot `.`.
	Dot,
	/// Minus `-`.
	Minus,
	/// Plus `+`.
	Plus,
	/// Semicolon `;`.
	Semicolon,
	/// Slash `/`.
	Slash,
	/// Asterisk `*`.
	Star,
	/// Percent `%`.
	Percent,
	/// Bang `!`.
	Bang,
	/// Bang equal `!=`.
	BangEqual,
	/// Strict inequality `!==`.
	BangEqualEqual,
	/// Equal `=`.
	Equal,
	/// Equal equal `==`.
	EqualEqual,
	/// Strict equality `===`.
	EqualEqualEqual,
	/// Greater than `>`.
	Greater,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Less than `<`.
	Less,
	/// Less than or equal `<=`.
	LessEqual,
	/// Logical and `&&`.
	AndAnd,
	/// Logical or `||`.
	OrOr,
	/// Identifier, e.g. variable or function name.
	Identifier(String),
	/// String literal with escapes already resolved.
	StringLiteral(String),
	/// Number literal, e.g. `123.45`.
	NumberLiteral(f64),
	Break,
	Const,
	Else,
	False,
	For,
	Function,
	If,
	Let,
	New,
	Null,
	Of,
	Return,
	Throw,
	True,
	Typeof,
	Undefined,
	Var,
	/// End of file/input.
	Eof,
}

impl TokenType {
	pub fn is_ignored(&self) -> bool {
		matches!(self, TokenType::EmptyChar | TokenType::NewLine | TokenType::Comment)
	}

	pub fn keyword_or_identifier(value: &str) -> Self {
		match value {
			"break" => TokenType::Break,
			"const" => TokenType::Const,
			"else" => TokenType::Else,
			"false" => TokenType::False,
			"for" => TokenType::For,
			"function" => TokenType::Function,
			"if" => TokenType::If,
			"let" => TokenType::Let,
			"new" => TokenType::New,
			"null" => TokenType::Null,
			"of" => TokenType::Of,
			"return" => TokenType::Return,
			"throw" => TokenType::Throw,
			"true" => TokenType::True,
			"typeof" => TokenType::Typeof,
			"undefined" => TokenType::Undefined,
			"var" => TokenType::Var,
			_ => TokenType::Identifier(value.to_string()),
		}
	}

	/// Identifiers and keywords may both name a property after `.` or as an
	/// object literal key.
	pub fn is_word(&self) -> bool {
		use TokenType::*;
		matches!(
			self,
			Identifier(_)
				| Break | Const | Else | False | For | Function | If | Let | New | Null | Of | Return | Throw | True
				| Typeof | Undefined | Var
		)
	}
}
