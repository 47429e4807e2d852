//! # epc
//!
//! A line-oriented transpiler for a small indentation-structured scripting
//! language, and an evaluator for the JavaScript-like code it produces.
//!
//! ``` markdown
//! source text
//! └── classifier   one ClassifiedLine per physical line
//!     └── translator   one host line per classified line
//!         └── adapter      scanner → parser → tree-walk interpreter
//! ```
//!
//! ## Classifying
//!
//! Each line is measured, stripped of its comment and sorted into exactly one
//! [`LineCategory`]. Nothing beyond the line itself is looked at, so there is
//! no grammar for the source language and no error a classifier can raise.
//!
//! ## Translating
//!
//! Headers (`plot`, `plan`, `if`, `elif`, `else:`, `loop`) are matched
//! directly and rewritten into opening host constructs. Every other line goes
//! through whole-word token substitution (`truth` → `true`, `files` →
//! `console.log`, `crew[` → `[`, ...) and becomes a host statement. Blocks are
//! closed by explicit `end` or `}` lines.
//!
//! ## Executing
//!
//! The translated program is handed, as one string, to an
//! [`ExecutionAdapter`]. It scans and parses the host code into an AST, then
//! walks it. Names resolve through three layers: the program's own scopes,
//! the caller's overrides and the built-ins.
//!
//! ```
//! use epc::{Epc, ExecutionAdapter, OutputCapture};
//!
//! let capture = OutputCapture::new();
//! let epc = Epc::with_adapter(ExecutionAdapter::with_output(capture.clone()));
//! let program = epc.run_source("if truth:\n    files \"Approved\"\nend").unwrap();
//! assert_eq!(program.to_string(), "if (true) {\n  console.log(\"Approved\");\n}");
//! assert_eq!(capture.contents(), "Approved\n");
//! ```

mod adapter;
mod classifier;
pub mod cli;
mod config;
mod environment;
mod epc;
mod error;
mod interpreter;
mod parser;
mod scanner;
mod statement;
mod translator;
mod utils;

pub use adapter::{Bindings, ExecutionAdapter, Mode, OutputCapture};
pub use classifier::{ClassifiedLine, LineCategory, classify, classify_source};
pub use config::{Config, DEBUG_VAR, debug_enabled};
pub use epc::{EXTENSION, Epc};
pub use error::{
	EpcError,
	execution::{ExecutionCause, ExecutionError},
	interpreter::InterpreterError,
	parser::{ParseError, ParseErrorType},
	scanner::{ScanError, ScanErrorType},
};
pub use interpreter::{
	callable::CallableValue,
	value::{ObjectKind, Properties, Value},
};
pub use translator::{INDENT_UNIT, TokenTable, TranslatedProgram, tables, translate, translate_source};
