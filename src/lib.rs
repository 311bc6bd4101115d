//! Lexical analyser for a small C-like language.
//!
//! [`Lexer`] turns source text into [`Token`]s, each carrying its [`Kind`],
//! lexeme, line and column span. Malformed literals come back as
//! [`Kind::LexicalError`] tokens; only failing to read the input is an error.
//!
//! ```
//! use lexana::{tokenize_str, Kind};
//!
//! let kinds: Vec<Kind> = tokenize_str("x += 1;").iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [Kind::Identifier, Kind::PlusAssign, Kind::IntegerConstant, Kind::SemiColon, Kind::EndOfInput]
//! );
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod output;
pub mod token;

pub use error::{LexanaError, LexingError, Result};
pub use lexer::{tokenize_str, Lexer, LexerOptions, UnrecognizedPolicy};
pub use token::{Kind, Token};
