use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use crate::cursor::LineCursor;
use crate::error::LexingError;
use crate::token::{Kind, Token};

/// What to do with a character that cannot start any token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnrecognizedPolicy {
    /// Emit a [`Kind::Unrecognized`] token holding the character.
    #[default]
    Emit,
    /// Consume the character without producing a token.
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexerOptions {
    pub unrecognized: UnrecognizedPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Word,
    Number { has_decimal_point: bool },
    String { in_escape: bool },
}

pub struct Lexer<R> {
    cursor: LineCursor<R>,
    file_name: PathBuf,
    options: LexerOptions,
    state: State,
    lexeme: String,
    finished: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(source: R, file_name: &Path) -> Self {
        Self::with_options(source, file_name, LexerOptions::default())
    }

    pub fn with_options(source: R, file_name: &Path, options: LexerOptions) -> Self {
        Self {
            cursor: LineCursor::new(source),
            file_name: file_name.to_path_buf(),
            options,
            state: State::Initial,
            lexeme: String::new(),
            finished: false,
        }
    }

    /// Scans the whole input. The last token is always [`Kind::EndOfInput`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexingError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind() == Kind::EndOfInput;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token. Once input is exhausted every call returns
    /// an [`Kind::EndOfInput`] token at the final position.
    pub fn next_token(&mut self) -> Result<Token, LexingError> {
        while let Some(ch) = self.next_char()? {
            self.lexeme.push(ch);

            let token = match self.state {
                State::Initial => self.scan_initial(ch)?,
                State::Word => self.scan_word(ch),
                State::Number { has_decimal_point } => self.scan_number(ch, has_decimal_point),
                State::String { in_escape } => self.scan_string(ch, in_escape),
            };

            if let Some(token) = token {
                return Ok(token);
            }
        }

        self.finished = true;
        self.lexeme.clear();
        Ok(self.emit(Kind::EndOfInput))
    }

    fn scan_initial(&mut self, ch: char) -> Result<Option<Token>, LexingError> {
        let token = match ch {
            ' ' | '\t' | '\r' | '\n' => {
                self.lexeme.clear();
                None
            }
            c if is_word_start(c) => {
                self.state = State::Word;
                None
            }
            c if c.is_ascii_digit() => {
                self.state = State::Number {
                    has_decimal_point: false,
                };
                None
            }
            '"' => {
                self.state = State::String { in_escape: false };
                None
            }
            '=' => Some(self.disambiguate(Kind::Assign, &[('=', Kind::Equals)])?),
            '!' => Some(self.disambiguate(Kind::LogicalNot, &[('=', Kind::NotEquals)])?),
            '>' => Some(self.disambiguate(
                Kind::Greater,
                &[('=', Kind::GreaterOrEqual), ('>', Kind::ShiftRight)],
            )?),
            '<' => Some(self.disambiguate(
                Kind::Less,
                &[('=', Kind::LessOrEqual), ('<', Kind::ShiftLeft)],
            )?),
            '+' => Some(self.disambiguate(
                Kind::Plus,
                &[('=', Kind::PlusAssign), ('+', Kind::Increment)],
            )?),
            '-' => Some(self.disambiguate(
                Kind::Minus,
                &[
                    ('=', Kind::MinusAssign),
                    ('-', Kind::Decrement),
                    ('>', Kind::StructAccessor),
                ],
            )?),
            '/' => Some(self.disambiguate(Kind::Division, &[('=', Kind::DivisionAssign)])?),
            '*' => Some(self.disambiguate(Kind::Product, &[('=', Kind::ProductAssign)])?),
            '%' => Some(self.disambiguate(Kind::Module, &[('=', Kind::ModuleAssign)])?),
            '|' => Some(self.disambiguate(Kind::Or, &[('|', Kind::LogicalOr)])?),
            '&' => Some(self.disambiguate(Kind::And, &[('&', Kind::LogicalAnd)])?),
            c => match Kind::from_punctuation(c) {
                Some(kind) => Some(self.emit(kind)),
                None => self.unrecognized(c),
            },
        };
        Ok(token)
    }

    fn scan_word(&mut self, ch: char) -> Option<Token> {
        if is_word_continue(ch) {
            return None;
        }

        self.retract(ch);
        let kind = Kind::from_keyword(&self.lexeme).unwrap_or(Kind::Identifier);
        Some(self.emit(kind))
    }

    fn scan_number(&mut self, ch: char, has_decimal_point: bool) -> Option<Token> {
        match ch {
            c if c.is_ascii_digit() => None,
            '.' if !has_decimal_point => {
                self.state = State::Number {
                    has_decimal_point: true,
                };
                None
            }
            // A second decimal point is consumed into the error token.
            '.' => Some(self.emit(Kind::LexicalError)),
            _ => {
                self.retract(ch);
                let kind = classify_number(&self.lexeme);
                Some(self.emit(kind))
            }
        }
    }

    fn scan_string(&mut self, ch: char, in_escape: bool) -> Option<Token> {
        match ch {
            // Raw newlines cannot appear inside a literal.
            '\n' => {
                self.retract(ch);
                Some(self.emit(Kind::LexicalError))
            }
            '"' if !in_escape => Some(self.emit(Kind::StringConstant)),
            _ => {
                self.state = State::String {
                    in_escape: ch == '\\' && !in_escape,
                };
                None
            }
        }
    }

    /// Reads one character of lookahead. A matching candidate extends the
    /// lexeme, otherwise the character is pushed back and `default` wins.
    fn disambiguate(&mut self, default: Kind, candidates: &[(char, Kind)]) -> Result<Token, LexingError> {
        let Some(next) = self.next_char()? else {
            return Ok(self.emit(default));
        };

        match candidates.iter().find(|(candidate, _)| *candidate == next) {
            Some(&(_, kind)) => {
                self.lexeme.push(next);
                Ok(self.emit(kind))
            }
            None => {
                self.cursor.push_back(next);
                Ok(self.emit(default))
            }
        }
    }

    fn unrecognized(&mut self, ch: char) -> Option<Token> {
        match self.options.unrecognized {
            UnrecognizedPolicy::Emit => Some(self.emit(Kind::Unrecognized)),
            UnrecognizedPolicy::Skip => {
                warn!(
                    line = self.cursor.line(),
                    column = self.cursor.column() - 1,
                    "skipping unrecognized character {:?}",
                    ch
                );
                self.lexeme.clear();
                None
            }
        }
    }

    /// Drops the over-appended terminator `ch` and returns it to the cursor.
    fn retract(&mut self, ch: char) {
        self.lexeme.pop();
        self.cursor.push_back(ch);
    }

    fn emit(&mut self, kind: Kind) -> Token {
        let lexeme = std::mem::take(&mut self.lexeme);
        self.state = State::Initial;
        let token = Token::new(kind, lexeme, self.cursor.line(), self.cursor.column());
        trace!(
            kind = %token.kind(),
            lexeme = token.lexeme(),
            line = token.line(),
            column = token.start_column(),
            "token"
        );
        token
    }

    fn next_char(&mut self) -> Result<Option<char>, LexingError> {
        self.cursor.next_char().map_err(|e| {
            LexingError::new(
                self.file_name.clone(),
                e,
                self.cursor.line() + 1,
                0,
            )
        })
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<Token, LexingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

impl<R: BufRead> std::iter::FusedIterator for Lexer<R> {}

/// Tokenizes in-memory text. Reading from a string cannot fail.
pub fn tokenize_str(source: &str) -> Vec<Token> {
    Lexer::new(source.as_bytes(), Path::new("<memory>"))
        .tokenize()
        .unwrap_or_default()
}

fn is_word_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_word_continue(ch: char) -> bool {
    is_word_start(ch) || ch.is_ascii_digit()
}

fn classify_number(lexeme: &str) -> Kind {
    if lexeme.parse::<i32>().is_ok() {
        Kind::IntegerConstant
    } else if lexeme.parse::<f64>().is_ok() {
        Kind::FloatingPointConstant
    } else {
        Kind::LexicalError
    }
}
