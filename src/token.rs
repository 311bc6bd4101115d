use serde::Serialize;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Token {
    kind: Kind,
    lexeme: String,
    line: usize,
    start_column: usize,
    end_column: usize,
}

impl Token {
    /// Builds a token whose lexeme ends (exclusively) at `end_column`.
    pub fn new(kind: Kind, lexeme: String, line: usize, end_column: usize) -> Self {
        let start_column = end_column.saturating_sub(lexeme.chars().count());
        Self {
            kind,
            lexeme,
            line,
            start_column,
            end_column,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn start_column(&self) -> usize {
        self.start_column
    }

    pub fn end_column(&self) -> usize {
        self.end_column
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, Kind::LexicalError | Kind::Unrecognized)
    }
}

/// Tab separated record, one per line in the results file.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\tColuna Inicio: {} Coluna Fim: {}\tLinha: {}\t",
            self.kind, self.lexeme, self.start_column, self.end_column, self.line
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Kind {
    EndOfInput,
    LexicalError,
    Unrecognized, // character with no token

    // Identifiers and literals
    Identifier,
    IntegerConstant,
    FloatingPointConstant,
    StringConstant,

    // Arithmetic operators
    Plus,      // +
    Minus,     // -
    Product,   // *
    Division,  // /
    Module,    // %
    Increment, // ++
    Decrement, // --

    // Logical operators
    Equals,         // ==
    NotEquals,      // !=
    Less,           // <
    Greater,        // >
    LessOrEqual,    // <=
    GreaterOrEqual, // >=
    LogicalAnd,     // &&
    LogicalOr,      // ||
    LogicalNot,     // !

    // Bitwise operators
    ShiftLeft,  // <<
    ShiftRight, // >>
    And,        // &
    Or,         // |

    // Assignment operators
    Assign,         // =
    PlusAssign,     // +=
    MinusAssign,    // -=
    ProductAssign,  // *=
    DivisionAssign, // /=
    ModuleAssign,   // %=

    // Keywords
    Int,
    Float,
    Double,
    Void,
    Return,
    Continue,
    Break,
    If,
    Else,
    For,
    Struct,

    // Brackets and delimiters
    ParenthesisOpen,  // (
    ParenthesisClose, // )
    BracketOpen,      // [
    BracketClose,     // ]
    BraceOpen,        // {
    BraceClose,       // }
    SemiColon,        // ;
    Comma,            // ,
    StructAccessor,   // ->
}

impl Kind {
    /// Reserved word lookup. Only exact matches are keywords.
    pub fn from_keyword(ident: &str) -> Option<Kind> {
        match ident {
            "int" => Some(Kind::Int),
            "float" => Some(Kind::Float),
            "double" => Some(Kind::Double),
            "void" => Some(Kind::Void),
            "return" => Some(Kind::Return),
            "continue" => Some(Kind::Continue),
            "break" => Some(Kind::Break),
            "if" => Some(Kind::If),
            "else" => Some(Kind::Else),
            "for" => Some(Kind::For),
            "struct" => Some(Kind::Struct),
            _ => None,
        }
    }

    /// Single character punctuation that is emitted without lookahead.
    pub fn from_punctuation(ch: char) -> Option<Kind> {
        match ch {
            '(' => Some(Kind::ParenthesisOpen),
            ')' => Some(Kind::ParenthesisClose),
            '[' => Some(Kind::BracketOpen),
            ']' => Some(Kind::BracketClose),
            '{' => Some(Kind::BraceOpen),
            '}' => Some(Kind::BraceClose),
            ';' => Some(Kind::SemiColon),
            ',' => Some(Kind::Comma),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Kind::Int
                | Kind::Float
                | Kind::Double
                | Kind::Void
                | Kind::Return
                | Kind::Continue
                | Kind::Break
                | Kind::If
                | Kind::Else
                | Kind::For
                | Kind::Struct
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
