use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Malformed lexemes are reported as tokens, never through here.
#[derive(Error, Debug)]
pub enum LexanaError {
    #[error("FileNotFoundError: {0}")]
    FileNotFound(String),

    #[error("IOError: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Lexing(#[from] LexingError),

    #[error("ConfigError: {0}")]
    Config(String),

    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LexanaError>;

/// The input could not be read while a scan was in progress.
#[derive(Error, Debug)]
#[error("LexingError: {message}\n  --> {}:{line}:{column}", .path.display())]
pub struct LexingError {
    pub(crate) path: PathBuf,
    pub(crate) message: String,
    pub(crate) line: usize,
    pub(crate) column: usize,
    #[source]
    pub(crate) source: io::Error,
}

impl LexingError {
    pub fn new(path: PathBuf, source: io::Error, line: usize, column: usize) -> Self {
        Self {
            path,
            message: source.to_string(),
            line,
            column,
            source,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lexing_error_points_at_location() {
        let err = LexingError::new(
            PathBuf::from("main.c"),
            io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
            4,
            0,
        );
        assert_eq!(
            err.to_string(),
            "LexingError: stream did not contain valid UTF-8\n  --> main.c:4:0"
        );
    }

    #[test]
    fn lexing_error_converts_into_lexana_error() {
        let err: LexanaError = LexingError::new(
            PathBuf::from("a.c"),
            io::Error::new(io::ErrorKind::Other, "boom"),
            1,
            2,
        )
        .into();
        assert!(matches!(err, LexanaError::Lexing(_)));
        assert!(err.to_string().starts_with("LexingError: boom"));
    }

    #[test]
    fn file_not_found_display() {
        let err = LexanaError::FileNotFound("input.c".to_string());
        assert_eq!(err.to_string(), "FileNotFoundError: input.c");
    }

    #[test]
    fn io_error_display() {
        let err: LexanaError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.to_string(), "IOError: denied");
    }
}
