//! Line-buffered character cursor over a [`BufRead`] source.
//!
//! Lines are pulled one at a time, their terminator is stripped and a single
//! `'\n'` is appended, so every line (including a final line without a
//! terminator) ends in a newline the scanner can use to close a lexeme.

use std::io::{self, BufRead};
use tracing::debug;

pub struct LineCursor<R> {
    source: R,
    line: Vec<char>,
    /// Index of the next unread character in `line`.
    column: usize,
    /// 1-based; 0 until the first line is read.
    line_number: usize,
    pushed_back: Option<char>,
    eof: bool,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            line: Vec::new(),
            column: 0,
            line_number: 0,
            pushed_back: None,
            eof: false,
        }
    }

    /// Returns the next character in document order, or `None` once the
    /// source is exhausted.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        if let Some(ch) = self.pushed_back.take() {
            return Ok(Some(ch));
        }

        if self.column >= self.line.len() && !self.refill()? {
            return Ok(None);
        }

        let ch = self.line[self.column];
        self.column += 1;
        Ok(Some(ch))
    }

    /// Makes `ch`, the character just read, the next character returned.
    pub fn push_back(&mut self, ch: char) {
        debug_assert!(self.pushed_back.is_none(), "pushback slot already full");
        debug_assert!(self.column > 0, "pushback at start of line");
        debug_assert_eq!(self.line.get(self.column - 1), Some(&ch));
        self.pushed_back = Some(ch);
    }

    pub fn line(&self) -> usize {
        self.line_number
    }

    /// Column of the next character to be returned.
    pub fn column(&self) -> usize {
        match self.pushed_back {
            Some(_) => self.column - 1,
            None => self.column,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    fn refill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        let mut buf = String::new();
        if self.source.read_line(&mut buf)? == 0 {
            debug!(lines = self.line_number, "end of input");
            self.eof = true;
            return Ok(false);
        }

        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }

        self.line.clear();
        self.line.extend(buf.chars());
        self.line.push('\n');
        self.column = 0;
        self.line_number += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(cursor: &mut LineCursor<&[u8]>) -> String {
        let mut out = String::new();
        while let Some(ch) = cursor.next_char().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn appends_newline_to_every_line() {
        let mut cursor = LineCursor::new("ab\ncd".as_bytes());
        assert_eq!(drain(&mut cursor), "ab\ncd\n");
        assert!(cursor.is_eof());
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn crlf_is_normalised() {
        let mut cursor = LineCursor::new("a\r\nb\r\n".as_bytes());
        assert_eq!(drain(&mut cursor), "a\nb\n");
    }

    #[test]
    fn empty_input_is_immediately_exhausted() {
        let mut cursor = LineCursor::new("".as_bytes());
        assert_eq!(cursor.next_char().unwrap(), None);
        assert_eq!(cursor.next_char().unwrap(), None);
        assert_eq!(cursor.line(), 0);
        assert!(cursor.is_eof());
    }

    #[test]
    fn blank_lines_still_count() {
        let mut cursor = LineCursor::new("\n\nx".as_bytes());
        assert_eq!(drain(&mut cursor), "\n\nx\n");
        assert_eq!(cursor.line(), 3);
    }

    #[test]
    fn line_and_column_track_reads() {
        let mut cursor = LineCursor::new("ab\nc".as_bytes());
        assert_eq!(cursor.next_char().unwrap(), Some('a'));
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        assert_eq!(cursor.next_char().unwrap(), Some('b'));
        assert_eq!(cursor.next_char().unwrap(), Some('\n'));
        assert_eq!((cursor.line(), cursor.column()), (1, 3));
        assert_eq!(cursor.next_char().unwrap(), Some('c'));
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn pushed_back_char_is_read_again_once() {
        let mut cursor = LineCursor::new("xy".as_bytes());
        assert_eq!(cursor.next_char().unwrap(), Some('x'));
        assert_eq!(cursor.next_char().unwrap(), Some('y'));
        cursor.push_back('y');
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.next_char().unwrap(), Some('y'));
        assert_eq!(cursor.column(), 2);
        assert_eq!(cursor.next_char().unwrap(), Some('\n'));
        assert_eq!(cursor.next_char().unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = &[b'a', 0xff, b'\n'];
        let mut cursor = LineCursor::new(bytes);
        let err = cursor.next_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
