//! Line-at-a-time character source
//!
//! Input bytes are split into physical lines on CR, LF or CR LF, and every
//! line end is delivered as a single `'\n'`. Bytes map one-to-one onto
//! `char` (Latin-1), so legacy high bytes survive into text values.

use crate::utils::Position;

pub struct CharSource<'a> {
    input: &'a [u8],
    cursor: usize,
    /// Current line as (char, input bytes consumed) pairs
    line: Vec<(char, usize)>,
    line_pos: usize,
    position: Position,
    lines_read: u32,
}

impl<'a> CharSource<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            cursor: 0,
            line: Vec::new(),
            line_pos: 0,
            position: Position::start(),
            lines_read: 0,
        }
    }

    fn fill_line(&mut self) -> bool {
        if self.cursor >= self.input.len() {
            return false;
        }

        self.line.clear();
        self.line_pos = 0;

        while let Some(&byte) = self.input.get(self.cursor) {
            self.cursor += 1;
            match byte {
                b'\r' => {
                    if self.input.get(self.cursor) == Some(&b'\n') {
                        self.cursor += 1;
                        self.line.push(('\n', 2));
                    } else {
                        self.line.push(('\n', 1));
                    }
                    break;
                }
                b'\n' => {
                    self.line.push(('\n', 1));
                    break;
                }
                other => self.line.push((char::from(other), 1)),
            }
        }

        self.lines_read += 1;
        true
    }

    /// Next character without consuming it
    pub fn peek(&mut self) -> Option<char> {
        if self.line_pos >= self.line.len() && !self.fill_line() {
            return None;
        }
        self.line.get(self.line_pos).map(|&(ch, _)| ch)
    }

    pub fn next(&mut self) -> Option<char> {
        self.peek()?;
        let (ch, bytes) = self.line[self.line_pos];
        self.line_pos += 1;
        self.position = self.position.advance(ch, bytes);
        Some(ch)
    }

    pub fn at_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Position of the next unread character
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// Physical lines pulled from the input so far
    pub fn lines_read(&self) -> u32 {
        self.lines_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &[u8]) -> String {
        let mut source = CharSource::new(input);
        let mut out = String::new();
        while let Some(ch) = source.next() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn test_line_ends_are_normalized() {
        assert_eq!(drain(b"a\rb\r\nc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_positions_track_lines() {
        let mut source = CharSource::new(b"ab\r\ncd");
        source.next();
        source.next();
        assert_eq!(source.line(), 1);
        assert_eq!(source.next(), Some('\n'));
        assert_eq!(source.line(), 2);
        assert_eq!(source.position().offset, 4);
        assert_eq!(source.position().column, 1);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut source = CharSource::new(b"x");
        assert_eq!(source.peek(), Some('x'));
        assert_eq!(source.peek(), Some('x'));
        assert_eq!(source.next(), Some('x'));
        assert!(source.at_eof());
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_high_bytes_map_to_latin1() {
        assert_eq!(drain(&[0xE9]), "\u{e9}");
    }

    #[test]
    fn test_lines_read() {
        let mut source = CharSource::new(b"a\rb\rc");
        while source.next().is_some() {}
        assert_eq!(source.lines_read(), 3);
    }

    #[test]
    fn test_empty_input() {
        let mut source = CharSource::new(b"");
        assert!(source.at_eof());
        assert_eq!(source.lines_read(), 0);
    }
}
