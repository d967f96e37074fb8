// # Token Scanner
//
// Pure functions over a single line of the configuration file. The file is
// not required to be UTF-8, so lines are byte slices and positions are byte
// offsets. Every delimiter the scanner knows is ASCII.
//
// A *value* is a maximal run of bytes that are not whitespace, not `#`, not
// a line terminator and not NUL. A value of length zero means the field is
// absent.
//
// None of the functions fail. Called on a position already at or past the
// boundary they look for, they return that position unchanged.

use std::borrow::Cow;

/// True for the in-line whitespace the scanner skips (space and tab)
#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// True for bytes that may appear inside a value
#[inline]
pub fn is_value(c: u8) -> bool {
    !matches!(c, b' ' | b'\t' | b'#' | b'\n' | b'\r' | b'\0')
}

#[inline]
fn is_end(c: u8) -> bool {
    c == b'\n' || c == b'\0'
}

/// Skip spaces and tabs
pub fn skip_space(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && is_space(line[pos]) {
        pos += 1;
    }
    pos
}

/// If `pos` is at a `#`, skip to the end of the line
pub fn skip_comment(line: &[u8], pos: usize) -> usize {
    match line.get(pos) {
        Some(b'#') => consume_to_end_of_line(line, pos),
        _ => pos,
    }
}

/// Consume a value
pub fn consume_value(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && is_value(line[pos]) {
        pos += 1;
    }
    pos
}

/// Consume everything up to the line terminator (or NUL)
pub fn consume_to_end_of_line(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && !is_end(line[pos]) {
        pos += 1;
    }
    pos
}

/// One positional field of a directive line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Offset where the leading whitespace begins
    pub start: usize,
    /// Whitespace between the previous field and this one
    pub gap: &'a [u8],
    /// The value itself, empty when the field is absent
    pub value: &'a [u8],
}

impl<'a> Field<'a> {
    pub fn is_absent(&self) -> bool {
        self.value.is_empty()
    }

    /// The value as text, for session state and requests
    ///
    /// Invalid UTF-8 is replaced. Never write the result back to the file;
    /// write [`Field::value`] instead.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.value)
    }
}

/// Walks the positional fields of a line, left to right
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// `line` must not contain its terminator
    pub fn new(line: &'a [u8]) -> Self {
        Self { line, pos: 0 }
    }

    /// Take the next field
    ///
    /// An absent field leaves the cursor past its gap; callers that stop at
    /// an absent field use [`Field::start`] to keep the gap with the rest of
    /// the line.
    pub fn next_field(&mut self) -> Field<'a> {
        let start = self.pos;
        let value_start = skip_space(self.line, start);
        let value_end = consume_value(self.line, value_start);
        self.pos = value_end;
        Field {
            start,
            gap: &self.line[start..value_start],
            value: &self.line[value_start..value_end],
        }
    }

    /// Everything after the last field taken, up to the end of the line
    pub fn rest(&self) -> &'a [u8] {
        self.rest_from(self.pos)
    }

    /// Everything from `start` to the end of the line
    pub fn rest_from(&self, start: usize) -> &'a [u8] {
        let end = consume_to_end_of_line(self.line, start);
        &self.line[start..end]
    }
}

/// True when a line holds no directive (blank or comment only)
pub fn is_blank_or_comment(line: &[u8]) -> bool {
    let pos = skip_space(line, 0);
    let pos = skip_comment(line, pos);
    consume_value(line, pos) == pos
}
