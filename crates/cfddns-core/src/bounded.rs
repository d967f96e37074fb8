// # Bounded String
//
// Every credential, name, id and fetched value in a run is held in a
// `BoundedString`. Writes never fail: anything past the capacity is
// silently dropped, which is also how over-long values end up on disk.
//
// Truncation happens on a UTF-8 character boundary, so the stored text may
// be a few bytes shorter than the capacity when a multi-byte character
// straddles the limit.

use std::fmt;

/// Maximum number of bytes a [`BoundedString`] holds
pub const BOUNDED_CAPACITY: usize = 254;

/// A string with a fixed maximum length and truncating writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedString {
    inner: String,
}

impl BoundedString {
    /// Create an empty bounded string
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents, truncating to capacity
    pub fn set(&mut self, value: &str) {
        self.inner.clear();
        self.push_str(value);
    }

    /// Append text, truncating to capacity
    pub fn push_str(&mut self, value: &str) {
        let room = BOUNDED_CAPACITY - self.inner.len();
        self.inner.push_str(truncate_to(value, room));
    }

    /// Empty the string
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Longest prefix of `value` that fits in `max` bytes without splitting a char
fn truncate_to(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

impl From<&str> for BoundedString {
    fn from(value: &str) -> Self {
        let mut s = Self::new();
        s.set(value);
        s
    }
}

impl AsRef<str> for BoundedString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for BoundedString {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for BoundedString {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
