// # Line Writer
//
// Builds two renderings of every processed line side by side:
//
// - the file line, written back to the configuration file byte for byte
// - the transcript line, logged for the operator
//
// They differ in three ways. Secrets (API key, zone id, record id) are
// replaced by a placeholder in the transcript unless secrets logging is
// enabled, outcome annotations appear only in the transcript, and bytes that
// are not UTF-8 are shown replaced in the transcript while the file keeps
// them as they were.
//
// Persisted annotations left at the end of a line by an earlier run are
// removed with `strip_persisted_tags` before the line is handled, so a line
// carries at most the annotation of the latest run.

use crate::scanner::{Field, is_space};

use super::annotation::Annotation;

/// Placeholder shown in the transcript instead of a secret
pub const REDACTED: &str = "<redacted>";

/// The two renderings of one line, without terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub file: Vec<u8>,
    pub transcript: String,
}

/// Accumulates one line
#[derive(Debug)]
pub struct LineWriter {
    file: Vec<u8>,
    transcript: String,
    log_secrets: bool,
}

impl LineWriter {
    pub fn new(log_secrets: bool) -> Self {
        Self {
            file: Vec::new(),
            transcript: String::new(),
            log_secrets,
        }
    }

    /// Write bytes to both renderings
    pub fn text(&mut self, text: &[u8]) {
        self.file.extend_from_slice(text);
        self.transcript.push_str(&String::from_utf8_lossy(text));
    }

    /// Write a secret: verbatim to the file, masked in the transcript
    pub fn secret(&mut self, text: &[u8]) {
        self.file.extend_from_slice(text);
        if self.log_secrets {
            self.transcript.push_str(&String::from_utf8_lossy(text));
        } else if !text.is_empty() {
            self.transcript.push_str(REDACTED);
        }
    }

    /// Copy a field as it appeared in the line
    pub fn field(&mut self, field: &Field<'_>) {
        self.text(field.gap);
        self.text(field.value);
    }

    /// Write a value in place of a field that was absent
    ///
    /// The value gets a separating space when the field had no leading
    /// whitespace, and another when a comment follows immediately.
    pub fn insert(&mut self, field: &Field<'_>, value: &[u8], secret: bool, rest: &[u8]) {
        self.text(field.gap);
        if value.is_empty() {
            return;
        }
        if field.gap.is_empty() {
            self.text(b" ");
        }
        if secret {
            self.secret(value);
        } else {
            self.text(value);
        }
        self.separate(rest);
    }

    /// Write a replacement value for a field that was present
    pub fn replace(&mut self, field: &Field<'_>, value: &[u8], secret: bool) {
        self.text(field.gap);
        if secret {
            self.secret(value);
        } else {
            self.text(value);
        }
    }

    /// Keep a comment from being glued to the value just written
    pub fn separate(&mut self, rest: &[u8]) {
        if rest.first() == Some(&b'#') {
            self.text(b" ");
        }
    }

    /// Append the rest of the line and the annotation
    pub fn finish(mut self, rest: &[u8], annotation: Option<Annotation>) -> RenderedLine {
        self.text(rest);

        if let Some(annotation) = annotation {
            if annotation.is_persisted() {
                self.file.push(b' ');
                self.file.extend_from_slice(annotation.tag().as_bytes());
            }
            self.transcript.push(' ');
            self.transcript.push_str(annotation.tag());
        }

        RenderedLine {
            file: self.file,
            transcript: self.transcript,
        }
    }
}

fn trim_blank_end(mut text: &[u8]) -> &[u8] {
    while let [head @ .., last] = text {
        if !is_space(*last) {
            break;
        }
        text = head;
    }
    text
}

/// Remove persisted annotations (and the whitespace before them) from the
/// end of a line
///
/// The line is returned untouched, trailing whitespace included, when it does
/// not end in one. A tag must be preceded by whitespace to count.
pub fn strip_persisted_tags(mut line: &[u8]) -> &[u8] {
    loop {
        let trimmed = trim_blank_end(line);
        let Some(tag) = Annotation::PERSISTED
            .iter()
            .map(|a| a.tag().as_bytes())
            .find(|tag| trimmed.ends_with(tag))
        else {
            return line;
        };

        let before = &trimmed[..trimmed.len() - tag.len()];
        if before.last().is_none_or(|c| !is_space(*c)) {
            return line;
        }
        line = trim_blank_end(before);
    }
}
