// # Engine
//
// Drives one run over the configuration file.
//
// ## Flow
//
// ```text
// for each line (in order):
//   blank / comment only  -> copied unchanged
//   first token ends '?'  -> variable declaration
//   first token ends ':'  -> credential declaration
//   first token ends '/'  -> zone declaration
//   anything else         -> record reconciliation
// ```
//
// Lines are processed strictly in file order and every remote call is
// awaited before the next line is read: later lines depend on credentials,
// zone ids and variables set by earlier ones.
//
// ## Output
//
// Every input line produces exactly one output line. Fields keep their
// original spacing, values are replaced or inserted in place, and the text
// after the last field is carried over. `\n` and `\r\n` terminators are kept
// as found; a final line without a terminator gains `\n`.
//
// Input and output are bytes. Nothing requires the file to be UTF-8: text
// the handlers do not rewrite is copied through unchanged.
//
// The engine never touches the filesystem. The caller decides what to do
// with `RunReport::output`.

mod annotation;
mod credential;
mod record;
mod report;
mod variable;
mod writer;
mod zone;

pub use annotation::Annotation;
pub use report::{LineKind, LineReport, RunReport, RunSummary};
pub use writer::{REDACTED, RenderedLine};

use writer::{LineWriter, strip_persisted_tags};

use chrono::Utc;
use tracing::{debug, info};

use crate::client::FetchClient;
use crate::config::EngineConfig;
use crate::context::Session;
use crate::scanner::{self, Cursor, Field};
use crate::traits::HttpTransport;
use crate::Result;

/// How a handler ends its line
pub(crate) struct LineEnd<'a> {
    /// Text after the last field handled
    rest: &'a [u8],
    annotation: Option<Annotation>,
}

impl<'a> LineEnd<'a> {
    fn new(rest: &'a [u8], annotation: Option<Annotation>) -> Self {
        Self { rest, annotation }
    }

    fn plain(rest: &'a [u8]) -> Self {
        Self::new(rest, None)
    }

    fn annotated(rest: &'a [u8], annotation: Annotation) -> Self {
        Self::new(rest, Some(annotation))
    }
}

/// Line interpreter and record reconciliation engine
#[derive(Debug)]
pub struct Engine {
    client: FetchClient,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(transport: Box<dyn HttpTransport>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let client = FetchClient::new(transport, config.api_base.clone());
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process a whole configuration file
    pub async fn run(&self, input: impl AsRef<[u8]>) -> RunReport {
        let input = input.as_ref();
        let mut summary = RunSummary {
            started_at: Utc::now(),
            ..RunSummary::default()
        };
        let mut session = Session::new();
        let mut output = Vec::with_capacity(input.len() + 64);
        let mut lines = Vec::new();

        debug!(
            "Starting run (dry_run={}, api_base={})",
            self.config.dry_run, self.config.api_base
        );

        for (index, raw) in input.split_inclusive(|&b| b == b'\n').enumerate() {
            let number = index + 1;
            let (content, terminator) = split_terminator(raw);

            let (kind, rendered, annotation) = self.process_line(&mut session, content).await;

            if kind == LineKind::Blank {
                debug!(line = number, "{}", rendered.transcript);
            } else {
                info!(line = number, "{}", rendered.transcript);
            }

            output.extend_from_slice(&rendered.file);
            output.extend_from_slice(terminator);

            summary.count(kind, annotation);
            lines.push(LineReport {
                number,
                kind,
                annotation,
                transcript: rendered.transcript,
            });
        }

        summary.variables_bound = session.variables.len();
        summary.variables_changed = session.variables.iter().filter(|v| v.changed).count();
        summary.finished_at = Utc::now();

        info!(
            "Run finished: {} line(s), {} variable(s) ({} changed), \
            {} record(s) updated, {} unchanged, {} failed, {} diagnostic(s)",
            summary.lines,
            summary.variables_bound,
            summary.variables_changed,
            summary.records_updated,
            summary.records_unchanged,
            summary.records_failed,
            summary.diagnostics
        );

        RunReport {
            output,
            lines,
            summary,
        }
    }

    /// Classify a line and hand it to its handler
    async fn process_line(
        &self,
        session: &mut Session,
        line: &[u8],
    ) -> (LineKind, RenderedLine, Option<Annotation>) {
        let mut writer = LineWriter::new(self.config.log_secrets);

        if scanner::is_blank_or_comment(line) {
            writer.text(line);
            return (LineKind::Blank, writer.finish(b"", None), None);
        }

        // the handlers append this run's annotation
        let line = strip_persisted_tags(line);

        let mut cursor = Cursor::new(line);
        let first = cursor.next_field();
        let kind = classify(&first);

        let end = match kind {
            LineKind::Variable => self.variable_line(session, &mut cursor, &mut writer, &first).await,
            LineKind::Credential => credential::credential_line(session, &mut cursor, &mut writer, &first),
            LineKind::Zone => self.zone_line(session, &mut cursor, &mut writer, &first).await,
            LineKind::Record | LineKind::Blank => {
                self.record_line(session, &mut cursor, &mut writer, &first).await
            }
        };

        let annotation = end.annotation;
        (kind, writer.finish(end.rest, annotation), annotation)
    }
}

/// Pick a handler from the last character of the first token
fn classify(first: &Field<'_>) -> LineKind {
    match first.value.last() {
        Some(b'?') => LineKind::Variable,
        Some(b':') => LineKind::Credential,
        Some(b'/') => LineKind::Zone,
        _ => LineKind::Record,
    }
}

/// The first token without its one-character sentinel
fn without_sentinel<'a>(first: &Field<'a>) -> &'a [u8] {
    &first.value[..first.value.len() - 1]
}

/// Split a line into content and terminator
fn split_terminator(raw: &[u8]) -> (&[u8], &'static [u8]) {
    if let Some(content) = raw.strip_suffix(b"\r\n") {
        (content, &b"\r\n"[..])
    } else if let Some(content) = raw.strip_suffix(b"\n") {
        (content, &b"\n"[..])
    } else {
        (raw, &b"\n"[..])
    }
}
