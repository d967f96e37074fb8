//! Run results

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::annotation::Annotation;

/// What a line was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Blank or comment only, passed through
    Blank,
    /// `key? url [last_value]`
    Variable,
    /// `email: apikey`
    Credential,
    /// `zoneName/ [zoneId]`
    Zone,
    /// `type name varKey [recordId[!]]`
    Record,
}

/// Per-line result
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    /// 1-based line number
    pub number: usize,
    pub kind: LineKind,
    pub annotation: Option<Annotation>,
    /// The line as logged, secrets masked unless enabled
    pub transcript: String,
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines: usize,
    pub variables_bound: usize,
    pub variables_changed: usize,
    pub records_unchanged: usize,
    pub records_updated: usize,
    pub records_failed: usize,
    pub diagnostics: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub(crate) fn count(&mut self, kind: LineKind, annotation: Option<Annotation>) {
        self.lines += 1;

        let Some(annotation) = annotation else {
            return;
        };
        if annotation.is_diagnostic() {
            self.diagnostics += 1;
        }
        if kind != LineKind::Record {
            return;
        }
        match annotation {
            Annotation::VarNotChanged | Annotation::AlreadyUpToDate => self.records_unchanged += 1,
            Annotation::Updated | Annotation::WouldUpdate => self.records_updated += 1,
            Annotation::UpdateFailed | Annotation::GetRecordIdFailed => self.records_failed += 1,
            _ => {}
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The rewritten configuration file
    pub output: Vec<u8>,
    pub lines: Vec<LineReport>,
    pub summary: RunSummary,
}
