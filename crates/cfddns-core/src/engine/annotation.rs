//! Line annotations
//!
//! Diagnostics are written back into the configuration file so the problem
//! is visible where it is fixed. Outcome tags only go to the transcript.

use serde::Serialize;

/// Trailing `#tag` attached to a processed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    // Written to the file
    NeedUrl,
    AlreadyBinded,
    RequestFailed,
    Changed,
    NeedApikey,
    NeedName,
    NeedVarKey,
    VarUndefined,

    // Transcript only
    GotZoneId,
    GetZoneIdFailed,
    VarNotChanged,
    AlreadyUpToDate,
    Updated,
    WouldUpdate,
    UpdateFailed,
    GetRecordIdFailed,
}

impl Annotation {
    /// Annotations that are written to the file
    pub const PERSISTED: [Annotation; 8] = [
        Annotation::NeedUrl,
        Annotation::AlreadyBinded,
        Annotation::RequestFailed,
        Annotation::Changed,
        Annotation::NeedApikey,
        Annotation::NeedName,
        Annotation::NeedVarKey,
        Annotation::VarUndefined,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Annotation::NeedUrl => "#need_url",
            Annotation::AlreadyBinded => "#already_binded",
            Annotation::RequestFailed => "#request_failed",
            Annotation::Changed => "#changed",
            Annotation::NeedApikey => "#need_apikey",
            Annotation::NeedName => "#need_name",
            Annotation::NeedVarKey => "#need_var_key",
            Annotation::VarUndefined => "#var_undefined",
            Annotation::GotZoneId => "#got_zone_id",
            Annotation::GetZoneIdFailed => "#get_zone_id_failed",
            Annotation::VarNotChanged => "#var_not_changed",
            Annotation::AlreadyUpToDate => "#already_up_to_date",
            Annotation::Updated => "#updated",
            Annotation::WouldUpdate => "#would_update",
            Annotation::UpdateFailed => "#update_failed",
            Annotation::GetRecordIdFailed => "#get_record_id_failed",
        }
    }

    pub fn is_persisted(&self) -> bool {
        Self::PERSISTED.contains(self)
    }

    /// A persisted annotation reporting a problem with the line itself
    pub fn is_diagnostic(&self) -> bool {
        self.is_persisted() && *self != Annotation::Changed
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
