//! Per-run session state
//!
//! A [`Session`] is created at the start of a run and dropped at its end.
//! Fields are overwritten top-down as lines are processed and read by the
//! lines that follow.

use crate::bounded::BoundedString;
use crate::variables::VariableTable;

/// Mutable state threaded through one run
#[derive(Default)]
pub struct Session {
    pub auth_email: BoundedString,
    pub auth_api_key: BoundedString,

    /// Set by the most recent zone line
    pub zone_name: BoundedString,
    pub zone_id: BoundedString,

    /// Scratch fields, reset by every record line
    pub record_type: BoundedString,
    pub record_name: BoundedString,
    pub record_id: BoundedString,
    pub record_content: BoundedString,

    pub variables: VariableTable,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget both credentials
    pub fn clear_credentials(&mut self) {
        self.auth_email.clear();
        self.auth_api_key.clear();
    }

    /// Reset the record scratch fields
    pub fn reset_record(&mut self) {
        self.record_type.clear();
        self.record_name.clear();
        self.record_id.clear();
        self.record_content.clear();
    }

    /// Fully qualified name of the current record
    ///
    /// `@` names the zone apex.
    pub fn fqdn(&self) -> String {
        if self.record_name == "@" {
            self.zone_name.to_string()
        } else {
            format!("{}.{}", self.record_name, self.zone_name)
        }
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_email", &self.auth_email)
            .field("auth_api_key", &"<REDACTED>")
            .field("zone_name", &self.zone_name)
            .field("zone_id", &self.zone_id)
            .field("record_type", &self.record_type)
            .field("record_name", &self.record_name)
            .field("record_id", &self.record_id)
            .field("variables", &self.variables.len())
            .finish()
    }
}
