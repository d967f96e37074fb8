// # Record Reconciliation
//
// `type name varKey [recordId[!]]`
//
// Record ids cached in the file are optimistic hints. The fourth field
// decides how far they are trusted:
//
// | field   | lookup first | force update | may expire |
// |---------|--------------|--------------|------------|
// | absent  | yes          | yes          | no         |
// | `!`     | yes          | yes          | yes        |
// | `id!`   | no           | yes          | yes        |
// | `id`    | no           | no           | yes        |
//
// A plain id is trusted until its variable changes. Anything that may have
// expired gets one more lookup and update attempt before the line is marked
// failed, so a line costs at most two lookups and two update calls.
//
// The id written back ends in `!` when the record could not be confirmed,
// asking the next run to re-resolve it.

use tracing::{debug, info, warn};

use crate::context::Session;
use crate::scanner::{Cursor, Field, is_space};
use crate::variables::Variable;

use super::writer::LineWriter;
use super::{Annotation, Engine, LineEnd};

/// Suffix marking a record id as possibly stale
const STALE_MARKER: u8 = b'!';

impl Engine {
    pub(super) async fn record_line<'a>(
        &self,
        session: &mut Session,
        cursor: &mut Cursor<'a>,
        writer: &mut LineWriter,
        first: &Field<'a>,
    ) -> LineEnd<'a> {
        session.reset_record();
        session.record_type.set(&first.text());
        writer.field(first);

        let name = cursor.next_field();
        if name.is_absent() {
            return LineEnd::annotated(cursor.rest_from(name.start), Annotation::NeedName);
        }
        session.record_name.set(&name.text());
        writer.field(&name);

        let key = cursor.next_field();
        if key.is_absent() {
            return LineEnd::annotated(cursor.rest_from(key.start), Annotation::NeedVarKey);
        }
        writer.field(&key);

        let Some(var) = session.variables.get(&key.text()).cloned() else {
            debug!("Variable {} is not bound", key.text());
            return LineEnd::annotated(cursor.rest(), Annotation::VarUndefined);
        };

        let id_field = cursor.next_field();
        let (cached_id, stale_marked) = match id_field.value.strip_suffix(&[STALE_MARKER]) {
            Some(id) => (id, true),
            None => (id_field.value, false),
        };

        let (force_update, may_expire) = if cached_id.is_empty() {
            self.refresh_record(session).await;
            (true, stale_marked)
        } else {
            session.record_id.set(&String::from_utf8_lossy(cached_id));
            (stale_marked, true)
        };

        let (success, annotation) = self
            .reconcile(session, &var, force_update, may_expire)
            .await;

        let mut rest = cursor.rest();
        writer.text(id_field.gap);
        if id_field.gap.is_empty() && (!session.record_id.is_empty() || !success) {
            writer.text(b" ");
        }
        // an id kept from the file goes back as it was read
        if !cached_id.is_empty() && String::from_utf8_lossy(cached_id) == session.record_id.as_str() {
            writer.secret(cached_id);
        } else {
            writer.secret(session.record_id.as_bytes());
        }

        if !success {
            writer.text(&[STALE_MARKER]);
            if !stale_marked {
                rest = drop_redundant_space(rest);
            }
        } else if stale_marked && !rest.is_empty() {
            // keep trailing text in the column the marker used to hold
            writer.text(b" ");
        }
        if id_field.is_absent() {
            writer.separate(rest);
        }

        LineEnd::annotated(rest, annotation)
    }

    /// Decide whether the record ends up holding the variable's value
    async fn reconcile(
        &self,
        session: &mut Session,
        var: &Variable,
        force_update: bool,
        may_expire: bool,
    ) -> (bool, Annotation) {
        if session.record_id.is_empty() {
            return (false, Annotation::GetRecordIdFailed);
        }

        if !force_update && !var.changed {
            return (true, Annotation::VarNotChanged);
        }

        if let Some(annotation) = self.converge(session, var).await {
            return (true, annotation);
        }

        if may_expire {
            debug!(
                "Record {} {} may be stale, looking it up again",
                session.record_type,
                session.fqdn()
            );
            self.refresh_record(session).await;
            if session.record_id.is_empty() {
                return (false, Annotation::GetRecordIdFailed);
            }
            if let Some(annotation) = self.converge(session, var).await {
                return (true, annotation);
            }
        }

        warn!(
            "Failed to update {} {} to {}",
            session.record_type,
            session.fqdn(),
            var.value
        );
        (false, Annotation::UpdateFailed)
    }

    /// Known content already matches, or one update call succeeds
    async fn converge(&self, session: &Session, var: &Variable) -> Option<Annotation> {
        if session.record_content == var.value {
            return Some(Annotation::AlreadyUpToDate);
        }

        if self.config.dry_run {
            info!(
                "[dry-run] Would update {} {} to {}",
                session.record_type,
                session.fqdn(),
                var.value
            );
            return Some(Annotation::WouldUpdate);
        }

        if self.client.update_record(session, var.value.as_str()).await {
            info!(
                "Updated {} {} -> {}",
                session.record_type,
                session.fqdn(),
                var.value
            );
            Some(Annotation::Updated)
        } else {
            None
        }
    }

    /// Replace the cached id and content with a fresh lookup
    async fn refresh_record(&self, session: &mut Session) {
        let found = self.client.lookup_record(session).await;
        session.record_id = found.id;
        session.record_content = found.content;
    }
}

/// Drop one space that only padded the column now taken by the marker
fn drop_redundant_space(rest: &[u8]) -> &[u8] {
    match rest {
        [b' '] => &rest[1..],
        [b' ', next, ..] if is_space(*next) => &rest[1..],
        _ => rest,
    }
}
