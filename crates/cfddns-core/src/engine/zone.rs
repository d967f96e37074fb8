//! `zoneName/ [zoneId]`

use tracing::warn;

use crate::context::Session;
use crate::scanner::{Cursor, Field};

use super::writer::LineWriter;
use super::{Annotation, Engine, LineEnd, without_sentinel};

impl Engine {
    /// Select the zone for the record lines that follow
    ///
    /// A zone id already in the file is used as is; otherwise it is looked
    /// up by name and written back.
    pub(super) async fn zone_line<'a>(
        &self,
        session: &mut Session,
        cursor: &mut Cursor<'a>,
        writer: &mut LineWriter,
        first: &Field<'a>,
    ) -> LineEnd<'a> {
        session.zone_name.set(&String::from_utf8_lossy(without_sentinel(first)));
        writer.field(first);

        let zone_id = cursor.next_field();
        if !zone_id.is_absent() {
            session.zone_id.set(&zone_id.text());
            writer.replace(&zone_id, zone_id.value, true);
            return LineEnd::plain(cursor.rest());
        }

        session.zone_id = self.client.lookup_zone(session).await;
        writer.insert(&zone_id, session.zone_id.as_bytes(), true, cursor.rest());

        let annotation = if session.zone_id.is_empty() {
            warn!("Could not resolve zone id for {}", session.zone_name);
            Annotation::GetZoneIdFailed
        } else {
            Annotation::GotZoneId
        };
        LineEnd::annotated(cursor.rest(), annotation)
    }
}
