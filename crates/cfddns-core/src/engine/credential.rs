//! `email: apikey`

use crate::context::Session;
use crate::scanner::{Cursor, Field};

use super::writer::LineWriter;
use super::{Annotation, LineEnd, without_sentinel};

/// Set the credentials used by every following provider call
///
/// A line without an API key clears both fields.
pub(super) fn credential_line<'a>(
    session: &mut Session,
    cursor: &mut Cursor<'a>,
    writer: &mut LineWriter,
    first: &Field<'a>,
) -> LineEnd<'a> {
    session.auth_email.set(&String::from_utf8_lossy(without_sentinel(first)));
    writer.field(first);

    let api_key = cursor.next_field();
    if api_key.is_absent() {
        session.clear_credentials();
        return LineEnd::annotated(cursor.rest_from(api_key.start), Annotation::NeedApikey);
    }

    session.auth_api_key.set(&api_key.text());
    writer.replace(&api_key, api_key.value, true);

    LineEnd::plain(cursor.rest())
}
