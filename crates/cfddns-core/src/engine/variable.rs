//! `key? url [last_value]`
//!
//! Fetches the URL, binds the first token of the response to `key` and
//! writes it back as the new last value.

use tracing::{debug, warn};

use crate::context::Session;
use crate::scanner::{Cursor, Field};
use crate::variables::Variable;

use super::writer::LineWriter;
use super::{Annotation, Engine, LineEnd, without_sentinel};

impl Engine {
    pub(super) async fn variable_line<'a>(
        &self,
        session: &mut Session,
        cursor: &mut Cursor<'a>,
        writer: &mut LineWriter,
        first: &Field<'a>,
    ) -> LineEnd<'a> {
        let key = String::from_utf8_lossy(without_sentinel(first));
        writer.field(first);

        if session.variables.contains(&key) {
            debug!("Variable {} is already bound", key);
            return LineEnd::annotated(cursor.rest(), Annotation::AlreadyBinded);
        }

        let url = cursor.next_field();
        if url.is_absent() {
            return LineEnd::annotated(cursor.rest_from(url.start), Annotation::NeedUrl);
        }
        writer.field(&url);

        let url_text = url.text();
        let value = self.client.fetch_first_token(&url_text).await;
        if value.is_empty() {
            warn!("Fetching {} for variable {} returned nothing", url_text, key);
            return LineEnd::annotated(cursor.rest(), Annotation::RequestFailed);
        }

        let last = cursor.next_field();
        if last.is_absent() {
            writer.insert(&last, value.as_bytes(), false, cursor.rest());
        } else {
            writer.replace(&last, value.as_bytes(), false);
        }

        let last_text = (!last.is_absent()).then(|| last.text());
        let var = Variable::new(&key, value, last_text.as_deref());
        let annotation = var.changed.then_some(Annotation::Changed);
        debug!("Bound {} = {} (changed={})", key, var.value, var.changed);
        session.variables.bind(var);

        LineEnd::new(cursor.rest(), annotation)
    }
}
