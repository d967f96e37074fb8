//! Response scanning
//!
//! Provider responses are not parsed as JSON. Each value the engine needs is
//! located by a fixed literal marker and runs up to the next double quote.

/// Precedes the zone id in a zone lookup response
pub const ZONE_ID: &str = r#""result":[{"id":""#;

/// Precedes the record id in a record lookup response
pub const RECORD_ID: &str = r#""id":""#;

/// Precedes the record content in a record lookup response
pub const RECORD_CONTENT: &str = r#""content":""#;

/// Present anywhere in the body of a successful update
pub const UPDATE_SUCCESS: &str = r#""success":true"#;

/// Text between the first occurrence of `marker` and the next `"`
///
/// `None` if the marker is missing or never closed.
pub fn extract_after<'a>(body: &'a str, marker: &str) -> Option<&'a str> {
    let start = body.find(marker)? + marker.len();
    let len = body[start..].find('"')?;
    Some(&body[start..start + len])
}

/// True if the body reports a successful update
pub fn is_update_success(body: &str) -> bool {
    body.contains(UPDATE_SUCCESS)
}

/// First run of non-whitespace, non-NUL characters in `body`
pub fn first_token(body: &str) -> &str {
    let is_delim = |c: char| c.is_whitespace() || c == '\0';
    let trimmed = body.trim_start_matches(is_delim);
    let end = trimmed.find(is_delim).unwrap_or(trimmed.len());
    &trimmed[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: &str = r#"{"result":[{"id":"023e105f4ecef8ad9ca31a8372d0c353","name":"example.com"}],"success":true}"#;

    #[test]
    fn zone_id_is_extracted() {
        assert_eq!(
            extract_after(ZONES, ZONE_ID),
            Some("023e105f4ecef8ad9ca31a8372d0c353")
        );
    }

    #[test]
    fn empty_result_has_no_zone_id() {
        let body = r#"{"result":[],"success":true}"#;
        assert_eq!(extract_after(body, ZONE_ID), None);
    }

    #[test]
    fn unterminated_value_is_missing() {
        assert_eq!(extract_after(r#"{"id":"abc"#, RECORD_ID), None);
    }

    #[test]
    fn record_fields_are_extracted() {
        let body = r#"{"result":[{"id":"372e6795","type":"A","name":"www.example.com","content":"198.51.100.4"}]}"#;
        assert_eq!(extract_after(body, RECORD_ID), Some("372e6795"));
        assert_eq!(extract_after(body, RECORD_CONTENT), Some("198.51.100.4"));
    }

    #[test]
    fn success_marker() {
        assert!(is_update_success(r#"{"result":{},"success":true,"errors":[]}"#));
        assert!(!is_update_success(r#"{"success":false,"errors":[{"code":1003}]}"#));
        assert!(!is_update_success(""));
    }

    #[test]
    fn first_token_skips_leading_whitespace() {
        assert_eq!(first_token("1.2.3.4\n"), "1.2.3.4");
        assert_eq!(first_token("\n\n  203.0.113.9 extra"), "203.0.113.9");
        assert_eq!(first_token("\0\0abc\0def"), "abc");
        assert_eq!(first_token("   \n"), "");
        assert_eq!(first_token(""), "");
    }
}
