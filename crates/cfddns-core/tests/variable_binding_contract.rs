//! Contract Test: Variable Binding
//!
//! Constraints verified:
//! - a key is bound at most once per run; later declarations are refused
//!   without a fetch
//! - a failed fetch binds nothing and keeps the previous value in the file
//! - fetched values are truncated to the bounded capacity
//! - record lines only see variables declared above them

mod common;

use cfddns_core::{Annotation, BOUNDED_CAPACITY, Method};
use common::*;

#[tokio::test]
async fn duplicate_binding_is_a_no_op() {
    let mock = MockTransport::new();
    mock.on_get("https://x.test/a", "a")
        .on_get("https://x.test/b", "b")
        .on_put(record_update_url("z1", "t1"), UPDATE_OK);

    let input = "\
A? https://x.test/a a
A? https://x.test/b b
me@example.com: key123
example.com/ z1
TXT txt A t1!
";
    let report = engine(&mock).run(input).await;

    let lines: Vec<&str> = report.text().lines().collect();
    assert_eq!(lines[0], "A? https://x.test/a a");
    assert_eq!(lines[1], "A? https://x.test/b b #already_binded");
    assert_eq!(report.lines[1].annotation, Some(Annotation::AlreadyBinded));

    // the refused declaration is never fetched
    assert!(mock.calls().iter().all(|c| c.url != "https://x.test/b"));

    // and the record sees the first binding
    let puts = mock.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(
        puts[0].body.as_deref(),
        Some(r#"{"type":"TXT","name":"txt","content":"a"}"#)
    );
    assert_eq!(report.summary.variables_bound, 1);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_value() {
    let mock = MockTransport::new();
    mock.fail(Method::Get, "https://ip.test/down");

    let input = "\
ip? https://ip.test/down 1.2.3.4 #changed
me@example.com: key123
example.com/ z1
A www ip 3f9a
";
    let report = engine(&mock).run(input).await;

    let lines: Vec<&str> = report.text().lines().collect();
    assert_eq!(lines[0], "ip? https://ip.test/down 1.2.3.4 #request_failed");
    assert_eq!(lines[3], "A www ip 3f9a #var_undefined");
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn empty_body_counts_as_failed_fetch() {
    let mock = MockTransport::new();
    mock.on_get(IP_URL, " \n\n");

    let report = engine(&mock).run(&format!("ip? {}\n", IP_URL)).await;

    assert_eq!(report.text(), format!("ip? {} #request_failed\n", IP_URL));
    assert_eq!(report.summary.variables_bound, 0);
}

#[tokio::test]
async fn first_token_of_body_is_bound() {
    let mock = MockTransport::new();
    mock.on_get(IP_URL, "\n  203.0.113.9 via proxy\n");

    let report = engine(&mock).run(&format!("ip? {}\n", IP_URL)).await;

    assert_eq!(report.text(), format!("ip? {} 203.0.113.9 #changed\n", IP_URL));
}

#[tokio::test]
async fn long_values_are_truncated() {
    let long = "a".repeat(BOUNDED_CAPACITY + 46);
    let mock = MockTransport::new();
    mock.on_get(IP_URL, long.clone());

    let report = engine(&mock).run(&format!("v? {}\n", IP_URL)).await;

    let expected = format!("v? {} {} #changed\n", IP_URL, &long[..BOUNDED_CAPACITY]);
    assert_eq!(report.text(), expected);

    // the truncated value compares equal on the next run
    let again = engine(&mock).run(&report.text()).await;
    assert_eq!(again.lines[0].annotation, None);
}

#[tokio::test]
async fn forward_references_are_undefined() {
    let mock = MockTransport::new();
    mock.on_get(IP_URL, "1.2.3.4");

    let input = format!("A www ip 3f9a\nip? {}\n", IP_URL);
    let report = engine(&mock).run(&input).await;

    assert_eq!(report.text().lines().next(), Some("A www ip 3f9a #var_undefined"));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn changed_flag_compares_with_last_value() {
    let mock = MockTransport::new();
    mock.on_get("https://ip.test/v4", "1.2.3.4")
        .on_get("https://ip.test/v6", "2001:db8::1");

    let input = "v4? https://ip.test/v4 1.2.3.4\nv6? https://ip.test/v6 2001:db8::2\n";
    let report = engine(&mock).run(input).await;

    assert_eq!(report.lines[0].annotation, None);
    assert_eq!(report.lines[1].annotation, Some(Annotation::Changed));
    assert_eq!(
        report.text(),
        "v4? https://ip.test/v4 1.2.3.4\nv6? https://ip.test/v6 2001:db8::1 #changed\n"
    );
    assert_eq!(report.summary.variables_changed, 1);
}
