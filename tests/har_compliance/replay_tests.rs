//! Replay Tests
//!
//! Completion rules of the replayer over the fixture log.

use super::{fixture_document, fixture_events, PAGE_URL};
use corten_har::{convert, convert_json, CdpEvent, HarError, LogReplayer, ReplayOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

fn body(request_id: &str, text: &str) -> CdpEvent {
    CdpEvent::new(
        "Network.getResponseBody",
        json!({"requestId": request_id, "body": text, "base64Encoded": false}),
    )
}

fn body_error(request_id: &str) -> CdpEvent {
    CdpEvent::new(
        "Network.getResponseBody",
        json!({"requestId": request_id, "error": "No resource with given identifier found"}),
    )
}

/// Fixture events with body events placed just before the load event
fn with_bodies(bodies: Vec<CdpEvent>) -> Vec<CdpEvent> {
    let mut events = fixture_events();
    let load = events
        .iter()
        .position(|e| e.method == "Page.loadEventFired")
        .unwrap();
    events.splice(load..load, bodies);
    events
}

#[test]
fn test_non_network_and_late_requests_are_left_out() {
    let document = fixture_document();

    assert_eq!(document.log.entries.len(), 5);
    assert!(document
        .log
        .entries
        .iter()
        .all(|e| !e.request.url.starts_with("data:") && !e.request.url.ends_with("late.js")));
}

#[test]
fn test_content_requires_bodies() {
    let error = convert(PAGE_URL, &fixture_events(), ReplayOptions { content: true }).unwrap_err();

    // the document, the stylesheet and the cached image lack bodies, and
    // late.js never finished
    assert!(matches!(error, HarError::IncompleteCapture { pending: 4, .. }));
}

#[test]
fn test_content_with_bodies() {
    let events = with_bodies(vec![
        body("1000.1", "<html></html>"),
        body("2", "body { color: red }"),
        body_error("4"),
    ]);

    let document = convert(PAGE_URL, &events, ReplayOptions { content: true }).unwrap();

    let texts: Vec<Option<&str>> = document
        .log
        .entries
        .iter()
        .map(|e| e.response.content.text.as_deref())
        .collect();
    assert_eq!(
        texts,
        vec![None, Some("<html></html>"), Some("body { color: red }"), None, None]
    );
}

#[test]
fn test_bodies_are_dropped_without_content() {
    let events = with_bodies(vec![body("1000.1", "<html></html>")]);
    let document = convert(PAGE_URL, &events, ReplayOptions::default()).unwrap();

    assert_eq!(document.log.entries.len(), 5);
    assert_eq!(document.log.entries[1].response.content.text, None);
}

#[test]
fn test_truncated_log_fails() {
    let mut events = fixture_events();
    events.truncate(10);

    let error = convert(PAGE_URL, &events, ReplayOptions::default()).unwrap_err();
    assert!(matches!(error, HarError::IncompleteCapture { .. }));
    assert_eq!(
        error.to_string(),
        "Incomplete capture: 1 request(s) still pending, load event missing"
    );
}

#[test]
fn test_convert_json_matches_convert() {
    let json = include_str!("fixtures/page_load.json");
    let document = convert_json(PAGE_URL, json, ReplayOptions::default()).unwrap();

    assert_eq!(document, fixture_document());
}

#[test]
fn test_entries_over_threshold() {
    let document = fixture_document();

    let slow: Vec<&str> = document
        .entries_over(300.0)
        .map(|e| e.request.url.as_str())
        .collect();
    assert_eq!(slow, vec!["https://www.example.com/"]);
    assert_eq!(document.entries_over(100.0).count(), 2);
    // entries without timing never qualify, even at a negative threshold
    assert_eq!(document.entries_over(-10.0).count(), 2);
}

#[test]
fn test_streamed_replay_matches_convert() {
    let replayer = LogReplayer::new(PAGE_URL, ReplayOptions::default());
    let document =
        tokio_test::block_on(replayer.replay_stream(futures::stream::iter(fixture_events())))
            .unwrap();

    assert_eq!(document, fixture_document());
}
