//! Document Shape Tests
//!
//! Checks the serialized document against the HAR 1.2 layout.

use super::{assert_close, fixture_document, PAGE_URL};
use pretty_assertions::assert_eq;
use serde_json::Value;

// ============================================================================
// Log
// ============================================================================

#[test]
fn test_log_header() {
    let json = serde_json::to_value(fixture_document()).unwrap();
    let log = &json["log"];

    assert_eq!(log["version"], "1.2");
    assert_eq!(log["creator"]["name"], "har_builder");
    assert!(log["creator"]["version"].is_string());
    assert!(log["pages"].is_array());
    assert!(log["entries"].is_array());
}

#[test]
fn test_single_page_record() {
    let document = fixture_document();

    assert_eq!(document.log.pages.len(), 1);
    let page = &document.log.pages[0];
    assert_eq!(page.id, "page_1");
    assert_eq!(page.title, PAGE_URL);
    assert_eq!(page.started_date_time, "2023-11-14T22:13:20.000Z");
    assert_close(page.page_timings.on_content_load, 600.0);
    assert_close(page.page_timings.on_load, 900.0);
    assert_eq!(page.user, None);
}

#[test]
fn test_every_entry_references_the_page() {
    let document = fixture_document();
    assert!(document
        .log
        .entries
        .iter()
        .all(|entry| entry.pageref == "page_1"));
}

// ============================================================================
// Entries
// ============================================================================

#[test]
fn test_entries_in_first_seen_order() {
    let document = fixture_document();
    let urls: Vec<&str> = document
        .log
        .entries
        .iter()
        .map(|entry| entry.request.url.as_str())
        .collect();

    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://www.example.com/",
            "https://www.example.com/style.css",
            "https://cdn.example.com/logo.png?v=3",
            "https://tracker.example.net/beacon",
        ]
    );
}

#[test]
fn test_required_entry_fields() {
    let json = serde_json::to_value(fixture_document()).unwrap();

    for entry in json["log"]["entries"].as_array().unwrap() {
        for field in ["pageref", "startedDateTime", "time", "request", "response", "cache", "timings"] {
            assert!(entry.get(field).is_some(), "entry lacks {field}");
        }
        for field in ["method", "url", "httpVersion", "cookies", "headers", "queryString", "headersSize", "bodySize"] {
            assert!(entry["request"].get(field).is_some(), "request lacks {field}");
        }
        for field in ["status", "statusText", "httpVersion", "cookies", "headers", "content", "redirectURL", "headersSize", "bodySize"] {
            assert!(entry["response"].get(field).is_some(), "response lacks {field}");
        }
        for field in ["size", "mimeType"] {
            assert!(entry["response"]["content"].get(field).is_some(), "content lacks {field}");
        }
        for field in ["send", "wait", "receive"] {
            assert!(entry["timings"][field].is_number(), "timings lack {field}");
        }
    }
}

#[test]
fn test_headers_are_name_value_pairs() {
    let json = serde_json::to_value(fixture_document()).unwrap();
    let headers = &json["log"]["entries"][1]["response"]["headers"];

    let pairs: Vec<(&str, &str)> = headers
        .as_array()
        .unwrap()
        .iter()
        .map(|h| (h["name"].as_str().unwrap(), h["value"].as_str().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Content-Type", "text/html; charset=utf-8"),
            ("Set-Cookie", "id=42; Path=/; HttpOnly"),
            ("x-served-by", "edge-1"),
        ]
    );
}

#[test]
fn test_started_date_times_are_iso_8601() {
    let json = serde_json::to_value(fixture_document()).unwrap();

    let starts: Vec<&str> = json["log"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["startedDateTime"].as_str().unwrap())
        .collect();
    assert_eq!(starts[0], "2023-11-14T22:13:20.000Z");
    assert_eq!(starts[1], "2023-11-14T22:13:20.100Z");
    assert!(starts.iter().all(|s| s.ends_with('Z') && s.len() == 24));
}

#[test]
fn test_round_trips_through_json() {
    let document = fixture_document();
    let text = serde_json::to_string(&document).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    let restored: corten_har::HarDocument = serde_json::from_value(value).unwrap();

    assert_eq!(restored, document);
}
