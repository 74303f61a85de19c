//! Entry Content Tests
//!
//! Per-entry details: redirects, header merging, cookies, sizes, cache hits,
//! failures and timing phases.

use super::{assert_close, fixture_document};
use corten_har::{HarEntry, TIMING_UNAVAILABLE};
use pretty_assertions::assert_eq;

fn entry(index: usize) -> HarEntry {
    fixture_document().log.entries[index].clone()
}

// ============================================================================
// Redirect chain
// ============================================================================

#[test]
fn test_redirect_hop_keeps_its_own_response() {
    let hop = entry(0);

    assert_eq!(hop.response.status, 301);
    assert_eq!(hop.response.status_text, "Moved Permanently");
    assert_eq!(hop.response.redirect_url, "https://www.example.com/");
    assert_eq!(hop.response.http_version, "HTTP/1.1");
    assert_eq!(hop.response.transfer_size, Some(120));
    assert_eq!(hop.time, TIMING_UNAVAILABLE);
}

#[test]
fn test_redirect_target_is_a_separate_entry() {
    let target = entry(1);

    assert_eq!(target.request.url, "https://www.example.com/");
    assert_eq!(target.response.status, 200);
    assert_eq!(target.response.redirect_url, "");
    assert_eq!(target.resource_type.as_deref(), Some("Document"));
}

// ============================================================================
// Headers and cookies
// ============================================================================

#[test]
fn test_request_extra_info_merges_into_headers() {
    let hop = entry(0);
    let names: Vec<&str> = hop.request.headers.iter().map(|h| h.name.as_str()).collect();

    // user-agent repeated by extra-info with the same value is absorbed
    assert_eq!(names, vec!["User-Agent", "Cookie", ":authority"]);
    assert_eq!(hop.request.headers.count_named("user-agent"), 1);
}

#[test]
fn test_request_cookies() {
    let hop = entry(0);
    let cookies: Vec<(&str, &str)> = hop
        .request
        .cookies
        .iter()
        .map(|c| (c.name.as_str(), c.value.as_str()))
        .collect();

    assert_eq!(cookies, vec![("session", "abc"), ("theme", "dark")]);
}

#[test]
fn test_response_cookies() {
    let document = entry(1);
    let cookie = &document.response.cookies[0];

    assert_eq!(document.response.cookies.len(), 1);
    assert_eq!(cookie.name, "id");
    assert_eq!(cookie.value, "42");
    assert_eq!(cookie.path.as_deref(), Some("/"));
    assert_eq!(cookie.http_only, Some(true));
}

// ============================================================================
// Sizes
// ============================================================================

#[test]
fn test_document_sizes() {
    let document = entry(1);

    assert_eq!(document.response.headers_size, 117);
    assert_eq!(document.response.transfer_size, Some(2100));
    assert_eq!(document.response.body_size, 2100 - 117);
    assert_eq!(document.response.content.size, 5000);
    assert_eq!(document.response.content.compression, Some(5000 - 1983));
    assert_eq!(document.response.content.mime_type, "text/html");
}

#[test]
fn test_connection_details() {
    let document = entry(1);

    assert_eq!(document.response.http_version, "HTTP/2.0");
    assert_eq!(document.request.http_version, "HTTP/2.0");
    assert_eq!(document.server_ip_address.as_deref(), Some("93.184.216.34"));
    assert_eq!(document.connection.as_deref(), Some("17"));
}

// ============================================================================
// Cache hits, failures, priorities
// ============================================================================

#[test]
fn test_memory_cache_hit() {
    let image = entry(3);

    assert_eq!(image.from_cache.as_deref(), Some("memory"));
    assert_eq!(image.response.body_size, 0);
    assert_eq!(image.time, TIMING_UNAVAILABLE);
    assert!(!image.has_timing());
    assert_eq!(image.request.query_string.len(), 1);
    assert_eq!(image.request.query_string[0].name, "v");
    assert_eq!(image.request.query_string[0].value, "3");
}

#[test]
fn test_blocked_request_is_recorded() {
    let beacon = entry(4);

    assert_eq!(beacon.request.method, "POST");
    assert_eq!(beacon.response.status, 0);
    assert_eq!(beacon.response.error.as_deref(), Some("net::ERR_BLOCKED_BY_CLIENT"));
    assert_eq!(beacon.time, TIMING_UNAVAILABLE);

    let post_data = beacon.request.post_data.unwrap();
    assert_eq!(post_data.mime_type, "application/x-www-form-urlencoded");
    assert_eq!(post_data.text, "event=view&page=home");
    assert_eq!(post_data.params.len(), 2);
    assert_eq!(beacon.request.body_size, 20);
}

#[test]
fn test_priority_follows_changes() {
    assert_eq!(entry(0).priority.as_deref(), Some("VeryHigh"));
    assert_eq!(entry(2).priority.as_deref(), Some("High"));
}

// ============================================================================
// Timings
// ============================================================================

#[test]
fn test_document_timing_phases() {
    let document = entry(1);
    let timings = document.timings;

    assert_close(timings.blocked, 0.0);
    assert_close(timings.dns, 10.0);
    assert_close(timings.connect, 30.0);
    assert_close(timings.ssl, 20.0);
    assert_close(timings.send, 1.0);
    assert_close(timings.wait, 108.0);
    assert_close(timings.receive, 250.0);
    assert_close(document.time, 399.0);
}

#[test]
fn test_queueing_counts_as_blocked() {
    let stylesheet = entry(2);

    // 10 ms between requestWillBeSent and requestTime, 0.5 ms before send
    assert_close(stylesheet.timings.blocked, 10.5);
    assert_eq!(stylesheet.timings.dns, TIMING_UNAVAILABLE);
    assert_eq!(stylesheet.timings.connect, TIMING_UNAVAILABLE);
    assert_close(stylesheet.timings.send, 0.3);
    assert_close(stylesheet.timings.wait, 59.2);
    assert_close(stylesheet.timings.receive, 180.0);
    assert_close(stylesheet.time, 250.0);
}

#[test]
fn test_time_is_sum_of_phases() {
    for entry in fixture_document().log.entries.iter().filter(|e| e.has_timing()) {
        assert_close(entry.time, entry.timings.total());
    }
}
