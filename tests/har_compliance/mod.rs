//! HAR Compliance Test Suite
//!
//! Every test replays `fixtures/page_load.json`: a redirected document, a
//! stylesheet, a memory-cached image, a blocked beacon, a `data:` image and
//! a request issued after the load event.

mod document_shape_tests;
mod entry_content_tests;
mod replay_tests;

use corten_har::{convert, CdpEvent, HarDocument, ReplayOptions};

pub const PAGE_URL: &str = "https://example.com/";

pub fn fixture_events() -> Vec<CdpEvent> {
    serde_json::from_str(include_str!("fixtures/page_load.json"))
        .expect("fixture is a JSON array of events")
}

pub fn fixture_document() -> HarDocument {
    convert(PAGE_URL, &fixture_events(), ReplayOptions::default())
        .expect("fixture describes a complete page")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}
