//! HAR assembly from Chrome DevTools Protocol events
//!
//! This crate folds the Network and Page events of one page load into a
//! HAR 1.2 document.
//!
//! # Features
//! - **Order-independent folding**: a request's events may arrive in any
//!   order, extra-info events before or after their primary event
//! - **Header merge**: lower-layer headers are merged without duplicating
//!   identical name/value pairs
//! - **Redirect chains**: every hop of a request id becomes its own entry
//! - **Completion detection**: the engine decides when the page is loaded
//!
//! # Example
//!
//! ```
//! use cdp_types::CdpEvent;
//! use har_builder::{EngineStatus, HarBuilderOptions, StatsEngine};
//! use serde_json::json;
//!
//! let mut engine = StatsEngine::new("https://example.com/", HarBuilderOptions::default());
//! let events = vec![
//!     CdpEvent::new("Network.requestWillBeSent", json!({
//!         "requestId": "1",
//!         "request": {"url": "https://example.com/", "method": "GET", "headers": {}},
//!         "timestamp": 1.0,
//!         "wallTime": 1700000000.0
//!     })),
//!     CdpEvent::new("Network.loadingFinished", json!({
//!         "requestId": "1", "timestamp": 1.2, "encodedDataLength": 512
//!     })),
//!     CdpEvent::new("Page.loadEventFired", json!({"timestamp": 1.5})),
//! ];
//!
//! let mut document = None;
//! for event in &events {
//!     if let EngineStatus::Complete(har) = engine.process_event(event) {
//!         document = Some(har);
//!     }
//! }
//! assert_eq!(document.unwrap().log.entries.len(), 1);
//! ```

mod cookies;
mod engine;
mod entry;
mod error;
mod har;
mod headers;
mod page;
mod request;

pub use engine::{EngineStatus, HarBuilderOptions, StatsEngine};
pub use error::{HarError, LoadState, Result};
pub use har::{
    Creator, HarContent, HarCookie, HarDocument, HarEntry, HarLog, HarPage, HarRequest,
    HarResponse, HarTimings, PageTimings, PostData, QueryParam, HAR_VERSION, TIMING_UNAVAILABLE,
};
pub use headers::{HeaderEntry, HeaderSet};
pub use page::{PageMetric, PageRecord};
