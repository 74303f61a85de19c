//! HAR capture for CortenBrowser
//!
//! Turns Chrome DevTools Protocol event streams into HAR 1.2 documents,
//! either from a recorded log or from a live browsing context.
//!
//! # Example
//!
//! ```no_run
//! use corten_har::{capture_urls, CaptureConfig, ContextProvider};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn archive(provider: Arc<dyn ContextProvider>) -> anyhow::Result<String> {
//!     let config = CaptureConfig::builder()
//!         .timeout(Duration::from_secs(30))
//!         .content(true)
//!         .parallel(2)
//!         .build();
//!     let urls = vec!["https://example.com/".to_string()];
//!
//!     let batch = capture_urls(provider, &urls, config, None).await;
//!     Ok(serde_json::to_string_pretty(&batch.document)?)
//! }
//! ```

#![warn(missing_docs)]

pub use cdp_types::{CdpError, CdpEvent};
pub use har_builder::{
    EngineStatus, HarBuilderOptions, HarDocument, HarEntry, HarError, HarLog, HarPage,
    HeaderEntry, HeaderSet, StatsEngine, TIMING_UNAVAILABLE,
};
pub use har_capture::{
    capture_urls, convert, convert_json, BatchCapture, BrowsingContext, CaptureConfig,
    CaptureError, CaptureEvent, ContextProvider, HookContext, HookStage, InteractionConfig,
    LiveSession, LogReplayer, PageFailure, PageHook, ReplayOptions, Result, SessionOutcome,
    SessionTimer, TimerOutcome,
};
