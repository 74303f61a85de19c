//! Live and replayed HAR capture
//!
//! Two ways to get a HAR document out of protocol events:
//!
//! - [`convert`] / [`LogReplayer`] fold a recorded event log.
//! - [`LiveSession`] drives a browsing context through a page load, racing
//!   completion against disconnection and a deadline. [`capture_urls`] runs
//!   sessions over a list of pages.
//!
//! The browser transport is supplied by the caller through the
//! [`BrowsingContext`] and [`ContextProvider`] traits.

mod batch;
mod config;
mod context;
mod error;
mod hooks;
mod interaction;
mod replay;
mod session;
mod timer;

pub use batch::{capture_urls, BatchCapture, CaptureEvent, PageFailure};
pub use config::{CaptureConfig, CaptureConfigBuilder, InteractionConfig};
pub use context::{BrowsingContext, ContextProvider};
pub use error::{CaptureError, HookStage, Result};
pub use hooks::{HookContext, PageHook};
pub use replay::{convert, convert_json, LogReplayer, ReplayOptions};
pub use session::{LiveSession, SessionOutcome};
pub use timer::{SessionTimer, TimerOutcome};
