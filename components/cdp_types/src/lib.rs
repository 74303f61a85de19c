// CDP protocol types, events, and error definitions
//
// This module is part of the CortenBrowser HAR capture implementation.

pub mod domains;
pub mod errors;
pub mod events;

// Re-export commonly used types
pub use errors::{CdpError, CdpProtocolError};
pub use events::ProtocolEvent;

use serde::{Deserialize, Serialize};

/// CDP Event message
/// Represents an unsolicited event from the browser, or a synthetic one
/// produced by the capturer itself
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CdpEvent {
    /// Event name in format "Domain.event"
    pub method: String,
    /// Event parameters
    #[serde(default)]
    pub params: serde_json::Value,
}

impl CdpEvent {
    /// Create a new event
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// The `requestId` parameter, when the event carries one
    pub fn request_id(&self) -> Option<&str> {
        self.params.get("requestId").and_then(|v| v.as_str())
    }
}
