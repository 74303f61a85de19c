// Page domain types

use super::network::Timestamp;
use serde::{Deserialize, Serialize};

/// `Page.domContentEventFired`
pub const DOM_CONTENT_EVENT_FIRED: &str = "Page.domContentEventFired";
/// `Page.loadEventFired`
pub const LOAD_EVENT_FIRED: &str = "Page.loadEventFired";

/// Parameters shared by both page lifecycle events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LifecycleTimestamp {
    pub timestamp: Timestamp,
}

/// Result of the `Page.navigate` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    pub frame_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_id: Option<String>,
    /// Set when the navigation itself failed (DNS error, refused connection...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}
