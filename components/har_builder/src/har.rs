//! HAR 1.2 document model
//!
//! Field names follow the HAR 1.2 specification; custom fields carry the
//! leading underscore the format reserves for them.

use crate::headers::HeaderSet;
use serde::{Deserialize, Serialize};

/// HAR format version emitted
pub const HAR_VERSION: &str = "1.2";

/// Sentinel for "timing unavailable"
pub const TIMING_UNAVAILABLE: f64 = -1.0;

/// Top-level HAR document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarDocument {
    pub log: HarLog,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarLog {
    pub version: String,
    pub creator: Creator,
    pub pages: Vec<HarPage>,
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Creator {
    pub name: String,
    pub version: String,
}

impl Default for Creator {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarPage {
    pub id: String,
    pub title: String,
    pub started_date_time: String,
    pub page_timings: PageTimings,
    /// Result of the post-load hook, if any
    #[serde(rename = "_user", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Page timings in milliseconds since the page started; `-1` when unknown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageTimings {
    pub on_content_load: f64,
    pub on_load: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarEntry {
    pub pageref: String,
    pub started_date_time: String,
    /// Total time in milliseconds, `-1` when the request produced no timing
    pub time: f64,
    pub request: HarRequest,
    pub response: HarResponse,
    pub cache: serde_json::Map<String, serde_json::Value>,
    pub timings: HarTimings,
    #[serde(rename = "serverIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(rename = "_initiator", default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<serde_json::Value>,
    #[serde(rename = "_priority", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "_resourceType", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "_fromCache", default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<String>,
}

impl HarEntry {
    /// Whether the entry carries a usable duration
    pub fn has_timing(&self) -> bool {
        self.time >= 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    pub http_version: String,
    pub cookies: Vec<HarCookie>,
    pub headers: HeaderSet,
    pub query_string: Vec<QueryParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
    pub headers_size: i64,
    pub body_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarResponse {
    pub status: u32,
    pub status_text: String,
    pub http_version: String,
    pub cookies: Vec<HarCookie>,
    pub headers: HeaderSet,
    pub content: HarContent,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    pub headers_size: i64,
    pub body_size: i64,
    #[serde(rename = "_transferSize", default, skip_serializing_if = "Option::is_none")]
    pub transfer_size: Option<i64>,
    #[serde(rename = "_error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<i64>,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HarCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<QueryParam>,
    pub text: String,
}

/// Phase breakdown in milliseconds; `-1` marks phases that did not apply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HarTimings {
    pub blocked: f64,
    pub dns: f64,
    pub connect: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
    pub ssl: f64,
}

impl HarTimings {
    /// Breakdown for requests that never produced timing marks
    pub fn unavailable() -> Self {
        Self {
            blocked: TIMING_UNAVAILABLE,
            dns: TIMING_UNAVAILABLE,
            connect: TIMING_UNAVAILABLE,
            send: 0.0,
            wait: 0.0,
            receive: 0.0,
            ssl: TIMING_UNAVAILABLE,
        }
    }

    /// Sum of the phases that contribute to the entry's `time`.
    /// `ssl` is already part of `connect`.
    pub fn total(&self) -> f64 {
        [self.blocked, self.dns, self.connect, self.send, self.wait, self.receive]
            .iter()
            .filter(|phase| **phase > 0.0)
            .sum()
    }
}

impl HarDocument {
    /// Empty document with the crate as creator
    pub fn new() -> Self {
        Self {
            log: HarLog {
                version: HAR_VERSION.to_string(),
                creator: Creator::default(),
                pages: Vec::new(),
                entries: Vec::new(),
            },
        }
    }

    /// Combine per-page documents into one.
    ///
    /// Pages are renumbered `page_1..` in the given order and their entries
    /// re-referenced accordingly.
    pub fn merge(documents: impl IntoIterator<Item = HarDocument>) -> Self {
        let mut merged = Self::new();
        for document in documents {
            let mut renames = Vec::with_capacity(document.log.pages.len());
            for mut page in document.log.pages {
                let id = format!("page_{}", merged.log.pages.len() + 1);
                renames.push((page.id.clone(), id.clone()));
                page.id = id;
                merged.log.pages.push(page);
            }
            for mut entry in document.log.entries {
                if let Some((_, id)) = renames.iter().find(|(old, _)| *old == entry.pageref) {
                    entry.pageref = id.clone();
                }
                merged.log.entries.push(entry);
            }
        }
        merged
    }

    /// Entries with a usable duration strictly above `threshold_ms`.
    /// Entries without timing never qualify.
    pub fn entries_over(&self, threshold_ms: f64) -> impl Iterator<Item = &HarEntry> {
        self.log
            .entries
            .iter()
            .filter(move |entry| entry.has_timing() && entry.time > threshold_ms)
    }
}

impl Default for HarDocument {
    fn default() -> Self {
        Self::new()
    }
}
