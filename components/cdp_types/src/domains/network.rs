// Network domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Network.requestWillBeSent`
pub const REQUEST_WILL_BE_SENT: &str = "Network.requestWillBeSent";
/// `Network.requestWillBeSentExtraInfo`
pub const REQUEST_WILL_BE_SENT_EXTRA_INFO: &str = "Network.requestWillBeSentExtraInfo";
/// `Network.responseReceived`
pub const RESPONSE_RECEIVED: &str = "Network.responseReceived";
/// `Network.responseReceivedExtraInfo`
pub const RESPONSE_RECEIVED_EXTRA_INFO: &str = "Network.responseReceivedExtraInfo";
/// `Network.dataReceived`
pub const DATA_RECEIVED: &str = "Network.dataReceived";
/// `Network.loadingFinished`
pub const LOADING_FINISHED: &str = "Network.loadingFinished";
/// `Network.loadingFailed`
pub const LOADING_FAILED: &str = "Network.loadingFailed";
/// `Network.requestServedFromCache`
pub const REQUEST_SERVED_FROM_CACHE: &str = "Network.requestServedFromCache";
/// `Network.resourceChangedPriority`
pub const RESOURCE_CHANGED_PRIORITY: &str = "Network.resourceChangedPriority";
/// Synthetic body-ready event, named after the command whose outcome it carries
pub const GET_RESPONSE_BODY: &str = "Network.getResponseBody";
/// Synthetic continuation marker emitted by interception middleware
pub const REQUEST_CONTINUED: &str = "Network.requestContinued";

/// Protocol header object. Values are usually strings; repeated headers are
/// joined with `\n` by the browser.
pub type Headers = serde_json::Map<String, serde_json::Value>;

/// Unique request identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Monotonic timestamp in seconds, shared by all timing-bearing events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd, Default)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }
}

/// Wall-clock time in seconds since the UNIX epoch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd, Default)]
pub struct WallTime(pub f64);

/// HTTP request as reported by `requestWillBeSent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request URL, without the fragment
    pub url: String,
    /// Fragment of the URL, including the leading `#`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_fragment: Option<String>,
    /// HTTP method
    pub method: String,
    /// HTTP request headers
    #[serde(default)]
    pub headers: Headers,
    /// POST data (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    /// Whether request has POST data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_post_data: Option<bool>,
    /// Request priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_priority: Option<String>,
}

/// HTTP response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Response URL
    pub url: String,
    /// HTTP status code
    pub status: u32,
    /// HTTP status text
    #[serde(default)]
    pub status_text: String,
    /// HTTP response headers
    #[serde(default)]
    pub headers: Headers,
    /// Raw response header text, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers_text: Option<String>,
    /// MIME type
    #[serde(default)]
    pub mime_type: String,
    /// Request headers actually sent on the wire (if captured)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Headers>,
    /// Raw request header text (if captured)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers_text: Option<String>,
    /// Whether connection was reused
    #[serde(default)]
    pub connection_reused: bool,
    /// Connection ID
    #[serde(default)]
    pub connection_id: f64,
    /// Remote IP address
    #[serde(default, rename = "remoteIPAddress", skip_serializing_if = "Option::is_none")]
    pub remote_ip_address: Option<String>,
    /// Whether response came from disk cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_disk_cache: Option<bool>,
    /// Whether response came from service worker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_service_worker: Option<bool>,
    /// Encoded bytes received so far
    #[serde(default)]
    pub encoded_data_length: f64,
    /// Timing information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<ResourceTiming>,
    /// Protocol used ("http/1.1", "h2", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

fn unset() -> f64 {
    -1.0
}

/// Resource timing information. Every mark is in milliseconds relative to
/// `request_time`; `-1` means the phase did not happen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    /// Request start time, monotonic seconds
    pub request_time: f64,
    #[serde(default = "unset")]
    pub proxy_start: f64,
    #[serde(default = "unset")]
    pub proxy_end: f64,
    #[serde(default = "unset")]
    pub dns_start: f64,
    #[serde(default = "unset")]
    pub dns_end: f64,
    #[serde(default = "unset")]
    pub connect_start: f64,
    #[serde(default = "unset")]
    pub connect_end: f64,
    #[serde(default = "unset")]
    pub ssl_start: f64,
    #[serde(default = "unset")]
    pub ssl_end: f64,
    #[serde(default)]
    pub send_start: f64,
    #[serde(default)]
    pub send_end: f64,
    #[serde(default = "unset")]
    pub push_start: f64,
    #[serde(default = "unset")]
    pub push_end: f64,
    #[serde(default)]
    pub receive_headers_end: f64,
}

/// `Network.requestWillBeSent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSent {
    pub request_id: RequestId,
    #[serde(default)]
    pub loader_id: String,
    #[serde(default, rename = "documentURL")]
    pub document_url: String,
    pub request: Request,
    pub timestamp: Timestamp,
    pub wall_time: WallTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<serde_json::Value>,
    /// Present when this event is a redirect hop of an already open request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_response: Option<Response>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

/// `Network.requestWillBeSentExtraInfo`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentExtraInfo {
    pub request_id: RequestId,
    #[serde(default)]
    pub headers: Headers,
}

/// `Network.responseReceived`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceived {
    pub request_id: RequestId,
    pub timestamp: Timestamp,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub response: Response,
}

/// `Network.responseReceivedExtraInfo`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedExtraInfo {
    pub request_id: RequestId,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers_text: Option<String>,
}

/// `Network.dataReceived`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataReceived {
    pub request_id: RequestId,
    #[serde(default)]
    pub data_length: f64,
    #[serde(default)]
    pub encoded_data_length: f64,
}

/// `Network.loadingFinished`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinished {
    pub request_id: RequestId,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub encoded_data_length: f64,
}

/// `Network.loadingFailed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailed {
    pub request_id: RequestId,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub error_text: String,
    #[serde(default)]
    pub canceled: bool,
}

/// `Network.requestServedFromCache`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestServedFromCache {
    pub request_id: RequestId,
}

/// `Network.resourceChangedPriority`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChangedPriority {
    pub request_id: RequestId,
    pub new_priority: String,
}

/// Synthetic `Network.getResponseBody` event.
///
/// Carries the outcome of a body fetch: either `body` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub base64_encoded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseBody {
    /// Body successfully fetched
    pub fn ready(request_id: RequestId, body: String, base64_encoded: bool) -> Self {
        Self {
            request_id,
            body: Some(body),
            base64_encoded,
            error: None,
        }
    }

    /// Body could not be fetched
    pub fn unavailable(request_id: RequestId, error: impl Into<String>) -> Self {
        Self {
            request_id,
            body: None,
            base64_encoded: false,
            error: Some(error.into()),
        }
    }
}

/// Synthetic `Network.requestContinued` continuation marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestContinued {
    pub request_id: RequestId,
    pub timestamp: Timestamp,
}

/// Result of the `Network.getResponseBody` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetResponseBodyResult {
    pub body: String,
    #[serde(default)]
    pub base64_encoded: bool,
}
