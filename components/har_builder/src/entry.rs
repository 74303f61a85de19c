//! Conversion of a settled request into a HAR entry

use crate::cookies::{request_cookies, response_cookies};
use crate::har::{
    HarContent, HarEntry, HarRequest, HarResponse, HarTimings, PostData, QueryParam,
    TIMING_UNAVAILABLE,
};
use crate::headers::HeaderSet;
use crate::request::{BodyState, PendingRequest, Phase};
use cdp_types::domains::network::{ResourceTiming, Response, Timestamp, WallTime};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;

/// Wall-clock time in seconds as a UTC instant; `None` when out of range
pub(crate) fn wall_clock(wall_time: WallTime) -> Option<DateTime<Utc>> {
    if !wall_time.0.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis((wall_time.0 * 1000.0).round() as i64)
}

/// ISO 8601 rendering with millisecond precision, as HAR date-times use
pub(crate) fn format_date_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO 8601 rendering of a wall-clock time in seconds
pub(crate) fn iso_date_time(wall_time: WallTime) -> Option<String> {
    wall_clock(wall_time).map(format_date_time)
}

/// Wall-clock start of a request, shifted by the continuation marker if any
pub(crate) fn started_wall_time(request: &PendingRequest) -> Option<WallTime> {
    let sent = request.sent.as_ref()?;
    let reference = request.reference()?;
    Some(WallTime(sent.wall_time.0 + (reference.0 - sent.timestamp.0)))
}

/// Build the entry for a tracked request; `None` for untracked ones
pub(crate) fn build_entry(request: &PendingRequest, pageref: &str) -> Option<HarEntry> {
    let sent = request.sent.as_ref()?;
    let wall_time = started_wall_time(request)?;
    let Some(started_date_time) = iso_date_time(wall_time) else {
        warn!(
            "Dropping request {}: wallTime {} is out of range",
            request.request_id, wall_time.0
        );
        return None;
    };
    let response = request.response.as_ref();

    let timings = match (response.and_then(|r| r.timing.as_ref()), request.ended_at()) {
        (Some(timing), Some(end)) => {
            Some(phase_timings(timing, request.reference().unwrap_or(sent.timestamp), end))
        }
        _ => None,
    };
    let time = timings.map(|t| t.total()).unwrap_or(TIMING_UNAVAILABLE);

    let mut url = sent.request.url.clone();
    if let Some(fragment) = &sent.request.url_fragment {
        url.push_str(fragment);
    }

    let http_version = http_version(response.and_then(|r| r.protocol.as_deref()));

    Some(HarEntry {
        pageref: pageref.to_string(),
        started_date_time,
        time,
        request: har_request(request, url, http_version.clone()),
        response: har_response(request, http_version, wall_time),
        cache: serde_json::Map::new(),
        timings: timings.unwrap_or_else(HarTimings::unavailable),
        server_ip_address: response
            .and_then(|r| r.remote_ip_address.as_deref())
            .map(|ip| ip.trim_start_matches('[').trim_end_matches(']').to_string()),
        connection: response
            .filter(|r| r.connection_id > 0.0)
            .map(|r| format!("{}", r.connection_id as u64)),
        initiator: sent.initiator.clone(),
        priority: request.priority.clone(),
        resource_type: request.resource_type.clone(),
        from_cache: request.cache.map(|source| source.as_str().to_string()),
    })
}

/// Phase breakdown from the response timing marks.
///
/// Marks are relative to `timing.request_time`. Time spent between the
/// request reference and `request_time` counts as blocked.
fn phase_timings(timing: &ResourceTiming, reference: Timestamp, end: Timestamp) -> HarTimings {
    let queued = ((timing.request_time - reference.0) * 1000.0).max(0.0);
    let stalled = [timing.dns_start, timing.connect_start, timing.send_start]
        .into_iter()
        .find(|mark| *mark >= 0.0)
        .unwrap_or(0.0);

    let span = |start: f64, stop: f64| {
        if start >= 0.0 && stop >= start {
            stop - start
        } else {
            TIMING_UNAVAILABLE
        }
    };

    let receive = end.as_millis() - (timing.request_time * 1000.0 + timing.receive_headers_end);

    HarTimings {
        blocked: round(queued + stalled),
        dns: round(span(timing.dns_start, timing.dns_end)),
        connect: round(span(timing.connect_start, timing.connect_end)),
        send: round((timing.send_end - timing.send_start).max(0.0)),
        wait: round((timing.receive_headers_end - timing.send_end).max(0.0)),
        receive: round(receive.max(0.0)),
        ssl: round(span(timing.ssl_start, timing.ssl_end)),
    }
}

fn round(value: f64) -> f64 {
    if value < 0.0 {
        return value;
    }
    (value * 1000.0).round() / 1000.0
}

fn http_version(protocol: Option<&str>) -> String {
    match protocol.map(str::to_ascii_lowercase).as_deref() {
        None | Some("") => String::new(),
        Some("h2") => "HTTP/2.0".to_string(),
        Some(p) if p.starts_with("h3") || p.starts_with("quic") => "HTTP/3.0".to_string(),
        Some(p) => p.to_ascii_uppercase(),
    }
}

fn har_request(request: &PendingRequest, url: String, http_version: String) -> HarRequest {
    let sent = request.sent.as_ref();
    let response = request.response.as_ref();

    // Wire headers from the response are more faithful than the ones the
    // renderer planned to send.
    let mut headers = match response.and_then(|r| r.request_headers.as_ref()) {
        Some(wire) => HeaderSet::from_protocol(wire),
        None => sent
            .map(|s| HeaderSet::from_protocol(&s.request.headers))
            .unwrap_or_default(),
    };
    for extra in &request.extra_request_headers {
        headers.merge_protocol(extra);
    }

    let headers_size = response
        .and_then(|r| r.request_headers_text.as_ref())
        .map(|text| text.len() as i64)
        .unwrap_or(-1);

    let method = sent.map(|s| s.request.method.clone()).unwrap_or_default();
    let post_data = sent
        .and_then(|s| s.request.post_data.as_ref())
        .map(|text| post_data(&headers, text));
    let body_size = post_data.as_ref().map(|p| p.text.len() as i64).unwrap_or(0);

    HarRequest {
        method,
        query_string: query_string(&url),
        url,
        http_version,
        cookies: request_cookies(&headers),
        headers,
        post_data,
        headers_size,
        body_size,
    }
}

fn query_string(url: &str) -> Vec<QueryParam> {
    url::Url::parse(url)
        .map(|parsed| {
            parsed
                .query_pairs()
                .map(|(name, value)| QueryParam {
                    name: name.into_owned(),
                    value: value.into_owned(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn post_data(headers: &HeaderSet, text: &str) -> PostData {
    let mime_type = headers.first("content-type").unwrap_or_default().to_string();
    let params = if mime_type.starts_with("application/x-www-form-urlencoded") {
        url::form_urlencoded::parse(text.as_bytes())
            .map(|(name, value)| QueryParam {
                name: name.into_owned(),
                value: value.into_owned(),
            })
            .collect()
    } else {
        Vec::new()
    };
    PostData {
        mime_type,
        params,
        text: text.to_string(),
    }
}

fn har_response(request: &PendingRequest, http_version: String, started: WallTime) -> HarResponse {
    let Some(response) = request.response.as_ref() else {
        return missing_response(request, http_version);
    };

    let mut headers = HeaderSet::from_protocol(&response.headers);
    for extra in &request.extra_response_headers {
        headers.merge_protocol(extra);
    }

    let headers_size = request
        .extra_response_headers_text
        .as_ref()
        .or(response.headers_text.as_ref())
        .map(|text| text.len() as i64)
        .unwrap_or(-1);

    let transfer_size = transfer_size(request, response);
    let body_size = match (request.cache, transfer_size) {
        (Some(_), _) => 0,
        (None, Some(total)) if headers_size >= 0 => (total - headers_size).max(0),
        (None, Some(total)) => total,
        (None, None) => -1,
    };

    let redirect_url = headers.first("location").unwrap_or_default().to_string();

    HarResponse {
        status: response.status,
        status_text: response.status_text.clone(),
        http_version,
        cookies: response_cookies(&headers, Some(started)),
        headers,
        content: content(request, response, body_size),
        redirect_url,
        headers_size,
        body_size,
        transfer_size,
        error: match &request.phase {
            Phase::Failed { error_text, .. } => Some(error_text.clone()),
            _ => None,
        },
    }
}

fn transfer_size(request: &PendingRequest, response: &Response) -> Option<i64> {
    match &request.phase {
        Phase::Finished {
            encoded_data_length,
            ..
        } => Some(*encoded_data_length as i64),
        Phase::Redirected { .. } if response.encoded_data_length > 0.0 => {
            Some(response.encoded_data_length as i64)
        }
        _ => None,
    }
}

fn content(request: &PendingRequest, response: &Response, body_size: i64) -> HarContent {
    let size = request.decoded_length as i64;
    let compression = if body_size > 0 && size > body_size {
        Some(size - body_size)
    } else {
        None
    };
    let (text, encoding) = match &request.body {
        BodyState::Ready {
            text,
            base64_encoded,
        } => (
            Some(text.clone()),
            base64_encoded.then(|| "base64".to_string()),
        ),
        BodyState::Missing | BodyState::Unavailable { .. } => (None, None),
    };
    HarContent {
        size,
        compression,
        mime_type: response.mime_type.clone(),
        text,
        encoding,
    }
}

/// Response block for requests that failed before any response arrived
fn missing_response(request: &PendingRequest, http_version: String) -> HarResponse {
    HarResponse {
        status: 0,
        status_text: String::new(),
        http_version,
        cookies: Vec::new(),
        headers: HeaderSet::new(),
        content: HarContent {
            size: 0,
            compression: None,
            mime_type: "x-unknown".to_string(),
            text: None,
            encoding: None,
        },
        redirect_url: String::new(),
        headers_size: -1,
        body_size: -1,
        transfer_size: None,
        error: match &request.phase {
            Phase::Failed { error_text, .. } => Some(error_text.clone()),
            _ => None,
        },
    }
}
