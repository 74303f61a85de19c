//! Cookie extraction from `Cookie` and `Set-Cookie` headers

use crate::entry::{format_date_time, wall_clock};
use crate::har::HarCookie;
use crate::headers::HeaderSet;
use cdp_types::domains::network::WallTime;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Cookies sent with a request: `Cookie: a=1; b=2`
pub fn request_cookies(headers: &HeaderSet) -> Vec<HarCookie> {
    headers
        .get_all("cookie")
        .flat_map(|line| line.split(';'))
        .filter_map(name_value)
        .map(|(name, value)| bare_cookie(name, value))
        .collect()
}

/// Cookies set by a response, one per `Set-Cookie` header.
///
/// `received` anchors `Max-Age`, which takes precedence over `Expires`.
pub fn response_cookies(headers: &HeaderSet, received: Option<WallTime>) -> Vec<HarCookie> {
    let received = received.and_then(wall_clock);
    headers
        .get_all("set-cookie")
        .filter_map(|line| parse_set_cookie(line, received))
        .collect()
}

fn parse_set_cookie(line: &str, received: Option<DateTime<Utc>>) -> Option<HarCookie> {
    let mut parts = line.split(';');
    let (name, value) = name_value(parts.next()?)?;
    let mut cookie = bare_cookie(name, value);
    let mut max_age = None;

    for attribute in parts {
        let attribute = attribute.trim();
        let (key, value) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (attribute, None),
        };
        match key.to_ascii_lowercase().as_str() {
            "path" => cookie.path = value.map(str::to_string),
            "domain" => cookie.domain = value.map(str::to_string),
            "expires" => cookie.expires = value.and_then(parse_expires),
            "max-age" => max_age = value.and_then(|v| v.parse::<i64>().ok()),
            "httponly" => cookie.http_only = Some(true),
            "secure" => cookie.secure = Some(true),
            _ => {}
        }
    }

    if let (Some(seconds), Some(received)) = (max_age, received) {
        cookie.expires = TimeDelta::try_seconds(seconds)
            .and_then(|delta| received.checked_add_signed(delta))
            .map(format_date_time);
    }
    Some(cookie)
}

/// `Expires` in RFC 1123 form, or the older dashed form, as a HAR date-time
fn parse_expires(value: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(value)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
                .map(|naive| naive.and_utc())
        })
        .ok()
        .map(format_date_time)
}

fn name_value(pair: &str) -> Option<(&str, &str)> {
    let pair = pair.trim();
    if pair.is_empty() {
        return None;
    }
    match pair.split_once('=') {
        Some((name, value)) => Some((name.trim(), value.trim())),
        None => Some(("", pair)),
    }
}

fn bare_cookie(name: &str, value: &str) -> HarCookie {
    HarCookie {
        name: name.to_string(),
        value: value.to_string(),
        path: None,
        domain: None,
        expires: None,
        http_only: None,
        secure: None,
    }
}
