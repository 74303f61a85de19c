//! Ordered header list with the extra-info merge rule
//!
//! HAR headers are a list, not a map: the same name may appear several times
//! and the order headers were seen in is kept.

use cdp_types::domains::network::Headers;
use serde::{Deserialize, Serialize};

/// A single `{name, value}` header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered collection of headers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct HeaderSet {
    entries: Vec<HeaderEntry>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a protocol header object.
    ///
    /// The browser joins repeated headers with `\n`; each line becomes its own
    /// entry. Non-string values are kept in their JSON rendering.
    pub fn from_protocol(headers: &Headers) -> Self {
        let mut set = Self::new();
        for (name, value) in protocol_pairs(headers) {
            set.push(HeaderEntry::new(name, value));
        }
        set
    }

    /// Append unconditionally
    pub fn push(&mut self, entry: HeaderEntry) {
        self.entries.push(entry);
    }

    /// Fold one header in with the extra-info merge rule.
    ///
    /// An entry whose name matches case-insensitively and whose value is
    /// exactly equal absorbs the incoming header. Anything else is appended
    /// verbatim. Returns whether the header was appended.
    pub fn merge(&mut self, incoming: HeaderEntry) -> bool {
        let present = self
            .entries
            .iter()
            .any(|existing| existing.is_named(&incoming.name) && existing.value == incoming.value);
        if present {
            return false;
        }
        self.entries.push(incoming);
        true
    }

    /// Fold a whole protocol header object in, see [`HeaderSet::merge`]
    pub fn merge_protocol(&mut self, headers: &Headers) -> usize {
        protocol_pairs(headers)
            .filter(|(name, value)| self.merge(HeaderEntry::new(name.clone(), value.clone())))
            .count()
    }

    /// Fold every entry of another set in, see [`HeaderSet::merge`]
    pub fn merge_set(&mut self, other: &HeaderSet) -> usize {
        other
            .iter()
            .filter(|entry| self.merge((*entry).clone()))
            .count()
    }

    /// All values carried under `name`, compared case-insensitively
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.is_named(name))
            .map(|entry| entry.value.as_str())
    }

    /// First value carried under `name`
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.is_named(name))
            .map(|entry| entry.value.as_str())
    }

    /// Number of entries named `name`, compared case-insensitively
    pub fn count_named(&self, name: &str) -> usize {
        self.get_all(name).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<HeaderEntry> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = HeaderEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn protocol_pairs(headers: &Headers) -> impl Iterator<Item = (String, String)> + '_ {
    headers.iter().flat_map(|(name, value)| {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        text.split('\n')
            .map(|line| (name.clone(), line.to_string()))
            .collect::<Vec<_>>()
    })
}
