//! Page record with first-occurrence-wins lifecycle metrics

use crate::har::{HarPage, PageTimings, TIMING_UNAVAILABLE};
use cdp_types::domains::network::Timestamp;

/// A page lifecycle metric. Moves from `Unset` to `Observed` once and never
/// changes afterwards: sub-frames fire the same events later and must not
/// overwrite the top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageMetric {
    #[default]
    Unset,
    Observed(Timestamp),
}

impl PageMetric {
    /// Record an occurrence; returns whether it was the first one
    pub fn observe(&mut self, timestamp: Timestamp) -> bool {
        match self {
            PageMetric::Unset => {
                *self = PageMetric::Observed(timestamp);
                true
            }
            PageMetric::Observed(_) => false,
        }
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            PageMetric::Unset => None,
            PageMetric::Observed(ts) => Some(*ts),
        }
    }

    pub fn is_observed(&self) -> bool {
        matches!(self, PageMetric::Observed(_))
    }

    /// Milliseconds elapsed since `reference`, `-1` when unset
    fn since(&self, reference: Timestamp) -> f64 {
        match self {
            PageMetric::Unset => TIMING_UNAVAILABLE,
            PageMetric::Observed(ts) => ts.as_millis() - reference.as_millis(),
        }
    }
}

/// The page being assembled
#[derive(Debug, Clone)]
pub struct PageRecord {
    id: String,
    title: String,
    pub(crate) dom_content_loaded: PageMetric,
    pub(crate) load: PageMetric,
}

impl PageRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            dom_content_loaded: PageMetric::Unset,
            load: PageMetric::Unset,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Timings relative to `reference`, the start of the page's first request
    pub fn timings(&self, reference: Timestamp) -> PageTimings {
        PageTimings {
            on_content_load: self.dom_content_loaded.since(reference),
            on_load: self.load.since(reference),
        }
    }

    pub(crate) fn to_har(&self, started_date_time: String, reference: Timestamp) -> HarPage {
        HarPage {
            id: self.id.clone(),
            title: self.title.clone(),
            started_date_time,
            page_timings: self.timings(reference),
            user: None,
        }
    }
}
