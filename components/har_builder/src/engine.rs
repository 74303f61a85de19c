//! Event folding engine
//!
//! `StatsEngine` owns every partial request of one page load and decides on
//! its own when the stream describes a complete page: the load event has
//! fired and no tracked request is still in flight.

use crate::entry::{build_entry, iso_date_time, started_wall_time};
use crate::error::{HarError, LoadState, Result};
use crate::har::HarDocument;
use crate::page::PageRecord;
use crate::request::{CacheSource, PendingRequest};
use cdp_types::domains::network::{Headers, RequestId, RequestWillBeSent, RequestWillBeSentExtraInfo};
use cdp_types::{CdpEvent, ProtocolEvent};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Options of one assembly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarBuilderOptions {
    /// Require a body-ready event for every finished request and embed the
    /// bodies in the document
    pub content: bool,
}

/// What the driver should do after feeding an event
#[derive(Debug)]
pub enum EngineStatus {
    /// More events are needed
    Continuing,
    /// The page is complete; the document is final
    Complete(Box<HarDocument>),
    /// The assembly ended without a document
    Failed(HarError),
}

#[derive(Debug)]
enum EngineState {
    Collecting,
    Settled,
    Cancelled,
}

/// Folds protocol events of one page load into a HAR document
#[derive(Debug)]
pub struct StatsEngine {
    options: HarBuilderOptions,
    page: PageRecord,
    /// Every hop ever seen, in first-sighting order
    requests: Vec<PendingRequest>,
    /// Current hop of each request id
    open: HashMap<RequestId, usize>,
    /// Ids whose URL is not worth recording (data:, blob:, ...)
    ignored: HashSet<RequestId>,
    /// Request extra-info that arrived while the current hop already had
    /// one; it belongs to the hop a redirect opens next
    held_extra: HashMap<RequestId, Vec<Headers>>,
    state: EngineState,
}

impl StatsEngine {
    /// Create an engine for the page loaded from `url`
    ///
    /// # Example
    /// ```
    /// use har_builder::{HarBuilderOptions, StatsEngine};
    ///
    /// let engine = StatsEngine::new("https://example.com/", HarBuilderOptions::default());
    /// assert_eq!(engine.pending_count(), 0);
    /// ```
    pub fn new(url: impl Into<String>, options: HarBuilderOptions) -> Self {
        Self {
            options,
            page: PageRecord::new("page_1", url),
            requests: Vec::new(),
            open: HashMap::new(),
            ignored: HashSet::new(),
            held_extra: HashMap::new(),
            state: EngineState::Collecting,
        }
    }

    pub fn options(&self) -> HarBuilderOptions {
        self.options
    }

    /// Fold one event, in arrival order.
    ///
    /// Events outside the capture's vocabulary and events with malformed
    /// parameters are ignored.
    pub fn process_event(&mut self, event: &CdpEvent) -> EngineStatus {
        match self.state {
            EngineState::Collecting => {}
            EngineState::Settled => {
                debug!("Ignoring {} after completion", event.method);
                return EngineStatus::Continuing;
            }
            EngineState::Cancelled => return EngineStatus::Failed(HarError::Cancelled),
        }

        match ProtocolEvent::decode(event) {
            Ok(Some(decoded)) => self.fold(decoded),
            Ok(None) => {}
            Err(e) => warn!("Ignoring malformed event: {}", e),
        }

        if self.is_complete() {
            self.state = EngineState::Settled;
            info!(
                "Page {} complete with {} request(s)",
                self.page.id(),
                self.tracked().count()
            );
            return EngineStatus::Complete(Box::new(self.build()));
        }
        EngineStatus::Continuing
    }

    /// Whether `request_id` belongs to a tracked request
    pub fn is_tracked(&self, request_id: &str) -> bool {
        self.open
            .get(&RequestId(request_id.to_string()))
            .map(|index| self.requests[*index].is_tracked())
            .unwrap_or(false)
    }

    /// Number of tracked requests still blocking completion
    pub fn pending_count(&self) -> usize {
        self.tracked()
            .filter(|request| !request.is_terminal(self.options.content))
            .count()
    }

    /// Whether the page load event has been seen
    pub fn load_fired(&self) -> bool {
        self.page.load.is_observed()
    }

    /// Signal that no more events will come.
    ///
    /// Succeeds only when the page is complete: a partial document is never
    /// returned.
    pub fn finish(mut self) -> Result<HarDocument> {
        if let EngineState::Cancelled = self.state {
            return Err(HarError::Cancelled);
        }
        if self.is_complete() {
            self.state = EngineState::Settled;
            return Ok(self.build());
        }
        let pending = self.pending_count();
        warn!(
            "Event stream ended with {} pending request(s), load event {}",
            pending,
            self.load_state()
        );
        Err(HarError::IncompleteCapture {
            pending,
            load: self.load_state(),
        })
    }

    /// Abandon the assembly; later events report `Failed(Cancelled)`
    pub fn cancel(&mut self) -> HarError {
        debug!("Cancelling assembly of {}", self.page.id());
        self.state = EngineState::Cancelled;
        self.requests.clear();
        self.open.clear();
        self.held_extra.clear();
        HarError::Cancelled
    }

    fn load_state(&self) -> LoadState {
        if self.load_fired() {
            LoadState::Fired
        } else {
            LoadState::Missing
        }
    }

    fn tracked(&self) -> impl Iterator<Item = &PendingRequest> {
        self.requests.iter().filter(|request| request.is_tracked())
    }

    fn is_complete(&self) -> bool {
        self.load_fired() && self.first_request().is_some() && self.pending_count() == 0
    }

    fn first_request(&self) -> Option<&PendingRequest> {
        self.tracked().min_by_key(|request| request.seq)
    }

    fn fold(&mut self, event: ProtocolEvent) {
        match event {
            ProtocolEvent::DomContentEventFired(params) => {
                if !self.page.dom_content_loaded.observe(params.timestamp) {
                    debug!("Ignoring repeated DOMContentLoaded");
                }
            }
            ProtocolEvent::LoadEventFired(params) => {
                if !self.page.load.observe(params.timestamp) {
                    debug!("Ignoring repeated load event");
                }
            }
            ProtocolEvent::RequestWillBeSent(sent) => self.fold_sent(sent),
            ProtocolEvent::RequestWillBeSentExtraInfo(extra) => self.fold_request_extra(extra),
            other => {
                let Some(request_id) = other.request_id().cloned() else {
                    return;
                };
                if self.ignored.contains(&request_id) {
                    return;
                }
                let content = self.options.content;
                // no redirect can follow these, so held headers are this hop's
                let held = match other {
                    ProtocolEvent::ResponseReceived(_)
                    | ProtocolEvent::LoadingFinished(_)
                    | ProtocolEvent::LoadingFailed(_) => self.held_extra.remove(&request_id),
                    _ => None,
                };
                let request = self.current(&request_id);
                if let Some(held) = held {
                    request.extra_request_headers.extend(held);
                }
                match other {
                    ProtocolEvent::ResponseReceived(received) => request.fold_response(*received),
                    ProtocolEvent::ResponseReceivedExtraInfo(extra) => {
                        request.fold_response_extra(extra)
                    }
                    ProtocolEvent::DataReceived(data) => request.fold_data(&data),
                    ProtocolEvent::LoadingFinished(finished) => request.fold_finished(&finished),
                    ProtocolEvent::LoadingFailed(failed) => request.fold_failed(failed),
                    ProtocolEvent::RequestServedFromCache(_) => {
                        request.cache = Some(CacheSource::Memory)
                    }
                    ProtocolEvent::ResourceChangedPriority(change) => {
                        request.priority = Some(change.new_priority)
                    }
                    ProtocolEvent::ResponseBody(body) if content => request.fold_body(body),
                    ProtocolEvent::ResponseBody(_) => {}
                    ProtocolEvent::RequestContinued(marker) => {
                        request.continued_at = Some(marker.timestamp)
                    }
                    ProtocolEvent::RequestWillBeSent(_)
                    | ProtocolEvent::RequestWillBeSentExtraInfo(_)
                    | ProtocolEvent::DomContentEventFired(_)
                    | ProtocolEvent::LoadEventFired(_) => {}
                }
            }
        }
    }

    fn fold_sent(&mut self, sent: Box<RequestWillBeSent>) {
        let request_id = sent.request_id.clone();
        if !is_recordable(&sent.request.url) {
            debug!("Not recording {} ({})", request_id, sent.request.url);
            self.open.remove(&request_id);
            self.ignored.insert(request_id);
            return;
        }
        if self.ignored.contains(&request_id) {
            return;
        }

        let redirect = sent.redirect_response.clone();
        let current = self.current(&request_id);
        if !current.is_tracked() {
            debug!("Request {} {} {}", sent.request.method, sent.request.url, request_id);
            current.fold_sent(sent);
            return;
        }

        match redirect {
            Some(response) => {
                debug!("Redirect {} -> {}", request_id, sent.request.url);
                current.close_redirect(response, sent.timestamp);
                let index = self.open_hop(request_id.clone());
                if let Some(held) = self.held_extra.remove(&request_id) {
                    self.requests[index].extra_request_headers.extend(held);
                }
                self.requests[index].fold_sent(sent);
            }
            None => debug!("Ignoring duplicate request line for {}", request_id),
        }
    }

    /// Each hop gets one request extra-info. The browser reports the next
    /// hop's extra-info before the request line carrying the redirect, so a
    /// second one is held until that hop opens.
    fn fold_request_extra(&mut self, extra: RequestWillBeSentExtraInfo) {
        let RequestWillBeSentExtraInfo {
            request_id,
            headers,
        } = extra;
        if self.ignored.contains(&request_id) {
            return;
        }
        let request = self.current(&request_id);
        if request.extra_request_headers.is_empty() {
            request.extra_request_headers.push(headers);
            return;
        }
        debug!("Holding request extra-info of {} for its next hop", request_id);
        self.held_extra.entry(request_id).or_default().push(headers);
    }

    /// Current hop for `request_id`, opened on first sighting
    fn current(&mut self, request_id: &RequestId) -> &mut PendingRequest {
        let index = match self.open.get(request_id).copied() {
            Some(index) => index,
            None => self.open_hop(request_id.clone()),
        };
        &mut self.requests[index]
    }

    fn open_hop(&mut self, request_id: RequestId) -> usize {
        let index = self.requests.len();
        self.requests
            .push(PendingRequest::new(index as u64, request_id.clone()));
        self.open.insert(request_id, index);
        index
    }

    fn build(&self) -> HarDocument {
        let mut document = HarDocument::new();

        if let Some(first) = self.first_request() {
            let reference = first.reference().unwrap_or_default();
            let started = started_wall_time(first)
                .and_then(iso_date_time)
                .unwrap_or_default();
            document.log.pages.push(self.page.to_har(started, reference));
        }

        let mut tracked: Vec<&PendingRequest> = self.tracked().collect();
        tracked.sort_by_key(|request| request.seq);
        document.log.entries = tracked
            .into_iter()
            .filter_map(|request| build_entry(request, self.page.id()))
            .collect();

        document
    }
}

/// Only network fetches end up in the archive
fn is_recordable(url: &str) -> bool {
    let scheme = url.split(':').next().unwrap_or_default();
    matches!(
        scheme.to_ascii_lowercase().as_str(),
        "http" | "https" | "ws" | "wss"
    )
}
