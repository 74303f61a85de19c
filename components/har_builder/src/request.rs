//! Per-request accumulator
//!
//! A `PendingRequest` is created by whichever event of a request arrives
//! first and fills its slots as the rest come in, in any order. Only the
//! final state matters when the entry is built.

use cdp_types::domains::network::{
    DataReceived, Headers, LoadingFailed, LoadingFinished, RequestId, RequestWillBeSent, Response,
    ResponseBody, ResponseReceived, ResponseReceivedExtraInfo, Timestamp,
};

/// Network lifecycle of one hop
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Open,
    /// Closed by a redirect; the next hop reuses the request id
    Redirected { at: Timestamp },
    Finished { at: Timestamp, encoded_data_length: f64 },
    Failed { at: Timestamp, error_text: String, canceled: bool },
}

/// Outcome of the body fetch for a finished request
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BodyState {
    Missing,
    Ready { text: String, base64_encoded: bool },
    Unavailable { reason: String },
}

impl BodyState {
    fn is_resolved(&self) -> bool {
        !matches!(self, BodyState::Missing)
    }
}

/// Where a cached response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheSource {
    Memory,
    Disk,
}

impl CacheSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CacheSource::Memory => "memory",
            CacheSource::Disk => "disk",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    /// Order of first sighting, used to order entries
    pub(crate) seq: u64,
    pub(crate) request_id: RequestId,
    pub(crate) sent: Option<Box<RequestWillBeSent>>,
    pub(crate) continued_at: Option<Timestamp>,
    pub(crate) response: Option<Response>,
    pub(crate) resource_type: Option<String>,
    pub(crate) extra_request_headers: Vec<Headers>,
    pub(crate) extra_response_headers: Vec<Headers>,
    pub(crate) extra_response_headers_text: Option<String>,
    pub(crate) priority: Option<String>,
    pub(crate) decoded_length: f64,
    pub(crate) phase: Phase,
    pub(crate) body: BodyState,
    pub(crate) cache: Option<CacheSource>,
}

impl PendingRequest {
    pub(crate) fn new(seq: u64, request_id: RequestId) -> Self {
        Self {
            seq,
            request_id,
            sent: None,
            continued_at: None,
            response: None,
            resource_type: None,
            extra_request_headers: Vec::new(),
            extra_response_headers: Vec::new(),
            extra_response_headers_text: None,
            priority: None,
            decoded_length: 0.0,
            phase: Phase::Open,
            body: BodyState::Missing,
            cache: None,
        }
    }

    /// Tracked requests are the ones whose request line is known
    pub(crate) fn is_tracked(&self) -> bool {
        self.sent.is_some()
    }

    /// Whether this hop no longer blocks completion
    pub(crate) fn is_terminal(&self, content: bool) -> bool {
        match &self.phase {
            Phase::Redirected { .. } | Phase::Failed { .. } => true,
            Phase::Finished { .. } => !content || self.body.is_resolved(),
            Phase::Open => self.cache == Some(CacheSource::Memory),
        }
    }

    /// Start-of-request reference: the continuation marker when one was
    /// seen, the natural `requestWillBeSent` timestamp otherwise
    pub(crate) fn reference(&self) -> Option<Timestamp> {
        self.continued_at
            .or_else(|| self.sent.as_ref().map(|sent| sent.timestamp))
    }

    /// End of the hop, when it ended
    pub(crate) fn ended_at(&self) -> Option<Timestamp> {
        match &self.phase {
            Phase::Open => None,
            Phase::Redirected { at } | Phase::Finished { at, .. } | Phase::Failed { at, .. } => {
                Some(*at)
            }
        }
    }

    pub(crate) fn fold_sent(&mut self, sent: Box<RequestWillBeSent>) {
        if self.resource_type.is_none() {
            self.resource_type = sent.resource_type.clone();
        }
        if self.priority.is_none() {
            self.priority = sent.request.initial_priority.clone();
        }
        self.sent = Some(sent);
    }

    /// Close this hop with the redirect response carried by the next hop
    pub(crate) fn close_redirect(&mut self, response: Response, at: Timestamp) {
        if response.from_disk_cache == Some(true) && self.cache.is_none() {
            self.cache = Some(CacheSource::Disk);
        }
        self.response = Some(response);
        self.phase = Phase::Redirected { at };
    }

    pub(crate) fn fold_response(&mut self, received: ResponseReceived) {
        if received.response.from_disk_cache == Some(true) && self.cache.is_none() {
            self.cache = Some(CacheSource::Disk);
        }
        if received.resource_type.is_some() {
            self.resource_type = received.resource_type;
        }
        self.response = Some(received.response);
    }

    pub(crate) fn fold_response_extra(&mut self, extra: ResponseReceivedExtraInfo) {
        if extra.headers_text.is_some() {
            self.extra_response_headers_text = extra.headers_text;
        }
        self.extra_response_headers.push(extra.headers);
    }

    pub(crate) fn fold_data(&mut self, data: &DataReceived) {
        self.decoded_length += data.data_length;
    }

    pub(crate) fn fold_finished(&mut self, finished: &LoadingFinished) {
        if matches!(self.phase, Phase::Open) {
            self.phase = Phase::Finished {
                at: finished.timestamp,
                encoded_data_length: finished.encoded_data_length,
            };
        }
    }

    pub(crate) fn fold_failed(&mut self, failed: LoadingFailed) {
        if matches!(self.phase, Phase::Open) {
            self.phase = Phase::Failed {
                at: failed.timestamp,
                error_text: failed.error_text,
                canceled: failed.canceled,
            };
        }
    }

    pub(crate) fn fold_body(&mut self, body: ResponseBody) {
        self.body = match (body.body, body.error) {
            (Some(text), _) => BodyState::Ready {
                text,
                base64_encoded: body.base64_encoded,
            },
            (None, reason) => BodyState::Unavailable {
                reason: reason.unwrap_or_default(),
            },
        };
    }
}
