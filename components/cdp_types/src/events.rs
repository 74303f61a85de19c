//! Typed view over the events a HAR capture folds
//!
//! Decoding never fails on events the capture does not know about: they map to
//! `Ok(None)` so newer browsers can add events without breaking older builds.

use crate::domains::network::{self, *};
use crate::domains::page::{self, LifecycleTimestamp};
use crate::errors::CdpProtocolError;
use crate::CdpEvent;
use serde::de::DeserializeOwned;

/// A decoded protocol event
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    RequestWillBeSent(Box<RequestWillBeSent>),
    RequestWillBeSentExtraInfo(RequestWillBeSentExtraInfo),
    ResponseReceived(Box<ResponseReceived>),
    ResponseReceivedExtraInfo(ResponseReceivedExtraInfo),
    DataReceived(DataReceived),
    LoadingFinished(LoadingFinished),
    LoadingFailed(LoadingFailed),
    RequestServedFromCache(RequestServedFromCache),
    ResourceChangedPriority(ResourceChangedPriority),
    ResponseBody(ResponseBody),
    RequestContinued(RequestContinued),
    DomContentEventFired(LifecycleTimestamp),
    LoadEventFired(LifecycleTimestamp),
}

fn params<T: DeserializeOwned>(event: &CdpEvent) -> Result<T, CdpProtocolError> {
    serde_json::from_value(event.params.clone()).map_err(|e| CdpProtocolError::MalformedEvent {
        method: event.method.clone(),
        reason: e.to_string(),
    })
}

impl ProtocolEvent {
    /// Decode a raw event.
    ///
    /// Returns `Ok(None)` for methods outside the capture's vocabulary and an
    /// error when a known method carries parameters of the wrong shape.
    pub fn decode(event: &CdpEvent) -> Result<Option<Self>, CdpProtocolError> {
        let decoded = match event.method.as_str() {
            network::REQUEST_WILL_BE_SENT => {
                ProtocolEvent::RequestWillBeSent(Box::new(params(event)?))
            }
            network::REQUEST_WILL_BE_SENT_EXTRA_INFO => {
                ProtocolEvent::RequestWillBeSentExtraInfo(params(event)?)
            }
            network::RESPONSE_RECEIVED => ProtocolEvent::ResponseReceived(Box::new(params(event)?)),
            network::RESPONSE_RECEIVED_EXTRA_INFO => {
                ProtocolEvent::ResponseReceivedExtraInfo(params(event)?)
            }
            network::DATA_RECEIVED => ProtocolEvent::DataReceived(params(event)?),
            network::LOADING_FINISHED => ProtocolEvent::LoadingFinished(params(event)?),
            network::LOADING_FAILED => ProtocolEvent::LoadingFailed(params(event)?),
            network::REQUEST_SERVED_FROM_CACHE => {
                ProtocolEvent::RequestServedFromCache(params(event)?)
            }
            network::RESOURCE_CHANGED_PRIORITY => {
                ProtocolEvent::ResourceChangedPriority(params(event)?)
            }
            network::GET_RESPONSE_BODY => ProtocolEvent::ResponseBody(params(event)?),
            network::REQUEST_CONTINUED => ProtocolEvent::RequestContinued(params(event)?),
            page::DOM_CONTENT_EVENT_FIRED => ProtocolEvent::DomContentEventFired(params(event)?),
            page::LOAD_EVENT_FIRED => ProtocolEvent::LoadEventFired(params(event)?),
            _ => return Ok(None),
        };
        Ok(Some(decoded))
    }

    /// Request the event belongs to, for network events
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            ProtocolEvent::RequestWillBeSent(e) => Some(&e.request_id),
            ProtocolEvent::RequestWillBeSentExtraInfo(e) => Some(&e.request_id),
            ProtocolEvent::ResponseReceived(e) => Some(&e.request_id),
            ProtocolEvent::ResponseReceivedExtraInfo(e) => Some(&e.request_id),
            ProtocolEvent::DataReceived(e) => Some(&e.request_id),
            ProtocolEvent::LoadingFinished(e) => Some(&e.request_id),
            ProtocolEvent::LoadingFailed(e) => Some(&e.request_id),
            ProtocolEvent::RequestServedFromCache(e) => Some(&e.request_id),
            ProtocolEvent::ResourceChangedPriority(e) => Some(&e.request_id),
            ProtocolEvent::ResponseBody(e) => Some(&e.request_id),
            ProtocolEvent::RequestContinued(e) => Some(&e.request_id),
            ProtocolEvent::DomContentEventFired(_) | ProtocolEvent::LoadEventFired(_) => None,
        }
    }
}

impl From<ResponseBody> for CdpEvent {
    fn from(body: ResponseBody) -> Self {
        // ResponseBody only holds strings and a bool
        let params = serde_json::to_value(&body).unwrap_or_default();
        CdpEvent::new(network::GET_RESPONSE_BODY, params)
    }
}
