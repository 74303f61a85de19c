//! Offline conversion of recorded event logs

use cdp_types::CdpEvent;
use futures::{Stream, StreamExt};
use har_builder::{EngineStatus, HarBuilderOptions, HarDocument, HarError, StatsEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Options of a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    /// The log contains body events and the document should embed them
    pub content: bool,
}

impl From<ReplayOptions> for HarBuilderOptions {
    fn from(options: ReplayOptions) -> Self {
        HarBuilderOptions {
            content: options.content,
        }
    }
}

/// Feeds a finite, ordered event log through one [`StatsEngine`]
#[derive(Debug, Clone)]
pub struct LogReplayer {
    url: String,
    options: ReplayOptions,
}

impl LogReplayer {
    pub fn new(url: impl Into<String>, options: ReplayOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    /// Replay `events` strictly in order.
    ///
    /// Events after the page completes are not looked at. A log that ends
    /// before completion yields `HarError::IncompleteCapture`.
    pub fn replay<'a, I>(&self, events: I) -> har_builder::Result<HarDocument>
    where
        I: IntoIterator<Item = &'a CdpEvent>,
    {
        let mut engine = self.engine();
        for (position, event) in events.into_iter().enumerate() {
            match engine.process_event(event) {
                EngineStatus::Continuing => {}
                EngineStatus::Complete(document) => {
                    self.log_complete(position, &document);
                    return Ok(*document);
                }
                EngineStatus::Failed(e) => return Err(e),
            }
        }
        engine.finish()
    }

    /// Replay events as they come out of `events`
    pub async fn replay_stream<S>(&self, mut events: S) -> har_builder::Result<HarDocument>
    where
        S: Stream<Item = CdpEvent> + Unpin,
    {
        let mut engine = self.engine();
        let mut position = 0;
        while let Some(event) = events.next().await {
            match engine.process_event(&event) {
                EngineStatus::Continuing => {}
                EngineStatus::Complete(document) => {
                    self.log_complete(position, &document);
                    return Ok(*document);
                }
                EngineStatus::Failed(e) => return Err(e),
            }
            position += 1;
        }
        engine.finish()
    }

    fn engine(&self) -> StatsEngine {
        debug!("Replaying event log of {}", self.url);
        StatsEngine::new(self.url.clone(), self.options.into())
    }

    fn log_complete(&self, position: usize, document: &HarDocument) {
        info!(
            "Replay of {} complete after {} event(s), {} entries",
            self.url,
            position + 1,
            document.log.entries.len()
        );
    }
}

/// Convert a recorded event log into a HAR document
///
/// # Example
///
/// ```
/// use cdp_types::CdpEvent;
/// use har_capture::{convert, ReplayOptions};
/// use serde_json::json;
///
/// let events = vec![
///     CdpEvent::new("Network.requestWillBeSent", json!({
///         "requestId": "1",
///         "request": {"url": "https://example.com/", "method": "GET", "headers": {}},
///         "timestamp": 1.0,
///         "wallTime": 1700000000.0
///     })),
///     CdpEvent::new("Network.loadingFinished", json!({
///         "requestId": "1", "timestamp": 1.2, "encodedDataLength": 512
///     })),
///     CdpEvent::new("Page.loadEventFired", json!({"timestamp": 1.5})),
/// ];
///
/// let document = convert("https://example.com/", &events, ReplayOptions::default()).unwrap();
/// assert_eq!(document.log.pages.len(), 1);
/// ```
pub fn convert<'a, I>(
    url: &str,
    events: I,
    options: ReplayOptions,
) -> har_builder::Result<HarDocument>
where
    I: IntoIterator<Item = &'a CdpEvent>,
{
    LogReplayer::new(url, options).replay(events)
}

/// Convert a JSON array of `{method, params}` objects
pub fn convert_json(
    url: &str,
    json: &str,
    options: ReplayOptions,
) -> har_builder::Result<HarDocument> {
    let events: Vec<CdpEvent> = serde_json::from_str(json).map_err(HarError::Serialization)?;
    convert(url, &events, options)
}
