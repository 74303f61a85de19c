//! Live capture of one page
//!
//! A session races three branches and keeps the first to settle:
//!
//! 1. **Load**: navigate, fold events until the page is complete, then run
//!    the reading simulation and the post-hook.
//! 2. **Disconnect**: the remote end went away.
//! 3. **Timeout**: the configured deadline elapsed.
//!
//! Whatever wins, the losing branches are dropped, the timer is cancelled
//! and the browsing context is destroyed exactly once.

use crate::config::CaptureConfig;
use crate::context::{BrowsingContext, ContextLease, ContextProvider};
use crate::error::{CaptureError, HookStage, Result};
use crate::hooks::HookContext;
use crate::interaction::simulate_reading;
use crate::timer::{SessionTimer, TimerOutcome};
use cdp_types::domains::network::{RequestId, ResponseBody, LOADING_FINISHED};
use cdp_types::CdpEvent;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use har_builder::{EngineStatus, HarBuilderOptions, HarDocument, StatsEngine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// How a session's race ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// The page completed; the document is final
    Loaded(HarDocument),
    /// The remote end went away first
    Disconnected,
    /// The deadline elapsed first
    TimedOut(Duration),
    /// The load branch failed (hook, command, navigation...)
    Failed(CaptureError),
}

impl SessionOutcome {
    pub fn into_result(self) -> Result<HarDocument> {
        match self {
            SessionOutcome::Loaded(document) => Ok(document),
            SessionOutcome::Disconnected => Err(CaptureError::Disconnected),
            SessionOutcome::TimedOut(duration) => Err(CaptureError::TimedOut(duration)),
            SessionOutcome::Failed(error) => Err(error),
        }
    }
}

/// Captures pages from live browsing contexts
pub struct LiveSession {
    provider: Arc<dyn ContextProvider>,
    config: CaptureConfig,
}

impl LiveSession {
    pub fn new(provider: Arc<dyn ContextProvider>, config: CaptureConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Capture a single page
    pub async fn capture(&self, url: &str) -> Result<HarDocument> {
        let urls = [url.to_string()];
        self.run(url, 0, &urls).await
    }

    /// Capture `url`, the `index`-th page of the batch `urls`
    pub async fn run(&self, url: &str, index: usize, urls: &[String]) -> Result<HarDocument> {
        self.race(url, index, urls)
            .instrument(info_span!("page", index, url))
            .await
            .into_result()
    }

    /// Run the three-way race and report which branch won
    pub async fn race(&self, url: &str, index: usize, urls: &[String]) -> SessionOutcome {
        let lease = match ContextLease::acquire(Arc::clone(&self.provider)).await {
            Ok(lease) => lease,
            Err(e) => return SessionOutcome::Failed(e),
        };
        let context = Arc::clone(lease.context());
        let timer = SessionTimer::new(self.config.timeout());

        let outcome = tokio::select! {
            biased;

            result = self.load(context.as_ref(), url, index, urls) => match result {
                Ok(document) => SessionOutcome::Loaded(document),
                Err(CaptureError::Disconnected) => SessionOutcome::Disconnected,
                Err(e) => SessionOutcome::Failed(e),
            },
            _ = context.disconnected() => {
                warn!("Browsing context disconnected before {} completed", url);
                SessionOutcome::Disconnected
            }
            TimerOutcome::Elapsed = timer.wait() => {
                let duration = timer.duration().unwrap_or_default();
                warn!("Timed out after {:?} waiting for {}", duration, url);
                SessionOutcome::TimedOut(duration)
            }
        };

        timer.cancel();
        drop(context);
        lease.release().await;
        outcome
    }

    async fn load(
        &self,
        context: &dyn BrowsingContext,
        url: &str,
        index: usize,
        urls: &[String],
    ) -> Result<HarDocument> {
        let hook_context = HookContext {
            url,
            context,
            index,
            urls,
        };

        if let Some(hook) = self.config.pre_hook() {
            debug!("Running pre-hook");
            hook.call(hook_context)
                .await
                .map_err(|source| CaptureError::HookFailure {
                    stage: HookStage::Pre,
                    source,
                })?;
        }

        let mut document = self.collect(context, url).await?;

        let interaction = self.config.interaction();
        if interaction.enabled {
            match simulate_reading(context, interaction).await {
                Ok(summary) => debug!(
                    "Scrolled to {:.0}px (target {:.0}px) in {} step(s)",
                    summary.reached, summary.target, summary.steps
                ),
                Err(e) => warn!("Interaction simulation failed: {}", e),
            }
        }

        if let Some(hook) = self.config.post_hook() {
            debug!("Running post-hook");
            let value = hook
                .call(hook_context)
                .await
                .map_err(|source| CaptureError::HookFailure {
                    stage: HookStage::Post,
                    source,
                })?;
            if let Some(page) = document.log.pages.first_mut() {
                page.user = value;
            }
        }

        info!(
            "HAR finished for {} with {} entries",
            url,
            document.log.entries.len()
        );
        Ok(document)
    }

    /// Navigate and fold events until the engine reports completion
    async fn collect(&self, context: &dyn BrowsingContext, url: &str) -> Result<HarDocument> {
        let content = self.config.content();

        // Subscribe first so no event of the navigation is missed
        let mut events = context.events();
        context.enable("Page").await?;
        context.enable("Network").await?;

        info!("Navigating to {}", url);
        let navigation = context.navigate(url).await?;
        if let Some(reason) = navigation.error_text {
            return Err(CaptureError::Navigation {
                url: url.to_string(),
                reason,
            });
        }

        let mut engine = StatsEngine::new(url, HarBuilderOptions { content });
        let mut fetches: FuturesUnordered<BoxFuture<'_, ResponseBody>> =
            FuturesUnordered::new();

        loop {
            let event = tokio::select! {
                Some(body) = fetches.next(), if !fetches.is_empty() => CdpEvent::from(body),
                event = events.next() => match event {
                    Some(event) => event,
                    None => {
                        warn!("Event stream ended before {} completed", url);
                        return Err(CaptureError::Disconnected);
                    }
                },
            };

            match engine.process_event(&event) {
                EngineStatus::Continuing => {}
                EngineStatus::Complete(document) => {
                    info!("Page {} loaded", url);
                    return Ok(*document);
                }
                EngineStatus::Failed(e) => return Err(e.into()),
            }

            if content && event.method == LOADING_FINISHED {
                if let Some(request_id) = event.request_id() {
                    if engine.is_tracked(request_id) {
                        fetches.push(fetch_body(context, RequestId::from(request_id)).boxed());
                    }
                }
            }
        }
    }
}

/// Fetch a body and turn the outcome into a body-ready event; failures are
/// recorded, never propagated
async fn fetch_body(context: &dyn BrowsingContext, request_id: RequestId) -> ResponseBody {
    match context.fetch_body(&request_id).await {
        Ok(result) => ResponseBody::ready(request_id, result.body, result.base64_encoded),
        Err(e) => {
            warn!("Failed to fetch body of {}: {}", request_id, e);
            ResponseBody::unavailable(request_id, e.message)
        }
    }
}
