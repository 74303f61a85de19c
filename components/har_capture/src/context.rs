//! Browsing context capabilities used by live sessions
//!
//! The transport that talks to a real browser is not part of this crate; it
//! plugs in by implementing [`BrowsingContext`] and [`ContextProvider`].

use crate::error::Result;
use async_trait::async_trait;
use cdp_types::domains::network::{GetResponseBodyResult, RequestId, GET_RESPONSE_BODY};
use cdp_types::domains::page::NavigateResult;
use cdp_types::{CdpError, CdpEvent, CdpProtocolError};
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// One browser tab (or target) driven over the protocol
#[async_trait]
pub trait BrowsingContext: Send + Sync {
    /// Issue a command and wait for its result
    async fn send_command(&self, method: &str, params: Value) -> std::result::Result<Value, CdpError>;

    /// Subscribe to the events of this context.
    ///
    /// Only events delivered after the call are seen. The stream ends when
    /// the connection goes away.
    fn events(&self) -> BoxStream<'static, CdpEvent>;

    /// Resolves once the remote end is gone
    async fn disconnected(&self);

    /// Enable a protocol domain ("Network", "Page")
    async fn enable(&self, domain: &str) -> std::result::Result<(), CdpError> {
        debug!("Enabling {}", domain);
        self.send_command(&format!("{}.enable", domain), json!({}))
            .await
            .map(|_| ())
    }

    /// Start navigating to `url`
    async fn navigate(&self, url: &str) -> std::result::Result<NavigateResult, CdpError> {
        let result = self.send_command("Page.navigate", json!({ "url": url })).await?;
        decode_result("Page.navigate", result)
    }

    /// Fetch the body of a finished response
    async fn fetch_body(
        &self,
        request_id: &RequestId,
    ) -> std::result::Result<GetResponseBodyResult, CdpError> {
        let result = self
            .send_command(GET_RESPONSE_BODY, json!({ "requestId": request_id }))
            .await?;
        decode_result(GET_RESPONSE_BODY, result)
    }
}

fn decode_result<T: DeserializeOwned>(
    method: &str,
    result: Value,
) -> std::result::Result<T, CdpError> {
    serde_json::from_value(result)
        .map_err(|_| CdpProtocolError::UnexpectedResult(method.to_string()).into())
}

/// Creates and destroys browsing contexts
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn create(&self) -> Result<Arc<dyn BrowsingContext>>;

    async fn destroy(&self, context: Arc<dyn BrowsingContext>) -> Result<()>;
}

/// A browsing context that must be handed back to its provider.
///
/// `release` consumes the lease, so an explicit teardown happens at most
/// once. A lease dropped without release (a cancelled session) schedules
/// the teardown on the current runtime instead.
pub(crate) struct ContextLease {
    provider: Arc<dyn ContextProvider>,
    context: Arc<dyn BrowsingContext>,
    released: bool,
}

impl ContextLease {
    pub(crate) async fn acquire(provider: Arc<dyn ContextProvider>) -> Result<Self> {
        let context = provider.create().await?;
        Ok(Self {
            provider,
            context,
            released: false,
        })
    }

    pub(crate) fn context(&self) -> &Arc<dyn BrowsingContext> {
        &self.context
    }

    /// Tear the context down; failures are logged, never propagated
    pub(crate) async fn release(mut self) {
        self.released = true;
        debug!("Destroying browsing context");
        if let Err(e) = self.provider.destroy(Arc::clone(&self.context)).await {
            warn!("Failed to destroy browsing context: {}", e);
        }
    }
}

impl Drop for ContextLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let provider = Arc::clone(&self.provider);
        let context = Arc::clone(&self.context);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = provider.destroy(context).await {
                        warn!("Failed to destroy abandoned browsing context: {}", e);
                    }
                });
            }
            Err(_) => warn!("Browsing context leaked: no runtime to destroy it on"),
        }
    }
}
