//! Scripted in-memory browsing context for session tests

#![allow(dead_code)]

use async_trait::async_trait;
use cdp_types::{CdpError, CdpEvent};
use futures::stream::{self, BoxStream, StreamExt};
use har_capture::{BrowsingContext, ContextProvider, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What a scripted context does once created
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Events delivered after subscription, each after its delay
    pub events: Vec<(Duration, CdpEvent)>,
    /// End the event stream after the script instead of staying open
    pub close_after_script: bool,
    /// Resolve `disconnected()` after this long
    pub disconnect_after: Option<Duration>,
    /// Bodies served by `Network.getResponseBody`; ids not listed fail
    pub bodies: HashMap<String, String>,
    /// Value of `window.scrollY` after each wheel event
    pub page_height: f64,
}

impl Script {
    pub fn new(events: Vec<CdpEvent>) -> Self {
        Self {
            events: events.into_iter().map(|e| (Duration::ZERO, e)).collect(),
            page_height: 3000.0,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, request_id: &str, body: &str) -> Self {
        self.bodies.insert(request_id.to_string(), body.to_string());
        self
    }

    pub fn disconnect_after(mut self, delay: Duration) -> Self {
        self.disconnect_after = Some(delay);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        for (d, _) in self.events.iter_mut() {
            *d = delay;
        }
        self
    }

    pub fn closing(mut self) -> Self {
        self.close_after_script = true;
        self
    }
}

pub struct ScriptedContext {
    script: Script,
    commands: Mutex<Vec<String>>,
    scroll_y: Mutex<f64>,
}

impl ScriptedContext {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            commands: Mutex::new(Vec::new()),
            scroll_y: Mutex::new(0.0),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl BrowsingContext for ScriptedContext {
    async fn send_command(&self, method: &str, params: Value) -> std::result::Result<Value, CdpError> {
        self.commands.lock().push(method.to_string());
        match method {
            "Page.enable" | "Network.enable" => Ok(json!({})),
            "Page.navigate" => Ok(json!({"frameId": "F1", "loaderId": "L1"})),
            "Network.getResponseBody" => {
                let id = params["requestId"].as_str().unwrap_or_default();
                match self.script.bodies.get(id) {
                    Some(body) => Ok(json!({"body": body, "base64Encoded": false})),
                    None => Err(CdpError::server_error(
                        "No resource with given identifier found",
                    )),
                }
            }
            "Input.dispatchMouseEvent" => {
                let delta = params["deltaY"].as_f64().unwrap_or_default();
                let mut scroll_y = self.scroll_y.lock();
                *scroll_y = (*scroll_y + delta).min(self.script.page_height - 720.0);
                Ok(json!({}))
            }
            "Runtime.evaluate" => {
                let expression = params["expression"].as_str().unwrap_or_default();
                let scroll_y = *self.scroll_y.lock();
                let value = if expression == "window.scrollY" {
                    json!(scroll_y)
                } else {
                    json!({
                        "height": self.script.page_height,
                        "width": 1280,
                        "viewport": 720,
                        "scrollY": scroll_y
                    })
                };
                Ok(json!({"result": {"type": "object", "value": value}}))
            }
            other => Err(CdpError::method_not_found(other)),
        }
    }

    fn events(&self) -> BoxStream<'static, CdpEvent> {
        let scripted = stream::iter(self.script.events.clone()).then(|(delay, event)| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            event
        });
        if self.script.close_after_script {
            scripted.boxed()
        } else {
            scripted.chain(stream::pending()).boxed()
        }
    }

    async fn disconnected(&self) {
        match self.script.disconnect_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => futures::future::pending::<()>().await,
        }
    }
}

/// Hands out scripted contexts and counts their lifecycle
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<usize, Script>>,
    default_script: Script,
    created: AtomicUsize,
    destroyed: AtomicUsize,
    contexts: Mutex<Vec<Arc<ScriptedContext>>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(HashMap::new()),
            default_script: script,
            created: AtomicUsize::new(0),
            destroyed: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        })
    }

    /// Use `script` for the `n`-th context created instead of the default
    pub fn script_for(self: &Arc<Self>, n: usize, script: Script) {
        self.scripts.lock().insert(n, script);
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn context(&self, n: usize) -> Arc<ScriptedContext> {
        Arc::clone(&self.contexts.lock()[n])
    }
}

#[async_trait]
impl ContextProvider for ScriptedProvider {
    async fn create(&self) -> Result<Arc<dyn BrowsingContext>> {
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .remove(&n)
            .unwrap_or_else(|| self.default_script.clone());
        let context = Arc::new(ScriptedContext::new(script));
        self.contexts.lock().push(Arc::clone(&context));
        Ok(context)
    }

    async fn destroy(&self, _context: Arc<dyn BrowsingContext>) -> Result<()> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Events of a one-request page, optionally with its body finished
pub fn page_events(url: &str) -> Vec<CdpEvent> {
    vec![
        CdpEvent::new(
            "Network.requestWillBeSent",
            json!({
                "requestId": "1",
                "request": {"url": url, "method": "GET", "headers": {"Accept": "text/html"}},
                "timestamp": 100.0,
                "wallTime": 1_700_000_000.0,
                "type": "Document"
            }),
        ),
        CdpEvent::new(
            "Network.responseReceived",
            json!({
                "requestId": "1",
                "timestamp": 100.2,
                "type": "Document",
                "response": {
                    "url": url,
                    "status": 200,
                    "statusText": "OK",
                    "headers": {"Content-Type": "text/html"},
                    "mimeType": "text/html",
                    "protocol": "h2"
                }
            }),
        ),
        CdpEvent::new(
            "Network.loadingFinished",
            json!({"requestId": "1", "timestamp": 100.3, "encodedDataLength": 1024}),
        ),
        CdpEvent::new("Page.domContentEventFired", json!({"timestamp": 100.4})),
        CdpEvent::new("Page.loadEventFired", json!({"timestamp": 100.5})),
    ]
}
