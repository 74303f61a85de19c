//! User hooks run around a page capture

use crate::context::BrowsingContext;
use async_trait::async_trait;
use serde_json::Value;

/// What a hook gets to see of the capture in progress
#[derive(Clone, Copy)]
pub struct HookContext<'a> {
    /// URL of the page being captured
    pub url: &'a str,
    /// The page's browsing context, for issuing commands
    pub context: &'a dyn BrowsingContext,
    /// Position of `url` in the batch
    pub index: usize,
    /// The whole batch
    pub urls: &'a [String],
}

/// A user hook
///
/// A pre-hook runs after the browsing context exists and before navigation;
/// its value is ignored. A post-hook runs once the page is complete and its
/// value, when `Some`, becomes the page's `_user` field. An error from
/// either aborts the page.
#[async_trait]
pub trait PageHook: Send + Sync {
    async fn call(&self, ctx: HookContext<'_>) -> anyhow::Result<Option<Value>>;
}
