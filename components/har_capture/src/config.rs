//! Configuration for capture sessions

use crate::hooks::PageHook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Tuning of the post-load reading simulation
///
/// Ranges are inclusive `(low, high)` pairs sampled uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub enabled: bool,
    /// Scroll target as a fraction of the page height
    pub target_fraction: (f64, f64),
    /// Wheel delta of one scroll increment, in CSS pixels
    pub step_px: (u32, u32),
    /// Pause between increments
    pub pace_ms: (u64, u64),
    /// Pause once the target is reached
    pub dwell_ms: (u64, u64),
    /// Upper bound on increments for pages that keep growing
    pub max_steps: u32,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl InteractionConfig {
    /// Configuration that skips the simulation entirely
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_fraction: (0.40, 0.67),
            step_px: (90, 260),
            pace_ms: (60, 220),
            dwell_ms: (500, 1500),
            max_steps: 80,
            seed: None,
        }
    }
}

/// Configuration of live captures
///
/// Hooks are runtime values and are not part of the serialized form.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Per-page deadline; `None` waits forever
    timeout: Option<Duration>,

    /// Fetch and embed response bodies
    content: bool,

    /// Number of pages captured concurrently by a batch
    parallel: usize,

    interaction: InteractionConfig,

    #[serde(skip)]
    pre_hook: Option<Arc<dyn PageHook>>,

    #[serde(skip)]
    post_hook: Option<Arc<dyn PageHook>>,
}

impl CaptureConfig {
    /// Create a new builder for CaptureConfig
    ///
    /// # Example
    ///
    /// ```
    /// use har_capture::CaptureConfig;
    /// use std::time::Duration;
    ///
    /// let config = CaptureConfig::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .content(true)
    ///     .build();
    /// assert!(config.content());
    /// ```
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }

    /// Get the per-page timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Get whether response bodies are captured
    pub fn content(&self) -> bool {
        self.content
    }

    /// Get the batch concurrency
    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Get the interaction settings
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    pub fn pre_hook(&self) -> Option<&Arc<dyn PageHook>> {
        self.pre_hook.as_ref()
    }

    pub fn post_hook(&self) -> Option<&Arc<dyn PageHook>> {
        self.post_hook.as_ref()
    }
}

impl Default for CaptureConfig {
    /// Default values:
    /// - timeout: none
    /// - content: false
    /// - parallel: 1
    /// - interaction: enabled with the default ranges
    /// - no hooks
    fn default() -> Self {
        Self {
            timeout: None,
            content: false,
            parallel: 1,
            interaction: InteractionConfig::default(),
            pre_hook: None,
            post_hook: None,
        }
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("timeout", &self.timeout)
            .field("content", &self.content)
            .field("parallel", &self.parallel)
            .field("interaction", &self.interaction)
            .field("pre_hook", &self.pre_hook.is_some())
            .field("post_hook", &self.post_hook.is_some())
            .finish()
    }
}

/// Builder for CaptureConfig
#[derive(Default)]
pub struct CaptureConfigBuilder {
    timeout: Option<Duration>,
    content: Option<bool>,
    parallel: Option<usize>,
    interaction: Option<InteractionConfig>,
    pre_hook: Option<Arc<dyn PageHook>>,
    post_hook: Option<Arc<dyn PageHook>>,
}

impl CaptureConfigBuilder {
    /// Set the per-page timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable response body capture
    pub fn content(mut self, enabled: bool) -> Self {
        self.content = Some(enabled);
        self
    }

    /// Set the batch concurrency; values below 1 are raised to 1
    pub fn parallel(mut self, parallel: usize) -> Self {
        self.parallel = Some(parallel.max(1));
        self
    }

    /// Replace the interaction settings
    pub fn interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = Some(interaction);
        self
    }

    /// Run `hook` before navigation
    pub fn pre_hook(mut self, hook: impl PageHook + 'static) -> Self {
        self.pre_hook = Some(Arc::new(hook));
        self
    }

    /// Run `hook` once the page is complete; its value lands in the page's
    /// `_user` field
    pub fn post_hook(mut self, hook: impl PageHook + 'static) -> Self {
        self.post_hook = Some(Arc::new(hook));
        self
    }

    /// Build the CaptureConfig
    ///
    /// Uses default values for any options not explicitly set.
    pub fn build(self) -> CaptureConfig {
        let default = CaptureConfig::default();

        CaptureConfig {
            timeout: self.timeout.or(default.timeout),
            content: self.content.unwrap_or(default.content),
            parallel: self.parallel.unwrap_or(default.parallel),
            interaction: self.interaction.unwrap_or(default.interaction),
            pre_hook: self.pre_hook,
            post_hook: self.post_hook,
        }
    }
}
