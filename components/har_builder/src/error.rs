//! Error types for HAR assembly

use thiserror::Error;

/// Errors that end a HAR assembly without a document
#[derive(Error, Debug)]
pub enum HarError {
    /// The event stream ended before the page was complete
    #[error("Incomplete capture: {pending} request(s) still pending, load event {load}")]
    IncompleteCapture { pending: usize, load: LoadState },

    /// The assembly was abandoned by its driver
    #[error("Capture cancelled")]
    Cancelled,

    /// Recorded input could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whether the page load event had been observed when assembly stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Fired,
    Missing,
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadState::Fired => write!(f, "fired"),
            LoadState::Missing => write!(f, "missing"),
        }
    }
}

/// Result type for HAR assembly
pub type Result<T> = std::result::Result<T, HarError>;
