//! Error types for capture sessions

use cdp_types::CdpError;
use har_builder::HarError;
use std::time::Duration;
use thiserror::Error;

/// Which user hook failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Before navigation
    Pre,
    /// After the page completed
    Post,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::Pre => write!(f, "pre"),
            HookStage::Post => write!(f, "post"),
        }
    }
}

/// Errors that abort the capture of a page
#[derive(Error, Debug)]
pub enum CaptureError {
    /// HAR assembly failed
    #[error(transparent)]
    Har(#[from] HarError),

    /// The remote end went away before the page completed
    #[error("Browsing context disconnected")]
    Disconnected,

    /// The page did not complete in time
    #[error("Timed out after {0:?}")]
    TimedOut(Duration),

    /// A user hook failed
    #[error("{stage}-hook failed: {source}")]
    HookFailure {
        stage: HookStage,
        #[source]
        source: anyhow::Error,
    },

    /// A protocol command was rejected
    #[error("Command failed: {0}")]
    Command(#[from] CdpError),

    /// The page could not be navigated to
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A browsing context could not be created
    #[error("Failed to provision browsing context: {0}")]
    Provisioning(String),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::Disconnected;
        assert_eq!(err.to_string(), "Browsing context disconnected");

        let err = CaptureError::TimedOut(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Timed out after 1.5s");

        let err = CaptureError::HookFailure {
            stage: HookStage::Pre,
            source: anyhow::anyhow!("login failed"),
        };
        assert_eq!(err.to_string(), "pre-hook failed: login failed");
    }

    #[test]
    fn test_har_error_is_transparent() {
        let err: CaptureError = HarError::Cancelled.into();
        assert_eq!(err.to_string(), "Capture cancelled");
    }
}
