// CDP Error types
// Implements the JSON-RPC 2.0 error object returned by failed commands

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// CDP Error following JSON-RPC 2.0 error specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CdpError {
    /// Error code (JSON-RPC standard codes)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Additional error data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for CdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CDP Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for CdpError {}

impl CdpError {
    /// Create a new CDP error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create error with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Method not found (-32601)
    /// The browser does not implement the command
    pub fn method_not_found(method: impl Into<String>) -> Self {
        let method = method.into();
        Self::with_data(
            -32601,
            "Method not found",
            serde_json::json!({ "method": method }),
        )
    }

    /// Invalid params (-32602)
    pub fn invalid_params(details: impl Into<String>) -> Self {
        let details = details.into();
        Self::with_data(
            -32602,
            "Invalid params",
            serde_json::json!({ "details": details }),
        )
    }

    /// Server error (-32000)
    /// What the browser answers for e.g. a body that is no longer buffered
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(-32000, message)
    }
}

/// Errors raised while decoding protocol messages
#[derive(Error, Debug)]
pub enum CdpProtocolError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Event parameters do not match the known shape
    #[error("Malformed {method} event: {reason}")]
    MalformedEvent { method: String, reason: String },

    /// Command result does not match the known shape
    #[error("Unexpected result for {0}")]
    UnexpectedResult(String),
}

impl From<CdpProtocolError> for CdpError {
    fn from(error: CdpProtocolError) -> Self {
        match error {
            CdpProtocolError::SerializationError(e) => CdpError::with_data(
                -32700,
                "Parse error",
                serde_json::json!({ "error": e.to_string() }),
            ),
            CdpProtocolError::MalformedEvent { method, reason } => {
                CdpError::invalid_params(format!("{}: {}", method, reason))
            }
            CdpProtocolError::UnexpectedResult(method) => {
                CdpError::server_error(format!("Unexpected result for {}", method))
            }
        }
    }
}
