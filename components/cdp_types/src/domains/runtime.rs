// Runtime domain types (JavaScript evaluation)

use serde::{Deserialize, Serialize};

/// Remote object representing a JavaScript value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type ("number", "object", ...)
    #[serde(rename = "type")]
    pub object_type: String,
    /// Primitive value, or the JSON value when evaluated with `returnByValue`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Details about a thrown exception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub text: String,
    #[serde(default)]
    pub line_number: u32,
    #[serde(default)]
    pub column_number: u32,
}

/// Result of the `Runtime.evaluate` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    pub result: RemoteObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}
