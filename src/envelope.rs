//! The JSON envelopes wrapping every API response body.

use serde::{Deserialize, Serialize};

/// The `status` of a response whose request succeeded.
pub const STATUS_SUCCESS: &str = "success";
/// The `status` of a response whose request failed.
pub const STATUS_ERROR: &str = "error";

/// The body of a successful response, e.g.:
///
/// ```json
/// { "status": "success", "message": "Transaction created successfully", "data": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always [STATUS_SUCCESS].
    pub status: String,
    /// A short, human readable description of what happened.
    pub message: String,
    /// The resource the request produced.
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    /// Wrap `data` with a success status and `message`.
    pub fn new(message: &str, data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_owned(),
            message: message.to_owned(),
            data,
        }
    }
}

/// The body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always [STATUS_ERROR].
    pub status: String,
    /// What went wrong.
    pub message: String,
    /// The detailed error trace, only included in development mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    /// An error body with just a `message`.
    pub fn new(message: &str) -> Self {
        Self {
            status: STATUS_ERROR.to_owned(),
            message: message.to_owned(),
            stack: None,
        }
    }

    /// An error body with a `message` and the error trace.
    pub fn with_stack(message: &str, stack: &str) -> Self {
        Self {
            stack: Some(stack.to_owned()),
            ..Self::new(message)
        }
    }
}
