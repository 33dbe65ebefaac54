//! Error types for the Mautic client.
//!
//! # Design
//! Each failure kind gets its own variant so callers can match on it instead
//! of inspecting messages. `Api` displays exactly the joined `code: message`
//! text.
//! `Transport` displays the host's original error as is: it is boxed, never
//! reshaped, and can be recovered with `downcast_ref`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, MauticError>;

/// Boxed error coming from the host's transport.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `MauticClient` and the resource APIs.
#[derive(Debug, Error)]
pub enum MauticError {
    /// A guard rejected its input. Raised before any request is built.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed to produce a response (connection, DNS, timeout).
    #[error("{0}")]
    Transport(TransportError),

    /// The response body is not valid JSON.
    #[error("malformed response body: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The remote API answered with a truthy `errors` field.
    #[error("{0}")]
    Api(NormalizedError),

    /// A request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl MauticError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The normalized API error, if this is one.
    pub fn api_error(&self) -> Option<&NormalizedError> {
        match self {
            MauticError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// One entry of a remote error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Uniform shape for heterogeneous remote error payloads.
///
/// `message` is every detail rendered as `code: message`, joined by `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    pub message: String,
    pub details: Vec<ErrorDetail>,
}

impl NormalizedError {
    pub fn new(details: Vec<ErrorDetail>) -> Self {
        let message = details
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self { message, details }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NormalizedError {}
