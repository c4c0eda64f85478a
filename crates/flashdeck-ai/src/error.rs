#![forbid(unsafe_code)]

//! Error types for AI requests.

use std::fmt;

/// Failure below the service: the request never produced a JSON body.
#[derive(Debug)]
pub enum TransportError {
    /// Connection refused, DNS failure, aborted fetch.
    Network(String),
    /// Non-success HTTP status.
    Status { code: u16, body: String },
    /// The transport gave up waiting.
    Timeout,
    /// The body was not JSON.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Status { code, body } if body.is_empty() => write!(f, "HTTP {code}"),
            Self::Status { code, body } => write!(f, "HTTP {code}: {body}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Decode(e) => write!(f, "invalid JSON body: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

/// A completion request failed.
///
/// Every variant carries enough to show the user a short message; see
/// [`RequestFailed::message`].
#[derive(Debug)]
pub enum RequestFailed {
    /// The transport failed.
    Transport(TransportError),
    /// The service answered `{success: false, message}`.
    Service { message: String },
    /// The service answered with an unexpected shape.
    Malformed { detail: String },
}

impl RequestFailed {
    /// Human-readable message suitable for a transient notice.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Service { message } if !message.trim().is_empty() => message.clone(),
            Self::Service { .. } => "the AI service reported an error".to_owned(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "AI request failed: {e}"),
            Self::Service { message } => write!(f, "AI service error: {message}"),
            Self::Malformed { detail } => write!(f, "malformed AI response: {detail}"),
        }
    }
}

impl std::error::Error for RequestFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for RequestFailed {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
