//! Failure classification for decision lookups.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while resolving a decision for a request.
///
/// Every variant is terminal for the request that triggered it.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The outbound query could not be serialised.
    #[error("failed to encode decision query: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connect, transport or timeout failure talking to the decision service.
    #[error("decision service unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    /// The service found several candidate decisions and refused to pick one.
    #[error("decision service reported an ambiguous match")]
    Ambiguous,

    /// Any other non-200 status.
    #[error("decision service returned unexpected status {0}")]
    Unrecognized(StatusCode),

    /// The response body could not be read.
    #[error("failed to read decision body: {0}")]
    Read(#[source] reqwest::Error),

    /// The response body does not match the decision schema.
    #[error("failed to decode decision body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ResolveError {
    /// Status code written to the client when this error ends a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResolveError::Ambiguous => StatusCode::CONFLICT,
            ResolveError::Unrecognized(_) => StatusCode::BAD_GATEWAY,
            ResolveError::Encode(_)
            | ResolveError::Unavailable(_)
            | ResolveError::Read(_)
            | ResolveError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::Encode(_) => "encode",
            ResolveError::Unavailable(_) => "unavailable",
            ResolveError::Ambiguous => "ambiguous",
            ResolveError::Unrecognized(_) => "unrecognized",
            ResolveError::Read(_) => "read",
            ResolveError::Decode(_) => "decode",
        }
    }
}
