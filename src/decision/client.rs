//! HTTP client for the remote decision service.
//!
//! # Responsibilities
//! - Serialise the effective URL into the query body
//! - POST it to the configured endpoint with a hard timeout
//! - Classify transport, status and body failures
//!
//! # Design Decisions
//! - The underlying `reqwest::Client` is pooled and cloned cheaply; it is
//!   built once at startup and shared by all requests
//! - No retries: a failed lookup fails the request

use std::time::Duration;

use axum::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::config::ConfigError;
use crate::decision::error::ResolveError;
use crate::decision::model::Decision;

/// Hard deadline for a single decision lookup.
pub const DECISION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct DecisionQuery<'a> {
    request: &'a str,
}

/// Client for the decision endpoint.
#[derive(Debug, Clone)]
pub struct DecisionClient {
    client: Client,
    endpoint: Url,
}

impl DecisionClient {
    /// Create a client with its own connection pool and the fixed timeout.
    pub fn new(endpoint: Url) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(DECISION_TIMEOUT)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use an existing client. The caller is responsible for its timeout.
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the service which headers and rewrites apply to `effective_url`.
    pub async fn resolve(&self, effective_url: &str) -> Result<Decision, ResolveError> {
        let body = serde_json::to_vec(&DecisionQuery {
            request: effective_url,
        })
        .map_err(ResolveError::Encode)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(ResolveError::Unavailable)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::CONFLICT => return Err(ResolveError::Ambiguous),
            status => return Err(ResolveError::Unrecognized(status)),
        }

        let bytes = response.bytes().await.map_err(ResolveError::Read)?;
        Decision::from_slice(&bytes).map_err(ResolveError::Decode)
    }
}
