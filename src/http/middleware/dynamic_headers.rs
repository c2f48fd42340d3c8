//! Decision-driven header injection and path rewriting.
//!
//! For every request:
//! ```text
//! Start → QueryingRemote ─┬─ DecisionReceived → HeadersApplied → RewriteAttempted → Forwarded
//!                         └─ Failed(status)
//! ```
//! A failed lookup writes a terminal status and the next handler is never
//! called. Otherwise the next handler always runs with the mutated request.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{HeaderName, HeaderValue, HOST},
        uri::PathAndQuery,
        Request, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::validation::parse_endpoint;
use crate::config::{ConfigError, MiddlewareConfig};
use crate::decision::{Decision, DecisionClient, HeaderDirective, ResolveError};
use crate::observability::{metrics, Event, EventSink, TracingSink};
use crate::rewrite::path::encode_path;
use crate::rewrite::select_and_rewrite;

/// Middleware state shared by every request.
pub struct DynamicHeaders {
    name: String,
    client: DecisionClient,
    enable_timing: bool,
    events: Arc<dyn EventSink>,
}

impl DynamicHeaders {
    /// Build the middleware and its decision client.
    ///
    /// Fails if the decision endpoint is empty or not an http(s) URL.
    pub fn new(config: &MiddlewareConfig) -> Result<Self, ConfigError> {
        let endpoint = parse_endpoint(&config.url_header_request)?;
        let client = DecisionClient::new(endpoint)?;
        tracing::info!(
            name = %config.name,
            endpoint = %client.endpoint(),
            enable_timing = config.enable_timing,
            "Decision middleware created"
        );
        Ok(Self::with_client(config, client))
    }

    /// Build the middleware around an existing decision client.
    pub fn with_client(config: &MiddlewareConfig, client: DecisionClient) -> Self {
        Self {
            name: config.name.clone(),
            client,
            enable_timing: config.enable_timing,
            events: Arc::new(TracingSink),
        }
    }

    /// Replace the sink that receives timing events.
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Resolve and apply the decision for `req`, then call `next`.
    pub async fn process(&self, mut req: Request<Body>, next: Next) -> Response {
        match self.apply(&mut req).await {
            Ok(_) => next.run(req).await,
            Err(e) => {
                let status = e.status_code();
                tracing::warn!(
                    middleware = %self.name,
                    error = %e,
                    status = status.as_u16(),
                    "Decision lookup failed"
                );
                (status, status.canonical_reason().unwrap_or("Decision lookup failed")).into_response()
            }
        }
    }

    /// Resolve the decision for `req` and mutate it in place.
    ///
    /// Returns whether a rewrite rule was applied. On error the request is
    /// left untouched.
    pub async fn apply<B>(&self, req: &mut Request<B>) -> Result<bool, ResolveError> {
        let start = self.enable_timing.then(Instant::now);

        let effective_url = effective_url(req);
        tracing::debug!(middleware = %self.name, request = %effective_url, "Resolving decision");

        let decision = match self.client.resolve(&effective_url).await {
            Ok(decision) => {
                metrics::record_resolution("ok");
                decision
            }
            Err(e) => {
                metrics::record_resolution(e.kind());
                return Err(e);
            }
        };

        let applied = apply_decision(req, &decision);
        metrics::record_rewrite(applied);

        if let Some(start) = start {
            self.events.emit(Event::timing(&self.name, start.elapsed()));
        }

        Ok(applied)
    }
}

/// Axum middleware entry point, for use with `middleware::from_fn_with_state`.
pub async fn dynamic_headers(
    State(middleware): State<Arc<DynamicHeaders>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    middleware.process(req, next).await
}

/// The `host + path` string sent to the decision service.
///
/// The path is the wire-level (percent-encoded) form. The host comes from the
/// URI authority when present, otherwise from the `Host` header.
pub fn effective_url<B>(req: &Request<B>) -> String {
    let host = req
        .uri()
        .authority()
        .map(|a| a.as_str())
        .or_else(|| req.headers().get(HOST).and_then(|h| h.to_str().ok()))
        .unwrap_or_default();
    format!("{}{}", host, req.uri().path())
}

/// Set headers and run the rewrite engine. Returns whether the path changed.
fn apply_decision<B>(req: &mut Request<B>, decision: &Decision) -> bool {
    for directive in &decision.headers {
        set_header(req, directive);
    }

    let (path, applied) = select_and_rewrite(req.uri().path(), &decision.rewrites);
    if !applied {
        return false;
    }

    match rewrite_uri(req.uri(), &path) {
        Ok(uri) => {
            tracing::debug!(from = %req.uri(), to = %uri, "Request URI rewritten");
            *req.uri_mut() = uri;
            true
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Rewritten path is not a valid request target");
            false
        }
    }
}

fn set_header<B>(req: &mut Request<B>, directive: &HeaderDirective) {
    let name = match HeaderName::from_bytes(directive.name.as_bytes()) {
        Ok(name) => name,
        Err(_) => {
            tracing::warn!(header = %directive.name, "Skipping header with invalid name");
            return;
        }
    };
    // obs-text (bytes >= 0x80) is allowed; control characters are not.
    let value = match HeaderValue::from_bytes(directive.value.as_bytes()) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(header = %directive.name, "Skipping header with invalid value");
            return;
        }
    };

    tracing::debug!(header = %name, value = %directive.value, "Setting header");
    req.headers_mut().insert(name, value);
}

/// Replace the path of `uri`, keeping scheme, authority and query.
fn rewrite_uri(uri: &Uri, decoded_path: &str) -> Result<Uri, axum::http::Error> {
    let path = encode_path(decoded_path);
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::from_str(&path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
