//! Decision-driven header injection and path rewriting middleware.
//!
//! For every request the middleware asks a remote decision service which
//! headers to set and which rewrite rule to apply, mutates the request, and
//! hands it to the next handler.

pub mod config;
pub mod decision;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;

pub use config::schema::ProxyConfig;
pub use decision::{Decision, DecisionClient, ResolveError};
pub use http::{dynamic_headers, DynamicHeaders, HttpServer};
pub use lifecycle::Shutdown;
