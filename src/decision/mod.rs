//! Remote decision subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (host, path)
//!     → client.rs (POST {"request": "<host><path>"} to the decision endpoint)
//!     → model.rs (decode {"payload": {"headers": [...], "rewrites": [...]}})
//!     → Decision handed to the middleware for one request
//!
//! Failures:
//!     → error.rs (ResolveError, mapped to a terminal status code)
//! ```
//!
//! # Design Decisions
//! - One call per request, no caching, no retries
//! - The HTTP client is built once and shared by every in-flight request
//! - The wire schema is open: unknown fields are ignored

pub mod client;
pub mod error;
pub mod model;

pub use client::{DecisionClient, DECISION_TIMEOUT};
pub use error::ResolveError;
pub use model::{Decision, HeaderDirective, RewriteRule};
