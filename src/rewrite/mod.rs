//! Path rewrite engine.
//!
//! # Data Flow
//! ```text
//! Request path (wire form) + RewriteRule[]
//!     → engine.rs (stable sort by weight, compile, first match wins)
//!     → template.rs ({name} placeholders → named group references)
//!     → path.rs (strict percent-decoding of the rewritten path)
//!     → (new path, applied)
//! ```
//!
//! # Design Decisions
//! - At most one rule is applied per request
//! - Equal weights keep the order the service sent them in
//! - A bad pattern or undecodable result skips that rule only
//! - Patterns are compiled per request; nothing is cached

pub mod engine;
pub mod path;
pub mod template;

use thiserror::Error;

pub use engine::select_and_rewrite;

/// Per-rule failures. Never terminal for the request.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid rewrite pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rewritten path '{0}' is not a valid percent-encoded path")]
    PathDecode(String),
}
