//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace/timeout/request-id layers)
//!     → request.rs (request ID)
//!     → middleware/dynamic_headers.rs (decision lookup, headers, rewrite)
//!     → server.rs forward handler (send to upstream)
//!     → Send response to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{dynamic_headers, DynamicHeaders};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
