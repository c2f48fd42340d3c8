//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!     → events.rs (typed events, e.g. per-request timing)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log lines via the trace span
//! - Metric updates are no-ops until a recorder is installed
//! - Events are decoupled from control flow behind a trait

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{Event, EventSink, TracingSink};
