//! Typed observability events.
//!
//! Components report noteworthy facts as an [`Event`] (a name plus key/value
//! attributes) through an [`EventSink`]. The middleware never inspects what a
//! sink does with an event.

use std::time::Duration;

use crate::observability::metrics;

/// Event name for per-request timing.
pub const DECISION_TIMING: &str = "decision.timing";

/// A named event with ordered key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
}

impl Event {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.attributes.push((key, value.to_string()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Timing event for one processed request.
    pub fn timing(middleware: &str, elapsed: Duration) -> Self {
        Self::new(DECISION_TIMING)
            .with("middleware", middleware)
            .with("elapsed_us", elapsed.as_micros())
    }
}

/// Destination for events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Default sink: logs the event and feeds timing into the metrics histogram.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        if event.name == DECISION_TIMING {
            let middleware = event.attribute("middleware").unwrap_or_default();
            let elapsed_us = event.attribute("elapsed_us").and_then(|v| v.parse::<u64>().ok());
            if let Some(us) = elapsed_us {
                metrics::record_duration(middleware, Duration::from_micros(us));
            }
            tracing::info!(event = DECISION_TIMING, middleware, elapsed_us, "Request timing");
            return;
        }

        // Attribute keys are only known at runtime, so they travel as one field.
        let attributes = event
            .attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(event = event.name, %attributes, "Observability event");
    }
}
