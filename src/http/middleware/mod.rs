//! Request middleware.

pub mod dynamic_headers;

pub use dynamic_headers::{dynamic_headers, effective_url, DynamicHeaders};
