//! # Middleware
//!
//! Tower middleware for the atlas service. Request tracing comes from
//! `tower_http::trace::TraceLayer`; request and render counters live in
//! [`metrics`].

pub mod metrics;
