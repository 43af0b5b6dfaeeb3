//! Observability setup for Chatkeep.
//!
//! - `tracing_setup`: global subscriber with text or JSON output and optional
//!   OpenTelemetry span export

pub mod tracing_setup;
