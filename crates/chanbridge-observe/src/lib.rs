//! Observability setup for chanbridge: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
