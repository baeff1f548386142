//! Observability setup for AgentForge: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
