//! Logging setup
//!
//! Installs the global `tracing` subscriber with an env filter and either
//! human-readable or JSON output on stderr.

mod subscriber;

pub use subscriber::{TelemetryError, init_telemetry};
