//! Lookup Host: map-style adapters, fixture-backed services and process
//! setup for the `lookup` binary.

pub mod config;
pub mod fixtures;
pub mod host_map;
pub mod render;
pub mod session;
pub mod telemetry;

pub use config::{HostConfig, LogFormat};
pub use fixtures::{FixtureError, Fixtures, InMemoryDirectory, InMemoryValueMapping};
pub use host_map::{HostAdapter, HostMap, HostValue};
pub use render::{key_from_tokens, render};
pub use session::Session;
pub use telemetry::init_tracing;
