//! Shared utilities for georisk
//!
//! Tracing setup shared by the CLI, the engine examples and tests.

pub mod logging;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
