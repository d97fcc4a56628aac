//! Shared utilities for the quadratic voting tools.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat};
