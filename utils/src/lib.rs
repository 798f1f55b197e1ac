//! Shared utilities for stakeview.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
