//! Utility functions and helpers
//!
//! Platform paths and the logging setup shared by the binary and the log panel.

pub mod app_paths;
pub mod dual_logging;
pub mod logging;
