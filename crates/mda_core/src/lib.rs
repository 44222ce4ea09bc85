//! MDA Core - Backend logic for MD Analyzer
//!
//! This crate contains all business logic with zero UI dependencies:
//! input discovery and parsing, system construction, the analysis
//! kernels, the session cache, and chart-spec construction. It can be
//! used by the dashboard application or a CLI tool.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod io;
pub mod logging;
pub mod models;
pub mod session;
pub mod system;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
