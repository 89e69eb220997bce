//! Shared common utilities for Brioche Datalog tools.

pub mod args;
pub mod formatter;

// Re-export main types for convenient access
pub use args::{get_demo_files, Args};
pub use formatter::{AllResultsFormatter, FailurePhase};
