//! Report output.
//!
//! This module handles:
//! - Colored console output and fetch progress
//! - The self-contained HTML report
//! - JSON output formatting

pub mod console;
pub mod html;
pub mod json;

pub use console::ConsoleOutput;
