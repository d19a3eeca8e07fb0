//! jsrecon - JavaScript reconnaissance for a single web page.
//!
//! This library renders a page in headless Chrome and then:
//! - Locates the scripts it references
//! - Fetches them with bounded concurrency
//! - Extracts path-like routes, `require(...)` dependencies and token-shaped strings
//! - Aggregates everything into a report rendered as HTML or JSON
//!
//! Tokens are only checked for shape. A reported token was never verified.
//!
//! # Example
//!
//! ```no_run
//! use jsrecon::config::ScanConfig;
//! use jsrecon::scanner::Scanner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scanner = Scanner::from_config(&ScanConfig::default()).unwrap();
//!     let report = scanner.scan("https://example.com").await.unwrap();
//!     println!("Found {} routes in {} scripts", report.total_routes, report.files.len());
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod types;

pub mod browser;

pub use aggregate::aggregate;
pub use config::{Commands, Config, ScanConfig, SetupConfig};
pub use parser::{extract, Extractor};
pub use scanner::{ScanOptions, Scanner};
pub use types::{Extraction, FetchedScript, HttpConfig, ReconError, Report, Result, ScriptRecord};
