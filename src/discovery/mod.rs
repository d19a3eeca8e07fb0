//! Script discovery and retrieval.
//!
//! This module handles:
//! - Rendering the target page (headless Chrome)
//! - Locating `<script src>` references in the rendered markup
//! - Fetching each script over HTTP

pub mod locator;
pub mod page_renderer;
pub mod script_fetcher;

pub use locator::{locate, resolve_script_src, validate_domain, ScriptLocator};
pub use page_renderer::{BrowserOptions, BrowserSession, ChromePageFetcher, PageFetcher, StaticPage};
pub use script_fetcher::{absolute_script_url, ResourceFetcher, ScriptFetcher};
