//! Core types and errors for the reconnaissance pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can abort a run.
///
/// There is no extraction error: the extractor skips malformed candidates
/// instead of failing a file.
#[derive(Error, Debug)]
pub enum ReconError {
    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("failed to render page {url}: {reason}")]
    PageFetch { url: String, reason: String },

    #[error("failed to fetch script {url}: {reason}")]
    ScriptFetch { url: String, reason: String },

    #[error("script {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("run timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;

/// Signals pulled out of a single script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Quoted absolute paths, first-seen order, duplicates kept.
    pub routes: Vec<String>,
    /// `require(...)` arguments, verbatim.
    pub dependencies: Vec<String>,
    /// Strings shaped like compact signed tokens. Never verified.
    pub tokens: Vec<String>,
}

/// Analysis result for one successfully fetched script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    /// Absolute URL the script was fetched from.
    pub url: String,
    pub routes: Vec<String>,
    pub dependencies: Vec<String>,
    pub tokens: Vec<String>,
}

impl ScriptRecord {
    pub fn new(url: impl Into<String>, extraction: Extraction) -> Self {
        let Extraction {
            routes,
            dependencies,
            tokens,
        } = extraction;

        Self {
            url: url.into(),
            routes,
            dependencies,
            tokens,
        }
    }
}

/// Domain-wide report built by [`crate::aggregate::aggregate`].
///
/// `total_*` always equals the length of the matching `all_*` list, and each
/// `all_*` list is the concatenation of the per-file lists in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub domain: String,
    pub files: Vec<ScriptRecord>,
    pub total_routes: usize,
    pub total_deps: usize,
    pub total_tokens: usize,
    pub all_routes: Vec<String>,
    pub all_dependencies: Vec<String>,
    pub all_tokens: Vec<String>,
}

/// Raw response from the resource fetcher.
#[derive(Debug, Clone)]
pub struct FetchedScript {
    /// URL that was requested.
    pub url: String,
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
}

impl FetchedScript {
    /// Decode the body as text. Invalid UTF-8 is replaced, never rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 0,
            user_agent: "Mozilla/5.0 (compatible; jsrecon/0.1)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_record_from_extraction() {
        let extraction = Extraction {
            routes: vec!["/api".to_string()],
            dependencies: vec!["lodash".to_string()],
            tokens: vec![],
        };

        let record = ScriptRecord::new("https://example.com/app.js", extraction);
        assert_eq!(record.url, "https://example.com/app.js");
        assert_eq!(record.routes, vec!["/api"]);
        assert_eq!(record.dependencies, vec!["lodash"]);
        assert!(record.tokens.is_empty());
    }

    #[test]
    fn test_fetched_script_lossy_text() {
        let fetched = FetchedScript {
            url: "https://example.com/bin.js".to_string(),
            bytes: vec![0xff, b'o', b'k'],
            content_type: None,
        };
        assert_eq!(fetched.text(), "\u{fffd}ok");
    }

    #[test]
    fn test_error_messages_name_the_url() {
        let err = ReconError::ScriptFetch {
            url: "https://example.com/b.js".to_string(),
            reason: "operation timed out".to_string(),
        };
        assert!(err.to_string().contains("https://example.com/b.js"));
    }
}
