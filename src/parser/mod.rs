//! Static signal extraction from script text.
//!
//! This module pulls three independent signal sets out of raw (often
//! minified) JavaScript without parsing it:
//! - Routes: quoted absolute paths
//! - Dependencies: `require(...)` arguments
//! - Tokens: strings shaped like compact signed tokens
//!
//! Extraction is pure and infallible. Malformed candidates are skipped.

pub mod requires;
pub mod routes;
pub mod tokens;

pub use requires::RequireParser;
pub use routes::{is_route, RouteParser};
pub use tokens::{looks_like_token, TokenParser};

use crate::types::Extraction;

/// Runs the route, require and token parsers over one script.
#[derive(Clone, Default)]
pub struct Extractor {
    routes: RouteParser,
    requires: RequireParser,
    tokens: TokenParser,
}

impl Extractor {
    /// Create an extractor with all patterns compiled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every signal set from `script`.
    pub fn extract(&self, script: &str) -> Extraction {
        if script.is_empty() {
            return Extraction::default();
        }

        Extraction {
            routes: self.routes.extract(script),
            dependencies: self.requires.extract(script),
            tokens: self.tokens.extract(script),
        }
    }
}

/// One-shot extraction with a freshly compiled [`Extractor`].
pub fn extract(script: &str) -> Extraction {
    Extractor::new().extract(script)
}
