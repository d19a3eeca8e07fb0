//! Route candidates: quoted absolute paths such as `"/api/v1/users"`.

use regex::Regex;
use tracing::trace;

/// Finds quoted string literals that look like endpoint paths.
#[derive(Clone)]
pub struct RouteParser {
    literal_pattern: Regex,
}

impl RouteParser {
    /// Create a new route parser.
    pub fn new() -> Self {
        Self {
            // Either quote may open or close; the body stops at the first quote or whitespace.
            literal_pattern: Regex::new(r#"["'](/[^"'\s]+)["']"#).unwrap(),
        }
    }

    /// Extract accepted routes in first-seen order, duplicates kept.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut routes = Vec::new();

        for cap in self.literal_pattern.captures_iter(content) {
            if let Some(candidate) = cap.get(1) {
                let candidate = candidate.as_str();
                if is_route(candidate) {
                    routes.push(candidate.to_string());
                } else {
                    trace!("Rejected route candidate: {}", candidate);
                }
            }
        }

        routes
    }
}

impl Default for RouteParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A route is `/` followed by one or more of `[A-Za-z0-9_/-]`.
pub fn is_route(candidate: &str) -> bool {
    match candidate.strip_prefix('/') {
        Some(rest) if !rest.is_empty() => rest
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'/' || b == b'-'),
        _ => false,
    }
}
