//! Candidate tokens: quoted strings shaped like a compact signed token
//! (`header.payload.signature`).
//!
//! A kept token has passed a structural decode only. No key is ever available,
//! so nothing here says the token is authentic.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use tracing::trace;

/// base64url that accepts padded or unpadded input and non-zero trailing bits.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Finds token-shaped string literals and keeps the structurally valid ones.
#[derive(Clone)]
pub struct TokenParser {
    candidate_pattern: Regex,
}

impl TokenParser {
    /// Create a new token parser.
    pub fn new() -> Self {
        Self {
            // Two base64url segments, then an optional dot and a tail that may carry `+` and `/`.
            candidate_pattern: Regex::new(
                r#"["']([A-Za-z0-9_=-]+\.[A-Za-z0-9_=-]+\.?[A-Za-z0-9_+=/-]*)["']"#,
            )
            .unwrap(),
        }
    }

    /// Extract tokens in source order, duplicates kept.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for cap in self.candidate_pattern.captures_iter(content) {
            if let Some(candidate) = cap.get(1) {
                let candidate = candidate.as_str();
                if looks_like_token(candidate) {
                    tokens.push(candidate.to_string());
                } else {
                    trace!("Rejected token candidate: {}", candidate);
                }
            }
        }

        tokens
    }
}

impl Default for TokenParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural check for a compact signed token.
///
/// Requires exactly three non-empty dot-separated segments where the first
/// two each decode (base64url, padding optional) to a JSON object. The third
/// segment is never inspected.
pub fn looks_like_token(candidate: &str) -> bool {
    let segments: Vec<&str> = candidate.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return false;
    }

    decode_json_object(segments[0]).is_some() && decode_json_object(segments[1]).is_some()
}

/// Decode one segment into a JSON object.
fn decode_json_object(segment: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let bytes = LENIENT_URL_SAFE.decode(segment).ok()?;

    match serde_json::from_slice::<serde_json::Value>(&bytes).ok()? {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
