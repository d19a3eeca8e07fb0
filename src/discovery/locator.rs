//! Script discovery: find `<script src>` references in rendered markup.

use crate::types::{ReconError, Result};
use regex::Regex;
use tracing::{debug, trace};
use url::Url;

/// Locates script sources in page markup and resolves them against a domain.
#[derive(Clone)]
pub struct ScriptLocator {
    script_pattern: Regex,
}

impl ScriptLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self {
            // Loose: attributes may sit on either side of src.
            script_pattern: Regex::new(r#"<script.*?src="(.*?)".*?></script>"#).unwrap(),
        }
    }

    /// Return every script source in markup order.
    ///
    /// Sources starting with `http` or `//` are kept as-is; anything else is
    /// appended to `base_domain` without normalization. Duplicates are kept.
    pub fn locate(&self, markup: &str, base_domain: &str) -> Vec<String> {
        let mut scripts = Vec::new();

        for cap in self.script_pattern.captures_iter(markup) {
            if let Some(src) = cap.get(1) {
                let resolved = resolve_script_src(base_domain, src.as_str());
                trace!("Script reference {} -> {}", src.as_str(), resolved);
                scripts.push(resolved);
            }
        }

        debug!("Located {} script references", scripts.len());
        scripts
    }
}

impl Default for ScriptLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot script discovery with a freshly compiled [`ScriptLocator`].
pub fn locate(markup: &str, base_domain: &str) -> Vec<String> {
    ScriptLocator::new().locate(markup, base_domain)
}

/// Resolve one `src` value against the domain.
pub fn resolve_script_src(base_domain: &str, src: &str) -> String {
    if src.starts_with("http") || src.starts_with("//") {
        src.to_string()
    } else {
        format!("{}{}", base_domain, src)
    }
}

/// Check that the run's domain is an absolute `http`/`https` URL.
pub fn validate_domain(domain: &str) -> Result<Url> {
    let invalid = |reason: String| ReconError::InvalidDomain {
        domain: domain.to_string(),
        reason,
    };

    let url = Url::parse(domain).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_src_joined_to_domain() {
        let markup = r#"<html><body><script src="/app.js"></script></body></html>"#;
        assert_eq!(
            locate(markup, "https://example.com"),
            vec!["https://example.com/app.js"]
        );
    }

    #[test]
    fn test_absolute_and_protocol_relative_kept() {
        let markup = r#"
            <script src="https://cdn.example.net/lib.js"></script>
            <script src="http://plain.example.net/x.js"></script>
            <script src="//cdn.example.net/y.js"></script>
        "#;
        assert_eq!(
            locate(markup, "https://example.com"),
            vec![
                "https://cdn.example.net/lib.js",
                "http://plain.example.net/x.js",
                "//cdn.example.net/y.js",
            ]
        );
    }

    #[test]
    fn test_no_normalization_or_dedup() {
        let markup = r#"<script src="js/a.js"></script><script src="js/a.js"></script>"#;
        assert_eq!(
            locate(markup, "https://example.com/"),
            vec!["https://example.com/js/a.js", "https://example.com/js/a.js"]
        );
    }

    #[test]
    fn test_attributes_around_src() {
        let markup = r#"<script type="module" src="/m.js" defer crossorigin></script>"#;
        assert_eq!(locate(markup, "https://example.com"), vec!["https://example.com/m.js"]);
    }

    #[test]
    fn test_inline_and_missing_scripts() {
        assert!(locate("<script>var a = 1;</script>", "https://example.com").is_empty());
        assert!(locate("", "https://example.com").is_empty());
        assert!(locate("<div>no scripts</div>", "https://example.com").is_empty());
    }

    #[test]
    fn test_validate_domain() {
        assert!(validate_domain("https://example.com").is_ok());
        assert!(validate_domain("http://localhost:8080").is_ok());
        assert!(matches!(
            validate_domain("example.com"),
            Err(ReconError::InvalidDomain { .. })
        ));
        assert!(matches!(
            validate_domain("ftp://example.com"),
            Err(ReconError::InvalidDomain { .. })
        ));
        assert!(matches!(
            validate_domain("javascript:alert(1)"),
            Err(ReconError::InvalidDomain { .. })
        ));
    }
}
