//! Dependency identifiers from CommonJS `require("...")` calls.

use regex::Regex;

/// Captures the quoted argument of every `require(...)` call verbatim.
///
/// Relative paths and package names are kept alike; nothing is resolved or
/// normalized.
#[derive(Clone)]
pub struct RequireParser {
    require_pattern: Regex,
}

impl RequireParser {
    /// Create a new require parser.
    pub fn new() -> Self {
        Self {
            require_pattern: Regex::new(r#"require\(["']([^"']+)["']\)"#).unwrap(),
        }
    }

    /// Extract module identifiers in source order, duplicates kept.
    pub fn extract(&self, content: &str) -> Vec<String> {
        self.require_pattern
            .captures_iter(content)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for RequireParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_preserved() {
        let parser = RequireParser::new();
        assert_eq!(parser.extract(r#"require("a"); require('a');"#), vec!["a", "a"]);
    }

    #[test]
    fn test_identifiers_verbatim() {
        let parser = RequireParser::new();
        let content = r#"
            var x = require("./local/file.js");
            var y = require('@scope/pkg/sub');
            var z = require("node:fs");
        "#;
        assert_eq!(
            parser.extract(content),
            vec!["./local/file.js", "@scope/pkg/sub", "node:fs"]
        );
    }

    #[test]
    fn test_non_literal_arguments_skipped() {
        let parser = RequireParser::new();
        assert!(parser.extract("require(name); require(); require('')").is_empty());
    }

    #[test]
    fn test_minified_bundle() {
        let parser = RequireParser::new();
        let content = r#"!function(){var e=require("react"),t=require("react-dom");e.x(t)}();"#;
        assert_eq!(parser.extract(content), vec!["react", "react-dom"]);
    }
}
