//! Merges per-script records into a domain-wide [`Report`].

use crate::types::{Report, Result, ScriptRecord};
use tracing::debug;

/// Build a report from per-file results in processing order.
///
/// Totals are plain sums and the pooled lists are concatenations, so nothing
/// is deduplicated across files. The first failed result fails the whole
/// aggregation; no partial report is returned.
pub fn aggregate<I>(domain: &str, results: I) -> Result<Report>
where
    I: IntoIterator<Item = Result<ScriptRecord>>,
{
    let mut report = Report {
        domain: domain.to_string(),
        ..Report::default()
    };

    for result in results {
        let record = result?;

        report.total_routes += record.routes.len();
        report.total_deps += record.dependencies.len();
        report.total_tokens += record.tokens.len();
        report.all_routes.extend(record.routes.iter().cloned());
        report.all_dependencies.extend(record.dependencies.iter().cloned());
        report.all_tokens.extend(record.tokens.iter().cloned());
        report.files.push(record);
    }

    debug!(
        "Aggregated {} files: {} routes, {} dependencies, {} tokens",
        report.files.len(),
        report.total_routes,
        report.total_deps,
        report.total_tokens
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReconError;

    fn record(url: &str, routes: &[&str], deps: &[&str], tokens: &[&str]) -> ScriptRecord {
        ScriptRecord {
            url: url.to_string(),
            routes: routes.iter().map(|s| s.to_string()).collect(),
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_totals_and_pooled_lists() {
        let files = vec![
            Ok(record("https://a/1.js", &["/a", "/b"], &["x"], &[])),
            Ok(record("https://a/2.js", &["/a"], &[], &["t.u.v"])),
            Ok(record("https://a/3.js", &[], &["x", "y"], &[])),
        ];

        let report = aggregate("https://a", files).unwrap();

        assert_eq!(report.domain, "https://a");
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.total_routes, 3);
        assert_eq!(report.total_deps, 3);
        assert_eq!(report.total_tokens, 1);
        assert_eq!(report.all_routes, vec!["/a", "/b", "/a"]);
        assert_eq!(report.all_dependencies, vec!["x", "x", "y"]);
        assert_eq!(report.all_tokens, vec!["t.u.v"]);
    }

    #[test]
    fn test_pooled_lists_match_files() {
        let files = vec![
            Ok(record("https://a/1.js", &["/one"], &["d1"], &[])),
            Ok(record("https://a/2.js", &["/two", "/three"], &[], &[])),
        ];
        let report = aggregate("https://a", files).unwrap();

        let concat: Vec<String> = report.files.iter().flat_map(|f| f.routes.clone()).collect();
        assert_eq!(report.all_routes, concat);
        assert_eq!(report.total_routes, report.all_routes.len());
        assert_eq!(
            report.total_routes,
            report.files.iter().map(|f| f.routes.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_file_order_preserved() {
        let files = vec![
            Ok(record("https://a/c.js", &[], &[], &[])),
            Ok(record("https://a/a.js", &[], &[], &[])),
            Ok(record("https://a/b.js", &[], &[], &[])),
        ];
        let report = aggregate("https://a", files).unwrap();
        let urls: Vec<&str> = report.files.iter().map(|f| f.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a/c.js", "https://a/a.js", "https://a/b.js"]);
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate("https://a", Vec::<Result<ScriptRecord>>::new()).unwrap();
        assert!(report.files.is_empty());
        assert_eq!(report.total_routes + report.total_deps + report.total_tokens, 0);
    }

    #[test]
    fn test_any_failure_fails_aggregation() {
        let files = vec![
            Ok(record("https://a/1.js", &["/a"], &[], &[])),
            Err(ReconError::ScriptFetch {
                url: "https://a/2.js".to_string(),
                reason: "connection reset".to_string(),
            }),
            Ok(record("https://a/3.js", &["/c"], &[], &[])),
        ];

        match aggregate("https://a", files) {
            Err(ReconError::ScriptFetch { url, .. }) => assert_eq!(url, "https://a/2.js"),
            other => panic!("expected ScriptFetch error, got {:?}", other),
        }
    }
}
