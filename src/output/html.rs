//! Self-contained HTML report using Tera templates.

use crate::types::Report;
use crate::types::Result;
use std::path::Path;
use tera::{Context, Tera};
use tracing::info;

const TEMPLATE_NAME: &str = "report.html";

/// Render the report to an HTML document.
///
/// The page has a summary row of four counts and a selector with an "All"
/// view plus one view per script; each view lists routes, dependencies and
/// tokens.
pub fn render(report: &Report) -> Result<String> {
    let mut tera = Tera::default();
    tera.set_escape_fn(escape_markup);
    tera.add_raw_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;

    let mut context = Context::new();
    context.insert("domain", &report.domain);
    context.insert("files", &report.files);
    context.insert("file_count", &report.files.len());
    context.insert("total_routes", &report.total_routes);
    context.insert("total_deps", &report.total_deps);
    context.insert("total_tokens", &report.total_tokens);
    context.insert("all_routes", &report.all_routes);
    context.insert("all_dependencies", &report.all_dependencies);
    context.insert("all_tokens", &report.all_tokens);
    context.insert("version", env!("CARGO_PKG_VERSION"));

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Escape markup-significant characters, leaving `/` readable in URLs and routes.
fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render and write the report.
///
/// The document is written to a sibling temp file and renamed into place, so
/// `output_path` either holds a complete report or is left untouched.
pub fn write(report: &Report, output_path: &Path) -> Result<()> {
    let rendered = render(report)?;

    let mut tmp_name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = output_path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, rendered)?;
    if let Err(e) = std::fs::rename(&tmp_path, output_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!("HTML report saved to {}", output_path.display());
    Ok(())
}

const REPORT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>jsrecon - {{ domain }}</title>
    <style>
        * { box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f1f5f9; color: #1e293b; margin: 0; }
        .container { max-width: 1100px; margin: 0 auto; padding: 24px; }
        .card { background: white; border-radius: 10px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); padding: 24px; }
        h1 { font-size: 1.5em; margin: 0 0 20px; word-break: break-all; }
        table.summary { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
        table.summary th, table.summary td { text-align: left; padding: 8px 12px; border-bottom: 1px solid #e2e8f0; }
        table.summary td { font-size: 1.4em; font-weight: 700; }
        select { width: 100%; padding: 8px; font-size: 1em; }
        .details-container { margin-top: 16px; max-height: 480px; overflow-y: auto; }
        .script-details h2 { font-size: 1.1em; word-break: break-all; }
        .script-details h3 { font-size: 0.95em; text-transform: uppercase; letter-spacing: 1px; color: #64748b; }
        .script-details ul { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: 0.9em; word-break: break-all; }
        .footer { text-align: center; color: #94a3b8; font-size: 0.8em; margin-top: 16px; }
    </style>
    <script>
        function showScriptDetails(index) {
            var details = document.getElementsByClassName("script-details");
            for (var i = 0; i < details.length; i++) {
                details[i].style.display = (index === "all" ? i === 0 : i === parseInt(index, 10)) ? "block" : "none";
            }
        }
    </script>
</head>
<body>
<div class="container">
    <div class="card">
        <h1>Domain: {{ domain }}</h1>
        <table class="summary">
            <thead>
                <tr><th>Total JS Files</th><th>Total Routes</th><th>Total Dependencies</th><th>Total Tokens</th></tr>
            </thead>
            <tbody>
                <tr><td>{{ file_count }}</td><td>{{ total_routes }}</td><td>{{ total_deps }}</td><td>{{ total_tokens }}</td></tr>
            </tbody>
        </table>
        <label for="script-selector">Select a JS file:</label>
        <select id="script-selector" onchange="showScriptDetails(this.value)">
            <option value="all">All</option>
            {%- for file in files %}
            <option value="{{ loop.index }}">{{ file.url }}</option>
            {%- endfor %}
        </select>
        <div class="details-container">
            <div class="script-details" style="display: block;">
                <h2>All JS Files</h2>
                <h3>Routes:</h3>
                <ul>{% for item in all_routes %}<li>{{ item }}</li>{% endfor %}</ul>
                <h3>Dependencies:</h3>
                <ul>{% for item in all_dependencies %}<li>{{ item }}</li>{% endfor %}</ul>
                <h3>Tokens:</h3>
                <ul>{% for item in all_tokens %}<li>{{ item }}</li>{% endfor %}</ul>
            </div>
            {%- for file in files %}
            <div class="script-details" style="display: none;">
                <h2>JS: {{ file.url }}</h2>
                <h3>Routes:</h3>
                <ul>{% for item in file.routes %}<li>{{ item }}</li>{% endfor %}</ul>
                <h3>Dependencies:</h3>
                <ul>{% for item in file.dependencies %}<li>{{ item }}</li>{% endfor %}</ul>
                <h3>Tokens:</h3>
                <ul>{% for item in file.tokens %}<li>{{ item }}</li>{% endfor %}</ul>
            </div>
            {%- endfor %}
        </div>
    </div>
    <div class="footer">Generated by jsrecon v{{ version }}. Tokens are shape-checked only and were not verified.</div>
</div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScriptRecord;

    fn sample_report() -> Report {
        let files = vec![
            ScriptRecord {
                url: "https://example.com/app.js".to_string(),
                routes: vec!["/api/login".to_string()],
                dependencies: vec!["lodash".to_string()],
                tokens: vec![],
            },
            ScriptRecord {
                url: "https://example.com/vendor.js".to_string(),
                routes: vec!["/api/items".to_string()],
                dependencies: vec![],
                tokens: vec![],
            },
        ];
        Report {
            domain: "https://example.com".to_string(),
            total_routes: 2,
            total_deps: 1,
            total_tokens: 0,
            all_routes: vec!["/api/login".to_string(), "/api/items".to_string()],
            all_dependencies: vec!["lodash".to_string()],
            all_tokens: vec![],
            files,
        }
    }

    #[test]
    fn test_render_summary_and_views() {
        let html = render(&sample_report()).unwrap();

        assert!(html.contains("Domain: https://example.com"));
        assert!(html.contains("<td>2</td><td>2</td><td>1</td><td>0</td>"));
        assert!(html.contains(r#"<option value="all">All</option>"#));
        assert!(html.contains(r#"<option value="1">https://example.com/app.js</option>"#));
        assert!(html.contains(r#"<option value="2">https://example.com/vendor.js</option>"#));
        assert!(html.contains("<li>/api/login</li>"));
        assert!(html.contains("<li>lodash</li>"));
        // "All" view plus one view per file
        assert_eq!(html.matches(r#"class="script-details""#).count(), 3);
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("/api/v1"), "/api/v1");
        assert_eq!(escape_markup("<b>\"x\"&'y'"), "&lt;b&gt;&quot;x&quot;&amp;&#x27;y&#x27;");
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write(&sample_report(), &path).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("report.html.tmp").exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("All JS Files"));
    }
}
