//! JSON serialization of the report.

use crate::types::{Report, Result};

/// Pretty-printed JSON for `--json`.
pub fn to_string(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
