//! Run-export JSON parser.
//!
//! The host pipeline engine exports the executed run graph as a JSON array
//! of step records. A record that lacks a required key (label, summary)
//! aborts the whole deposition attempt: no partial graph is ever produced.

use std::path::Path;

use super::types::RunGraph;
use crate::error::{Error, Result};

/// Parse a run graph from a JSON string.
pub fn parse_run_graph(json: &str) -> Result<RunGraph> {
    if json.trim().is_empty() {
        return Err(Error::Parse("Empty run export".to_string()));
    }

    let graph: RunGraph = serde_json::from_str(json).map_err(|e| {
        let msg = e.to_string();
        if let Some(field) = extract_missing_field(&msg) {
            Error::Parse(format!("Step record is missing required key: {}", field))
        } else {
            Error::Parse(format!("Invalid run export: {}", msg))
        }
    })?;
    Ok(graph)
}

/// Parse a run graph from a file path.
pub fn parse_run_graph_file(path: &Path) -> Result<RunGraph> {
    let content = std::fs::read_to_string(path)?;
    parse_run_graph(&content)
}

fn extract_missing_field(error_message: &str) -> Option<&str> {
    let marker = "missing field `";
    let start = error_message.find(marker)? + marker.len();
    let rest = &error_message[start..];
    let end = rest.find('`')?;
    Some(&rest[..end])
}
