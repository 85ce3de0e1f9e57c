//! Record readers for the three input sources and the metrics report
//!
//! Every reader takes a directory (or a single file) and returns typed,
//! in-memory records. Directories are read in file-name order.

pub mod claims;
pub mod metrics;
pub mod pharmacy;
pub mod revert;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{PipelineError, Result};

pub use claims::read_claims_file;
pub use metrics::read_metrics;
pub use pharmacy::read_pharmacies;
pub use revert::read_reverts;

/// Read a file holding a single JSON array and return its elements
pub(crate) fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    match serde_json::from_slice::<Value>(&bytes).map_err(|e| PipelineError::json(path, e))? {
        Value::Array(items) => Ok(items),
        other => Err(PipelineError::malformed(
            path,
            format!("expected a JSON array, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
