//! Metrics report reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::models::MetricRow;

/// Read a metrics report written by the metrics stage
pub fn read_metrics(path: &Path) -> Result<Vec<MetricRow>> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| PipelineError::json(path, e))
}
