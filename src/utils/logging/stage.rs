//! Stage logging
//!
//! Standardized messages for pipeline stages.

use std::path::Path;
use std::time::Duration;

/// Log the start of a stage over an input directory
///
/// # Arguments
/// * `stage` - Name of the stage
/// * `path` - Directory the stage reads from
pub fn log_stage_start(stage: &str, path: &Path) {
    log::info!("{stage}: reading {}", path.display());
}

/// Log a timed step of a stage, in seconds rounded to four places
///
/// # Arguments
/// * `stage` - Name of the stage
/// * `step` - What was done
/// * `elapsed` - How long it took
pub fn log_step_timing(stage: &str, step: &str, elapsed: Duration) {
    log::info!("{stage}: {step} done in {:.4} sec", elapsed.as_secs_f64());
}

/// Log where a stage wrote its output
///
/// # Arguments
/// * `stage` - Name of the stage
/// * `rows` - Number of rows written
/// * `path` - Output file
pub fn log_stage_output(stage: &str, rows: usize, path: &Path) {
    log::info!("{stage}: wrote {rows} rows to {}", path.display());
}

/// Log a recoverable problem with consistent format
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
