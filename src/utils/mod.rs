//! Shared helpers for output, logging and progress

pub mod json;
pub mod logging;

pub use json::write_json_report;
pub use logging::{log_stage_output, log_stage_start, log_step_timing, log_warning};
