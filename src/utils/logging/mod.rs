//! Utilities for logging and progress tracking

pub mod progress;
pub mod stage;

pub use progress::{create_main_progress_bar, finish_progress_bar};
pub use stage::{log_stage_output, log_stage_start, log_step_timing, log_warning};
