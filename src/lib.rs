//! A Rust library for aggregating prescription claim metrics across many
//! claim files in parallel, with pharmacy chain price and quantity reports.

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod join;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod utils;
pub mod validation;

// Re-export the most common types for easier use
// Core types
pub use config::{FailurePolicy, FillsCounting, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{
    ChainPriceReport, ClaimRecord, MetricRow, PharmacyRecord, QuantityReport, RevertRecord,
};

// Stages
pub use pipeline::{PipelineSummary, calculate_metrics, run_pipeline};
pub use report::{calculate_lowest_avg_prices, calculate_top_prescribed_quantities};
