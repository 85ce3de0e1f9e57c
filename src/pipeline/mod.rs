//! Stage orchestration
//!
//! Runs metrics, lowest-price and top-quantity stages in sequence. The
//! lowest-price stage reads the metrics report the first stage wrote.

pub mod metrics;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::error::util::validate_directory;
use crate::models::{ChainPriceReport, QuantityReport};
use crate::report::{calculate_lowest_avg_prices, calculate_top_prescribed_quantities};

pub use metrics::{
    ClaimsFileReport, ClaimsStats, MetricsRun, ReferenceData, calculate_metrics, compute_metrics,
    process_claims_file,
};

/// Everything one pipeline invocation produced
#[derive(Debug)]
pub struct PipelineSummary {
    pub metrics: MetricsRun,
    pub lowest_prices: Vec<ChainPriceReport>,
    pub top_quantities: Vec<QuantityReport>,
}

/// Check the three input directories before any processing starts
pub fn validate_inputs(config: &PipelineConfig) -> Result<()> {
    validate_directory(&config.claims_dir, "claims")?;
    validate_directory(&config.reverts_dir, "reverts")?;
    validate_directory(&config.pharmacies_dir, "pharmacies")?;
    Ok(())
}

/// Run all three stages
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    validate_inputs(config)?;

    let metrics = calculate_metrics(config)?;
    let lowest_prices = calculate_lowest_avg_prices(
        &config.metrics_path(),
        &config.pharmacies_dir,
        config.chain_top_n,
        &config.lowest_price_path(),
    )?;
    let top_quantities = calculate_top_prescribed_quantities(config)?;

    Ok(PipelineSummary {
        metrics,
        lowest_prices,
        top_quantities,
    })
}
