//! Cheapest pharmacy chains per drug

use std::path::Path;
use std::time::Instant;

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::models::{ChainPrice, ChainPriceReport, MetricRow, PharmacyRecord};
use crate::reader::{read_metrics, read_pharmacies};
use crate::utils::{log_stage_output, log_step_timing, write_json_report};

const STAGE: &str = "Lowest price";

struct Candidate<'a> {
    ndc: &'a str,
    name: &'a str,
    avg_price: f64,
}

/// Normalized bit pattern used to compare prices for equality
fn price_bits(price: f64) -> u64 {
    // folds -0.0 into 0.0
    (price + 0.0).to_bits()
}

/// Rank chains by average price for every drug
///
/// Each metric row is paired with every chain its pharmacy belongs to. Rows
/// with the same drug and the same average price collapse to the first one,
/// even when they come from different chains. Per drug the `top_n` cheapest
/// remain, ties keeping their metric row order. Rows with an undefined
/// average price are never ranked.
#[must_use]
pub fn lowest_price_chains(
    metrics: &[MetricRow],
    pharmacies: &[PharmacyRecord],
    top_n: usize,
) -> Vec<ChainPriceReport> {
    let mut chains_by_npi: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for pharmacy in pharmacies {
        chains_by_npi
            .entry(pharmacy.npi.as_str())
            .or_default()
            .push(pharmacy.chain.as_str());
    }

    let mut seen = FxHashSet::default();
    let mut candidates: Vec<Candidate<'_>> = metrics
        .iter()
        .filter(|row| row.has_avg_price())
        .flat_map(|row| {
            chains_by_npi
                .get(row.npi.as_str())
                .into_iter()
                .flatten()
                .map(move |&name| Candidate {
                    ndc: row.ndc.as_str(),
                    name,
                    avg_price: row.avg_price,
                })
        })
        .filter(|c| seen.insert((c.ndc, price_bits(c.avg_price))))
        .collect();

    // stable: candidates of one drug keep their relative order
    candidates.sort_by(|a, b| a.ndc.cmp(b.ndc));

    let by_drug = candidates.into_iter().chunk_by(|c| c.ndc);
    by_drug
        .into_iter()
        .filter_map(|(ndc, group)| {
            let chain = group
                .sorted_by(|a, b| a.avg_price.total_cmp(&b.avg_price))
                .take(top_n)
                .map(|c| ChainPrice {
                    name: c.name.to_string(),
                    avg_price: c.avg_price,
                })
                .collect_vec();
            (!chain.is_empty()).then(|| ChainPriceReport {
                ndc: ndc.to_string(),
                chain,
            })
        })
        .collect()
}

/// Read the metrics report and pharmacies, rank chains and write the report
pub fn calculate_lowest_avg_prices(
    metrics_path: &Path,
    pharmacies_dir: &Path,
    top_n: usize,
    output_path: &Path,
) -> Result<Vec<ChainPriceReport>> {
    let start = Instant::now();
    let metrics = read_metrics(metrics_path)?;
    let pharmacies = read_pharmacies(pharmacies_dir)?;

    let report = lowest_price_chains(&metrics, &pharmacies, top_n);
    write_json_report(output_path, &report)?;

    log_step_timing(STAGE, "ranking and save result", start.elapsed());
    log_stage_output(STAGE, report.len(), output_path);
    Ok(report)
}
