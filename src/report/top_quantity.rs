//! Most commonly prescribed quantities per drug
//!
//! Runs independently of the metrics stage: claim files are read and
//! validated again, without the pharmacy or revert filters.

use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::config::{FailurePolicy, PipelineConfig};
use crate::dispatch::WorkerPool;
use crate::error::Result;
use crate::error::util::list_input_files;
use crate::models::{ClaimRecord, QuantityReport};
use crate::reader::read_claims_file;
use crate::utils::{log_stage_output, log_stage_start, log_step_timing, write_json_report};
use crate::validation::{DiscardQuarantine, validate_claims};

const STAGE: &str = "Top quantity";

/// A quantity usable as a hash key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct QuantityKey(u64);

impl QuantityKey {
    fn new(quantity: f64) -> Self {
        // folds -0.0 into 0.0
        Self((quantity + 0.0).to_bits())
    }

    fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Number of claims per `(ndc, quantity)`
#[derive(Debug, Clone, Default)]
pub struct QuantityCounts {
    counts: FxHashMap<(String, QuantityKey), u64>,
}

impl QuantityCounts {
    /// Count valid claims by drug and quantity
    #[must_use]
    pub fn from_claims(claims: &[ClaimRecord]) -> Self {
        let mut counts = Self::default();
        for claim in claims {
            if let (Some(ndc), Some(quantity)) = (&claim.ndc, claim.quantity) {
                *counts
                    .counts
                    .entry((ndc.clone(), QuantityKey::new(quantity)))
                    .or_default() += 1;
            }
        }
        counts
    }

    /// Add the counts of another partition
    pub fn merge(&mut self, other: Self) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_default() += count;
        }
    }

    #[cfg(test)]
    fn count(&self, ndc: &str, quantity: f64) -> u64 {
        self.counts
            .get(&(ndc.to_string(), QuantityKey::new(quantity)))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `top_n` most frequent quantities per drug, drugs in code order
    ///
    /// Quantities with the same count are listed smallest first.
    #[must_use]
    pub fn top_quantities(&self, top_n: usize) -> Vec<QuantityReport> {
        let entries = self
            .counts
            .iter()
            .map(|((ndc, key), count)| (ndc.as_str(), key.value(), *count))
            .sorted_by(|a, b| a.0.cmp(b.0).then(a.1.total_cmp(&b.1)));

        let by_drug = entries.chunk_by(|entry| entry.0);
        by_drug
            .into_iter()
            .filter_map(|(ndc, group)| {
                let most_prescribed_quantity = group
                    .sorted_by(|a, b| b.2.cmp(&a.2))
                    .take(top_n)
                    .map(|(_, quantity, _)| quantity)
                    .collect_vec();
                (!most_prescribed_quantity.is_empty()).then(|| QuantityReport {
                    ndc: ndc.to_string(),
                    most_prescribed_quantity,
                })
            })
            .collect()
    }
}

/// Count quantities of the valid claims in one file
pub fn count_quantities_in_file(path: &Path) -> Result<QuantityCounts> {
    let rows = read_claims_file(path)?;
    let outcome = validate_claims(path, rows, &DiscardQuarantine);
    Ok(QuantityCounts::from_claims(&outcome.valid))
}

/// Count quantities over all claim files with a pool of `workers` and rank them
pub fn top_prescribed_quantities(
    claim_files: &[PathBuf],
    workers: usize,
    top_n: usize,
    policy: FailurePolicy,
) -> Result<Vec<QuantityReport>> {
    let pool = WorkerPool::new(workers)?;

    let start = Instant::now();
    let outcome = pool.run(claim_files, policy, count_quantities_in_file)?;
    log_step_timing(STAGE, "initial preprocessing", start.elapsed());

    let mut totals = QuantityCounts::default();
    for counts in outcome.completed {
        totals.merge(counts);
    }
    if totals.is_empty() && !claim_files.is_empty() {
        log::warn!("{STAGE}: no valid claims with a drug code were found");
    }
    Ok(totals.top_quantities(top_n))
}

/// Run the top-quantity stage for `config` and write its report
pub fn calculate_top_prescribed_quantities(config: &PipelineConfig) -> Result<Vec<QuantityReport>> {
    log_stage_start(STAGE, &config.claims_dir);
    let files = list_input_files(&config.claims_dir)?;

    let report = top_prescribed_quantities(
        &files,
        config.report_workers,
        config.quantity_top_n,
        config.failure_policy,
    )?;

    let start = Instant::now();
    let output_path = config.top_quantity_path();
    write_json_report(&output_path, &report)?;
    log_step_timing(STAGE, "union and save result", start.elapsed());
    log_stage_output(STAGE, report.len(), &output_path);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(rows: &[(&str, f64)]) -> Vec<ClaimRecord> {
        rows.iter()
            .enumerate()
            .map(|(i, (ndc, quantity))| {
                ClaimRecord::new(i.to_string(), *ndc, "1", Some(1.0), Some(*quantity))
            })
            .collect()
    }

    #[test]
    fn test_counts_merge_across_partitions() {
        let mut counts =
            QuantityCounts::from_claims(&claims(&[("X", 30.0), ("X", 30.0), ("X", 90.0)]));
        counts.merge(QuantityCounts::from_claims(&claims(&[
            ("X", 90.0),
            ("X", 90.0),
            ("Y", 1.0),
        ])));

        assert_eq!(counts.count("X", 30.0), 2);
        assert_eq!(counts.count("X", 90.0), 3);
        assert_eq!(counts.count("Y", 1.0), 1);
        assert_eq!(counts.count("Y", 2.0), 0);
    }

    #[test]
    fn test_top_quantities_ordered_by_count() {
        let counts = QuantityCounts::from_claims(&claims(&[
            ("X", 30.0),
            ("X", 60.0),
            ("X", 60.0),
            ("X", 90.0),
            ("X", 90.0),
            ("X", 90.0),
            ("A", 5.0),
        ]));

        let report = counts.top_quantities(2);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].ndc, "A");
        assert_eq!(report[0].most_prescribed_quantity, vec![5.0]);
        assert_eq!(report[1].most_prescribed_quantity, vec![90.0, 60.0]);
    }

    #[test]
    fn test_ties_listed_smallest_first() {
        let counts = QuantityCounts::from_claims(&claims(&[("X", 60.0), ("X", 30.0), ("X", 45.0)]));
        let report = counts.top_quantities(5);
        assert_eq!(report[0].most_prescribed_quantity, vec![30.0, 45.0, 60.0]);
    }

    #[test]
    fn test_zero_quantities_share_a_key() {
        let counts = QuantityCounts::from_claims(&claims(&[("X", 0.0), ("X", -0.0)]));
        assert_eq!(counts.count("X", 0.0), 2);
    }
}
