//! Metrics stage: per-pharmacy, per-drug fill metrics
//!
//! The controller loads pharmacies and reverts once into [`ReferenceData`],
//! then every claims file is processed by one worker: read, validate,
//! quarantine, join, partially aggregate. The partials are reduced in file
//! order after the whole pool has finished.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::aggregate::{GlobalReducer, PartialAggregate};
use crate::config::PipelineConfig;
use crate::dispatch::{FileFailure, WorkerPool};
use crate::error::util::list_input_files;
use crate::error::{PipelineError, Result};
use crate::join::{PharmacyAllowList, RevertIndex, enrich_claims};
use crate::models::MetricRow;
use crate::reader::{read_claims_file, read_pharmacies, read_reverts};
use crate::utils::{log_stage_output, log_stage_start, log_step_timing, write_json_report};
use crate::validation::{DirectoryQuarantine, QuarantineSink, QuarantineStatus, validate_claims};

const STAGE: &str = "Metrics";

/// Lookup tables shared read-only by every worker
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub pharmacies: PharmacyAllowList,
    pub reverts: RevertIndex,
}

impl ReferenceData {
    /// Load the pharmacy allow-list and the revert index
    pub fn load(reverts_dir: &Path, pharmacies_dir: &Path) -> Result<Self> {
        let reverts = RevertIndex::from_records(read_reverts(reverts_dir)?);
        let pharmacies = PharmacyAllowList::from_records(&read_pharmacies(pharmacies_dir)?);
        log::info!(
            "{STAGE}: loaded {} reverted claim ids and {} pharmacies",
            reverts.len(),
            pharmacies.len()
        );
        Ok(Self {
            pharmacies,
            reverts,
        })
    }
}

/// Row counts of one or more claims files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimsStats {
    /// Rows read
    pub rows: usize,
    /// Rows rejected by validation
    pub invalid: usize,
    /// Valid rows of pharmacies not on the allow-list
    pub unknown_pharmacy: usize,
    /// Valid rows of known pharmacies that were reverted
    pub reverted: usize,
}

impl ClaimsStats {
    fn add(&mut self, other: &Self) {
        self.rows += other.rows;
        self.invalid += other.invalid;
        self.unknown_pharmacy += other.unknown_pharmacy;
        self.reverted += other.reverted;
    }
}

/// Result of one worker
#[derive(Debug)]
pub struct ClaimsFileReport {
    pub partial: PartialAggregate,
    pub stats: ClaimsStats,
    pub quarantine: QuarantineStatus,
}

/// Process one claims file end to end, up to its partial aggregate
pub fn process_claims_file(
    path: &Path,
    reference: &ReferenceData,
    sink: &dyn QuarantineSink,
) -> Result<ClaimsFileReport> {
    let rows = read_claims_file(path)?;
    let row_count = rows.len();

    let validated = validate_claims(path, rows, sink);
    let (enriched, enrich_stats) =
        enrich_claims(validated.valid, &reference.pharmacies, &reference.reverts);
    let partial = PartialAggregate::from_claims(path, &enriched);

    let stats = ClaimsStats {
        rows: row_count,
        invalid: validated.invalid_rows,
        unknown_pharmacy: enrich_stats.unknown_pharmacy,
        reverted: enrich_stats.reverted,
    };
    log::debug!(
        "{}: {} rows, {} invalid, {} unknown pharmacy, {} reverted, {} groups",
        path.display(),
        stats.rows,
        stats.invalid,
        stats.unknown_pharmacy,
        stats.reverted,
        partial.len()
    );

    Ok(ClaimsFileReport {
        partial,
        stats,
        quarantine: validated.quarantine,
    })
}

/// Outcome of the metrics stage
#[derive(Debug, Default)]
pub struct MetricsRun {
    /// Final rows sorted by `(npi, ndc)`
    pub metrics: Vec<MetricRow>,
    /// Totals over all processed files
    pub stats: ClaimsStats,
    /// Number of claims files aggregated
    pub files_processed: usize,
    /// Quarantine files written
    pub quarantine_files: Vec<PathBuf>,
    /// Quarantine writes that failed
    pub quarantine_failures: Vec<PipelineError>,
    /// Claims files skipped under [`crate::config::FailurePolicy::SkipAndReport`]
    pub failures: Vec<FileFailure>,
}

/// Aggregate `claim_files` against already loaded reference data
pub fn compute_metrics(
    config: &PipelineConfig,
    claim_files: &[PathBuf],
    reference: &ReferenceData,
    sink: &dyn QuarantineSink,
) -> Result<MetricsRun> {
    let pool = WorkerPool::new(config.workers)?;
    log::info!(
        "{STAGE}: processing {} claim files with {} workers",
        claim_files.len(),
        pool.workers()
    );

    let start = Instant::now();
    let outcome = pool.run(claim_files, config.failure_policy, |path| {
        process_claims_file(path, reference, sink)
    })?;
    log_step_timing(STAGE, "initial preprocessing", start.elapsed());

    let mut run = MetricsRun {
        files_processed: outcome.completed.len(),
        failures: outcome.failures,
        ..MetricsRun::default()
    };
    let mut reducer = GlobalReducer::new(config.fills_counting);
    for report in outcome.completed {
        reducer.merge(&report.partial);
        run.stats.add(&report.stats);
        match report.quarantine {
            QuarantineStatus::Written(path) => run.quarantine_files.push(path),
            QuarantineStatus::Failed(error) => run.quarantine_failures.push(error),
            QuarantineStatus::Clean | QuarantineStatus::Discarded => {}
        }
    }
    if reducer.is_empty() && !claim_files.is_empty() {
        log::warn!("{STAGE}: no valid claims of a known pharmacy were found");
    }
    log::info!("{STAGE}: {} pharmacy and drug pairs", reducer.len());
    run.metrics = reducer.finish();
    Ok(run)
}

/// Run the metrics stage for `config` and write its report
pub fn calculate_metrics(config: &PipelineConfig) -> Result<MetricsRun> {
    log_stage_start(STAGE, &config.claims_dir);
    let reference = ReferenceData::load(&config.reverts_dir, &config.pharmacies_dir)?;
    let claim_files = list_input_files(&config.claims_dir)?;
    let sink = DirectoryQuarantine::new(&config.quarantine_dir);

    let run = compute_metrics(config, &claim_files, &reference, &sink)?;

    let start = Instant::now();
    let output_path = config.metrics_path();
    write_json_report(&output_path, &run.metrics)?;
    log_step_timing(STAGE, "union and save result", start.elapsed());
    log_stage_output(STAGE, run.metrics.len(), &output_path);
    Ok(run)
}
