//! Configuration for the metrics pipeline.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "RX_METRICS_OUTPUT_DIR";
/// Environment variable overriding the quarantine directory
pub const QUARANTINE_DIR_ENV: &str = "RX_METRICS_QUARANTINE_DIR";

/// Quarantine directory name under the output directory
pub const QUARANTINE_SUBDIR: &str = "invalid_claims";

/// File name of the per-pharmacy, per-drug metrics report
pub const METRICS_FILE: &str = "metrics.json";
/// File name of the cheapest chains report
pub const LOWEST_PRICE_FILE: &str = "lowest_price_chains.json";
/// File name of the most prescribed quantities report
pub const TOP_QUANTITY_FILE: &str = "top_prescribed_quantities.json";

/// How the global reducer recomputes `fills` from worker partials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillsCounting {
    /// Sum the fill counts of every partial; equals the true global fill count
    #[default]
    SumOfPartials,
    /// Count the partial rows per key (legacy output, undercounts when a key
    /// spans several claim files)
    PartitionCount,
}

/// What happens when a worker fails on one claims file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure aborts the whole stage
    #[default]
    Abort,
    /// Failed files are excluded and reported; the rest are aggregated
    SkipAndReport,
}

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory of claims JSON files
    pub claims_dir: PathBuf,
    /// Directory of revert JSON files
    pub reverts_dir: PathBuf,
    /// Directory of pharmacy CSV files
    pub pharmacies_dir: PathBuf,
    /// Worker pool size for the metrics stage
    pub workers: usize,
    /// Worker pool size for the top-quantity stage
    pub report_workers: usize,
    /// Directory receiving the JSON reports
    pub output_dir: PathBuf,
    /// Directory receiving rejected claim rows
    pub quarantine_dir: PathBuf,
    /// Number of chains kept per drug in the lowest-price report
    pub chain_top_n: usize,
    /// Number of quantities kept per drug in the top-quantity report
    pub quantity_top_n: usize,
    /// Fills re-aggregation mode
    pub fills_counting: FillsCounting,
    /// Per-file failure handling
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let output_dir = PathBuf::from("output");
        Self {
            claims_dir: PathBuf::from("data/claims"),
            reverts_dir: PathBuf::from("data/reverts"),
            pharmacies_dir: PathBuf::from("data/pharmacies"),
            workers: num_cpus::get(),
            report_workers: 10,
            quarantine_dir: output_dir.join(QUARANTINE_SUBDIR),
            output_dir,
            chain_top_n: 2,
            quantity_top_n: 5,
            fills_counting: FillsCounting::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration for the three input directories with default settings
    pub fn new(
        claims_dir: impl Into<PathBuf>,
        reverts_dir: impl Into<PathBuf>,
        pharmacies_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            claims_dir: claims_dir.into(),
            reverts_dir: reverts_dir.into(),
            pharmacies_dir: pharmacies_dir.into(),
            ..Self::default()
        }
    }

    /// Set the metrics worker count
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Write reports under `dir`
    ///
    /// A quarantine directory still at its `<output_dir>/invalid_claims`
    /// default moves along; one set explicitly is kept.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if self.quarantine_dir == self.output_dir.join(QUARANTINE_SUBDIR) {
            self.quarantine_dir = dir.join(QUARANTINE_SUBDIR);
        }
        self.output_dir = dir;
        self
    }

    /// Send rejected claim rows to `dir`
    #[must_use]
    pub fn with_quarantine_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.quarantine_dir = dir.into();
        self
    }

    /// Apply `RX_METRICS_OUTPUT_DIR` and `RX_METRICS_QUARANTINE_DIR` as found
    /// through `lookup`, normally `std::env::var_os`
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
            self = self.with_output_dir(dir);
        }
        if let Some(dir) = lookup(QUARANTINE_DIR_ENV) {
            self = self.with_quarantine_dir(dir);
        }
        self
    }

    /// Path of the metrics report
    #[must_use]
    pub fn metrics_path(&self) -> PathBuf {
        self.output_dir.join(METRICS_FILE)
    }

    /// Path of the lowest-price report
    #[must_use]
    pub fn lowest_price_path(&self) -> PathBuf {
        self.output_dir.join(LOWEST_PRICE_FILE)
    }

    /// Path of the top-quantity report
    #[must_use]
    pub fn top_quantity_path(&self) -> PathBuf {
        self.output_dir.join(TOP_QUANTITY_FILE)
    }
}
