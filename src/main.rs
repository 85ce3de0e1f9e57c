use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use rx_metrics::{FailurePolicy, FillsCounting, PipelineConfig, run_pipeline};

/// Aggregate prescription claim metrics and derive chain price and quantity reports
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to 'claims' input data
    #[arg(long, alias = "input_claims")]
    input_claims: PathBuf,

    /// Path to 'reverts' input data
    #[arg(long, alias = "input_reverts")]
    input_reverts: PathBuf,

    /// Path to 'pharmacies' input data
    #[arg(long, alias = "input_pharmacies")]
    input_pharmacies: PathBuf,

    /// Number of workers used for the metrics stage
    #[arg(long)]
    cores: usize,

    /// Number of workers used for the top-quantity stage
    #[arg(long, default_value_t = 10)]
    report_cores: usize,

    /// Directory receiving the reports (default: ./output)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory receiving rejected claim rows (default: <output-dir>/invalid_claims)
    #[arg(long)]
    quarantine_dir: Option<PathBuf>,

    /// Chains kept per drug in the lowest-price report
    #[arg(long, default_value_t = 2)]
    chain_top_n: usize,

    /// Quantities kept per drug in the top-quantity report
    #[arg(long, default_value_t = 5)]
    quantity_top_n: usize,

    /// Count fills as the number of claim files contributing a group (legacy output)
    #[arg(long)]
    partition_fills: bool,

    /// Skip claim files that fail to parse instead of aborting the run
    #[arg(long)]
    skip_failed_files: bool,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        self.into_config_with(|key| std::env::var_os(key))
    }

    /// Environment overrides first, then the explicit flags
    fn into_config_with(self, env: impl Fn(&str) -> Option<OsString>) -> PipelineConfig {
        let mut config =
            PipelineConfig::new(self.input_claims, self.input_reverts, self.input_pharmacies)
                .with_workers(self.cores)
                .with_overrides_from(env);
        if let Some(dir) = self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dir) = self.quarantine_dir {
            config = config.with_quarantine_dir(dir);
        }
        config.report_workers = self.report_cores;
        config.chain_top_n = self.chain_top_n;
        config.quantity_top_n = self.quantity_top_n;
        if self.partition_fills {
            config.fills_counting = FillsCounting::PartitionCount;
        }
        if self.skip_failed_files {
            config.failure_policy = FailurePolicy::SkipAndReport;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    let start = Instant::now();

    let summary = run_pipeline(&config).context("Failed to compute claim metrics")?;

    let run = &summary.metrics;
    info!(
        "Aggregated {} claim files ({} rows, {} invalid, {} unknown pharmacy, {} reverted) \
         into {} metric rows",
        run.files_processed,
        run.stats.rows,
        run.stats.invalid,
        run.stats.unknown_pharmacy,
        run.stats.reverted,
        run.metrics.len()
    );
    if !run.quarantine_files.is_empty() {
        info!(
            "Quarantined invalid claims from {} files in {}",
            run.quarantine_files.len(),
            config.quarantine_dir.display()
        );
    }
    for error in &run.quarantine_failures {
        warn!("{error}");
    }
    for failure in &run.failures {
        warn!("Skipped {}: {}", failure.path.display(), failure.error);
    }
    info!(
        "Wrote {} lowest-price and {} top-quantity entries in {:?}",
        summary.lowest_prices.len(),
        summary.top_quantities.len(),
        start.elapsed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_metrics::config::{OUTPUT_DIR_ENV, QUARANTINE_DIR_ENV};

    const INPUTS: [&str; 7] = [
        "rx-metrics",
        "--input_claims",
        "c",
        "--input_reverts",
        "r",
        "--input_pharmacies",
        "p",
    ];

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(INPUTS.iter().chain(extra)).unwrap()
    }

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn test_underscore_aliases_and_defaults() {
        let config = parse(&["--cores", "3"]).into_config_with(no_env);
        assert_eq!(config.claims_dir, PathBuf::from("c"));
        assert_eq!(config.reverts_dir, PathBuf::from("r"));
        assert_eq!(config.pharmacies_dir, PathBuf::from("p"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.report_workers, 10);
        assert_eq!(config.chain_top_n, 2);
        assert_eq!(config.quantity_top_n, 5);
        assert_eq!(config.fills_counting, FillsCounting::SumOfPartials);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.quarantine_dir, PathBuf::from("output/invalid_claims"));
    }

    #[test]
    fn test_dashed_flags() {
        let cli = Cli::try_parse_from([
            "rx-metrics",
            "--input-claims",
            "c",
            "--input-reverts",
            "r",
            "--input-pharmacies",
            "p",
            "--cores",
            "1",
            "--partition-fills",
            "--skip-failed-files",
        ])
        .unwrap();
        let config = cli.into_config_with(no_env);
        assert_eq!(config.fills_counting, FillsCounting::PartitionCount);
        assert_eq!(config.failure_policy, FailurePolicy::SkipAndReport);
    }

    #[test]
    fn test_cores_required() {
        assert!(Cli::try_parse_from(INPUTS).is_err());
    }

    #[test]
    fn test_env_quarantine_dir_kept_with_output_flag() {
        let env = |key: &str| (key == QUARANTINE_DIR_ENV).then(|| OsString::from("/q"));
        let config = parse(&["--cores", "2", "--output-dir", "/o"]).into_config_with(env);
        assert_eq!(config.output_dir, PathBuf::from("/o"));
        assert_eq!(config.quarantine_dir, PathBuf::from("/q"));
    }

    #[test]
    fn test_flags_override_env() {
        let env = |key: &str| match key {
            OUTPUT_DIR_ENV => Some(OsString::from("/env/out")),
            QUARANTINE_DIR_ENV => Some(OsString::from("/env/q")),
            _ => None,
        };
        let config = parse(&["--cores", "2", "--output-dir", "/o", "--quarantine-dir", "/cli/q"])
            .into_config_with(env);
        assert_eq!(config.output_dir, PathBuf::from("/o"));
        assert_eq!(config.quarantine_dir, PathBuf::from("/cli/q"));
    }

    #[test]
    fn test_env_output_dir_moves_default_quarantine() {
        let env = |key: &str| (key == OUTPUT_DIR_ENV).then(|| OsString::from("/env/out"));
        let config = parse(&["--cores", "2"]).into_config_with(env);
        assert_eq!(config.output_dir, PathBuf::from("/env/out"));
        assert_eq!(config.quarantine_dir, PathBuf::from("/env/out/invalid_claims"));
    }
}
