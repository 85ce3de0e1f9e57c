//! Fixed-size worker pool over input files
//!
//! Every file is one task. Tasks only see shared data through `&` references,
//! so nothing a worker reads can change while the pool runs. Results are
//! collected in file order after all tasks have finished, and only then is
//! the failure policy applied.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::FailurePolicy;
use crate::error::{PipelineError, Result};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar, log_warning};

/// A file that could not be processed
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: PipelineError,
}

/// Results of one pool run, both in input file order
#[derive(Debug)]
pub struct DispatchOutcome<T> {
    pub completed: Vec<T>,
    pub failures: Vec<FileFailure>,
}

/// Bounded pool of worker threads
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Start a pool with exactly `workers` threads
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(PipelineError::InvalidWorkerCount);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("claims-worker-{idx}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` once per file and wait for all of them
    ///
    /// With [`FailurePolicy::Abort`] the first failure in file order is
    /// returned as the error of the whole run. With
    /// [`FailurePolicy::SkipAndReport`] failures are returned next to the
    /// completed results.
    pub fn run<T, F>(
        &self,
        files: &[PathBuf],
        policy: FailurePolicy,
        task: F,
    ) -> Result<DispatchOutcome<T>>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync,
    {
        let pb = create_main_progress_bar(files.len() as u64, Some("Processing claim files"));

        let results: Vec<(PathBuf, Result<T>)> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = task(path).map_err(|e| e.in_worker(path));
                    pb.inc(1);
                    (path.clone(), result)
                })
                .collect()
        });

        finish_progress_bar(&pb, Some("Claim files processed"));

        let mut completed = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (path, result) in results {
            match result {
                Ok(value) => completed.push(value),
                Err(error) if policy == FailurePolicy::Abort => return Err(error),
                Err(error) => {
                    log_warning(&format!("Skipping failed claims file ({error})"), Some(&path));
                    failures.push(FileFailure { path, error });
                }
            }
        }

        Ok(DispatchOutcome {
            completed,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn parse_len(path: &Path) -> Result<usize> {
        let name = path.to_string_lossy();
        if name.starts_with("bad") {
            return Err(PipelineError::malformed(path, "bad file"));
        }
        Ok(name.len())
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(PipelineError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_results_keep_file_order() {
        let pool = WorkerPool::new(3).unwrap();
        let outcome = pool
            .run(&files(&["a", "bb", "ccc", "dddd"]), FailurePolicy::Abort, parse_len)
            .unwrap();
        assert_eq!(outcome.completed, vec![1, 2, 3, 4]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_abort_returns_first_failure() {
        let pool = WorkerPool::new(2).unwrap();
        let err = pool
            .run(&files(&["a", "bad-1", "bad-2"]), FailurePolicy::Abort, parse_len)
            .unwrap_err();
        match err {
            PipelineError::Worker { path, .. } => assert_eq!(path, PathBuf::from("bad-1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_and_report_isolates_failures() {
        let pool = WorkerPool::new(2).unwrap();
        let outcome = pool
            .run(&files(&["a", "bad-1", "ccc"]), FailurePolicy::SkipAndReport, parse_len)
            .unwrap();
        assert_eq!(outcome.completed, vec![1, 3]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, PathBuf::from("bad-1"));
    }
}
