//! Claim validation
//!
//! Splits a claims file into the rows that can take part in the metrics and
//! the rows that cannot. Rejected rows are handed to a [`QuarantineSink`]; a
//! sink failure is recorded on the outcome and never stops the valid rows.

pub mod quarantine;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::PipelineError;
use crate::models::{ClaimRecord, ClaimRow};

pub use quarantine::{DirectoryQuarantine, DiscardQuarantine, QuarantineSink};

/// What happened to the rejected rows of one file
#[derive(Debug, Default)]
pub enum QuarantineStatus {
    /// Nothing was rejected
    #[default]
    Clean,
    /// Rejected rows were written to this file
    Written(PathBuf),
    /// The sink does not keep rejected rows
    Discarded,
    /// Writing the rejected rows failed
    Failed(PipelineError),
}

/// Valid claims of one file plus the fate of the invalid ones
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<ClaimRecord>,
    pub invalid_rows: usize,
    pub quarantine: QuarantineStatus,
}

/// Split rows into valid records and the raw JSON of invalid ones
#[must_use]
pub fn partition_claims(rows: Vec<ClaimRow>) -> (Vec<ClaimRecord>, Vec<Value>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut invalid = Vec::new();
    for row in rows {
        if row.record.is_invalid() {
            invalid.push(row.raw);
        } else {
            valid.push(row.record);
        }
    }
    (valid, invalid)
}

/// Validate the rows of `source` and quarantine the rejected ones
pub fn validate_claims(
    source: &Path,
    rows: Vec<ClaimRow>,
    sink: &dyn QuarantineSink,
) -> ValidationOutcome {
    let (valid, invalid) = partition_claims(rows);
    if invalid.is_empty() {
        return ValidationOutcome {
            valid,
            ..ValidationOutcome::default()
        };
    }

    let quarantine = match sink.quarantine(source, &invalid) {
        Ok(Some(path)) => QuarantineStatus::Written(path),
        Ok(None) => QuarantineStatus::Discarded,
        Err(e) => {
            log::warn!("{e}; continuing with the valid rows of {}", source.display());
            QuarantineStatus::Failed(e)
        }
    };

    ValidationOutcome {
        valid,
        invalid_rows: invalid.len(),
        quarantine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn rows() -> Vec<ClaimRow> {
        vec![
            ClaimRow::from_value(json!({
                "id": "a", "npi": "1", "ndc": "X", "price": 10, "quantity": 2
            })),
            ClaimRow::from_value(json!({
                "id": "b", "npi": "1", "ndc": "X", "price": -5, "quantity": 1
            })),
            ClaimRow::from_value(json!({"id": "c", "npi": "1", "ndc": "X", "price": 3})),
        ]
    }

    #[test]
    fn test_partition_claims() {
        let (valid, invalid) = partition_claims(rows());
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id.as_deref(), Some("a"));
        assert_eq!(invalid.len(), 2);
        assert_eq!(invalid[0]["id"], "b");
    }

    #[test]
    fn test_validate_claims_writes_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryQuarantine::new(dir.path());

        let outcome = validate_claims(Path::new("claims-1.json"), rows(), &sink);
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.invalid_rows, 2);
        match outcome.quarantine {
            QuarantineStatus::Written(path) => assert_eq!(path, dir.path().join("claims-1.json")),
            other => panic!("unexpected quarantine status: {other:?}"),
        }
    }

    #[test]
    fn test_quarantine_failure_keeps_valid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let sink = DirectoryQuarantine::new(&blocker);

        let outcome = validate_claims(Path::new("claims-1.json"), rows(), &sink);
        assert_eq!(outcome.valid.len(), 1);
        assert!(matches!(outcome.quarantine, QuarantineStatus::Failed(_)));
    }

    #[test]
    fn test_clean_file_skips_sink() {
        let (valid, _) = partition_claims(rows());
        let clean = valid
            .into_iter()
            .map(|record| ClaimRow {
                raw: serde_json::to_value(&record).unwrap(),
                record,
            })
            .collect();

        let outcome = validate_claims(Path::new("claims-1.json"), clean, &DiscardQuarantine);
        assert!(matches!(outcome.quarantine, QuarantineStatus::Clean));
        assert_eq!(outcome.invalid_rows, 0);
    }
}
