//! Pharmacy CSV reader

use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::util::list_input_files;
use crate::error::{PipelineError, Result};
use crate::models::PharmacyRecord;

/// Read one pharmacy CSV file with a `chain,npi` header
pub fn read_pharmacy_file(path: &Path) -> Result<Vec<PharmacyRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PipelineError::csv(path, e))?;

    reader
        .deserialize::<PharmacyRecord>()
        .map(|row| row.map_err(|e| PipelineError::csv(path, e)))
        .collect()
}

/// Read every pharmacy file in `dir` and return the distinct `(chain, npi)` pairs
///
/// Pairs keep the order of their first appearance.
pub fn read_pharmacies(dir: &Path) -> Result<Vec<PharmacyRecord>> {
    let mut seen = FxHashSet::default();
    let mut pharmacies = Vec::new();

    for path in list_input_files(dir)? {
        let records = read_pharmacy_file(&path)?;
        log::debug!("Read {} pharmacy rows from {}", records.len(), path.display());
        for record in records {
            if seen.insert((record.chain.clone(), record.npi.clone())) {
                pharmacies.push(record);
            }
        }
    }

    Ok(pharmacies)
}
