//! Revert JSON reader

use std::path::Path;

use crate::error::util::list_input_files;
use crate::error::{PipelineError, Result};
use crate::models::RevertRecord;
use crate::reader::read_json_array;

/// Read one revert file holding a JSON array of revert events
pub fn read_revert_file(path: &Path) -> Result<Vec<RevertRecord>> {
    read_json_array(path)?
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            RevertRecord::from_value(value).ok_or_else(|| {
                PipelineError::malformed(path, format!("revert #{idx} has no claim_id"))
            })
        })
        .collect()
}

/// Read every revert file in `dir`, in file-name order
pub fn read_reverts(dir: &Path) -> Result<Vec<RevertRecord>> {
    let mut reverts = Vec::new();
    for path in list_input_files(dir)? {
        let records = read_revert_file(&path)?;
        log::debug!("Read {} reverts from {}", records.len(), path.display());
        reverts.extend(records);
    }
    Ok(reverts)
}
