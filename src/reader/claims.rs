//! Claims JSON reader

use std::path::Path;

use crate::error::Result;
use crate::models::ClaimRow;
use crate::reader::read_json_array;

/// Read one claims file holding a JSON array of claims
///
/// Only the array itself is required; fields that are missing or of the wrong
/// type surface as `None` on the returned records.
pub fn read_claims_file(path: &Path) -> Result<Vec<ClaimRow>> {
    Ok(read_json_array(path)?
        .into_iter()
        .map(ClaimRow::from_value)
        .collect())
}
