//! Pharmacy entity model

use serde::{Deserialize, Serialize};

/// One row of a pharmacy file: a pharmacy and the chain it belongs to
///
/// `npi` is always text. Pharmacy identifiers carry leading zeros that a
/// numeric type would lose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PharmacyRecord {
    /// Chain name
    pub chain: String,
    /// Pharmacy identifier
    pub npi: String,
}

impl PharmacyRecord {
    #[must_use]
    pub fn new(chain: impl Into<String>, npi: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            npi: npi.into(),
        }
    }
}
