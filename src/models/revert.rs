//! Revert entity model

use serde::Serialize;
use serde_json::Value;

use crate::models::fields;

/// A reversal of a previously filed claim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevertRecord {
    /// Identifier of the revert event itself
    pub id: Option<String>,
    /// Identifier of the claim being reverted
    pub claim_id: String,
    /// When the revert happened, as given in the source
    pub timestamp: Option<String>,
}

impl RevertRecord {
    #[must_use]
    pub fn new(claim_id: impl Into<String>) -> Self {
        Self {
            id: None,
            claim_id: claim_id.into(),
            timestamp: None,
        }
    }

    /// Build a revert from a JSON object; `None` if it has no usable `claim_id`
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id: fields::identifier(record, "id"),
            claim_id: fields::identifier(record, "claim_id")?,
            timestamp: fields::identifier(record, "timestamp"),
        })
    }
}
