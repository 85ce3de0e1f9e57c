//! Claim entity model
//!
//! A claim is one prescription fill reported by a pharmacy. Claims are read
//! leniently: a missing or malformed field is `None`, and it is the validator's
//! job to decide whether such a claim can take part in the metrics.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::fields;

/// One claim as read from a claims file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRecord {
    /// Claim identifier, unique within its file
    pub id: Option<String>,
    /// Drug code
    pub ndc: Option<String>,
    /// Pharmacy identifier
    pub npi: Option<String>,
    /// Total price of the fill
    pub price: Option<f64>,
    /// Dispensed quantity
    pub quantity: Option<f64>,
    /// When the claim was filed
    pub timestamp: Option<NaiveDateTime>,
}

impl ClaimRecord {
    /// Create a claim from its identifiers and amounts, without a timestamp
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        ndc: impl Into<String>,
        npi: impl Into<String>,
        price: Option<f64>,
        quantity: Option<f64>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            ndc: Some(ndc.into()),
            npi: Some(npi.into()),
            price,
            quantity,
            timestamp: None,
        }
    }

    /// Build a claim from a JSON object; non-objects yield an all-empty claim
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(record) => Self::from_map(record),
            None => Self::empty(),
        }
    }

    fn from_map(record: &Map<String, Value>) -> Self {
        Self {
            id: fields::identifier(record, "id"),
            ndc: fields::identifier(record, "ndc"),
            npi: fields::identifier(record, "npi"),
            price: fields::number(record, "price"),
            quantity: fields::number(record, "quantity"),
            timestamp: fields::timestamp(record, "timestamp"),
        }
    }

    fn empty() -> Self {
        Self {
            id: None,
            ndc: None,
            npi: None,
            price: None,
            quantity: None,
            timestamp: None,
        }
    }

    /// A claim is invalid when quantity or price is missing or negative
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        let bad = |v: Option<f64>| v.is_none_or(|v| v < 0.0);
        bad(self.quantity) || bad(self.price)
    }
}

/// A claims row together with the JSON it was read from
///
/// The raw value is what ends up in quarantine, so rejected rows are persisted
/// exactly as they arrived.
#[derive(Debug, Clone)]
pub struct ClaimRow {
    pub record: ClaimRecord,
    pub raw: Value,
}

impl ClaimRow {
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        Self {
            record: ClaimRecord::from_value(&raw),
            raw,
        }
    }
}

/// A valid claim of a known pharmacy with its revert status attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedClaim {
    pub npi: String,
    pub ndc: Option<String>,
    /// Cleared when the claim was reverted
    pub price: Option<f64>,
    /// Cleared when the claim was reverted
    pub quantity: Option<f64>,
    pub reverted: bool,
}
