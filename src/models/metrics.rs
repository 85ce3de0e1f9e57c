//! Per-pharmacy, per-drug metrics

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Final metrics for one `(npi, ndc)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub npi: String,
    pub ndc: String,
    /// Number of reverted claims in the group
    pub reverted: u64,
    /// Number of fills (valid, non-reverted claims)
    pub fills: u64,
    /// Sum of price over the fills
    pub total_price: f64,
    /// `total_price / sum_qty`; NaN when no quantity was dispensed
    #[serde(with = "undefined_as_null")]
    pub avg_price: f64,
}

impl MetricRow {
    /// Whether the average price is defined
    #[must_use]
    pub fn has_avg_price(&self) -> bool {
        !self.avg_price.is_nan()
    }
}

/// Average price of a group, undefined (NaN) when the quantity sum is zero
#[must_use]
pub fn average_price(total_price: f64, sum_qty: f64) -> f64 {
    if sum_qty == 0.0 {
        f64::NAN
    } else {
        total_price / sum_qty
    }
}

/// Serde adapter writing non-finite floats as JSON `null` and reading `null` back as NaN
pub mod undefined_as_null {
    use super::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
