//! Report rows for the downstream rankings

use serde::{Deserialize, Serialize};

/// A chain and its average price for one drug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainPrice {
    pub name: String,
    pub avg_price: f64,
}

/// The cheapest chains for one drug, in non-decreasing price order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainPriceReport {
    pub ndc: String,
    pub chain: Vec<ChainPrice>,
}

/// The most frequently prescribed quantities for one drug, most common first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityReport {
    pub ndc: String,
    pub most_prescribed_quantity: Vec<f64>,
}
