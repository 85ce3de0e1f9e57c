//! Domain models for prescription claims
//!
//! Records read from the three input sources (pharmacies, reverts, claims) and
//! the rows of the reports derived from them.

pub mod claim;
pub mod fields;
pub mod metrics;
pub mod pharmacy;
pub mod report;
pub mod revert;

// Re-export commonly used types
pub use claim::{ClaimRecord, ClaimRow, EnrichedClaim};
pub use metrics::MetricRow;
pub use pharmacy::PharmacyRecord;
pub use report::{ChainPrice, ChainPriceReport, QuantityReport};
pub use revert::RevertRecord;
