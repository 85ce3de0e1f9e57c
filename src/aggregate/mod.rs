//! Grouping of enriched claims into per-`(npi, ndc)` totals
//!
//! Each worker builds a [`PartialAggregate`] for its claims file; the
//! controller folds all partials into final metric rows with a
//! [`GlobalReducer`] once every worker has finished.

pub mod partial;
pub mod reduce;

pub use partial::{GroupKey, GroupTotals, PartialAggregate};
pub use reduce::{GlobalReducer, reduce_partials};
