//! Per-file partial aggregation

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::models::EnrichedClaim;

/// Grouping key of the metrics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub npi: String,
    pub ndc: String,
}

impl GroupKey {
    pub fn new(npi: impl Into<String>, ndc: impl Into<String>) -> Self {
        Self {
            npi: npi.into(),
            ndc: ndc.into(),
        }
    }
}

/// Running totals of one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTotals {
    /// Number of reverted claims
    pub reverted: u64,
    /// Number of claims with a quantity
    pub fills: u64,
    /// Sum of quantities, missing ones excluded
    pub sum_qty: f64,
    /// Sum of prices, missing ones excluded
    pub total_price: f64,
}

impl GroupTotals {
    /// Account for one enriched claim
    pub fn add_claim(&mut self, claim: &EnrichedClaim) {
        if claim.reverted {
            self.reverted += 1;
        }
        if let Some(quantity) = claim.quantity {
            self.fills += 1;
            self.sum_qty += quantity;
        }
        if let Some(price) = claim.price {
            self.total_price += price;
        }
    }
}

/// Group totals of the claims of one file
#[derive(Debug, Clone, Default)]
pub struct PartialAggregate {
    source: PathBuf,
    groups: FxHashMap<GroupKey, GroupTotals>,
}

impl PartialAggregate {
    /// Group claims by `(npi, ndc)`
    ///
    /// Claims without a drug code have no group and are left out, the same way
    /// they could never appear in a report keyed by drug code.
    #[must_use]
    pub fn from_claims(source: impl Into<PathBuf>, claims: &[EnrichedClaim]) -> Self {
        let mut groups: FxHashMap<GroupKey, GroupTotals> = FxHashMap::default();
        for claim in claims {
            let Some(ndc) = &claim.ndc else {
                continue;
            };
            groups
                .entry(GroupKey::new(claim.npi.as_str(), ndc.as_str()))
                .or_default()
                .add_claim(claim);
        }
        Self {
            source: source.into(),
            groups,
        }
    }

    /// Claims file this partial was computed from
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[cfg(test)]
    pub fn get(&self, key: &GroupKey) -> Option<&GroupTotals> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &GroupTotals)> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
