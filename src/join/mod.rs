//! Join and enrichment of valid claims
//!
//! Claims are restricted to pharmacies on the allow-list and tagged with their
//! revert status. Both lookup tables are built once by the controller and only
//! ever read by workers.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{ClaimRecord, EnrichedClaim, PharmacyRecord, RevertRecord};

/// Distinct pharmacy identifiers claims may come from
#[derive(Debug, Clone, Default)]
pub struct PharmacyAllowList {
    npis: FxHashSet<String>,
}

impl PharmacyAllowList {
    #[must_use]
    pub fn from_records(records: &[PharmacyRecord]) -> Self {
        Self {
            npis: records.iter().map(|r| r.npi.clone()).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, npi: &str) -> bool {
        self.npis.contains(npi)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.npis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npis.is_empty()
    }
}

/// Reverted claims keyed by claim id
///
/// When the same claim id is reverted more than once, the record seen last
/// (file-name order, then array order) is kept.
#[derive(Debug, Clone, Default)]
pub struct RevertIndex {
    by_claim: FxHashMap<String, RevertRecord>,
    duplicates: usize,
}

impl RevertIndex {
    #[must_use]
    pub fn from_records(records: Vec<RevertRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if index
                .by_claim
                .insert(record.claim_id.clone(), record)
                .is_some()
            {
                index.duplicates += 1;
            }
        }
        if index.duplicates > 0 {
            log::warn!(
                "{} duplicate revert claim ids collapsed (last one kept)",
                index.duplicates
            );
        }
        index
    }

    /// Revert record kept for `claim_id`, if the claim was reverted
    #[must_use]
    pub fn get(&self, claim_id: &str) -> Option<&RevertRecord> {
        self.by_claim.get(claim_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_claim.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_claim.is_empty()
    }

    /// Number of revert records that collided with an earlier claim id
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Counts from one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Claims dropped because their pharmacy is not on the allow-list
    pub unknown_pharmacy: usize,
    /// Claims found in the revert index
    pub reverted: usize,
}

/// Keep claims of known pharmacies and attach their revert status
///
/// Reverted claims lose their quantity and price so they count only toward the
/// reverted tally.
#[must_use]
pub fn enrich_claims(
    claims: Vec<ClaimRecord>,
    pharmacies: &PharmacyAllowList,
    reverts: &RevertIndex,
) -> (Vec<EnrichedClaim>, EnrichStats) {
    let mut stats = EnrichStats::default();
    let mut enriched = Vec::with_capacity(claims.len());

    for claim in claims {
        let Some(npi) = claim.npi.filter(|npi| pharmacies.contains(npi)) else {
            stats.unknown_pharmacy += 1;
            continue;
        };

        let revert = claim.id.as_deref().and_then(|id| reverts.get(id));
        let reverted = revert.is_some();
        if let Some(revert) = revert {
            stats.reverted += 1;
            log::trace!(
                "claim {} reverted by {}",
                revert.claim_id,
                revert.id.as_deref().unwrap_or("<no id>")
            );
        }

        enriched.push(EnrichedClaim {
            npi,
            ndc: claim.ndc,
            price: if reverted { None } else { claim.price },
            quantity: if reverted { None } else { claim.quantity },
            reverted,
        });
    }

    (enriched, stats)
}
