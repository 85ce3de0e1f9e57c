//! Global reduction of partial aggregates

use rustc_hash::FxHashMap;

use crate::aggregate::partial::{GroupKey, GroupTotals, PartialAggregate};
use crate::config::FillsCounting;
use crate::models::MetricRow;
use crate::models::metrics::average_price;

#[derive(Debug, Clone, Copy, Default)]
struct ReducedGroup {
    totals: GroupTotals,
    /// Number of partials that contributed this key
    partitions: u64,
}

/// Folds partial aggregates into final metric rows
#[derive(Debug, Default)]
pub struct GlobalReducer {
    fills_counting: FillsCounting,
    groups: FxHashMap<GroupKey, ReducedGroup>,
}

impl GlobalReducer {
    #[must_use]
    pub fn new(fills_counting: FillsCounting) -> Self {
        Self {
            fills_counting,
            groups: FxHashMap::default(),
        }
    }

    /// Add one partial; merging order fixes the float summation order
    pub fn merge(&mut self, partial: &PartialAggregate) {
        log::trace!(
            "merging {} groups from {}",
            partial.len(),
            partial.source().display()
        );
        for (key, totals) in partial.iter() {
            let group = self.groups.entry(key.clone()).or_default();
            group.totals.reverted += totals.reverted;
            group.totals.fills += totals.fills;
            group.totals.sum_qty += totals.sum_qty;
            group.totals.total_price += totals.total_price;
            group.partitions += 1;
        }
    }

    /// Number of distinct `(npi, ndc)` keys merged so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Final rows sorted by `(npi, ndc)` with the average price derived
    #[must_use]
    pub fn finish(self) -> Vec<MetricRow> {
        let fills_counting = self.fills_counting;
        let mut rows: Vec<_> = self.groups.into_iter().collect();
        rows.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        rows.into_iter()
            .map(|(key, group)| MetricRow {
                npi: key.npi,
                ndc: key.ndc,
                reverted: group.totals.reverted,
                fills: match fills_counting {
                    FillsCounting::SumOfPartials => group.totals.fills,
                    FillsCounting::PartitionCount => group.partitions,
                },
                total_price: group.totals.total_price,
                avg_price: average_price(group.totals.total_price, group.totals.sum_qty),
            })
            .collect()
    }
}

/// Reduce partials in the given order
#[must_use]
pub fn reduce_partials(
    partials: &[PartialAggregate],
    fills_counting: FillsCounting,
) -> Vec<MetricRow> {
    let mut reducer = GlobalReducer::new(fills_counting);
    for partial in partials {
        reducer.merge(partial);
    }
    reducer.finish()
}
