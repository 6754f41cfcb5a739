//! Per-link load aggregation.

use std::collections::BTreeMap;

use super::allocation::Allocation;
use super::model::{LinkId, Network};

/// Sums, for every link, the flow of each (demand, path) whose route
/// traverses it.
///
/// The result is aligned with [`Network::links`]. Flow entries beyond a
/// demand's path count and vectors beyond the demand count are ignored,
/// so the function is total; callers normally pass a feasible allocation.
pub fn link_loads(network: &Network, allocation: &Allocation) -> Vec<u64> {
    let mut loads = vec![0u64; network.links().len()];
    for (d, (demand, flows)) in network.demands().iter().zip(allocation.flows()).enumerate() {
        for (p, &units) in flows.iter().take(demand.path_count()).enumerate() {
            if units == 0 {
                continue;
            }
            for &link in network.route(d, p) {
                loads[link] += u64::from(units);
            }
        }
    }
    loads
}

/// Re-keys a link-aligned vector by link id.
pub fn by_link_id<T: Copy>(network: &Network, values: &[T]) -> BTreeMap<LinkId, T> {
    network
        .links()
        .iter()
        .zip(values)
        .map(|(l, &v)| (l.id, v))
        .collect()
}
