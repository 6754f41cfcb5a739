//! Feasibility repair.
//!
//! Projects arbitrary integer flow vectors onto the feasible set: length
//! P(d), non-negative entries, sum equal to the demand volume h.
//!
//! # Algorithm (per demand)
//!
//! 1. Truncate or zero-pad to P(d); clamp negatives to 0.
//! 2. Sum equals h: keep.
//! 3. Sum is 0: put all of h on path 1.
//! 4. Otherwise scale each entry to `floor(x · h / sum)`, then hand out
//!    the shortfall one unit at a time round-robin from path 1. An
//!    overshoot (unreachable with flooring) is removed one unit at a time
//!    from positive entries in path order.
//!
//! Repair never fails and is idempotent on feasible input.

use std::collections::BTreeMap;

use tracing::trace;

use super::allocation::Allocation;
use super::model::{DemandId, Network};

/// Repairs one raw integer vector for a demand of `volume` units over
/// `path_count` paths.
pub fn repair_vector(volume: u32, path_count: usize, raw: &[i64]) -> Vec<u32> {
    project(
        volume,
        path_count,
        raw.iter().map(|&x| x.max(0) as u64).collect(),
    )
}

/// Repairs one real-valued vector: entries are rounded to the nearest
/// integer (ties to even) before [`repair_vector`] semantics apply.
///
/// NaN entries count as 0.
pub fn repair_rounded(volume: u32, path_count: usize, raw: &[f64]) -> Vec<u32> {
    project(
        volume,
        path_count,
        raw.iter()
            .map(|&x| {
                let r = x.round_ties_even();
                if r > 0.0 {
                    r as u64
                } else {
                    0
                }
            })
            .collect(),
    )
}

/// Repairs a keyed collection of raw vectors into a feasible allocation.
///
/// Demands absent from `raw` are treated as all-zero and receive their
/// whole volume on path 1. Keys naming no demand are ignored.
pub fn repair_map(network: &Network, raw: &BTreeMap<DemandId, Vec<i64>>) -> Allocation {
    let flows = network
        .demands()
        .iter()
        .map(|d| {
            let g = raw.get(&d.id).map(Vec::as_slice).unwrap_or(&[]);
            repair_vector(d.volume, d.path_count(), g)
        })
        .collect();
    Allocation::from_flows(flows)
}

impl Allocation {
    /// Repairs this allocation in place against `network`.
    ///
    /// Missing demand vectors are added, surplus ones dropped, and every
    /// vector that violates its demand's invariants is projected.
    pub fn repair(&mut self, network: &Network) {
        self.flows.resize(network.demands().len(), Vec::new());
        for (demand, flows) in network.demands().iter().zip(self.flows.iter_mut()) {
            let path_count = demand.path_count();
            let sum: u64 = flows.iter().map(|&x| u64::from(x)).sum();
            if flows.len() == path_count && sum == u64::from(demand.volume) {
                continue;
            }
            let raw = flows.iter().map(|&x| u64::from(x)).collect();
            *flows = project(demand.volume, path_count, raw);
        }
    }

    /// Returns a repaired copy.
    pub fn repaired(&self, network: &Network) -> Allocation {
        let mut copy = self.clone();
        copy.repair(network);
        copy
    }
}

fn project(volume: u32, path_count: usize, mut g: Vec<u64>) -> Vec<u32> {
    g.resize(path_count, 0);

    let h = u128::from(volume);
    let sum: u128 = g.iter().map(|&x| u128::from(x)).sum();

    if sum == h {
        // Every entry is at most h, so it fits.
        return g.into_iter().map(|x| x as u32).collect();
    }

    if sum == 0 {
        let mut flows = vec![0; path_count];
        if let Some(first) = flows.first_mut() {
            *first = volume;
        }
        return flows;
    }

    trace!(volume, path_count, "rescaling flow vector");

    let mut scaled: Vec<u32> = g
        .iter()
        .map(|&x| (u128::from(x) * h / sum) as u32)
        .collect();
    let assigned: i64 = scaled.iter().map(|&x| i64::from(x)).sum();
    let mut diff = i64::from(volume) - assigned;

    let mut i = 0;
    while diff > 0 {
        scaled[i % path_count] += 1;
        diff -= 1;
        i += 1;
    }

    while diff < 0 {
        for x in scaled.iter_mut() {
            if diff == 0 {
                break;
            }
            if *x > 0 {
                *x -= 1;
                diff += 1;
            }
        }
    }

    scaled
}
