//! Flow-allocation chromosome.
//!
//! # Encoding
//!
//! One integer flow-split vector per demand, in network demand order.
//! Entry `i` of demand `d`'s vector is the number of traffic units routed
//! on candidate path `i + 1`. An allocation is feasible when, for every
//! demand, the vector has exactly P(d) entries summing to the demand
//! volume. Non-negativity holds by construction.

use std::collections::BTreeMap;

use rand::Rng;

use super::model::{DemandId, Network};
use crate::ga::{Fitness, Individual};

/// A flow allocation over every demand's candidate paths.
///
/// Lower fitness = better (minimization convention).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Allocation {
    pub(crate) flows: Vec<Vec<u32>>,
    pub(crate) fitness: f64,
}

impl Individual for Allocation {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl Allocation {
    /// Wraps raw flow vectors, one per demand in network order.
    ///
    /// No invariant is checked; call [`repair`](Self::repair) before
    /// relying on feasibility.
    pub fn from_flows(flows: Vec<Vec<u32>>) -> Self {
        Self {
            flows,
            fitness: f64::worst(),
        }
    }

    /// Creates a random feasible allocation.
    ///
    /// Each unit of every demand independently picks a uniform path.
    pub fn random<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Self {
        let flows = network
            .demands()
            .iter()
            .map(|d| random_split(d.volume, d.path_count(), rng))
            .collect();
        Self::from_flows(flows)
    }

    /// Flow vectors in network demand order.
    pub fn flows(&self) -> &[Vec<u32>] {
        &self.flows
    }

    /// Flow vector of the demand with id `demand`.
    pub fn flows_of(&self, network: &Network, demand: DemandId) -> Option<&[u32]> {
        let d = network.demand_position(demand)?;
        self.flows.get(d).map(Vec::as_slice)
    }

    /// Flow vectors keyed by demand id.
    pub fn by_demand(&self, network: &Network) -> BTreeMap<DemandId, Vec<u32>> {
        network
            .demands()
            .iter()
            .zip(&self.flows)
            .map(|(d, f)| (d.id, f.clone()))
            .collect()
    }

    /// Checks vector count, vector lengths, and per-demand volume sums.
    pub fn is_feasible(&self, network: &Network) -> bool {
        self.flows.len() == network.demands().len()
            && network
                .demands()
                .iter()
                .zip(&self.flows)
                .all(|(d, f)| {
                    f.len() == d.path_count()
                        && f.iter().map(|&x| u64::from(x)).sum::<u64>() == u64::from(d.volume)
                })
    }
}

/// Distributes `volume` units over `path_count` paths, one uniform draw
/// per unit.
pub(crate) fn random_split<R: Rng + ?Sized>(
    volume: u32,
    path_count: usize,
    rng: &mut R,
) -> Vec<u32> {
    let mut flows = vec![0u32; path_count];
    for _ in 0..volume {
        flows[rng.random_range(0..path_count)] += 1;
    }
    flows
}
