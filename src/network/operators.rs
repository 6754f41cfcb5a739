//! Crossover and mutation operators for flow allocations.
//!
//! # Crossover Operators
//!
//! - [`Crossover::UniformDemand`]: whole demand vectors swap with p = 0.5
//! - [`Crossover::OnePoint`]: per-demand cut, prefix of one parent + suffix
//!   of the other
//! - [`Crossover::UniformGene`]: every path entry swaps with p = 0.5
//!
//! # Mutation Operators
//!
//! - [`Mutation::UnitShift`]: per demand with probability `gene_rate`,
//!   move one unit from a loaded path to another path
//! - [`Mutation::SwapDemands`]: exchange the vectors of two demands that
//!   have the same path count
//! - [`Mutation::RandomReset`]: redraw one demand's vector from scratch
//!
//! Every operator ends with a repair, so its output is always feasible.
//! Mutations also repair their input first.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::trace;

use super::allocation::{random_split, Allocation};
use super::model::Network;
use crate::error::ConfigError;

/// Crossover strategy, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// For each demand, child 1 takes parent 1's vector and child 2 takes
    /// parent 2's, or the reverse, with equal probability.
    #[default]
    UniformDemand,
    /// For each demand, cut at a random index in `1..P(d)` (1 when
    /// P(d) = 1) and exchange tails.
    OnePoint,
    /// For each demand and path index, exchange the parents' entries with
    /// probability 0.5.
    UniformGene,
}

impl Crossover {
    /// All variants, in declaration order.
    pub const ALL: [Crossover; 3] = [
        Crossover::UniformDemand,
        Crossover::OnePoint,
        Crossover::UniformGene,
    ];

    /// Recombines two parents into two repaired children.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        network: &Network,
        parent1: &Allocation,
        parent2: &Allocation,
        rng: &mut R,
    ) -> (Allocation, Allocation) {
        let pairs = parent1.flows().iter().zip(parent2.flows());
        let (flows1, flows2): (Vec<Vec<u32>>, Vec<Vec<u32>>) = match self {
            Crossover::UniformDemand => pairs
                .map(|(a, b)| {
                    if rng.random_bool(0.5) {
                        (a.clone(), b.clone())
                    } else {
                        (b.clone(), a.clone())
                    }
                })
                .unzip(),
            Crossover::OnePoint => pairs
                .map(|(a, b)| {
                    let n = a.len();
                    let point = if n > 1 { rng.random_range(1..n) } else { 1 };
                    (splice(a, b, point), splice(b, a, point))
                })
                .unzip(),
            Crossover::UniformGene => pairs
                .map(|(a, b)| {
                    a.iter()
                        .zip(b)
                        .map(|(&x, &y)| if rng.random_bool(0.5) { (x, y) } else { (y, x) })
                        .unzip::<_, _, Vec<u32>, Vec<u32>>()
                })
                .unzip(),
        };

        let mut child1 = Allocation::from_flows(flows1);
        let mut child2 = Allocation::from_flows(flows2);
        child1.repair(network);
        child2.repair(network);
        (child1, child2)
    }
}

/// `prefix[..point]` followed by `suffix[point..]`.
fn splice(prefix: &[u32], suffix: &[u32], point: usize) -> Vec<u32> {
    prefix
        .iter()
        .take(point)
        .chain(suffix.iter().skip(point))
        .copied()
        .collect()
}

/// Mutation strategy, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// For every demand, with probability `gene_rate` (q), move one unit
    /// from a random loaded path to a different random path.
    UnitShift {
        /// Per-demand mutation probability.
        gene_rate: f64,
    },
    /// Exchange the full vectors of two distinct demands with equal path
    /// counts, chosen uniformly among all such pairs. No-op when no such
    /// pair exists.
    SwapDemands,
    /// Redraw one uniformly chosen demand as in initialization.
    RandomReset,
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::UnitShift { gene_rate: 0.1 }
    }
}

impl Mutation {
    /// Unit-shift mutation with per-demand probability `gene_rate`.
    pub fn unit_shift(gene_rate: f64) -> Self {
        Mutation::UnitShift {
            gene_rate: gene_rate.clamp(0.0, 1.0),
        }
    }

    /// Checks the operator's parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Mutation::UnitShift { gene_rate } if !(0.0..=1.0).contains(&gene_rate) => {
                Err(ConfigError::Probability {
                    name: "gene_rate",
                    value: gene_rate,
                })
            }
            _ => Ok(()),
        }
    }

    /// Mutates `allocation` in place; the result is feasible.
    pub fn apply<R: Rng + ?Sized>(&self, network: &Network, allocation: &mut Allocation, rng: &mut R) {
        allocation.repair(network);
        match *self {
            Mutation::UnitShift { gene_rate } => unit_shift(allocation, gene_rate, rng),
            Mutation::SwapDemands => swap_demands(network, allocation, rng),
            Mutation::RandomReset => random_reset(network, allocation, rng),
        }
        allocation.repair(network);
    }
}

fn unit_shift<R: Rng + ?Sized>(allocation: &mut Allocation, gene_rate: f64, rng: &mut R) {
    for flows in allocation.flows.iter_mut() {
        if rng.random::<f64>() >= gene_rate || flows.len() < 2 {
            continue;
        }
        let loaded: Vec<usize> = (0..flows.len()).filter(|&i| flows[i] > 0).collect();
        let Some(&from) = loaded.choose(rng) else {
            continue;
        };
        let mut to = rng.random_range(0..flows.len() - 1);
        if to >= from {
            to += 1;
        }
        flows[from] -= 1;
        flows[to] += 1;
    }
}

fn swap_demands<R: Rng + ?Sized>(network: &Network, allocation: &mut Allocation, rng: &mut R) {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (d, demand) in network.demands().iter().enumerate() {
        groups.entry(demand.path_count()).or_default().push(d);
    }

    let total: usize = groups.values().map(|g| g.len() * (g.len() - 1) / 2).sum();
    if total == 0 {
        return;
    }

    // Pick the r-th unordered pair across all groups.
    let mut r = rng.random_range(0..total);
    for group in groups.values() {
        let n = group.len();
        let pairs = n * (n - 1) / 2;
        if r >= pairs {
            r -= pairs;
            continue;
        }
        for i in 0..n {
            let row = n - 1 - i;
            if r < row {
                let (a, b) = (group[i], group[i + 1 + r]);
                trace!(a, b, "swapping demand vectors");
                allocation.flows.swap(a, b);
                return;
            }
            r -= row;
        }
    }
}

fn random_reset<R: Rng + ?Sized>(network: &Network, allocation: &mut Allocation, rng: &mut R) {
    if network.demands().is_empty() {
        return;
    }
    let d = rng.random_range(0..network.demands().len());
    let demand = &network.demands()[d];
    allocation.flows[d] = random_split(demand.volume, demand.path_count(), rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parents(seed: u64) -> (Network, Allocation, Allocation, StdRng) {
        let net = Network::reference();
        let mut rng = StdRng::seed_from_u64(seed);
        let p1 = Allocation::random(&net, &mut rng);
        let p2 = Allocation::random(&net, &mut rng);
        (net, p1, p2, rng)
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice(&[1, 2, 3], &[7, 8, 9], 1), vec![1, 8, 9]);
        assert_eq!(splice(&[1, 2, 3], &[7, 8, 9], 2), vec![1, 2, 9]);
        assert_eq!(splice(&[5], &[6], 1), vec![5]);
    }

    #[test]
    fn test_uniform_demand_moves_whole_vectors() {
        let (net, p1, p2, mut rng) = parents(1);
        let (c1, c2) = Crossover::UniformDemand.apply(&net, &p1, &p2, &mut rng);
        for d in 0..net.demands().len() {
            let from_p1 = c1.flows()[d] == p1.flows()[d] && c2.flows()[d] == p2.flows()[d];
            let from_p2 = c1.flows()[d] == p2.flows()[d] && c2.flows()[d] == p1.flows()[d];
            assert!(from_p1 || from_p2);
        }
    }

    #[test]
    fn test_one_point_single_path_keeps_parents() {
        let net = NetworkBuilder::new(1)
            .link(1, 1, 2, 1, 1.0)
            .demand(1, 1, 2, 4, 1)
            .path(1, 1, vec![1])
            .build()
            .unwrap();
        let p1 = Allocation::from_flows(vec![vec![4]]);
        let p2 = Allocation::from_flows(vec![vec![4]]);
        let mut rng = StdRng::seed_from_u64(0);
        let (c1, c2) = Crossover::OnePoint.apply(&net, &p1, &p2, &mut rng);
        assert_eq!(c1.flows(), p1.flows());
        assert_eq!(c2.flows(), p2.flows());
    }

    #[test]
    fn test_one_point_two_paths_exchanges_tail() {
        let net = NetworkBuilder::new(1)
            .link(1, 1, 2, 1, 1.0)
            .link(2, 1, 2, 1, 1.0)
            .demand(1, 1, 2, 4, 2)
            .path(1, 1, vec![1])
            .path(1, 2, vec![2])
            .build()
            .unwrap();
        let p1 = Allocation::from_flows(vec![vec![4, 0]]);
        let p2 = Allocation::from_flows(vec![vec![0, 4]]);
        let mut rng = StdRng::seed_from_u64(0);
        let (c1, c2) = Crossover::OnePoint.apply(&net, &p1, &p2, &mut rng);
        // Cut is always 1: [4] + [4] and [0] + [0], then repaired.
        assert_eq!(c1.flows(), &[vec![2, 2]]);
        assert_eq!(c2.flows(), &[vec![4, 0]]);
    }

    #[test]
    fn test_unit_shift_moves_one_unit() {
        let net = Network::reference();
        let mut rng = StdRng::seed_from_u64(4);
        let original = Allocation::random(&net, &mut rng);
        let mut mutated = original.clone();
        Mutation::unit_shift(1.0).apply(&net, &mut mutated, &mut rng);

        for (a, b) in original.flows().iter().zip(mutated.flows()) {
            let moved: u32 = a.iter().zip(b).map(|(&x, &y)| x.abs_diff(y)).sum();
            assert_eq!(moved, 2, "{a:?} -> {b:?}");
        }
    }

    #[test]
    fn test_unit_shift_zero_rate_is_noop() {
        let net = Network::reference();
        let mut rng = StdRng::seed_from_u64(4);
        let original = Allocation::random(&net, &mut rng);
        let mut mutated = original.clone();
        Mutation::unit_shift(0.0).apply(&net, &mut mutated, &mut rng);
        assert_eq!(original.flows(), mutated.flows());
    }

    #[test]
    fn test_unit_shift_skips_single_path_and_empty() {
        let net = NetworkBuilder::new(1)
            .link(1, 1, 2, 1, 1.0)
            .link(2, 1, 2, 1, 1.0)
            .demand(1, 1, 2, 3, 1)
            .demand(2, 1, 2, 0, 2)
            .path(1, 1, vec![1])
            .path(2, 1, vec![1])
            .path(2, 2, vec![2])
            .build()
            .unwrap();
        let mut alloc = Allocation::from_flows(vec![vec![3], vec![0, 0]]);
        let mut rng = StdRng::seed_from_u64(8);
        Mutation::unit_shift(1.0).apply(&net, &mut alloc, &mut rng);
        assert_eq!(alloc.flows(), &[vec![3], vec![0, 0]]);
    }

    #[test]
    fn test_swap_demands_requires_equal_path_counts() {
        let net = NetworkBuilder::new(1)
            .link(1, 1, 2, 1, 1.0)
            .link(2, 1, 2, 1, 1.0)
            .demand(1, 1, 2, 3, 1)
            .demand(2, 1, 2, 3, 2)
            .path(1, 1, vec![1])
            .path(2, 1, vec![1])
            .path(2, 2, vec![2])
            .build()
            .unwrap();
        let mut alloc = Allocation::from_flows(vec![vec![3], vec![1, 2]]);
        let mut rng = StdRng::seed_from_u64(2);
        Mutation::SwapDemands.apply(&net, &mut alloc, &mut rng);
        assert_eq!(alloc.flows(), &[vec![3], vec![1, 2]]);
    }

    #[test]
    fn test_swap_demands_rescales_to_volume() {
        let net = NetworkBuilder::new(1)
            .link(1, 1, 2, 1, 1.0)
            .link(2, 1, 2, 1, 1.0)
            .demand(1, 1, 2, 2, 2)
            .demand(2, 1, 2, 4, 2)
            .path(1, 1, vec![1])
            .path(1, 2, vec![2])
            .path(2, 1, vec![1])
            .path(2, 2, vec![2])
            .build()
            .unwrap();
        let mut alloc = Allocation::from_flows(vec![vec![2, 0], vec![1, 3]]);
        let mut rng = StdRng::seed_from_u64(2);
        Mutation::SwapDemands.apply(&net, &mut alloc, &mut rng);
        // [1, 3] scaled to 2 units: floor(0.5)=0, floor(1.5)=1, +1 on path 1.
        assert_eq!(alloc.flows(), &[vec![1, 1], vec![4, 0]]);
    }

    #[test]
    fn test_swap_demands_pairs_cover_groups() {
        let net = Network::reference();
        let mut seen = std::collections::HashSet::new();
        let mut rng = StdRng::seed_from_u64(6);
        // Distinct volumes make every swapped pair visible after repair.
        let base = Allocation::from_flows(vec![
            vec![3, 0, 0],
            vec![0, 4, 0],
            vec![5, 0],
            vec![0, 0, 2],
            vec![1, 1, 1],
            vec![2, 2, 0],
        ]);
        for _ in 0..400 {
            let mut alloc = base.clone();
            Mutation::SwapDemands.apply(&net, &mut alloc, &mut rng);
            assert_eq!(alloc.flows()[2], vec![5, 0], "demand 3 has no partner");
            let changed: Vec<usize> = (0..6).filter(|&d| alloc.flows()[d] != base.flows()[d]).collect();
            assert_eq!(changed.len(), 2);
            seen.insert((changed[0], changed[1]));
        }
        // C(5, 2) pairs among the five 3-path demands.
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn test_random_reset_touches_one_demand() {
        let net = Network::reference();
        let mut rng = StdRng::seed_from_u64(13);
        let original = Allocation::random(&net, &mut rng);
        let mut mutated = original.clone();
        Mutation::RandomReset.apply(&net, &mut mutated, &mut rng);
        let changed = original
            .flows()
            .iter()
            .zip(mutated.flows())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1);
        assert!(mutated.is_feasible(&net));
    }

    #[test]
    fn test_mutation_validate() {
        assert!(Mutation::default().validate().is_ok());
        assert!(Mutation::SwapDemands.validate().is_ok());
        let bad = Mutation::UnitShift { gene_rate: 1.5 };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::Probability { name: "gene_rate", .. })
        ));
        assert_eq!(Mutation::unit_shift(7.0), Mutation::UnitShift { gene_rate: 1.0 });
    }

    proptest! {
        #[test]
        fn prop_crossover_children_feasible(seed in any::<u64>()) {
            let (net, p1, p2, mut rng) = parents(seed);
            for op in Crossover::ALL {
                let (c1, c2) = op.apply(&net, &p1, &p2, &mut rng);
                prop_assert!(c1.is_feasible(&net), "{:?}", op);
                prop_assert!(c2.is_feasible(&net), "{:?}", op);
            }
        }

        #[test]
        fn prop_mutation_preserves_volume(seed in any::<u64>(), rate in 0.0f64..=1.0) {
            let (net, p1, _, mut rng) = parents(seed);
            for op in [Mutation::unit_shift(rate), Mutation::SwapDemands, Mutation::RandomReset] {
                let mut child = p1.clone();
                op.apply(&net, &mut child, &mut rng);
                prop_assert!(child.is_feasible(&net), "{:?}", op);
            }
        }

        #[test]
        fn prop_mutation_repairs_infeasible_input(
            raw in proptest::collection::vec(proptest::collection::vec(0u32..20, 0..5), 0..8),
            seed in any::<u64>(),
        ) {
            let net = Network::reference();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut alloc = Allocation::from_flows(raw);
            Mutation::unit_shift(0.5).apply(&net, &mut alloc, &mut rng);
            prop_assert!(alloc.is_feasible(&net));
        }
    }
}
