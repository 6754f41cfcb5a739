//! Flow-allocation GA problem definition.
//!
//! Implements [`GaProblem`] for network dimensioning and bridges the
//! network model to the generic (μ+λ) engine.

use rand::Rng;
use tracing::{info, instrument};

use super::allocation::Allocation;
use super::model::Network;
use super::objective::{Evaluation, Objective};
use super::operators::{Crossover, Mutation};
use crate::error::ConfigError;
use crate::ga::{GaConfig, GaProblem, GaRunner};

/// GA problem: allocate every demand's volume over its candidate paths.
///
/// # Example
/// ```
/// use u_netdim::ga::GaConfig;
/// use u_netdim::network::{AllocationProblem, Crossover, Network, Objective};
///
/// let network = Network::reference();
/// let problem = AllocationProblem::new(&network, Objective::Ddap)
///     .with_crossover(Crossover::OnePoint);
/// let result = problem
///     .solve(&GaConfig::default().with_max_generations(20).with_seed(0))
///     .unwrap();
/// assert_eq!(result.trajectory.len(), 21);
/// assert!(result.allocation.is_feasible(&network));
/// ```
#[derive(Debug, Clone)]
pub struct AllocationProblem<'a> {
    network: &'a Network,
    objective: Objective,
    crossover: Crossover,
    mutation: Mutation,
}

impl<'a> AllocationProblem<'a> {
    /// Creates a problem with uniform-per-demand crossover and unit-shift
    /// mutation (q = 0.1).
    pub fn new(network: &'a Network, objective: Objective) -> Self {
        Self {
            network,
            objective,
            crossover: Crossover::default(),
            mutation: Mutation::default(),
        }
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Network being dimensioned.
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Objective this problem minimizes.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Runs the GA and evaluates the best allocation in full.
    #[instrument(level = "info", skip_all, fields(objective = ?self.objective, crossover = ?self.crossover))]
    pub fn solve(&self, config: &GaConfig) -> Result<Dimensioning, ConfigError> {
        self.mutation.validate()?;
        let result = GaRunner::run(self, config)?;
        let evaluation = self.objective.evaluate(self.network, &result.best);
        info!(value = evaluation.value, "dimensioning found");

        Ok(Dimensioning {
            objective: self.objective,
            allocation: result.best,
            evaluation,
            trajectory: result.fitness_history,
            generations: result.generations,
            seed: result.seed,
        })
    }
}

impl GaProblem for AllocationProblem<'_> {
    type Individual = Allocation;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Allocation {
        Allocation::random(self.network, rng)
    }

    fn evaluate(&self, individual: &Allocation) -> f64 {
        self.objective.evaluate(self.network, individual).value
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Allocation,
        parent2: &Allocation,
        rng: &mut R,
    ) -> (Allocation, Allocation) {
        self.crossover.apply(self.network, parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&self, individual: &mut Allocation, rng: &mut R) {
        self.mutation.apply(self.network, individual, rng);
    }
}

/// Outcome of a dimensioning run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dimensioning {
    /// Objective the run minimized.
    pub objective: Objective,
    /// Best feasible allocation.
    pub allocation: Allocation,
    /// Value, link loads, and side output of `allocation`.
    pub evaluation: Evaluation,
    /// Best value of generation 0 and after each generation.
    pub trajectory: Vec<f64>,
    /// Generations executed.
    pub generations: usize,
    /// Seed that reproduces this run.
    pub seed: u64,
}

impl Dimensioning {
    /// Objective value of the best allocation.
    pub fn value(&self) -> f64 {
        self.evaluation.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GaConfig {
        GaConfig::default().with_seed(0)
    }

    #[test]
    fn test_dap_result_consistent() {
        let net = Network::reference();
        let result = AllocationProblem::new(&net, Objective::Dap)
            .solve(&config())
            .unwrap();

        assert!(result.allocation.is_feasible(&net));
        // 26 link-units of traffic at best against 18 units of capacity:
        // some link carries at least 2 units of overload.
        assert!(result.value() >= 2.0, "got {}", result.value());
        assert!(result.value() <= result.trajectory[0]);
        let worst = *result.evaluation.detail.values().iter().max().unwrap();
        assert_eq!(worst as f64, result.value());
    }

    #[test]
    fn test_ddap_result_consistent() {
        let net = Network::reference();
        let result = AllocationProblem::new(&net, Objective::Ddap)
            .solve(&config())
            .unwrap();

        // Every demand needs at least one link per unit.
        let lower_bound: u32 = net.demands().iter().map(|d| d.volume).sum();
        assert!(result.value() >= f64::from(lower_bound));
        assert_eq!(result.value(), *result.trajectory.last().unwrap());
        assert_eq!(result.allocation.fitness, result.value());
    }

    #[test]
    fn test_trajectory_non_increasing_for_all_operators() {
        let net = Network::reference();
        for objective in [Objective::Dap, Objective::Ddap] {
            for crossover in Crossover::ALL {
                for mutation in [
                    Mutation::unit_shift(0.1),
                    Mutation::SwapDemands,
                    Mutation::RandomReset,
                ] {
                    let result = AllocationProblem::new(&net, objective)
                        .with_crossover(crossover)
                        .with_mutation(mutation)
                        .solve(&config().with_max_generations(30).with_mutation_rate(0.5))
                        .unwrap();
                    assert_eq!(result.trajectory.len(), 31);
                    for w in result.trajectory.windows(2) {
                        assert!(w[1] <= w[0], "{objective:?}/{crossover:?}/{mutation:?}");
                    }
                    assert!(result.allocation.is_feasible(&net));
                }
            }
        }
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let net = Network::reference();
        let problem = AllocationProblem::new(&net, Objective::Ddap).with_mutation(Mutation::RandomReset);
        let a = problem.solve(&config().with_seed(17)).unwrap();
        let b = problem.solve(&config().with_seed(17)).unwrap();
        assert_eq!(a.trajectory, b.trajectory);
        assert_eq!(a.allocation.flows(), b.allocation.flows());
    }

    #[test]
    fn test_invalid_gene_rate_rejected() {
        let net = Network::reference();
        let problem = AllocationProblem::new(&net, Objective::Dap)
            .with_mutation(Mutation::UnitShift { gene_rate: f64::NAN });
        assert!(matches!(
            problem.solve(&config()),
            Err(ConfigError::Probability { name: "gene_rate", .. })
        ));
    }

    #[test]
    fn test_invalid_ga_config_rejected() {
        let net = Network::reference();
        let problem = AllocationProblem::new(&net, Objective::Dap);
        let err = problem.solve(&config().with_pair_count(0)).unwrap_err();
        assert_eq!(err, ConfigError::NoPairs);
    }

    #[test]
    fn test_zero_volume_demand_runs() {
        let net = crate::network::NetworkBuilder::new(1)
            .link(1, 1, 2, 2, 1.0)
            .link(2, 1, 2, 2, 1.0)
            .demand(1, 1, 2, 0, 2)
            .demand(2, 1, 2, 3, 2)
            .path(1, 1, vec![1])
            .path(1, 2, vec![2])
            .path(2, 1, vec![1])
            .path(2, 2, vec![2])
            .build()
            .unwrap();
        let result = AllocationProblem::new(&net, Objective::Ddap)
            .solve(&config().with_max_generations(10))
            .unwrap();
        assert_eq!(result.allocation.flows()[0], vec![0, 0]);
        assert_eq!(result.value(), 3.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let net = Network::reference();
        let problem =
            AllocationProblem::new(&net, Objective::Ddap).with_mutation(Mutation::RandomReset);
        let base = config().with_seed(5).with_mutation_rate(0.5);
        let sequential = problem.solve(&base.clone().with_parallel(false)).unwrap();
        let parallel = problem.solve(&base.with_parallel(true)).unwrap();

        assert_eq!(sequential.trajectory, parallel.trajectory);
        assert_eq!(sequential.allocation.flows(), parallel.allocation.flows());
        assert_eq!(sequential.value(), parallel.value());
    }
}
