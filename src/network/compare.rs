//! Operator comparison sweeps.
//!
//! Runs one GA per (objective, crossover) combination under the same
//! configuration and seed, so differences come from the operator alone.

use super::model::Network;
use super::objective::Objective;
use super::operators::{Crossover, Mutation};
use super::problem::AllocationProblem;
use crate::error::ConfigError;
use crate::ga::GaConfig;

/// Best value reached by one combination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparisonRow {
    /// Objective minimized.
    pub objective: Objective,
    /// Crossover used.
    pub crossover: Crossover,
    /// Mutation used.
    pub mutation: Mutation,
    /// Best value after the last generation.
    pub best_value: f64,
    /// Best value of generation 0, before any offspring.
    pub initial_value: f64,
}

/// Runs every crossover in `crossovers` under every objective in
/// `objectives`, objective-major, with a fixed `mutation`.
///
/// An unseeded `config` gets one random seed shared by all runs.
pub fn compare_crossovers(
    network: &Network,
    config: &GaConfig,
    objectives: &[Objective],
    crossovers: &[Crossover],
    mutation: Mutation,
) -> Result<Vec<ComparisonRow>, ConfigError> {
    config.validate()?;
    mutation.validate()?;
    let config = match config.seed {
        Some(_) => config.clone(),
        None => config.clone().with_seed(rand::random()),
    };

    let mut rows = Vec::with_capacity(objectives.len() * crossovers.len());
    for &objective in objectives {
        for &crossover in crossovers {
            let result = AllocationProblem::new(network, objective)
                .with_crossover(crossover)
                .with_mutation(mutation)
                .solve(&config)?;
            rows.push(ComparisonRow {
                objective,
                crossover,
                mutation,
                best_value: result.value(),
                initial_value: result.trajectory[0],
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sweep_on_reference() {
        let net = Network::reference();
        let config = GaConfig::default().with_max_generations(40).with_seed(0);
        let rows = compare_crossovers(
            &net,
            &config,
            &[Objective::Dap, Objective::Ddap],
            &Crossover::ALL,
            Mutation::default(),
        )
        .unwrap();

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].objective, Objective::Dap);
        assert_eq!(rows[3].objective, Objective::Ddap);
        assert_eq!(rows[4].crossover, Crossover::OnePoint);
        for row in &rows {
            assert!(row.best_value <= row.initial_value, "{row:?}");
        }
    }

    #[test]
    fn test_shared_seed_gives_same_initial_population() {
        let net = Network::reference();
        let config = GaConfig::default().with_max_generations(5);
        let rows = compare_crossovers(
            &net,
            &config,
            &[Objective::Ddap],
            &Crossover::ALL,
            Mutation::RandomReset,
        )
        .unwrap();

        assert!(rows.iter().all(|r| r.initial_value == rows[0].initial_value));
    }

    #[test]
    fn test_sweep_rejects_bad_config() {
        let net = Network::reference();
        let config = GaConfig::default().with_population_size(0);
        let err = compare_crossovers(&net, &config, &[Objective::Dap], &Crossover::ALL, Mutation::default())
            .unwrap_err();
        assert_eq!(err, ConfigError::PopulationTooSmall(0));
    }
}
