//! (μ+λ) evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → pair sampling → crossover → mutation →
//! evaluation → merge and truncate → repeat.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::ConfigError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual of the final population.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Total number of generations executed.
    pub generations: usize,

    /// Seed the run's generator was created from.
    ///
    /// Equal to `GaConfig::seed` when one was given; feeding it back
    /// reproduces the run.
    pub seed: u64,

    /// Best fitness of generation 0 followed by the best after each
    /// generation. Length is `generations + 1`.
    pub fitness_history: Vec<f64>,
}

/// Executes the (μ+λ) loop.
///
/// Every generation samples `pair_count` parent pairs uniformly (with
/// replacement across pairs, distinct within a pair), produces two
/// children per pair, mutates each child with probability
/// `mutation_rate`, then keeps the `population_size` best of parents and
/// children. Sorting is stable, so on ties parents rank ahead of children
/// and earlier children ahead of later ones.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// Returns an error only if `config` fails [`GaConfig::validate`].
    #[instrument(
        level = "info",
        skip_all,
        fields(
            population = config.population_size,
            pairs = config.pair_count,
            generations = config.max_generations,
        )
    )]
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let mu = config.population_size;

        // 1. Initialize and evaluate generation 0
        let mut population: Vec<P::Individual> = (0..mu)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);
        sort_by_fitness(&mut population);

        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(population[0].fitness().to_f64());
        info!(seed, initial_best = fitness_history[0], "starting evolution");

        // 2. Evolutionary loop
        for gen in 1..=config.max_generations {
            let mut offspring = Vec::with_capacity(2 * config.pair_count);

            for _ in 0..config.pair_count {
                let (i, j) = sample_pair(population.len(), &mut rng);
                let (mut c1, mut c2) = problem.crossover(&population[i], &population[j], &mut rng);

                if rng.random_bool(config.mutation_rate) {
                    problem.mutate(&mut c1, &mut rng);
                }
                if rng.random_bool(config.mutation_rate) {
                    problem.mutate(&mut c2, &mut rng);
                }

                offspring.push(c1);
                offspring.push(c2);
            }

            evaluate_population(problem, &mut offspring, config.parallel);

            // (μ+λ) replacement: parents first so ties keep them
            population.append(&mut offspring);
            sort_by_fitness(&mut population);
            population.truncate(mu);

            let best_fitness = population[0].fitness();
            fitness_history.push(best_fitness.to_f64());
            debug!(generation = gen, best = best_fitness.to_f64());

            problem.on_generation(gen, best_fitness);
        }

        let best = population.swap_remove(0);
        info!(best = best.fitness().to_f64(), "evolution finished");

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations: config.max_generations,
            seed,
            fitness_history,
        })
    }
}

/// Draws two distinct indices uniformly from `0..len`.
///
/// `len` must be at least 2, which [`GaConfig::validate`] guarantees.
fn sample_pair<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.random_range(0..len);
    let mut j = rng.random_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

/// Stable ascending sort (best first).
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Evaluate all individuals in the population.
#[cfg(feature = "parallel")]
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        evaluate_sequential(problem, population);
    }
}

/// Evaluate all individuals in the population.
#[cfg(not(feature = "parallel"))]
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    _parallel: bool,
) {
    evaluate_sequential(problem, population);
}

fn evaluate_sequential<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

// ============================================================================
// Tests
// ============================================================================
