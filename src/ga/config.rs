//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the (μ+λ) loop.

use crate::error::ConfigError;

/// Configuration for the (μ+λ) genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_netdim::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.pair_count, 10);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_netdim::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_pair_count(25)
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of individuals kept after each truncation (μ, or N).
    pub population_size: usize,

    /// Number of parent pairs sampled per generation (K).
    ///
    /// Each pair yields two children, so λ = 2K.
    pub pair_count: usize,

    /// Probability of mutating a child as a whole (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of generations to run. The run never stops early.
    pub max_generations: usize,

    /// Whether to evaluate individuals on the rayon pool.
    ///
    /// Only honored with the `parallel` feature. Evaluation draws no
    /// randomness, so a seeded run gives the same result either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            pair_count: 10,
            mutation_rate: 0.1,
            max_generations: 100,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of parent pairs per generation.
    pub fn with_pair_count(mut self, k: usize) -> Self {
        self.pair_count = k;
        self
    }

    /// Sets the whole-child mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.pair_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Probability {
                name: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        Ok(())
    }
}
