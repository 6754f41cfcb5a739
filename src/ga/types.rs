//! Core trait definitions for the GA framework.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generic (μ+λ) engine and domain-specific problem
//! implementations.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable.
/// Lower fitness is considered better (minimization).
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Used for freshly created individuals that have not been evaluated.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and the trajectory.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution in the GA population.
///
/// Individuals carry their own cached fitness. The engine calls
/// [`GaProblem::evaluate`] and stores the value via
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this individual.
    fn fitness(&self) -> Self::Fitness;

    /// Sets the fitness of this individual.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines a GA optimization problem.
///
/// 1. **Initialization**: how to create random individuals
/// 2. **Evaluation**: how to compute fitness
/// 3. **Crossover**: how to recombine two parents into two children
/// 4. **Mutation**: how to perturb one child
///
/// Every operator receives the run's generator explicitly, so a fixed seed
/// reproduces the whole run.
///
/// # Thread Safety
///
/// `GaProblem` must be `Send + Sync` because the runner may evaluate
/// individuals in parallel when the `parallel` feature is enabled.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random, valid individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Evaluates an individual and returns its fitness.
    ///
    /// Must not draw randomness: the runner relies on evaluation being a
    /// pure function of the individual.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into exactly two children.
    ///
    /// The default implementation clones both parents (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        _rng: &mut R,
    ) -> (Self::Individual, Self::Individual) {
        (parent1.clone(), parent2.clone())
    }

    /// Mutates an individual in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Called at the end of each generation with the current best fitness.
    ///
    /// The default implementation is a no-op.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}
