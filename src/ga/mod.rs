//! Genetic Algorithm framework.
//!
//! A generic, domain-agnostic (μ+λ) GA built on trait-based abstractions.
//! Users define their problem by implementing [`GaProblem`], which specifies
//! how to create, evaluate, crossover, and mutate individuals.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (μ, pair count, mutation rate, seed)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best individual and the per-generation trajectory
//!
//! # References
//!
//! - Schwefel (1981), *Numerical Optimization of Computer Models*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod runner;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use types::{Fitness, GaProblem, Individual};
