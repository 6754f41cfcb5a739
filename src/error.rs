//! Error types for network construction and engine configuration.
//!
//! Optimization itself never fails: repair, load aggregation, objectives,
//! and genetic operators are total. Errors only surface when a network or
//! a configuration is built from caller-supplied values.

use crate::network::{DemandId, LinkId};

/// A structural problem found while building a [`Network`](crate::network::Network).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("module capacity must be positive")]
    ZeroModuleCapacity,
    #[error("duplicate link id: {0}")]
    DuplicateLink(LinkId),
    #[error("duplicate demand id: {0}")]
    DuplicateDemand(DemandId),
    #[error("link {link}: cost must be finite and non-negative, got {cost}")]
    InvalidCost { link: LinkId, cost: f64 },
    #[error("demand {0} has no candidate paths")]
    NoPaths(DemandId),
    #[error("demand {demand}: no catalog entry for path {path}")]
    MissingPath { demand: DemandId, path: usize },
    #[error("demand {demand}: path index {path} outside 1..={path_count}")]
    PathOutOfRange {
        demand: DemandId,
        path: usize,
        path_count: usize,
    },
    #[error("path entry for unknown demand {0}")]
    UnknownDemand(DemandId),
    #[error("demand {demand}: path {path} traverses no links")]
    EmptyPath { demand: DemandId, path: usize },
    #[error("demand {demand}: path {path} references unknown link {link}")]
    UnknownLink {
        demand: DemandId,
        path: usize,
        link: LinkId,
    },
}

/// An invalid [`GaConfig`](crate::ga::GaConfig) parameter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("pair_count must be at least 1")]
    NoPairs,
    #[error("max_generations must be at least 1")]
    NoGenerations,
    #[error("{name} must lie in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
}
