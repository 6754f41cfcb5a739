//! Network dimensioning by flow allocation.
//!
//! Given a fixed topology, a demand table, and a catalog of candidate
//! paths per demand, find how many traffic units each demand routes on
//! each of its paths so that:
//!
//! - **DAP**: the worst link overload `max_e (load − capacity)` is minimal, or
//! - **DDAP**: the total modular cost `Σ_e ξ(e) · ⌈load / M⌉` is minimal.
//!
//! # Key Types
//!
//! - [`Network`] / [`NetworkBuilder`]: validated, immutable input tables
//! - [`Allocation`]: the chromosome, one flow-split vector per demand
//! - [`Objective`]: DAP or DDAP, producing an [`Evaluation`]
//! - [`Crossover`] / [`Mutation`]: operator families
//! - [`AllocationProblem`]: plugs all of the above into [`crate::ga`]
//!
//! # Submodules
//!
//! - [`repair`]: feasibility projection for arbitrary integer vectors
//! - [`load`]: per-link load aggregation
//! - [`compare`]: operator comparison sweeps

mod allocation;
pub mod compare;
pub mod load;
mod model;
mod objective;
mod operators;
mod problem;
pub mod repair;

pub use allocation::Allocation;
pub use model::{
    Demand, DemandEntry, DemandId, Link, LinkId, Network, NetworkBuilder, NodeId,
    PathEntry,
};
pub use objective::{Evaluation, LinkDetail, Objective};
pub use operators::{Crossover, Mutation};
pub use problem::{AllocationProblem, Dimensioning};
