//! Evolutionary network dimensioning.
//!
//! Searches for a feasible allocation of traffic demands onto predefined
//! candidate paths of a fixed network with a (μ+λ) genetic algorithm,
//! minimizing either the worst link overload (DAP) or the total modular
//! link cost (DDAP).
//!
//! - [`ga`]: Generic (μ+λ) engine with pluggable problem definitions.
//! - [`network`]: Topology, demands, path catalog, the flow-allocation
//!   chromosome, repair, objectives, and genetic operators.
//! - [`error`]: Construction and configuration errors.
//!
//! # Example
//!
//! ```
//! use u_netdim::ga::GaConfig;
//! use u_netdim::network::{AllocationProblem, Mutation, Network, Objective};
//!
//! let network = Network::reference();
//! let result = AllocationProblem::new(&network, Objective::Dap)
//!     .with_mutation(Mutation::unit_shift(0.2))
//!     .solve(&GaConfig::default().with_seed(1))
//!     .unwrap();
//!
//! println!("F = {}", result.value());
//! for (demand, flows) in result.allocation.by_demand(&network) {
//!     println!("demand {demand}: {flows:?}");
//! }
//! ```

pub mod error;
pub mod ga;
pub mod network;

#[cfg(feature = "wasm")]
mod wasm;
