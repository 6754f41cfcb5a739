//! DAP and DDAP objective functions.
//!
//! - **DAP** (dimensioned network): `F = max_e (l(e) − C(e))` with
//!   `C(e) = modules(e) · M`. Not clamped, so an under-loaded network
//!   scores negative. Side output: `max(0, l(e) − C(e))` per link.
//! - **DDAP** (network to dimension): `F = Σ_e ξ(e) · ⌈l(e) / M⌉`.
//!   Side output: the module count `y(e) = ⌈l(e) / M⌉` per link.
//!
//! Both repair their input first and are deterministic.
//!
//! # Reference
//! Pióro & Medhi (2004), *Routing, Flow, and Capacity Design in
//! Communication and Computer Networks*, ch. 2

use std::borrow::Cow;

use super::allocation::Allocation;
use super::load::link_loads;
use super::model::{LinkId, Network};

/// Optimization objective, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Minimize the worst link overload.
    #[default]
    Dap,
    /// Minimize total modular link cost.
    Ddap,
}

/// Objective-specific per-link output, aligned with [`Network::links`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LinkDetail {
    /// DAP: positive part of `load − capacity`.
    Overload(Vec<u64>),
    /// DDAP: modules required to carry the load.
    Modules(Vec<u64>),
}

impl LinkDetail {
    /// The per-link values regardless of variant.
    pub fn values(&self) -> &[u64] {
        match self {
            LinkDetail::Overload(v) | LinkDetail::Modules(v) => v,
        }
    }
}

/// Result of evaluating an allocation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    /// Objective value. Lower is better.
    pub value: f64,
    /// Load per link, aligned with [`Network::links`].
    pub loads: Vec<u64>,
    /// Overload (DAP) or module count (DDAP) per link.
    pub detail: LinkDetail,
}

impl Evaluation {
    /// Load on the link with id `link`.
    pub fn load(&self, network: &Network, link: LinkId) -> Option<u64> {
        network
            .link_position(link)
            .and_then(|i| self.loads.get(i).copied())
    }

    /// Side-output value on the link with id `link`.
    pub fn detail_of(&self, network: &Network, link: LinkId) -> Option<u64> {
        network
            .link_position(link)
            .and_then(|i| self.detail.values().get(i).copied())
    }
}

impl Objective {
    /// Repairs `allocation` (on a copy, if needed), aggregates link loads,
    /// and scores them.
    pub fn evaluate(&self, network: &Network, allocation: &Allocation) -> Evaluation {
        let allocation = if allocation.is_feasible(network) {
            Cow::Borrowed(allocation)
        } else {
            Cow::Owned(allocation.repaired(network))
        };
        let loads = link_loads(network, &allocation);
        match self {
            Objective::Dap => dap(network, loads),
            Objective::Ddap => ddap(network, loads),
        }
    }
}

fn dap(network: &Network, loads: Vec<u64>) -> Evaluation {
    let mut worst: Option<i128> = None;
    let mut overload = Vec::with_capacity(loads.len());
    for (i, &load) in loads.iter().enumerate() {
        let capacity = network.capacity(i);
        let o = i128::from(load) - i128::from(capacity);
        worst = Some(worst.map_or(o, |w| w.max(o)));
        overload.push(load.saturating_sub(capacity));
    }
    Evaluation {
        value: worst.unwrap_or(0) as f64,
        loads,
        detail: LinkDetail::Overload(overload),
    }
}

fn ddap(network: &Network, loads: Vec<u64>) -> Evaluation {
    let m = u64::from(network.module_capacity());
    let modules: Vec<u64> = loads.iter().map(|&l| l.div_ceil(m)).collect();
    let value: f64 = network
        .links()
        .iter()
        .zip(&modules)
        .map(|(link, &y)| link.cost * y as f64)
        .sum();
    Evaluation {
        value,
        loads,
        detail: LinkDetail::Modules(modules),
    }
}
