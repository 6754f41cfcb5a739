//! Network topology, demand table, and candidate-path catalog.
//!
//! A [`Network`] is immutable once built. [`NetworkBuilder`] collects the
//! three input tables and checks their structural integrity:
//! - Positive module granularity M
//! - Unique link and demand ids, finite non-negative link costs
//! - Every demand declares at least one path, and the catalog holds an
//!   entry for each index in `1..=path_count`
//! - Every path is non-empty and traverses known links only

use std::collections::HashMap;

use crate::error::NetworkError;

/// Link identifier, as used by the path catalog.
pub type LinkId = u32;

/// Demand identifier.
pub type DemandId = u32;

/// Node identifier (link and demand endpoints).
pub type NodeId = u32;

/// An edge of the topology.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Link id.
    pub id: LinkId,
    /// First endpoint.
    pub a: NodeId,
    /// Second endpoint.
    pub z: NodeId,
    /// Installed modules. Capacity is `modules × M`.
    pub modules: u32,
    /// Cost of one module (ξ).
    pub cost: f64,
}

impl Link {
    /// Creates a link.
    pub fn new(id: LinkId, a: NodeId, z: NodeId, modules: u32, cost: f64) -> Self {
        Self {
            id,
            a,
            z,
            modules,
            cost,
        }
    }

    /// Capacity in traffic units for module granularity `module_capacity`.
    pub fn capacity(&self, module_capacity: u32) -> u64 {
        u64::from(self.modules) * u64::from(module_capacity)
    }
}

/// A row of the demand table, before its paths are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandEntry {
    /// Demand id, unique in the table.
    pub id: DemandId,
    /// Source node.
    pub a: NodeId,
    /// Sink node.
    pub z: NodeId,
    /// Traffic units to place (h).
    pub volume: u32,
    /// Number of candidate paths P(d).
    pub path_count: usize,
}

/// A row of the path catalog: demand, 1-based path index, traversed links.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEntry {
    /// Demand this path serves.
    pub demand: DemandId,
    /// 1-based path index within the demand.
    pub index: usize,
    /// Links traversed, by id.
    pub links: Vec<LinkId>,
}

/// A demand with its resolved candidate paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demand {
    /// Demand id.
    pub id: DemandId,
    /// Source node.
    pub a: NodeId,
    /// Sink node.
    pub z: NodeId,
    /// Traffic units to place (h).
    pub volume: u32,
    /// Candidate paths in catalog order; `paths[i]` is path index `i + 1`.
    pub paths: Vec<Vec<LinkId>>,
}

impl Demand {
    /// Number of candidate paths P(d).
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

/// Collects the input tables and validates them into a [`Network`].
///
/// # Example
///
/// ```
/// use u_netdim::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new(1)
///     .link(1, 1, 2, 4, 1.0)
///     .link(2, 1, 3, 4, 1.0)
///     .link(3, 2, 3, 2, 1.0)
///     .demand(1, 1, 2, 3, 2)
///     .path(1, 1, vec![1])
///     .path(1, 2, vec![2, 3])
///     .build()
///     .unwrap();
/// assert_eq!(network.demands()[0].path_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkBuilder {
    /// Traffic units per module (M).
    pub module_capacity: u32,
    /// Link table.
    pub links: Vec<Link>,
    /// Demand table.
    pub demands: Vec<DemandEntry>,
    /// Catalog rows. A later row for the same (demand, index) replaces an
    /// earlier one.
    pub paths: Vec<PathEntry>,
}

impl NetworkBuilder {
    /// Starts a builder with module granularity `module_capacity` (M).
    pub fn new(module_capacity: u32) -> Self {
        Self {
            module_capacity,
            ..Self::default()
        }
    }

    /// Adds a link.
    pub fn link(mut self, id: LinkId, a: NodeId, z: NodeId, modules: u32, cost: f64) -> Self {
        self.links.push(Link::new(id, a, z, modules, cost));
        self
    }

    /// Adds a demand of `volume` units with `path_count` candidate paths.
    pub fn demand(
        mut self,
        id: DemandId,
        a: NodeId,
        z: NodeId,
        volume: u32,
        path_count: usize,
    ) -> Self {
        self.demands.push(DemandEntry {
            id,
            a,
            z,
            volume,
            path_count,
        });
        self
    }

    /// Adds the catalog entry for path `index` (1-based) of `demand`.
    pub fn path(mut self, demand: DemandId, index: usize, links: Vec<LinkId>) -> Self {
        self.paths.push(PathEntry {
            demand,
            index,
            links,
        });
        self
    }

    /// Validates the tables and builds the network.
    pub fn build(self) -> Result<Network, NetworkError> {
        if self.module_capacity == 0 {
            return Err(NetworkError::ZeroModuleCapacity);
        }

        let mut link_index = HashMap::with_capacity(self.links.len());
        for (idx, link) in self.links.iter().enumerate() {
            if link_index.insert(link.id, idx).is_some() {
                return Err(NetworkError::DuplicateLink(link.id));
            }
            if !link.cost.is_finite() || link.cost < 0.0 {
                return Err(NetworkError::InvalidCost {
                    link: link.id,
                    cost: link.cost,
                });
            }
        }

        let mut demand_index = HashMap::with_capacity(self.demands.len());
        let mut catalog: Vec<Vec<Option<Vec<LinkId>>>> = Vec::with_capacity(self.demands.len());
        for (idx, entry) in self.demands.iter().enumerate() {
            if demand_index.insert(entry.id, idx).is_some() {
                return Err(NetworkError::DuplicateDemand(entry.id));
            }
            if entry.path_count == 0 {
                return Err(NetworkError::NoPaths(entry.id));
            }
            catalog.push(vec![None; entry.path_count]);
        }

        for path in self.paths {
            let &d = demand_index
                .get(&path.demand)
                .ok_or(NetworkError::UnknownDemand(path.demand))?;
            let path_count = self.demands[d].path_count;
            if path.index == 0 || path.index > path_count {
                return Err(NetworkError::PathOutOfRange {
                    demand: path.demand,
                    path: path.index,
                    path_count,
                });
            }
            if path.links.is_empty() {
                return Err(NetworkError::EmptyPath {
                    demand: path.demand,
                    path: path.index,
                });
            }
            if let Some(&link) = path.links.iter().find(|l| !link_index.contains_key(*l)) {
                return Err(NetworkError::UnknownLink {
                    demand: path.demand,
                    path: path.index,
                    link,
                });
            }
            catalog[d][path.index - 1] = Some(path.links);
        }

        let mut demands = Vec::with_capacity(self.demands.len());
        let mut routes = Vec::with_capacity(self.demands.len());
        for (entry, slots) in self.demands.into_iter().zip(catalog) {
            let mut paths = Vec::with_capacity(slots.len());
            for (p, slot) in slots.into_iter().enumerate() {
                let links = slot.ok_or(NetworkError::MissingPath {
                    demand: entry.id,
                    path: p + 1,
                })?;
                paths.push(links);
            }
            let route: Vec<Vec<usize>> = paths
                .iter()
                .map(|links| links.iter().map(|id| link_index[id]).collect())
                .collect();
            routes.push(route);
            demands.push(Demand {
                id: entry.id,
                a: entry.a,
                z: entry.z,
                volume: entry.volume,
                paths,
            });
        }

        Ok(Network {
            module_capacity: self.module_capacity,
            links: self.links,
            demands,
            link_index,
            demand_index,
            routes,
        })
    }
}

/// Immutable network: links, demands, and the path → link mapping.
///
/// Links and demands keep their table order. Per-link outputs (loads,
/// overloads, module counts) are vectors aligned with [`links`](Self::links);
/// allocations are aligned with [`demands`](Self::demands).
#[derive(Debug, Clone)]
pub struct Network {
    module_capacity: u32,
    links: Vec<Link>,
    demands: Vec<Demand>,
    link_index: HashMap<LinkId, usize>,
    demand_index: HashMap<DemandId, usize>,
    /// `routes[d][p]` lists link positions traversed by path `p` of demand `d`.
    routes: Vec<Vec<Vec<usize>>>,
}

impl Network {
    /// The 4-node, 5-link, 6-demand instance with M = 1 and unit costs.
    ///
    /// Demands have 2 or 3 candidate paths each.
    pub fn reference() -> Self {
        NetworkBuilder::new(1)
            .link(1, 1, 2, 4, 1.0)
            .link(2, 1, 3, 4, 1.0)
            .link(3, 2, 3, 2, 1.0)
            .link(4, 2, 4, 4, 1.0)
            .link(5, 3, 4, 4, 1.0)
            .demand(1, 1, 2, 3, 3)
            .demand(2, 1, 3, 4, 3)
            .demand(3, 1, 4, 5, 2)
            .demand(4, 2, 3, 2, 3)
            .demand(5, 2, 4, 3, 3)
            .demand(6, 3, 4, 4, 3)
            .path(1, 1, vec![1])
            .path(1, 2, vec![2, 3])
            .path(1, 3, vec![2, 4, 5])
            .path(2, 1, vec![2])
            .path(2, 2, vec![1, 3])
            .path(2, 3, vec![1, 4, 5])
            .path(3, 1, vec![1, 4])
            .path(3, 2, vec![2, 5])
            .path(4, 1, vec![3])
            .path(4, 2, vec![1, 2])
            .path(4, 3, vec![4, 5])
            .path(5, 1, vec![4])
            .path(5, 2, vec![3, 5])
            .path(5, 3, vec![1, 2, 5])
            .path(6, 1, vec![5])
            .path(6, 2, vec![3, 4])
            .path(6, 3, vec![1, 2, 4])
            .build()
            .expect("reference network is well-formed")
    }

    /// Traffic units per module (M).
    pub fn module_capacity(&self) -> u32 {
        self.module_capacity
    }

    /// Links in table order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Demands in table order.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// Looks up a link by id.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.link_index.get(&id).map(|&i| &self.links[i])
    }

    /// Position of a link in [`links`](Self::links).
    pub fn link_position(&self, id: LinkId) -> Option<usize> {
        self.link_index.get(&id).copied()
    }

    /// Looks up a demand by id.
    pub fn demand(&self, id: DemandId) -> Option<&Demand> {
        self.demand_index.get(&id).map(|&i| &self.demands[i])
    }

    /// Position of a demand in [`demands`](Self::demands).
    pub fn demand_position(&self, id: DemandId) -> Option<usize> {
        self.demand_index.get(&id).copied()
    }

    /// Links traversed by path `index` (1-based) of demand `demand`.
    pub fn path(&self, demand: DemandId, index: usize) -> Option<&[LinkId]> {
        let d = self.demand(demand)?;
        index
            .checked_sub(1)
            .and_then(|p| d.paths.get(p))
            .map(Vec::as_slice)
    }

    /// Capacity of the link at `position`.
    pub fn capacity(&self, position: usize) -> u64 {
        self.links[position].capacity(self.module_capacity)
    }

    /// Link positions of path `path` (0-based) of the demand at `demand`.
    pub(crate) fn route(&self, demand: usize, path: usize) -> &[usize] {
        &self.routes[demand][path]
    }
}
