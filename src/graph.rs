//! Compact representation of a weighted undirected graph.
//!
//! Adjacency lives in a single arena of parallel `neighbor_ids`/`edge_weights`
//! arrays; each node owns a contiguous slice described by a cumulative-degree
//! prefix sum. The optimizer scans these slices on every pass, so the layout
//! favors cache locality over per-node flexibility. A graph is built once,
//! from an edge list or from a coarsened partition, and never mutated
//! afterwards.
//!
//! ## Self-loops
//!
//! A self-loop has both of its endpoints at the same node, so an input record
//! `(u, u, w)` contributes `w` twice to `u`'s aggregated adjacency entry.
//! Under that convention [`Graph::weighted_degree`] is the plain sum of a
//! node's stored incident weights and `total_weight == Σ weighted_degree(i)`
//! holds with no special cases.

use std::collections::BTreeMap;

use hashbrown::HashMap as FastMap;
use itertools::Itertools;

use crate::error::CommunityError;

/// Dense internal node id, contiguous in `0..node_count`.
pub type NodeId = usize;

/// One undirected input edge between two externally-named endpoints.
///
/// Endpoint ids are arbitrary non-negative integers; densification happens in
/// [`Graph::from_edges`]. Duplicate records are allowed and sum their weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: u64,
    pub target: u64,
    pub weight: f64,
}

impl Edge {
    /// Unit-weight edge.
    pub fn new(source: u64, target: u64) -> Self {
        Self {
            source,
            target,
            weight: 1.0,
        }
    }

    /// Explicitly weighted edge.
    pub fn weighted(source: u64, target: u64, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

/// Immutable-after-construction weighted undirected graph.
///
/// Every structural change (coarsening a partition into super-nodes) produces
/// a new `Graph`; no mutation is exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    node_count: usize,
    /// `m2`: twice the total edge weight, the modularity normalizer.
    total_weight: f64,
    /// Prefix sums; node `i` owns `cumulative_degree[i-1]..cumulative_degree[i]`
    /// of the arenas (with an implicit 0 for `i == 0`).
    cumulative_degree: Vec<usize>,
    neighbor_ids: Vec<NodeId>,
    edge_weights: Vec<f64>,
    /// External node id -> dense internal id. After a coarsening step this
    /// maps external ids through to super-node ids.
    original_id_map: FastMap<u64, NodeId>,
}

impl Graph {
    /// Build a graph from an edge list.
    ///
    /// The node universe is exactly the set of ids appearing as an endpoint;
    /// dense ids are assigned in increasing original-id order. Duplicate
    /// edges sum their weights and self-loops are accepted.
    ///
    /// Returns [`CommunityError::InvalidEdge`] for a non-finite or negative
    /// weight; no partial graph is returned.
    pub fn from_edges(edges: &[Edge]) -> Result<Self, CommunityError> {
        Self::from_nodes_and_edges(&[], edges)
    }

    /// Same as [`Graph::from_edges`], with the node universe widened to the
    /// union of `nodes` and the edge endpoints, so edge-less nodes can be
    /// represented.
    pub fn from_nodes_and_edges(nodes: &[u64], edges: &[Edge]) -> Result<Self, CommunityError> {
        for edge in edges {
            let reason = if !edge.weight.is_finite() {
                Some("weight is not finite")
            } else if edge.weight < 0.0 {
                Some("weight is negative")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CommunityError::InvalidEdge {
                    source: edge.source,
                    target: edge.target,
                    weight: edge.weight,
                    reason,
                });
            }
        }

        // First pass: discover the id universe and densify in increasing
        // original-id order.
        let mut ids: Vec<u64> = nodes
            .iter()
            .copied()
            .chain(edges.iter().flat_map(|e| [e.source, e.target]))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let mut original_id_map = FastMap::with_capacity(ids.len());
        for (dense, &original) in ids.iter().enumerate() {
            original_id_map.insert(original, dense);
        }

        // Aggregate parallel edges per node; a self-loop lands on its node
        // from both endpoints.
        let mut adjacency: Vec<BTreeMap<NodeId, f64>> = vec![BTreeMap::new(); ids.len()];
        for edge in edges {
            let u = original_id_map[&edge.source];
            let v = original_id_map[&edge.target];
            *adjacency[u].entry(v).or_insert(0.0) += edge.weight;
            *adjacency[v].entry(u).or_insert(0.0) += edge.weight;
        }
        let adjacency: Vec<Vec<(NodeId, f64)>> = adjacency
            .into_iter()
            .map(|list| list.into_iter().collect())
            .collect();

        Ok(Self::from_adjacency(adjacency, original_id_map))
    }

    /// Second construction pass, shared with coarsening: fill the pre-sized
    /// arenas from dense, aggregated, sorted adjacency lists.
    ///
    /// The arena invariants are checked here, once, so queries can trust the
    /// slice bounds afterwards.
    pub(crate) fn from_adjacency(
        adjacency: Vec<Vec<(NodeId, f64)>>,
        original_id_map: FastMap<u64, NodeId>,
    ) -> Self {
        let node_count = adjacency.len();
        let mut cumulative_degree = Vec::with_capacity(node_count);
        let mut entries = 0usize;
        for list in &adjacency {
            entries += list.len();
            cumulative_degree.push(entries);
        }

        let mut neighbor_ids = Vec::with_capacity(entries);
        let mut edge_weights = Vec::with_capacity(entries);
        for list in adjacency {
            for (neighbor, weight) in list {
                neighbor_ids.push(neighbor);
                edge_weights.push(weight);
            }
        }
        let total_weight = edge_weights.iter().sum();

        let graph = Self {
            node_count,
            total_weight,
            cumulative_degree,
            neighbor_ids,
            edge_weights,
            original_id_map,
        };
        graph.assert_invariants();
        graph
    }

    fn assert_invariants(&self) {
        assert_eq!(
            self.neighbor_ids.len(),
            self.edge_weights.len(),
            "neighbor and weight arenas must run in parallel"
        );
        assert_eq!(
            self.cumulative_degree.len(),
            self.node_count,
            "one prefix sum per node"
        );
        assert_eq!(
            self.cumulative_degree.last().copied().unwrap_or(0),
            self.neighbor_ids.len(),
            "final prefix sum must cover the arena"
        );
        assert!(
            self.cumulative_degree
                .iter()
                .tuple_windows()
                .all(|(a, b)| a <= b),
            "cumulative degrees must be non-decreasing"
        );
        assert!(
            self.neighbor_ids.iter().all(|&n| n < self.node_count),
            "neighbor ids must be dense"
        );
        assert!(
            self.edge_weights.iter().all(|&w| w >= 0.0),
            "edge weights must be non-negative"
        );
        for node in 0..self.node_count {
            let (start, end) = self.slice_bounds(node);
            assert!(
                self.neighbor_ids[start..end]
                    .iter()
                    .tuple_windows()
                    .all(|(a, b)| a < b),
                "adjacency of node {node} must be sorted and aggregated"
            );
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    /// `m2`: twice the total edge weight, equal to the sum of all weighted
    /// degrees.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    fn slice_bounds(&self, node: NodeId) -> (usize, usize) {
        assert!(
            node < self.node_count,
            "node {node} out of range (graph has {} nodes)",
            self.node_count
        );
        let end = self.cumulative_degree[node];
        let start = if node == 0 {
            0
        } else {
            self.cumulative_degree[node - 1]
        };
        (start, end)
    }

    /// Number of stored adjacency entries for `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        let (start, end) = self.slice_bounds(node);
        end - start
    }

    /// Sum of the node's stored incident weights. A self-loop entry already
    /// carries both of its half-links, so no adjustment is needed.
    pub fn weighted_degree(&self, node: NodeId) -> f64 {
        let (start, end) = self.slice_bounds(node);
        self.edge_weights[start..end].iter().sum()
    }

    /// Weight of the node's self-loop entry, `0.0` if it has none.
    pub fn self_loop_weight(&self, node: NodeId) -> f64 {
        self.neighbors(node)
            .find(|&(neighbor, _)| neighbor == node)
            .map_or(0.0, |(_, weight)| weight)
    }

    /// `(neighbor, weight)` pairs for `node`, in ascending neighbor order.
    ///
    /// Re-derived from the slice bounds on every call; the iterator holds no
    /// cursor state beyond the borrowed slices.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let (start, end) = self.slice_bounds(node);
        self.neighbor_ids[start..end]
            .iter()
            .copied()
            .zip(self.edge_weights[start..end].iter().copied())
    }

    /// Number of stored undirected links, each counted once, self-loops
    /// included. O(E); used for per-level reporting.
    pub fn link_count(&self) -> usize {
        (0..self.node_count)
            .map(|node| self.neighbors(node).filter(|&(n, _)| n >= node).count())
            .sum()
    }

    /// `(external id, dense id)` pairs, order unspecified.
    pub fn original_ids(&self) -> impl Iterator<Item = (u64, NodeId)> + '_ {
        self.original_id_map.iter().map(|(&orig, &node)| (orig, node))
    }

    /// Dense id for an external node id, if that node exists.
    pub fn resolve(&self, original_id: u64) -> Option<NodeId> {
        self.original_id_map.get(&original_id).copied()
    }

    pub(crate) fn original_id_count(&self) -> usize {
        self.original_id_map.len()
    }
}
