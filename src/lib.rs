//! # louvain-communities
//!
//! Multilevel Louvain community detection over compact weighted undirected
//! graphs. The crate greedily maximizes modularity with a local-move pass,
//! collapses the resulting communities into a smaller weighted graph of
//! super-nodes, and repeats until the gain falls below a configured
//! threshold.
//!
//! Three pieces, strictly layered:
//! - [`graph::Graph`]: immutable-after-construction adjacency in flat
//!   prefix-sum arenas, built from an edge list or from a coarsened
//!   partition.
//! - [`community::Partition`]: mutable community assignment over a fixed
//!   graph; runs the local-move optimization and emits the coarsened graph.
//! - [`pipeline::detect_communities`]: the level loop, threading the
//!   external-id mapping through each coarsening step.
//!
//! ## Determinism
//!
//! All randomized decisions use `SmallRng` seeds drawn from configuration so
//! runs are reproducible. Tie-breaks prefer a node's current community and
//! otherwise the lowest candidate id. Unit tests fix seeds explicitly.
//!
//! ## Usage
//!
//! ```
//! use louvain_communities::prelude::*;
//!
//! let edges = [Edge::new(0, 1), Edge::new(1, 2), Edge::new(0, 2)];
//! let graph = Graph::from_edges(&edges)?;
//! let clustering = detect_communities(graph, &LouvainConfig::default())?;
//! assert_eq!(clustering.assignments.len(), 3);
//! assert_eq!(clustering.assignments.community_count(), 1);
//! # Ok::<(), louvain_communities::error::CommunityError>(())
//! ```
//!
//! The crate emits progress through the [`log`] facade: one `info!` line per
//! level and one `debug!` line per local-move pass.

pub mod community;
pub mod error;
pub mod graph;
pub mod pipeline;

/// A convenient prelude to import the most-used types:
pub mod prelude {
    pub use crate::community::{CommunityMap, LouvainConfig, Partition};
    pub use crate::error::CommunityError;
    pub use crate::graph::{Edge, Graph, NodeId};
    pub use crate::pipeline::{Clustering, detect_communities};
}
