//! Multilevel driver: optimize one level, coarsen, repeat.

use log::info;
use serde::{Deserialize, Serialize};

use crate::community::{CommunityMap, LouvainConfig, Partition};
use crate::error::CommunityError;
use crate::graph::Graph;

/// Result of a full multilevel run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// External node id -> final-level community id, one entry per input
    /// node, isolated and self-loop-only nodes included.
    pub assignments: CommunityMap,
    /// Modularity of the final partition.
    pub modularity: f64,
    /// Optimization levels actually run.
    pub levels: usize,
}

/// Run the multilevel Louvain method to convergence.
///
/// Each level wraps the current graph in a fresh [`Partition`], runs the
/// local-move optimization, and coarsens the communities into super-nodes
/// for the next level; the coarsening also rewrites the external-id map, so
/// the final graph's map is the answer. The loop stops once a level improves
/// modularity by at most `min_modularity_gain`, or after `max_levels`
/// levels. A graph with no nodes is a no-op with modularity 0.
pub fn detect_communities(
    graph: Graph,
    config: &LouvainConfig,
) -> Result<Clustering, CommunityError> {
    config.validate()?;

    let mut graph = graph;
    let mut modularity = 0.0;
    let mut levels = 0;

    while !graph.is_empty() && levels < config.max_levels {
        let seed = config.rng_seed.wrapping_add(levels as u64);
        let (initial, level_modularity, coarse) = {
            let mut partition = Partition::seeded(&graph, config, seed);
            let initial = partition.modularity();
            let level_modularity = partition.one_level();
            (initial, level_modularity, partition.coarsen())
        };
        info!(
            "level {level}: {nodes} nodes, {links} links, weight {weight}; modularity {initial:.6} -> {level_modularity:.6}",
            level = levels + 1,
            nodes = graph.node_count(),
            links = graph.link_count(),
            weight = graph.total_weight(),
        );

        // Modularity survives coarsening unchanged, so after the first level
        // the baseline is the previous level's result.
        let baseline = if levels == 0 { initial } else { modularity };
        let gained = level_modularity - baseline;
        modularity = level_modularity;
        graph = coarse;
        levels += 1;
        if gained <= config.min_modularity_gain {
            break;
        }
    }

    let mut assignments = CommunityMap::with_capacity(graph.node_count());
    for (original, community) in graph.original_ids() {
        assignments.insert(original, community);
    }

    Ok(Clustering {
        assignments,
        modularity,
        levels,
    })
}
