//! Aggregation of a partition into the next level's graph.

use std::collections::BTreeMap;

use hashbrown::HashMap as FastMap;

use crate::community::Partition;
use crate::graph::{Graph, NodeId};

impl Partition<'_> {
    /// Collapse every non-empty community into a super-node and return the
    /// coarsened graph.
    ///
    /// Communities are renumbered densely in ascending community-id order.
    /// Weight between two communities aggregates into a single edge; weight
    /// inside a community becomes its super-node's self-loop, carrying the
    /// community's internal half-link weight, so the coarse graph's
    /// singleton partition has exactly this partition's modularity. The
    /// external-id map is rewritten through the assignment so it points at
    /// super-node ids.
    pub fn coarsen(&self) -> Graph {
        let graph = self.graph();
        let n = graph.node_count();

        // Dense renumbering of the communities that still hold a node.
        let mut occupied = vec![false; n];
        for node in 0..n {
            occupied[self.community_of(node)] = true;
        }
        let mut renumber = vec![usize::MAX; n];
        let mut community_count = 0;
        for community in 0..n {
            if occupied[community] {
                renumber[community] = community_count;
                community_count += 1;
            }
        }

        // Members per new community id, in ascending node order.
        let mut members: Vec<Vec<NodeId>> = vec![Vec::new(); community_count];
        for node in 0..n {
            members[renumber[self.community_of(node)]].push(node);
        }

        // Per community, tally outgoing weight by destination community;
        // the diagonal entry becomes the super-node self-loop.
        let mut adjacency = Vec::with_capacity(community_count);
        for community_members in &members {
            let mut weights: BTreeMap<NodeId, f64> = BTreeMap::new();
            for &node in community_members {
                for (neighbor, weight) in graph.neighbors(node) {
                    let destination = renumber[self.community_of(neighbor)];
                    *weights.entry(destination).or_insert(0.0) += weight;
                }
            }
            adjacency.push(weights.into_iter().collect::<Vec<_>>());
        }

        // Point every external id at its node's new community.
        let mut original_id_map = FastMap::with_capacity(graph.original_id_count());
        for (original, node) in graph.original_ids() {
            original_id_map.insert(original, renumber[self.community_of(node)]);
        }

        Graph::from_adjacency(adjacency, original_id_map)
    }
}

#[cfg(test)]
mod tests {
    use crate::community::{LouvainConfig, Partition};
    use crate::graph::{Edge, Graph};

    fn triangle_pair() -> Graph {
        Graph::from_edges(&[
            Edge::new(0, 1),
            Edge::new(1, 2),
            Edge::new(0, 2),
            Edge::new(3, 4),
            Edge::new(4, 5),
            Edge::new(3, 5),
        ])
        .unwrap()
    }

    #[test]
    fn collapses_communities_into_self_loops() {
        let g = triangle_pair();
        let mut p = Partition::new(&g, &LouvainConfig::default());
        p.set_assignments(&[0, 0, 0, 3, 3, 3]);
        let coarse = p.coarsen();

        assert_eq!(coarse.node_count(), 2);
        assert_eq!(coarse.self_loop_weight(0), 6.0);
        assert_eq!(coarse.self_loop_weight(1), 6.0);
        assert_eq!(coarse.degree(0), 1);
        assert_eq!(coarse.total_weight(), g.total_weight());
        for original in 0..3 {
            assert_eq!(coarse.resolve(original), Some(0));
        }
        for original in 3..6 {
            assert_eq!(coarse.resolve(original), Some(1));
        }
    }

    #[test]
    fn aggregates_cross_community_weight_into_one_edge() {
        // {0,1} and {2,3} joined by two parallel paths: 1-2 and 0-3.
        let g = Graph::from_edges(&[
            Edge::new(0, 1),
            Edge::new(2, 3),
            Edge::weighted(1, 2, 0.5),
            Edge::weighted(0, 3, 0.25),
        ])
        .unwrap();
        let mut p = Partition::new(&g, &LouvainConfig::default());
        p.set_assignments(&[0, 0, 2, 2]);
        let coarse = p.coarsen();

        assert_eq!(coarse.node_count(), 2);
        assert_eq!(
            coarse.neighbors(0).collect::<Vec<_>>(),
            vec![(0, 2.0), (1, 0.75)]
        );
        assert_eq!(coarse.weighted_degree(0), 2.75);
        assert_eq!(coarse.total_weight(), g.total_weight());
    }

    #[test]
    fn renumbering_skips_empty_communities() {
        // Path 0 - 1 - 2 with communities {2} and {0, 1}: community 1 is
        // empty and must not leave a hole in the coarse ids.
        let g = Graph::from_edges(&[Edge::new(0, 1), Edge::new(1, 2)]).unwrap();
        let mut p = Partition::new(&g, &LouvainConfig::default());
        p.set_assignments(&[2, 2, 0]);
        let coarse = p.coarsen();

        assert_eq!(coarse.node_count(), 2);
        // Community 0 ({node 2}) -> 0, community 2 ({nodes 0, 1}) -> 1.
        assert_eq!(coarse.resolve(2), Some(0));
        assert_eq!(coarse.resolve(0), Some(1));
        assert_eq!(coarse.resolve(1), Some(1));
        assert_eq!(coarse.self_loop_weight(1), 2.0);
        assert_eq!(coarse.neighbors(0).collect::<Vec<_>>(), vec![(1, 1.0)]);
    }

    #[test]
    fn coarsening_singletons_is_the_identity() {
        let g = triangle_pair();
        let p = Partition::new(&g, &LouvainConfig::default());
        assert_eq!(p.coarsen(), g);
    }

    #[test]
    fn coarse_singleton_modularity_matches_the_partition() {
        let g = triangle_pair();
        let mut p = Partition::new(&g, &LouvainConfig::default());
        p.set_assignments(&[0, 0, 0, 3, 3, 3]);
        let q = p.modularity();
        let coarse = p.coarsen();
        let coarse_partition = Partition::new(&coarse, &LouvainConfig::default());
        assert!((coarse_partition.modularity() - q).abs() < 1e-9);
        assert!((q - 0.5).abs() < 1e-9);
    }
}
