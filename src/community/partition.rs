//! Mutable community assignment over a fixed graph, and the greedy
//! local-move pass that maximizes modularity one node at a time.

use std::collections::BTreeMap;

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::community::LouvainConfig;
use crate::graph::{Graph, NodeId};

/// Community state for one optimization level.
///
/// `membership[v]` is `Some(c)` while `v` sits in community `c`, and `None`
/// only transiently, between the remove and insert halves of a single move.
/// Community ids share the node-id space: community `c` starts out holding
/// exactly node `c`.
#[derive(Debug)]
pub struct Partition<'g> {
    graph: &'g Graph,
    membership: Vec<Option<usize>>,
    /// `in`: half-link weight strictly inside each community.
    internal_weight: Vec<f64>,
    /// `tot`: summed weighted degree of each community's members.
    community_total: Vec<f64>,
    min_modularity_gain: f64,
    resolution: f64,
    max_passes: usize,
    rng: SmallRng,
}

impl<'g> Partition<'g> {
    /// Singleton partition: every node alone in the community of its own id.
    pub fn new(graph: &'g Graph, config: &LouvainConfig) -> Self {
        Self::seeded(graph, config, config.rng_seed)
    }

    /// Same as [`Partition::new`] with an explicit shuffle seed; the
    /// multilevel driver derives one per level.
    pub fn seeded(graph: &'g Graph, config: &LouvainConfig, seed: u64) -> Self {
        let n = graph.node_count();
        let mut membership = Vec::with_capacity(n);
        let mut internal_weight = Vec::with_capacity(n);
        let mut community_total = Vec::with_capacity(n);
        for node in 0..n {
            membership.push(Some(node));
            internal_weight.push(graph.self_loop_weight(node));
            community_total.push(graph.weighted_degree(node));
        }
        Self {
            graph,
            membership,
            internal_weight,
            community_total,
            min_modularity_gain: config.min_modularity_gain,
            resolution: config.resolution,
            max_passes: config.max_passes,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Community currently holding `node`.
    pub fn community_of(&self, node: NodeId) -> usize {
        assert!(
            node < self.membership.len(),
            "node {node} out of range (partition has {} nodes)",
            self.membership.len()
        );
        self.membership[node]
            .unwrap_or_else(|| panic!("node {node} queried mid-move has no community"))
    }

    /// Raw (not renumbered) community id per node.
    pub fn assignments(&self) -> Vec<usize> {
        (0..self.membership.len())
            .map(|node| self.community_of(node))
            .collect()
    }

    /// Number of communities with at least one member.
    pub fn community_count(&self) -> usize {
        let mut ids = self.assignments();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Exact modularity of the current assignment.
    ///
    /// Always recomputed from `in`/`tot`; per-move gain deltas never feed
    /// this value, so it cannot drift across passes. Defined as 0 for the
    /// edge-less graph.
    pub fn modularity(&self) -> f64 {
        let m2 = self.graph.total_weight();
        if m2 <= 0.0 {
            return 0.0;
        }
        let mut q = 0.0;
        for community in 0..self.community_total.len() {
            let tot = self.community_total[community];
            if tot > 0.0 {
                let a = tot / m2;
                q += self.internal_weight[community] / m2 - self.resolution * a * a;
            }
        }
        q
    }

    /// Weight from `node` into each adjacent community. The node's own
    /// community is always present, possibly at zero weight; self-loops are
    /// excluded from the tally. Ascending key order is what drives the
    /// lowest-id tie-break in [`Partition::select_community`].
    fn neighboring_communities(&self, node: NodeId) -> BTreeMap<usize, f64> {
        let mut links = BTreeMap::new();
        links.insert(self.community_of(node), 0.0);
        for (neighbor, weight) in self.graph.neighbors(node) {
            if neighbor == node {
                continue;
            }
            let community = self.membership[neighbor]
                .unwrap_or_else(|| panic!("neighbor {neighbor} of node {node} has no community"));
            *links.entry(community).or_insert(0.0) += weight;
        }
        links
    }

    /// Modularity-gain proxy for inserting `node` into `community` with
    /// `links` weight between them. Terms independent of the candidate
    /// cancel, so comparing proxies is equivalent to comparing true deltas.
    fn gain(&self, node: NodeId, community: usize, links: f64) -> f64 {
        let m2 = self.graph.total_weight();
        if m2 <= 0.0 {
            return 0.0;
        }
        links
            - self.resolution * self.community_total[community] * self.graph.weighted_degree(node)
                / m2
    }

    /// Take `node` out of `community`, to which it has `links` weight.
    fn remove(&mut self, node: NodeId, community: usize, links: f64) {
        self.community_total[community] -= self.graph.weighted_degree(node);
        self.internal_weight[community] -= 2.0 * links + self.graph.self_loop_weight(node);
        self.membership[node] = None;
    }

    /// Put `node` into `community`, to which it has `links` weight.
    fn insert(&mut self, node: NodeId, community: usize, links: f64) {
        self.community_total[community] += self.graph.weighted_degree(node);
        self.internal_weight[community] += 2.0 * links + self.graph.self_loop_weight(node);
        self.membership[node] = Some(community);
    }

    /// Pick the community for a removed `node`: the origin's own gain is the
    /// baseline and only a strictly greater score moves the node, so ties
    /// keep it where it was. Among tied non-origin candidates the lowest
    /// community id wins, by ascending map order.
    fn select_community(
        &self,
        node: NodeId,
        origin: usize,
        links: &BTreeMap<usize, f64>,
    ) -> (usize, f64) {
        let links_to_origin = links[&origin];
        let mut best_community = origin;
        let mut best_links = links_to_origin;
        let mut best_gain = self.gain(node, origin, links_to_origin);
        for (&candidate, &weight) in links {
            if candidate == origin {
                continue;
            }
            let gain = self.gain(node, candidate, weight);
            if gain > best_gain {
                best_community = candidate;
                best_links = weight;
                best_gain = gain;
            }
        }
        (best_community, best_links)
    }

    /// Fresh random visiting order for one pass.
    fn visit_order(&mut self) -> Vec<NodeId> {
        let mut order: Vec<NodeId> = (0..self.graph.node_count()).collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// One sweep over all nodes in a fresh random order: tentatively remove
    /// each node, score every adjacent community, and re-insert it where the
    /// gain proxy is highest.
    pub(crate) fn local_move_pass(&mut self) {
        for node in self.visit_order() {
            let origin = self.community_of(node);
            let links = self.neighboring_communities(node);
            self.remove(node, origin, links[&origin]);
            let (target, target_links) = self.select_community(node, origin, &links);
            self.insert(node, target, target_links);
        }
    }

    /// Run local-move passes until a full pass improves modularity by at
    /// most the configured threshold (or the pass ceiling is reached), and
    /// return the final modularity.
    pub fn one_level(&mut self) -> f64 {
        let mut new_modularity = self.modularity();
        for pass in 1..=self.max_passes {
            let current = new_modularity;
            self.local_move_pass();
            new_modularity = self.modularity();
            debug!("pass {pass}: modularity {current:.6} -> {new_modularity:.6}");
            if new_modularity - current <= self.min_modularity_gain {
                break;
            }
        }
        new_modularity
    }

    #[cfg(test)]
    pub(crate) fn internal_weights(&self) -> &[f64] {
        &self.internal_weight
    }

    #[cfg(test)]
    pub(crate) fn community_totals(&self) -> &[f64] {
        &self.community_total
    }

    /// Test hook: adopt an arbitrary assignment and rebuild `in`/`tot` from
    /// the graph.
    #[cfg(test)]
    pub(crate) fn set_assignments(&mut self, assignment: &[usize]) {
        let n = self.graph.node_count();
        assert_eq!(assignment.len(), n);
        assert!(assignment.iter().all(|&c| c < n));
        self.membership = assignment.iter().map(|&c| Some(c)).collect();
        self.internal_weight = vec![0.0; n];
        self.community_total = vec![0.0; n];
        for node in 0..n {
            let community = assignment[node];
            self.community_total[community] += self.graph.weighted_degree(node);
            for (neighbor, weight) in self.graph.neighbors(node) {
                // A self entry already carries both half-links; an internal
                // edge is counted once from each side.
                if neighbor == node || assignment[neighbor] == community {
                    self.internal_weight[community] += weight;
                }
            }
        }
    }
}
