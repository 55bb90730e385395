//! Community detection over a fixed [`Graph`](crate::graph::Graph).
//!
//! ## Objective (Newman modularity with resolution)
//!
//! Let
//! - `m2` = twice the total edge weight (unit: half-links; `∑_i k_i = m2`).
//! - `in_c` = half-link weight strictly inside community `c` (each internal
//!   edge counted from both endpoints, self-loops included).
//! - `tot_c` = summed weighted degree of the members of `c`.
//!
//! The quality of a partition is
//!
//! ```text
//! Q = ∑_c (in_c / m2 - γ · (tot_c / m2)²)
//! ```
//!
//! where `γ` is the resolution parameter; `γ > 1` favors smaller, denser
//! communities. When weighing a single node `v` against a candidate
//! community `c` with `links(v, c)` weight between them, the terms of the
//! true modularity delta that do not depend on `c` cancel, leaving the proxy
//!
//! ```text
//! gain(v, c) = links(v, c) - γ · tot_c · k_v / m2
//! ```
//!
//! which orders candidates identically to the true delta and is what the
//! local-move pass compares. Exact `Q` is recomputed from `in`/`tot` once
//! per pass, so the greedy deltas never accumulate drift into the reported
//! value.
//!
//! The main entry points are [`Partition::one_level`], which greedily
//! optimizes one level and returns its modularity, and
//! [`Partition::coarsen`], which collapses the result into the next level's
//! graph. The multilevel loop lives in
//! [`detect_communities`](crate::pipeline::detect_communities).

pub mod partition;

mod coarsen;


pub use partition::Partition;

use hashbrown::HashMap as FastMap;
use serde::{Deserialize, Serialize};

use crate::error::CommunityError;

/// Tunables for the multilevel optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LouvainConfig {
    /// A new pass (and a new level) runs only if the previous one improved
    /// modularity by more than this threshold.
    pub min_modularity_gain: f64,
    /// Scales the null-model term of modularity; values above 1 favor
    /// smaller, denser communities.
    pub resolution: f64,
    /// Seed for the per-pass node visiting order. Level `k` shuffles with
    /// `rng_seed + k`, so a full run is reproducible end to end.
    pub rng_seed: u64,
    /// Ceiling on local-move passes within one level, guarding against
    /// pathological threshold comparisons.
    pub max_passes: usize,
    /// Ceiling on coarsening levels.
    pub max_levels: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            min_modularity_gain: 1e-6,
            resolution: 1.0,
            rng_seed: 42,
            max_passes: 32,
            max_levels: 32,
        }
    }
}

impl LouvainConfig {
    pub(crate) fn validate(&self) -> Result<(), CommunityError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(CommunityError::InvalidConfig(
                "resolution must be finite and positive",
            ));
        }
        if !self.min_modularity_gain.is_finite() || self.min_modularity_gain < 0.0 {
            return Err(CommunityError::InvalidConfig(
                "min_modularity_gain must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Final assignment of external node ids to community ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityMap(FastMap<u64, usize>);

impl CommunityMap {
    pub fn with_capacity(cap: usize) -> Self {
        Self(FastMap::with_capacity(cap))
    }

    pub fn insert(&mut self, node: u64, community: usize) {
        self.0.insert(node, community);
    }

    pub fn get(&self, node: &u64) -> Option<&usize> {
        self.0.get(node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &usize)> {
        self.0.iter()
    }

    /// Number of distinct communities present in the map.
    pub fn community_count(&self) -> usize {
        let mut ids: Vec<usize> = self.0.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}
