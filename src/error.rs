//! Unified error type for louvain-communities public APIs.
//!
//! Input-shape problems are surfaced as `Err` values carrying the offending
//! record so the caller can fix the input. Internal invariant violations
//! (out-of-range node ids, a node queried mid-move) panic with diagnostic
//! context instead: they indicate a bug, not a data problem.

use core::fmt;

/// Errors surfaced by graph construction and the multilevel driver.
#[derive(Debug, Clone, PartialEq)]
pub enum CommunityError {
    /// An input edge carried a weight the graph cannot represent.
    InvalidEdge {
        /// Original id of the source endpoint.
        source: u64,
        /// Original id of the target endpoint.
        target: u64,
        /// Weight carried by the offending record.
        weight: f64,
        /// Why the record was rejected.
        reason: &'static str,
    },
    /// Configuration rejected before any optimization ran.
    InvalidConfig(&'static str),
}

impl fmt::Display for CommunityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunityError::InvalidEdge {
                source,
                target,
                weight,
                reason,
            } => write!(
                f,
                "invalid edge {source} -- {target} (weight {weight}): {reason}"
            ),
            CommunityError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for CommunityError {}
