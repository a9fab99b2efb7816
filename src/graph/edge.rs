//! Edge type.
//!
//! Edges are unordered vertex pairs stored canonically, lower index first, so
//! that `(3, 1)` and `(1, 3)` are the same edge in any set or map.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Canonical undirected edge between two distinct vertices.
///
/// Invariant: `u < v`. Equality, ordering and hashing are by that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Edge {
    u: usize,
    v: usize,
}

impl Edge {
    /// Create an edge between `a` and `b`, in either order.
    ///
    /// Fails with [`ValidationError::SelfLoop`] when `a == b`.
    pub fn new(a: usize, b: usize) -> Result<Self> {
        if a == b {
            return Err(ValidationError::SelfLoop(a));
        }
        Ok(Self::canonical(a, b))
    }

    /// Canonicalize a pair already known to be distinct.
    #[inline]
    pub(crate) fn canonical(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b);
        if a < b { Self { u: a, v: b } } else { Self { u: b, v: a } }
    }

    /// Lower endpoint.
    #[inline]
    pub fn u(self) -> usize {
        self.u
    }

    /// Higher endpoint.
    #[inline]
    pub fn v(self) -> usize {
        self.v
    }

    /// Both endpoints, lower first.
    #[inline]
    pub fn endpoints(self) -> (usize, usize) {
        (self.u, self.v)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({}, {})", self.u, self.v)
    }
}

impl TryFrom<(usize, usize)> for Edge {
    type Error = ValidationError;

    fn try_from((a, b): (usize, usize)) -> Result<Self> {
        Self::new(a, b)
    }
}

impl From<Edge> for (usize, usize) {
    #[inline]
    fn from(edge: Edge) -> Self {
        edge.endpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let edge = Edge::new(5, 2).unwrap();
        assert_eq!(edge.endpoints(), (2, 5));
        assert_eq!(edge, Edge::new(2, 5).unwrap());
        assert_eq!(format!("{}", edge), "Edge(2, 5)");
    }

    #[test]
    fn test_self_loop_rejected() {
        assert_eq!(Edge::new(3, 3), Err(ValidationError::SelfLoop(3)));
    }

    #[test]
    fn test_deserialize_canonicalizes() {
        let edge: Edge = serde_json::from_str("[9, 4]").unwrap();
        assert_eq!(edge.endpoints(), (4, 9));
        assert!(serde_json::from_str::<Edge>("[2, 2]").is_err());
    }
}
