//! Input validation errors.
//!
//! Every operation in this crate is total over its valid input domain, so the
//! only failures are malformed inputs. They are local and recoverable: retry
//! with corrected arguments.

use thiserror::Error;

/// Errors raised when an operation receives input outside its domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A vertex count below the minimum an operation requires.
    #[error("invalid vertex count {count}: at least {min} required")]
    InvalidVertexCount { count: usize, min: usize },

    /// A degree bound below 1.
    #[error("invalid degree bound {0}: must be at least 1")]
    InvalidDegreeBound(usize),

    /// Canvas dimensions that are non-positive, non-finite, or too small to
    /// hold the padding margin.
    #[error("invalid canvas bounds {width}x{height}")]
    InvalidCanvasBounds { width: f32, height: f32 },

    /// Previous positions whose length differs from the graph's vertex count.
    #[error("expected {expected} positions, got {actual}")]
    PositionCountMismatch { expected: usize, actual: usize },

    /// An edge joining a vertex to itself.
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    /// An edge endpoint outside `[0, vertex_count)`.
    #[error("vertex {vertex} out of range for a graph of {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ValidationError>;
