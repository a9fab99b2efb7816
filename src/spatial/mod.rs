//! Hit testing and spatial indexing.
//!
//! `hit_test` answers single queries with a linear scan over the layout. The
//! R-tree [`SpatialIndex`] answers the same queries with the same tie-breaks
//! in O(log n), for layouts queried repeatedly between changes.

mod hit_test;
mod rtree;

pub use hit_test::{
    DEFAULT_EDGE_THRESHOLD, DEFAULT_VERTEX_RADIUS, find_edge_by_coordinates,
    find_vertex_by_coordinates, point_to_segment_distance,
};
pub use rtree::{SpatialIndex, VertexPoint};
