//! R-tree based spatial index using the rstar crate.
//!
//! Answers the same queries as the linear scans in `hit_test`, with the same
//! tie-breaks, for a layout that is queried repeatedly between changes:
//! - Vertex within a pick radius
//! - Edge segment within a pick threshold
//! - Vertices inside a rectangle

use std::cmp::Ordering;

use rstar::primitives::{GeomWithData, Line};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::hit_test::point_to_segment_distance;
use crate::error::{Result, ValidationError};
use crate::graph::{Edge, Graph};
use crate::layout::VertexPosition;

/// A vertex position in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPoint {
    /// Vertex index.
    pub vertex: usize,
    pub x: f32,
    pub y: f32,
}

impl VertexPoint {
    pub fn new(vertex: usize, position: VertexPosition) -> Self {
        Self {
            vertex,
            x: position.x,
            y: position.y,
        }
    }
}

impl RTreeObject for VertexPoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for VertexPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// An edge segment in the spatial index.
type EdgeSegment = GeomWithData<Line<[f32; 2]>, Edge>;

/// Spatial index over one graph's vertices and edges at fixed positions.
///
/// Rebuild it whenever the graph or the layout changes.
pub struct SpatialIndex {
    vertices: RTree<VertexPoint>,
    edges: RTree<EdgeSegment>,
    positions: Vec<VertexPosition>,
}

impl SpatialIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            vertices: RTree::new(),
            edges: RTree::new(),
            positions: Vec::new(),
        }
    }

    /// Bulk-load an index for `graph` laid out at `positions`.
    pub fn build(graph: &Graph, positions: &[VertexPosition]) -> Result<Self> {
        if positions.len() != graph.vertex_count() {
            return Err(ValidationError::PositionCountMismatch {
                expected: graph.vertex_count(),
                actual: positions.len(),
            });
        }

        let points = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| VertexPoint::new(i, p))
            .collect();
        let segments = graph
            .edges()
            .iter()
            .map(|&edge| {
                let a = positions[edge.u()];
                let b = positions[edge.v()];
                GeomWithData::new(Line::new([a.x, a.y], [b.x, b.y]), edge)
            })
            .collect();

        Ok(Self {
            vertices: RTree::bulk_load(points),
            edges: RTree::bulk_load(segments),
            positions: positions.to_vec(),
        })
    }

    /// Closest vertex within `radius` of `point`; lowest index on ties.
    pub fn vertex_at(&self, point: VertexPosition, radius: f32) -> Option<usize> {
        self.vertices
            .locate_within_distance([point.x, point.y], radius * radius)
            .map(|p| (p.vertex, point.distance_to(self.positions[p.vertex])))
            .filter(|&(_, dist)| dist <= radius)
            .min_by(|a, b| by_distance_then(a, b))
            .map(|(vertex, _)| vertex)
    }

    /// Closest edge within `threshold` of `point`; lowest canonical edge on
    /// ties.
    pub fn edge_at(&self, point: VertexPosition, threshold: f32) -> Option<Edge> {
        self.edges
            .locate_within_distance([point.x, point.y], threshold * threshold)
            .map(|segment| {
                let edge = segment.data;
                let a = self.positions[edge.u()];
                let b = self.positions[edge.v()];
                (edge, point_to_segment_distance(point, a, b))
            })
            .filter(|&(_, dist)| dist <= threshold)
            .min_by(|a, b| by_distance_then(a, b))
            .map(|(edge, _)| edge)
    }

    /// Nearest vertex regardless of distance.
    pub fn nearest_vertex(&self, point: VertexPosition) -> Option<usize> {
        self.vertices
            .nearest_neighbor(&[point.x, point.y])
            .map(|p| p.vertex)
    }

    /// All vertices inside the rectangle spanned by two corners, ascending.
    pub fn vertices_in_rect(&self, corner_a: VertexPosition, corner_b: VertexPosition) -> Vec<usize> {
        let envelope = AABB::from_corners([corner_a.x, corner_a.y], [corner_b.x, corner_b.y]);
        let mut found: Vec<usize> = self
            .vertices
            .locate_in_envelope(&envelope)
            .map(|p| p.vertex)
            .collect();
        found.sort_unstable();
        found
    }

    /// Number of vertices in the index.
    pub fn len(&self) -> usize {
        self.vertices.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn by_distance_then<T: Ord>(a: &(T, f32), b: &(T, f32)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}
