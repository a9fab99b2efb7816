//! Linear-scan hit testing.
//!
//! Pure geometric queries that map a point (a tap, a click) to the closest
//! vertex or edge within a tolerance. Vertices and edges are answered
//! independently; callers check vertices first since vertices are drawn over
//! edge midpoints.

use crate::graph::Edge;
use crate::layout::VertexPosition;

/// Default pick radius around a vertex.
pub const DEFAULT_VERTEX_RADIUS: f32 = 20.0;

/// Default pick distance from an edge segment.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 8.0;

/// Index of the vertex closest to `point` among those within `radius`.
///
/// On equal distances the lowest index wins.
pub fn find_vertex_by_coordinates(
    point: VertexPosition,
    positions: &[VertexPosition],
    radius: f32,
) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f32::MAX;
    for (i, &position) in positions.iter().enumerate() {
        let dist = point.distance_to(position);
        if dist <= radius && dist < best_dist {
            best_dist = dist;
            best = Some(i);
        }
    }
    best
}

/// The edge whose segment is closest to `point` among those within
/// `threshold`.
///
/// On equal distances the first edge in iteration order wins. Edges with an
/// endpoint that has no position are skipped.
pub fn find_edge_by_coordinates<'a>(
    point: VertexPosition,
    edges: impl IntoIterator<Item = &'a Edge>,
    positions: &[VertexPosition],
    threshold: f32,
) -> Option<Edge> {
    let mut best = None;
    let mut best_dist = f32::MAX;
    for &edge in edges {
        let (Some(&a), Some(&b)) = (positions.get(edge.u()), positions.get(edge.v())) else {
            continue;
        };
        let dist = point_to_segment_distance(point, a, b);
        if dist <= threshold && dist < best_dist {
            best_dist = dist;
            best = Some(edge);
        }
    }
    best
}

/// Distance from `p` to the segment `a`-`b`.
///
/// Projects `p` onto the line through `a` and `b`, clamps the projection to
/// the segment, and measures to the clamped point. A degenerate segment
/// (`a == b`) is treated as the point `a`.
pub fn point_to_segment_distance(p: VertexPosition, a: VertexPosition, b: VertexPosition) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }

    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance_to(VertexPosition::new(a.x + t * abx, a.y + t * aby))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f32, y: f32) -> VertexPosition {
        VertexPosition::new(x, y)
    }

    fn edge(a: usize, b: usize) -> Edge {
        Edge::new(a, b).unwrap()
    }

    #[test]
    fn test_point_to_segment_distance() {
        let a = pos(0.0, 0.0);
        let b = pos(10.0, 0.0);
        assert_eq!(point_to_segment_distance(pos(0.0, 5.0), a, b), 5.0);
        assert_eq!(point_to_segment_distance(pos(5.0, -3.0), a, b), 3.0);
        // Clamped to the endpoints
        assert_eq!(point_to_segment_distance(pos(-5.0, 0.0), a, b), 5.0);
        assert_eq!(point_to_segment_distance(pos(13.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn test_point_to_degenerate_segment() {
        let a = pos(1.0, 1.0);
        assert_eq!(point_to_segment_distance(pos(4.0, 5.0), a, a), 5.0);
    }

    #[test]
    fn test_find_vertex_exact_position() {
        let positions = [pos(100.0, 100.0), pos(200.0, 100.0)];
        assert_eq!(
            find_vertex_by_coordinates(pos(200.0, 100.0), &positions, DEFAULT_VERTEX_RADIUS),
            Some(1)
        );
    }

    #[test]
    fn test_find_vertex_miss() {
        let positions = [pos(100.0, 100.0), pos(200.0, 100.0)];
        assert_eq!(
            find_vertex_by_coordinates(pos(150.0, 100.0), &positions, DEFAULT_VERTEX_RADIUS),
            None
        );
        assert_eq!(find_vertex_by_coordinates(pos(0.0, 0.0), &[], 20.0), None);
    }

    #[test]
    fn test_find_vertex_boundary_radius() {
        let positions = [pos(0.0, 0.0)];
        assert_eq!(find_vertex_by_coordinates(pos(20.0, 0.0), &positions, 20.0), Some(0));
        assert_eq!(find_vertex_by_coordinates(pos(20.5, 0.0), &positions, 20.0), None);
    }

    #[test]
    fn test_find_vertex_closest_wins() {
        let positions = [pos(0.0, 0.0), pos(10.0, 0.0), pos(6.0, 0.0)];
        assert_eq!(find_vertex_by_coordinates(pos(7.0, 0.0), &positions, 20.0), Some(2));
    }

    #[test]
    fn test_find_vertex_tie_lowest_index() {
        let positions = [pos(10.0, 0.0), pos(-10.0, 0.0), pos(0.0, 10.0)];
        assert_eq!(find_vertex_by_coordinates(pos(0.0, 0.0), &positions, 20.0), Some(0));
    }

    #[test]
    fn test_find_edge() {
        let positions = [pos(0.0, 0.0), pos(100.0, 0.0), pos(100.0, 100.0)];
        let edges = [edge(0, 1), edge(1, 2)];

        assert_eq!(
            find_edge_by_coordinates(pos(50.0, 5.0), &edges, &positions, DEFAULT_EDGE_THRESHOLD),
            Some(edge(0, 1))
        );
        assert_eq!(
            find_edge_by_coordinates(pos(97.0, 50.0), &edges, &positions, DEFAULT_EDGE_THRESHOLD),
            Some(edge(1, 2))
        );
        assert_eq!(
            find_edge_by_coordinates(pos(50.0, 50.0), &edges, &positions, DEFAULT_EDGE_THRESHOLD),
            None
        );
    }

    #[test]
    fn test_find_edge_closest_wins() {
        let positions = [pos(0.0, 0.0), pos(100.0, 0.0), pos(0.0, 6.0), pos(100.0, 6.0)];
        let edges = [edge(0, 1), edge(2, 3)];
        assert_eq!(
            find_edge_by_coordinates(pos(50.0, 4.0), &edges, &positions, 8.0),
            Some(edge(2, 3))
        );
        // Exactly between: first in order wins
        assert_eq!(
            find_edge_by_coordinates(pos(50.0, 3.0), &edges, &positions, 8.0),
            Some(edge(0, 1))
        );
    }

    #[test]
    fn test_find_edge_skips_missing_positions() {
        let positions = [pos(0.0, 0.0), pos(100.0, 0.0)];
        let edges = [edge(0, 5), edge(0, 1)];
        assert_eq!(
            find_edge_by_coordinates(pos(50.0, 0.0), &edges, &positions, 8.0),
            Some(edge(0, 1))
        );
    }
}
