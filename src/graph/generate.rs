//! Random graph generators.
//!
//! Both generators take the random source explicitly. They are meant to be
//! exploratory, so callers normally pass an entropy-seeded RNG; tests pass a
//! seeded one.

use std::collections::BTreeSet;

use rand::Rng;

use super::edge::Edge;
use super::model::Graph;
use crate::error::{Result, ValidationError};

/// Generate a random graph with at most `max_vertices` vertices and no vertex
/// of degree above `max_degree`.
///
/// The vertex count is drawn uniformly from `[2, max_vertices]`. Edges are
/// proposed by sampling two vertices uniformly; a proposal is rejected when it
/// is a self-loop, a duplicate, or would push an endpoint past `max_degree`.
/// Generation stops after `2 * n^2` *consecutive* rejections: the counter
/// resets on every accepted edge. The result is not necessarily connected.
pub fn generate_random_graph<R: Rng + ?Sized>(
    rng: &mut R,
    max_vertices: usize,
    max_degree: usize,
) -> Result<Graph> {
    if max_vertices < 2 {
        return Err(ValidationError::InvalidVertexCount {
            count: max_vertices,
            min: 2,
        });
    }
    if max_degree < 1 {
        return Err(ValidationError::InvalidDegreeBound(max_degree));
    }

    let vertex_count = rng.gen_range(2..=max_vertices);
    let edges = add_random_edges(vertex_count, max_degree, || {
        (rng.gen_range(0..vertex_count), rng.gen_range(0..vertex_count))
    });

    log::debug!(
        "generated random graph: {} vertices, {} edges (max degree {})",
        vertex_count,
        edges.len(),
        max_degree
    );
    Ok(Graph::from_valid(vertex_count, edges))
}

/// Consecutive rejections after which edge sampling gives up: `2 * n^2`,
/// saturating for vertex counts whose square overflows `usize`.
fn failure_budget(vertex_count: usize) -> usize {
    vertex_count.saturating_mul(vertex_count).saturating_mul(2)
}

/// Insert edges proposed by `sample` until the failure budget runs out.
fn add_random_edges(
    vertex_count: usize,
    max_degree: usize,
    mut sample: impl FnMut() -> (usize, usize),
) -> BTreeSet<Edge> {
    let max_failures = failure_budget(vertex_count);
    let mut edges = BTreeSet::new();
    let mut degrees = vec![0usize; vertex_count];
    let mut failures = 0;

    while failures < max_failures {
        let (u, v) = sample();
        if u == v || degrees[u] >= max_degree || degrees[v] >= max_degree {
            failures += 1;
            continue;
        }
        if !edges.insert(Edge::canonical(u, v)) {
            failures += 1;
            continue;
        }

        degrees[u] += 1;
        degrees[v] += 1;
        failures = 0;
    }
    edges
}

/// Generate a random binary tree on exactly `max_vertices` vertices.
///
/// Vertex 0 is the root. Each new vertex `v` picks its parent uniformly from
/// the vertices that still have fewer than two children; a parent leaves that
/// pool once it has two.
pub fn generate_random_binary_tree<R: Rng + ?Sized>(
    rng: &mut R,
    max_vertices: usize,
) -> Result<Graph> {
    if max_vertices < 2 {
        return Err(ValidationError::InvalidVertexCount {
            count: max_vertices,
            min: 2,
        });
    }

    let vertex_count = max_vertices;
    let mut edges = BTreeSet::new();
    let mut child_count = vec![0u8; vertex_count];
    let mut available = vec![0usize];

    for v in 1..vertex_count {
        let slot = rng.gen_range(0..available.len());
        let parent = available[slot];
        edges.insert(Edge::canonical(parent, v));
        child_count[parent] += 1;
        if child_count[parent] >= 2 {
            available.remove(slot);
        }
        available.push(v);
    }

    log::debug!("generated random binary tree: {} vertices", vertex_count);
    Ok(Graph::from_valid(vertex_count, edges))
}
