//! Fruchterman-Reingold force-directed layout with simulated annealing.
//!
//! Vertices repel each other like charged particles (`k^2 / d`) and edges pull
//! their endpoints together like springs (`d^2 / k`). Each step moves every
//! vertex by its net displacement, capped at the current temperature, and the
//! temperature then decays geometrically. Early steps move far; late steps
//! only make small adjustments.
//!
//! The engine is a pair of free functions. All state travels in
//! [`LayoutState`], so a run can be split into any number of calls: chaining
//! two calls of `n` steps produces exactly the result of one call of `2n`.
//!
//! Repulsion is an O(V^2) pass per step, which is fine for the tens to low
//! hundreds of vertices this is meant for. Barnes-Hut or grid binning would be
//! the way to scale it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::canvas::Canvas;
use super::state::{LayoutSeed, LayoutState, VertexPosition};
use crate::error::{Result, ValidationError};
use crate::graph::Graph;

/// Margin kept free on every side of the canvas.
pub const DEFAULT_PADDING: f32 = 40.0;

/// Configuration for the force simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Margin kept free on every side of the canvas (default: 40).
    pub padding: f32,
    /// Temperature multiplier applied after every step (default: 0.95).
    pub cooling_factor: f32,
    /// Floor for distances and displacement lengths (default: 0.01).
    pub min_distance: f32,
}

impl ForceConfig {
    /// Starting temperature for a canvas laid out with this padding.
    pub fn initial_temperature(&self, width: f32, height: f32) -> f32 {
        padded_temperature(width, height, self.padding)
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            cooling_factor: 0.95,
            min_distance: 0.01,
        }
    }
}

/// Starting temperature for a canvas: half the smaller padded dimension.
///
/// Not clamped: canvases smaller than the padding give a non-positive value,
/// which freezes the simulation.
pub fn initial_temperature(width: f32, height: f32) -> f32 {
    padded_temperature(width, height, DEFAULT_PADDING)
}

/// [`initial_temperature`] for a canvas with a custom padding.
pub(crate) fn padded_temperature(width: f32, height: f32, padding: f32) -> f32 {
    let margin = 2.0 * padding;
    (width - margin).min(height - margin) / 2.0
}

/// Advance a layout of `graph` by `steps` simulation steps.
///
/// With [`LayoutSeed::Unseeded`] the vertices start uniformly scattered over
/// the padded canvas, from an RNG seeded with the graph's structural hash, so
/// the same graph always starts from the same scatter.
///
/// Graphs with zero or one vertex never enter the simulation: the result is
/// no positions, or the single vertex at the canvas center, with the
/// temperature unchanged.
///
/// # Errors
///
/// * [`ValidationError::InvalidCanvasBounds`] if a dimension is not a positive
///   finite number, or (for two or more vertices) the padded area is empty.
/// * [`ValidationError::PositionCountMismatch`] if seeded positions don't
///   match the vertex count.
pub fn layout_incrementally(
    seed: LayoutSeed<'_>,
    temperature: f32,
    steps: usize,
    graph: &Graph,
    width: f32,
    height: f32,
    config: &ForceConfig,
) -> Result<LayoutState> {
    let canvas = Canvas::new(width, height, config.padding)?;
    let n = graph.vertex_count();

    match n {
        0 => return Ok(LayoutState::new(Vec::new(), temperature)),
        1 => return Ok(LayoutState::new(vec![canvas.center()], temperature)),
        _ => {}
    }

    let canvas = canvas.with_interior()?;

    let (mut pos_x, mut pos_y) = match seed {
        LayoutSeed::Seeded(positions) => {
            if positions.len() != n {
                return Err(ValidationError::PositionCountMismatch {
                    expected: n,
                    actual: positions.len(),
                });
            }
            (
                positions.iter().map(|p| p.x).collect::<Vec<_>>(),
                positions.iter().map(|p| p.y).collect::<Vec<_>>(),
            )
        }
        LayoutSeed::Unseeded => initial_scatter(graph, &canvas),
    };

    let k = (canvas.usable_area() / n as f32).sqrt() * graph.density();
    let k_sq = k * k;
    let min_distance = config.min_distance;
    let mut t = temperature;

    let mut disp_x = vec![0.0f32; n];
    let mut disp_y = vec![0.0f32; n];

    for _ in 0..steps {
        disp_x.fill(0.0);
        disp_y.fill(0.0);

        // Repulsion between every unordered pair
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos_x[i] - pos_x[j];
                let dy = pos_y[i] - pos_y[j];
                let dist = (dx * dx + dy * dy).sqrt().max(min_distance);
                let force = k_sq / dist;
                let fx = dx / dist * force;
                let fy = dy / dist * force;
                disp_x[i] += fx;
                disp_y[i] += fy;
                disp_x[j] -= fx;
                disp_y[j] -= fy;
            }
        }

        // Attraction along edges. k > 0 here: an edge implies density > 0.
        for edge in graph.edges() {
            let (u, v) = edge.endpoints();
            let dx = pos_x[u] - pos_x[v];
            let dy = pos_y[u] - pos_y[v];
            let dist = (dx * dx + dy * dy).sqrt().max(min_distance);
            let force = dist * dist / k;
            let fx = dx / dist * force;
            let fy = dy / dist * force;
            disp_x[u] -= fx;
            disp_y[u] -= fy;
            disp_x[v] += fx;
            disp_y[v] += fy;
        }

        // Cap displacement at the temperature, then clip to the canvas
        for i in 0..n {
            let len = (disp_x[i] * disp_x[i] + disp_y[i] * disp_y[i])
                .sqrt()
                .max(min_distance);
            let scale = len.min(t) / len;
            pos_x[i] = canvas.clamp_x(pos_x[i] + disp_x[i] * scale);
            pos_y[i] = canvas.clamp_y(pos_y[i] + disp_y[i] * scale);
        }

        t *= config.cooling_factor;
    }

    log::trace!(
        "force layout: {} vertices, {} steps, temperature {} -> {}",
        n,
        steps,
        temperature,
        t
    );

    let positions = pos_x
        .into_iter()
        .zip(pos_y)
        .map(|(x, y)| VertexPosition::new(x, y))
        .collect();
    Ok(LayoutState::new(positions, t))
}

/// Uniform scatter over the padded canvas, reproducible per graph.
fn initial_scatter(graph: &Graph, canvas: &Canvas) -> (Vec<f32>, Vec<f32>) {
    let n = graph.vertex_count();
    let mut rng = ChaCha8Rng::seed_from_u64(graph.structural_hash());

    let width = canvas.usable_width();
    let height = canvas.usable_height();
    let xs = (0..n)
        .map(|_| canvas.padding + rng.r#gen::<f32>() * width)
        .collect();
    let ys = (0..n)
        .map(|_| canvas.padding + rng.r#gen::<f32>() * height)
        .collect();
    (xs, ys)
}
