//! Tidy tree layout for tree-shaped graphs.
//!
//! A hierarchical placement in the Reingold-Tilford family, used instead of
//! the force simulation when the graph is a tree. Subtrees are laid out
//! bottom-up and packed against each other by comparing their contours, and
//! each parent is centered over its first and last child.
//!
//! # Algorithm Overview
//!
//! 1. **Orientation:** BFS from the lowest-index vertex of each connected
//!    component. Edges that would close a cycle are ignored, so any graph
//!    yields a spanning forest. All component roots hang under one virtual
//!    root and end up side by side.
//! 2. **First walk (bottom-up):** Each subtree reports its left and right
//!    contour (extreme x per level, relative to its root). A new child subtree
//!    is shifted right until it clears the contour accumulated so far by
//!    `sibling_separation` on the child level and `subtree_separation` below.
//! 3. **Second walk (top-down):** Accumulate relative offsets into final x.
//! 4. **Coordinate transform:** Map (x, depth) into the padded canvas, either
//!    top-down (linear) or as rings around the canvas center (radial).
//!
//! Both walks iterate the BFS order (forward or reversed), so deep trees don't
//! recurse.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::canvas::Canvas;
use super::force::{DEFAULT_PADDING, padded_temperature};
use super::state::{LayoutState, VertexPosition};
use crate::error::Result;
use crate::graph::Graph;

/// Coordinate mode for the final layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Top-down: root at the top, one row per level.
    Linear,
    /// Root at the canvas center, one ring per level.
    Radial,
}

/// Configuration for the tidy tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidyTreeConfig {
    /// Minimum horizontal separation between siblings, in layout units.
    pub sibling_separation: f32,
    /// Minimum horizontal separation between cousins in adjacent subtrees.
    pub subtree_separation: f32,
    /// Upper bound on the pixel spacing between levels. One layout unit of
    /// horizontal separation is also at most this many pixels.
    pub level_separation: f32,
    /// Margin kept free on every side of the canvas.
    pub padding: f32,
    /// Coordinate output mode.
    pub coordinate_mode: CoordinateMode,
}

impl Default for TidyTreeConfig {
    fn default() -> Self {
        Self {
            sibling_separation: 1.0,
            subtree_separation: 2.0,
            level_separation: 80.0,
            padding: DEFAULT_PADDING,
            coordinate_mode: CoordinateMode::Linear,
        }
    }
}

/// Index of the virtual root in the layout node list.
const VIRTUAL_ROOT: usize = 0;

/// Internal node data used during the walks.
#[derive(Debug)]
struct LayoutNode {
    /// Graph vertex, `None` for the virtual root.
    vertex: Option<usize>,
    /// Layout index of the parent (`None` for the virtual root).
    parent: Option<usize>,
    /// Depth below the virtual root (component roots are at 1).
    depth: u32,
    /// Children in ascending vertex order.
    children: Vec<usize>,
    /// x relative to the parent, from the first walk.
    offset: f32,
}

/// Extreme x per level of a subtree, relative to its root. Index 0 is the
/// root's own level.
#[derive(Debug)]
struct Contour {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Contour {
    fn leaf() -> Self {
        Self {
            left: vec![0.0],
            right: vec![0.0],
        }
    }

    /// Place `other` at `shift` to the right of `self` and merge.
    fn absorb(&mut self, other: Contour, shift: f32) {
        for (d, (l, r)) in other.left.into_iter().zip(other.right).enumerate() {
            if d < self.left.len() {
                self.right[d] = r + shift;
            } else {
                self.left.push(l + shift);
                self.right.push(r + shift);
            }
        }
    }
}

/// The tidy tree layout engine.
pub struct TidyTreeLayout {
    config: TidyTreeConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: TidyTreeConfig) -> Self {
        Self { config }
    }

    /// Lay out `graph` inside a `width` x `height` canvas.
    ///
    /// The returned temperature is the starting temperature for the canvas
    /// and this padding, so the result can also seed the force simulation.
    pub fn compute(&self, graph: &Graph, width: f32, height: f32) -> Result<LayoutState> {
        let canvas = Canvas::new(width, height, self.config.padding)?;
        let temperature = padded_temperature(width, height, self.config.padding);

        match graph.vertex_count() {
            0 => return Ok(LayoutState::new(Vec::new(), temperature)),
            1 => return Ok(LayoutState::new(vec![canvas.center()], temperature)),
            _ => {}
        }
        let canvas = canvas.with_interior()?;

        let mut nodes = Self::build_forest(graph);
        self.first_walk(&mut nodes);
        let xs = Self::second_walk(&nodes);

        let positions = self.transform(&nodes, &xs, graph.vertex_count(), &canvas);
        log::trace!(
            "tidy tree layout: {} vertices, {} roots, {:?}",
            graph.vertex_count(),
            nodes[VIRTUAL_ROOT].children.len(),
            self.config.coordinate_mode
        );
        Ok(LayoutState::new(positions, temperature))
    }

    /// BFS spanning forest under a virtual root, stored in BFS order so every
    /// parent precedes its children.
    fn build_forest(graph: &Graph) -> Vec<LayoutNode> {
        let n = graph.vertex_count();
        let mut nodes = Vec::with_capacity(n + 1);
        nodes.push(LayoutNode {
            vertex: None,
            parent: None,
            depth: 0,
            children: Vec::new(),
            offset: 0.0,
        });

        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            queue.push_back(Self::attach(&mut nodes, VIRTUAL_ROOT, start));

            while let Some(idx) = queue.pop_front() {
                let Some(vertex) = nodes[idx].vertex else {
                    continue;
                };
                let mut neighbors: Vec<usize> = graph.neighbors(vertex).collect();
                neighbors.sort_unstable();
                for next in neighbors {
                    if !visited[next] {
                        visited[next] = true;
                        queue.push_back(Self::attach(&mut nodes, idx, next));
                    }
                }
            }
        }

        nodes
    }

    fn attach(nodes: &mut Vec<LayoutNode>, parent: usize, vertex: usize) -> usize {
        let idx = nodes.len();
        let depth = nodes[parent].depth + 1;
        nodes.push(LayoutNode {
            vertex: Some(vertex),
            parent: Some(parent),
            depth,
            children: Vec::new(),
            offset: 0.0,
        });
        nodes[parent].children.push(idx);
        idx
    }

    /// Bottom-up: pack child subtrees left to right and center each parent.
    fn first_walk(&self, nodes: &mut [LayoutNode]) {
        let mut contours: Vec<Option<Contour>> = (0..nodes.len()).map(|_| None).collect();

        for v in (0..nodes.len()).rev() {
            let children = std::mem::take(&mut nodes[v].children);
            if children.is_empty() {
                contours[v] = Some(Contour::leaf());
                continue;
            }

            let mut merged: Option<Contour> = None;
            let mut shifts = Vec::with_capacity(children.len());

            for &child in &children {
                let sub = contours[child].take().unwrap_or_else(Contour::leaf);
                let shift = match &merged {
                    None => 0.0,
                    Some(acc) => self.required_shift(acc, &sub),
                };
                shifts.push(shift);
                match merged.as_mut() {
                    None => merged = Some(sub),
                    Some(acc) => acc.absorb(sub, shift),
                }
            }

            // Center the parent over its first and last child
            let mid = (shifts[0] + shifts[shifts.len() - 1]) / 2.0;
            for (&child, &shift) in children.iter().zip(&shifts) {
                nodes[child].offset = shift - mid;
            }

            let mut own = Contour::leaf();
            if let Some(acc) = merged {
                own.left.extend(acc.left.into_iter().map(|x| x - mid));
                own.right.extend(acc.right.into_iter().map(|x| x - mid));
            }
            contours[v] = Some(own);
            nodes[v].children = children;
        }
    }

    /// Smallest shift placing `right` clear of `left` on every shared level.
    fn required_shift(&self, left: &Contour, right: &Contour) -> f32 {
        left.right
            .iter()
            .zip(&right.left)
            .enumerate()
            .map(|(depth, (&l, &r))| {
                let separation = if depth == 0 {
                    self.config.sibling_separation
                } else {
                    self.config.subtree_separation
                };
                l + separation - r
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Top-down: absolute x from accumulated offsets.
    fn second_walk(nodes: &[LayoutNode]) -> Vec<f32> {
        let mut xs = vec![0.0f32; nodes.len()];
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                xs[idx] = xs[parent] + node.offset;
            }
        }
        xs
    }

    /// Map (x, depth) into canvas coordinates, indexed by vertex.
    fn transform(
        &self,
        nodes: &[LayoutNode],
        xs: &[f32],
        vertex_count: usize,
        canvas: &Canvas,
    ) -> Vec<VertexPosition> {
        let real = || {
            nodes
                .iter()
                .zip(xs)
                .filter_map(|(node, &x)| node.vertex.map(|v| (v, x, node.depth)))
        };

        // A single tree keeps its root on level 0 (the canvas center in radial
        // mode). A forest keeps the virtual root's level so that the separate
        // roots don't collide at the center.
        let level_base = match (self.config.coordinate_mode, nodes[VIRTUAL_ROOT].children.len()) {
            (CoordinateMode::Radial, roots) if roots > 1 => 0,
            _ => 1,
        };

        let min_x = real().map(|(_, x, _)| x).fold(f32::INFINITY, f32::min);
        let max_x = real().map(|(_, x, _)| x).fold(f32::NEG_INFINITY, f32::max);
        let span = max_x - min_x;
        let max_level = real().map(|(_, _, d)| d - level_base).max().unwrap_or(0);

        let center = canvas.center();
        let mut positions = vec![center; vertex_count];

        match self.config.coordinate_mode {
            CoordinateMode::Linear => {
                let unit = if span > f32::EPSILON {
                    (canvas.usable_width() / span).min(self.config.level_separation)
                } else {
                    0.0
                };
                let gap = if max_level > 0 {
                    (canvas.usable_height() / max_level as f32).min(self.config.level_separation)
                } else {
                    0.0
                };
                let top = center.y - gap * max_level as f32 / 2.0;
                let mid_x = min_x + span / 2.0;

                for (vertex, x, depth) in real() {
                    let level = (depth - level_base) as f32;
                    positions[vertex] =
                        VertexPosition::new(center.x + (x - mid_x) * unit, top + level * gap);
                }
            }
            CoordinateMode::Radial => {
                let ring = if max_level > 0 {
                    let max_radius = canvas.usable_width().min(canvas.usable_height()) / 2.0;
                    (max_radius / max_level as f32).min(self.config.level_separation)
                } else {
                    0.0
                };
                let divisor = span + self.config.sibling_separation;
                let angular_scale = if divisor > f32::EPSILON {
                    std::f32::consts::TAU / divisor
                } else {
                    0.0
                };

                for (vertex, x, depth) in real() {
                    let radius = (depth - level_base) as f32 * ring;
                    let angle = (x - min_x) * angular_scale;
                    positions[vertex] = VertexPosition::new(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                    );
                }
            }
        }

        for p in &mut positions {
            p.x = canvas.clamp_x(p.x);
            p.y = canvas.clamp_y(p.y);
        }
        positions
    }
}

/// Lay out a tree-shaped graph hierarchically. See [`TidyTreeLayout`].
pub fn layout_tree(
    graph: &Graph,
    width: f32,
    height: f32,
    config: &TidyTreeConfig,
) -> Result<LayoutState> {
    TidyTreeLayout::new(config.clone()).compute(graph, width, height)
}
