//! Interactive editing session.
//!
//! A [`Session`] holds everything a front end needs to animate and edit one
//! graph: the graph itself, its current layout, the canvas size, the selected
//! vertex and whether the animation is running. Rendering stays with the
//! caller; the session only answers "what changed".
//!
//! Typical use from a UI loop:
//!
//! 1. `resize` whenever the canvas changes size
//! 2. `generate_graph` / `generate_tree` from the controls
//! 3. `tick` every `tick_interval_ms` while `is_running`
//! 4. `tap` on pointer events

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::graph::{Edge, Graph, generate_random_binary_tree, generate_random_graph};
use crate::layout::{
    ForceConfig, LayoutSeed, LayoutState, TidyTreeConfig, VertexPosition, layout_incrementally,
    layout_tree,
};
use crate::spatial::{DEFAULT_EDGE_THRESHOLD, DEFAULT_VERTEX_RADIUS, SpatialIndex};

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulation steps per animation tick (default: 10).
    pub steps_per_tick: usize,
    /// The animation stops once the temperature drops below this (default: 0.5).
    pub convergence_temperature: f32,
    /// Suggested delay between ticks in milliseconds (default: 200).
    pub tick_interval_ms: u32,
    /// Pick radius around vertices (default: 20).
    pub vertex_hit_radius: f32,
    /// Pick distance from edges (default: 8).
    pub edge_hit_threshold: f32,
    pub force: ForceConfig,
    pub tree: TidyTreeConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            steps_per_tick: 10,
            convergence_temperature: 0.5,
            tick_interval_ms: 200,
            vertex_hit_radius: DEFAULT_VERTEX_RADIUS,
            edge_hit_threshold: DEFAULT_EDGE_THRESHOLD,
            force: ForceConfig::default(),
            tree: TidyTreeConfig::default(),
        }
    }
}

/// How the current graph was produced. Decides how a fresh layout is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    /// Force-directed layout from a random scatter.
    #[default]
    General,
    /// Hierarchical tree layout.
    Tree,
}

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TapOutcome {
    /// A vertex became selected.
    Selected { vertex: usize },
    /// The selected vertex was tapped again.
    Deselected { vertex: usize },
    /// A second vertex was tapped; the edge to the selected one was added.
    EdgeAdded { edge: Edge },
    /// An edge was tapped and removed.
    EdgeRemoved { edge: Edge },
    /// Empty space was tapped; the selection is cleared.
    Cleared,
    /// No graph or layout to hit.
    Ignored,
}

/// One graph being laid out and edited.
pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    graph: Option<Graph>,
    kind: GraphKind,
    layout: Option<LayoutState>,
    canvas: Option<(f32, f32)>,
    selected: Option<usize>,
    running: bool,
    /// Built on first tap after the graph or layout changed.
    spatial: Option<SpatialIndex>,
}

impl Session {
    /// Create a session whose generators draw from OS entropy.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a session with reproducible generators.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            graph: None,
            kind: GraphKind::General,
            layout: None,
            canvas: None,
            selected: None,
            running: false,
            spatial: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next operation.
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn layout(&self) -> Option<&LayoutState> {
        self.layout.as_ref()
    }

    /// Current temperature, if there is a layout.
    pub fn temperature(&self) -> Option<f32> {
        self.layout.as_ref().map(|l| l.temperature)
    }

    /// Canvas size, once a usable one has been reported.
    pub fn canvas(&self) -> Option<(f32, f32)> {
        self.canvas
    }

    pub fn selected_vertex(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // =========================================================================
    // Graph lifecycle
    // =========================================================================

    /// Replace the graph with a random one and lay it out from a fresh
    /// scatter.
    ///
    /// # Errors
    ///
    /// Generator validation errors leave the session untouched. Layout errors
    /// (a canvas too small for the padding) keep the new graph without a
    /// layout.
    pub fn generate_graph(&mut self, max_vertices: usize, max_degree: usize) -> Result<()> {
        let graph = generate_random_graph(&mut self.rng, max_vertices, max_degree)?;
        self.load(graph, GraphKind::General)
    }

    /// Replace the graph with a random binary tree and lay it out
    /// hierarchically.
    ///
    /// # Errors
    ///
    /// As for [`Session::generate_graph`].
    pub fn generate_tree(&mut self, max_vertices: usize) -> Result<()> {
        let graph = generate_random_binary_tree(&mut self.rng, max_vertices)?;
        self.load(graph, GraphKind::Tree)
    }

    /// Replace the graph. Stops the animation and clears the selection.
    pub fn load(&mut self, graph: Graph, kind: GraphKind) -> Result<()> {
        log::debug!(
            "loading {:?} graph: {} vertices, {} edges",
            kind,
            graph.vertex_count(),
            graph.edge_count()
        );
        self.running = false;
        self.selected = None;
        self.kind = kind;
        self.graph = Some(graph);
        self.set_layout(None);
        self.initialize_layout()
    }

    /// Record a new canvas size. A graph still waiting for a canvas gets its
    /// first layout now.
    ///
    /// Zero dimensions mean the canvas is not ready yet and are not an error.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidCanvasBounds`] for negative or non-finite
    /// dimensions, plus any error from the initial layout.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            log::warn!("rejected canvas size {}x{}", width, height);
            return Err(ValidationError::InvalidCanvasBounds { width, height });
        }
        if width == 0.0 || height == 0.0 {
            self.canvas = None;
            return Ok(());
        }

        self.canvas = Some((width, height));
        if self.layout.is_none() {
            self.initialize_layout()?;
        }
        Ok(())
    }

    fn initialize_layout(&mut self) -> Result<()> {
        let (Some(graph), Some((width, height))) = (&self.graph, self.canvas) else {
            return Ok(());
        };

        let layout = match self.kind {
            GraphKind::General => layout_incrementally(
                LayoutSeed::Unseeded,
                self.config.force.initial_temperature(width, height),
                0,
                graph,
                width,
                height,
                &self.config.force,
            )?,
            GraphKind::Tree => layout_tree(graph, width, height, &self.config.tree)?,
        };
        self.set_layout(Some(layout));
        Ok(())
    }

    fn set_layout(&mut self, layout: Option<LayoutState>) {
        self.layout = layout;
        self.spatial = None;
    }

    fn set_graph(&mut self, graph: Graph) {
        self.graph = Some(graph);
        self.spatial = None;
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance the layout by `steps` steps. Returns whether anything moved.
    ///
    /// Does nothing without a graph, a layout and a canvas, or for zero steps.
    pub fn step(&mut self, steps: usize) -> Result<bool> {
        if steps == 0 {
            return Ok(false);
        }
        let (Some(graph), Some(layout), Some((width, height))) =
            (&self.graph, &self.layout, self.canvas)
        else {
            return Ok(false);
        };

        let next = layout_incrementally(
            layout.seed(),
            layout.temperature,
            steps,
            graph,
            width,
            height,
            &self.config.force,
        )?;
        self.set_layout(Some(next));
        Ok(true)
    }

    /// Start animating. Re-heats the layout so a settled graph moves again.
    pub fn start(&mut self) {
        if let (Some(layout), Some((width, height))) = (&self.layout, self.canvas) {
            let temperature = self.config.force.initial_temperature(width, height);
            let reheated = layout.with_temperature(temperature);
            self.set_layout(Some(reheated));
        }
        log::debug!("animation started");
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("animation stopped");
        }
        self.running = false;
    }

    /// Start if stopped, stop if running. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    /// One animation frame: advance `steps_per_tick` steps while running.
    ///
    /// Stops once the temperature falls below the convergence threshold, or
    /// when there is nothing to animate. Returns whether still running.
    pub fn tick(&mut self) -> Result<bool> {
        if !self.running {
            return Ok(false);
        }

        let advanced = match self.step(self.config.steps_per_tick) {
            Ok(advanced) => advanced,
            Err(err) => {
                self.running = false;
                return Err(err);
            }
        };
        if !advanced {
            log::debug!("nothing to animate, stopping");
            self.running = false;
            return Ok(false);
        }

        if let Some(temperature) = self.temperature() {
            if temperature < self.config.convergence_temperature {
                log::debug!("layout converged at temperature {}", temperature);
                self.running = false;
            }
        }
        Ok(self.running)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Handle a tap at canvas coordinates.
    ///
    /// Vertices take precedence over edges. Tapping a vertex selects it,
    /// tapping it again deselects it, and tapping another vertex while one is
    /// selected connects the two. Tapping an edge removes it. Anything else
    /// clears the selection.
    pub fn tap(&mut self, x: f32, y: f32) -> TapOutcome {
        let point = VertexPosition::new(x, y);
        let (radius, threshold) = (self.config.vertex_hit_radius, self.config.edge_hit_threshold);
        let (vertex, edge) = match self.spatial_index() {
            Some(index) => (index.vertex_at(point, radius), index.edge_at(point, threshold)),
            None => return TapOutcome::Ignored,
        };

        let outcome = match (vertex, edge) {
            (Some(vertex), _) => self.tap_vertex(vertex),
            (None, Some(edge)) => self.remove_edge(edge),
            (None, None) => {
                self.selected = None;
                TapOutcome::Cleared
            }
        };
        log::debug!("tap at ({}, {}): {:?}", x, y, outcome);
        outcome
    }

    fn tap_vertex(&mut self, vertex: usize) -> TapOutcome {
        match self.selected {
            None => {
                self.selected = Some(vertex);
                TapOutcome::Selected { vertex }
            }
            Some(first) if first == vertex => {
                self.selected = None;
                TapOutcome::Deselected { vertex }
            }
            Some(first) => {
                self.selected = None;
                let Some(graph) = &self.graph else {
                    return TapOutcome::Ignored;
                };
                let added = Edge::new(first, vertex).and_then(|edge| Ok((edge, graph.with_edge(edge)?)));
                match added {
                    Ok((edge, graph)) => {
                        self.set_graph(graph);
                        TapOutcome::EdgeAdded { edge }
                    }
                    Err(err) => {
                        log::warn!("could not connect {} and {}: {}", first, vertex, err);
                        TapOutcome::Ignored
                    }
                }
            }
        }
    }

    fn remove_edge(&mut self, edge: Edge) -> TapOutcome {
        self.selected = None;
        let Some(graph) = &self.graph else {
            return TapOutcome::Ignored;
        };
        let graph = graph.without_edge(&edge);
        self.set_graph(graph);
        TapOutcome::EdgeRemoved { edge }
    }

    fn spatial_index(&mut self) -> Option<&SpatialIndex> {
        if self.spatial.is_none() {
            let (graph, layout) = (self.graph.as_ref()?, self.layout.as_ref()?);
            match SpatialIndex::build(graph, &layout.positions) {
                Ok(index) => self.spatial = Some(index),
                Err(err) => {
                    log::warn!("ignoring tap: {}", err);
                    return None;
                }
            }
        }
        self.spatial.as_ref()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
