//! Graph Layout - WASM Module
//!
//! Random graph generation, incremental force-directed layout and hit testing
//! for interactive graph editors. Compiled to WebAssembly, with a
//! JavaScript-friendly API exposed via wasm-bindgen; the same functions are
//! usable directly from Rust.
//!
//! # Architecture
//!
//! - `graph`: immutable graph model and random generators
//! - `layout`: Fruchterman-Reingold force layout and tidy tree layout
//! - `spatial`: hit testing, linear scans and an R-tree index
//! - `session`: one graph being animated and edited, independent of rendering

use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;
pub mod session;
pub mod spatial;

pub use error::ValidationError;
pub use graph::{Edge, Graph, generate_random_binary_tree, generate_random_graph};
pub use layout::{
    CoordinateMode, ForceConfig, LayoutSeed, LayoutState, TidyTreeConfig, VertexPosition,
    initial_temperature, layout_incrementally, layout_tree,
};
pub use session::{GraphKind, Session, SessionConfig, TapOutcome};
pub use spatial::{
    SpatialIndex, find_edge_by_coordinates, find_vertex_by_coordinates, point_to_segment_distance,
};

/// Initialize the WASM module: route `log` to the browser console and report
/// panics there.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

/// Main entry point for JavaScript.
///
/// Wraps a [`Session`]. Call `tick` every `tickIntervalMs` milliseconds while
/// `isRunning`, redraw from `getPositions` and `getEdgePairs`, and forward
/// pointer taps to `tap`.
#[wasm_bindgen]
pub struct GraphLayoutWasm {
    session: Session,
}

#[wasm_bindgen]
impl GraphLayoutWasm {
    /// Create a session with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: Session::default(),
        }
    }

    /// Create a session with reproducible random generation.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u32) -> Self {
        Self {
            session: Session::with_seed(SessionConfig::default(), u64::from(seed)),
        }
    }

    // =========================================================================
    // Graph Generation
    // =========================================================================

    /// Replace the graph with a random one of 2 to `maxVertices` vertices
    /// and degree at most `maxDegree`.
    #[wasm_bindgen(js_name = generateGraph)]
    pub fn generate_graph(
        &mut self,
        max_vertices: usize,
        max_degree: usize,
    ) -> Result<(), JsError> {
        Ok(self.session.generate_graph(max_vertices, max_degree)?)
    }

    /// Replace the graph with a random binary tree of `maxVertices` vertices.
    #[wasm_bindgen(js_name = generateTree)]
    pub fn generate_tree(&mut self, max_vertices: usize) -> Result<(), JsError> {
        Ok(self.session.generate_tree(max_vertices)?)
    }

    /// Get the graph as `{ vertex_count, edges: [[u, v], ...] }`, or
    /// `undefined`.
    #[wasm_bindgen(js_name = getGraph)]
    pub fn get_graph(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.session.graph())?)
    }

    /// Load a graph in the `getGraph` shape. `isTree` selects the tree
    /// layout.
    #[wasm_bindgen(js_name = setGraph)]
    pub fn set_graph(&mut self, graph: JsValue, is_tree: bool) -> Result<(), JsError> {
        let graph: Graph = serde_wasm_bindgen::from_value(graph)?;
        let kind = if is_tree { GraphKind::Tree } else { GraphKind::General };
        Ok(self.session.load(graph, kind)?)
    }

    /// Number of vertices, 0 without a graph.
    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> u32 {
        self.session.graph().map_or(0, |g| g.vertex_count() as u32)
    }

    /// Number of edges, 0 without a graph.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.session.graph().map_or(0, |g| g.edge_count() as u32)
    }

    /// Get edges as a flat Uint32Array [u0, v0, u1, v1, ...], `u < v`.
    #[wasm_bindgen(js_name = getEdgePairs)]
    pub fn get_edge_pairs(&self) -> Uint32Array {
        Uint32Array::from(&self.edge_pairs()[..])
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Report the canvas size in pixels. Zero means not ready yet.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        Ok(self.session.resize(width, height)?)
    }

    /// Advance the layout by `steps` steps. Returns whether anything moved.
    pub fn step(&mut self, steps: usize) -> Result<bool, JsError> {
        Ok(self.session.step(steps)?)
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        self.session.toggle()
    }

    /// Advance one animation frame. Returns whether still running.
    pub fn tick(&mut self) -> Result<bool, JsError> {
        Ok(self.session.tick()?)
    }

    /// Get positions as a Float32Array [x0, y0, x1, y1, ...]. Empty until
    /// both a graph and a canvas size are known.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(&self.positions()[..])
    }

    /// Current temperature, `undefined` without a layout.
    pub fn temperature(&self) -> Option<f32> {
        self.session.temperature()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Suggested delay between `tick` calls.
    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> u32 {
        self.session.config().tick_interval_ms
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Handle a tap. Returns `{ kind: "selected" | "deselected" |
    /// "edge_added" | "edge_removed" | "cleared" | "ignored", ... }`.
    pub fn tap(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.session.tap(x, y))?)
    }

    #[wasm_bindgen(js_name = selectedVertex)]
    pub fn selected_vertex(&self) -> Option<u32> {
        self.session.selected_vertex().map(|v| v as u32)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the configuration. Missing fields take their defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: SessionConfig = serde_wasm_bindgen::from_value(config)?;
        self.session.set_config(config);
        Ok(())
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.session.config())?)
    }
}

impl GraphLayoutWasm {
    fn edge_pairs(&self) -> Vec<u32> {
        self.session.graph().map_or_else(Vec::new, |g| {
            g.edges()
                .iter()
                .flat_map(|e| [e.u() as u32, e.v() as u32])
                .collect()
        })
    }

    fn positions(&self) -> Vec<f32> {
        self.session
            .layout()
            .map_or_else(Vec::new, LayoutState::interleaved)
    }
}

impl Default for GraphLayoutWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The full pipeline through the wrapper: generate, size, animate, edit.
    #[test]
    fn test_generate_layout_and_edit() {
        let mut wasm = GraphLayoutWasm::with_seed(42);
        wasm.session.generate_graph(12, 3).unwrap();
        assert!(wasm.positions().is_empty());

        wasm.session.resize(800.0, 600.0).unwrap();
        let n = wasm.vertex_count() as usize;
        assert_eq!(wasm.positions().len(), 2 * n);
        assert_eq!(wasm.edge_pairs().len(), 2 * wasm.edge_count() as usize);

        wasm.start();
        while wasm.session.tick().unwrap() {}
        assert!(!wasm.is_running());
        assert!(wasm.temperature().unwrap() < 0.5);

        let positions = wasm.positions();
        assert!(
            positions
                .chunks(2)
                .all(|p| (40.0..=760.0).contains(&p[0]) && (40.0..=560.0).contains(&p[1]))
        );

        // Select vertex 0, then tap it again
        let (x, y) = (positions[0], positions[1]);
        assert_eq!(wasm.session.tap(x, y), TapOutcome::Selected { vertex: 0 });
        assert_eq!(wasm.selected_vertex(), Some(0));
        assert_eq!(wasm.session.tap(x, y), TapOutcome::Deselected { vertex: 0 });
        assert_eq!(wasm.selected_vertex(), None);
    }

    #[test]
    fn test_edge_pairs_are_canonical() {
        let mut wasm = GraphLayoutWasm::with_seed(7);
        wasm.session.generate_tree(9).unwrap();

        let pairs = wasm.edge_pairs();
        assert_eq!(pairs.len(), 2 * 8);
        assert!(pairs.chunks(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn test_empty_wrapper() {
        let wasm = GraphLayoutWasm::default();
        assert_eq!(wasm.vertex_count(), 0);
        assert_eq!(wasm.edge_count(), 0);
        assert!(wasm.edge_pairs().is_empty());
        assert!(wasm.positions().is_empty());
        assert_eq!(wasm.temperature(), None);
        assert_eq!(wasm.tick_interval_ms(), 200);
    }
}
