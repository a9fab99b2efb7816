//! Layout algorithms for graph visualization.
//!
//! This module computes vertex positions inside a padded canvas:
//!
//! - `force`: incremental Fruchterman-Reingold simulation for general graphs
//! - `tidy_tree`: hierarchical placement for trees
//!
//! Both return a [`LayoutState`]; the force engine can continue from either.

mod canvas;
pub mod force;
mod state;
pub mod tidy_tree;

pub use force::{DEFAULT_PADDING, ForceConfig, initial_temperature, layout_incrementally};
pub use state::{LayoutSeed, LayoutState, VertexPosition};
pub use tidy_tree::{CoordinateMode, TidyTreeConfig, TidyTreeLayout, layout_tree};
