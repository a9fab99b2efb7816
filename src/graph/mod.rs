//! Graph data structures and random generators.
//!
//! A [`Graph`] is an immutable vertex count plus a canonical edge set, with
//! adjacency derived through petgraph. The [`generate`] module produces random
//! instances for exercising the layout.

mod edge;
pub mod generate;
mod model;

pub use edge::Edge;
pub use generate::{generate_random_binary_tree, generate_random_graph};
pub use model::Graph;
