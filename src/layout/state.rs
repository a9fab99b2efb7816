//! Layout values passed between calls.
//!
//! A layout is never mutated in place: each step batch consumes the previous
//! state by reference and returns a fresh one.

use serde::{Deserialize, Serialize};

/// A vertex position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexPosition {
    pub x: f32,
    pub y: f32,
}

impl VertexPosition {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(self, other: VertexPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for VertexPosition {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Positions (one per vertex, index-aligned) plus the simulation temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    pub positions: Vec<VertexPosition>,
    /// Upper bound on how far a vertex may move in the next step. Decays
    /// every step; callers treat a small value as convergence.
    pub temperature: f32,
}

impl LayoutState {
    pub fn new(positions: Vec<VertexPosition>, temperature: f32) -> Self {
        Self {
            positions,
            temperature,
        }
    }

    /// Same positions, new temperature. Used to re-heat a settled layout.
    pub fn with_temperature(&self, temperature: f32) -> Self {
        Self {
            positions: self.positions.clone(),
            temperature,
        }
    }

    /// Seed for continuing the simulation from this state.
    pub fn seed(&self) -> LayoutSeed<'_> {
        LayoutSeed::Seeded(&self.positions)
    }

    /// Positions interleaved as `[x0, y0, x1, y1, ...]`.
    pub fn interleaved(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

/// Starting point for a layout call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutSeed<'a> {
    /// Continue from these positions. Must hold one entry per vertex.
    Seeded(&'a [VertexPosition]),
    /// Scatter vertices randomly, seeded from the graph's structure.
    Unseeded,
}

impl<'a> From<Option<&'a [VertexPosition]>> for LayoutSeed<'a> {
    fn from(positions: Option<&'a [VertexPosition]>) -> Self {
        positions.map_or(LayoutSeed::Unseeded, LayoutSeed::Seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = VertexPosition::new(0.0, 0.0);
        let b = VertexPosition::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
    }

    #[test]
    fn test_interleaved() {
        let state = LayoutState::new(vec![(1.0, 2.0).into(), (3.0, 4.0).into()], 10.0);
        assert_eq!(state.interleaved(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_seed_from_option() {
        let positions = [VertexPosition::new(1.0, 1.0)];
        assert_eq!(LayoutSeed::from(None::<&[VertexPosition]>), LayoutSeed::Unseeded);
        assert_eq!(
            LayoutSeed::from(Some(&positions[..])),
            LayoutSeed::Seeded(&positions[..])
        );
    }
}
