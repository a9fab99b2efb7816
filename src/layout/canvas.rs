//! Padded canvas rectangle shared by the layout algorithms.

use super::state::VertexPosition;
use crate::error::{Result, ValidationError};

/// Canvas bounds with a fixed margin on every side. Layouts keep vertices in
/// `[padding, width - padding] x [padding, height - padding]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Canvas {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Canvas {
    /// Validate dimensions: both finite and positive.
    pub fn new(width: f32, height: f32, padding: f32) -> Result<Self> {
        let valid = |d: f32| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ValidationError::InvalidCanvasBounds { width, height });
        }
        Ok(Self {
            width,
            height,
            padding: padding.max(0.0),
        })
    }

    /// Require a non-empty padded interior, which anything that places more
    /// than one vertex needs.
    pub fn with_interior(self) -> Result<Self> {
        if self.usable_width() <= 0.0 || self.usable_height() <= 0.0 {
            return Err(ValidationError::InvalidCanvasBounds {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    #[inline]
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.padding
    }

    #[inline]
    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.padding
    }

    #[inline]
    pub fn usable_area(&self) -> f32 {
        self.usable_width() * self.usable_height()
    }

    #[inline]
    pub fn center(&self) -> VertexPosition {
        VertexPosition::new(self.width / 2.0, self.height / 2.0)
    }

    /// Hard-clip into the padded rectangle. Only valid after
    /// [`Canvas::with_interior`].
    #[inline]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.padding, self.width - self.padding)
    }

    #[inline]
    pub fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(self.padding, self.height - self.padding)
    }

    #[cfg(test)]
    pub fn contains(&self, p: VertexPosition) -> bool {
        (self.padding..=self.width - self.padding).contains(&p.x)
            && (self.padding..=self.height - self.padding).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(Canvas::new(0.0, 100.0, 40.0).is_err());
        assert!(Canvas::new(100.0, -1.0, 40.0).is_err());
        assert!(Canvas::new(f32::NAN, 100.0, 40.0).is_err());
        assert!(Canvas::new(f32::INFINITY, 100.0, 40.0).is_err());
    }

    #[test]
    fn test_interior() {
        assert!(Canvas::new(80.0, 200.0, 40.0).unwrap().with_interior().is_err());
        let canvas = Canvas::new(100.0, 200.0, 40.0).unwrap().with_interior().unwrap();
        assert_eq!(canvas.usable_area(), 20.0 * 120.0);
        assert_eq!(canvas.clamp_x(0.0), 40.0);
        assert_eq!(canvas.clamp_y(500.0), 160.0);
        assert!(canvas.contains(canvas.center()));
    }
}
