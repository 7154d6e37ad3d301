use crate::foundation::error::{LoupeError, LoupeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Frame dimensions shared by every buffer handed to one effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting empty frames.
    pub fn new(width: u32, height: u32) -> LoupeResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoupeError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels in a tightly packed frame.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Scale for stroke widths that are calibrated against a 1080-pixel-tall frame.
    pub fn reference_scale(self) -> f64 {
        f64::from(self.height) / 1080.0
    }

    /// The full frame as a rectangle in pixel space.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
