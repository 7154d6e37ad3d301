use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{LoupeError, LoupeResult};

/// Number of independently configurable lens regions.
pub const NUM_REGIONS: usize = 3;

/// One magnifying-lens configuration.
///
/// All geometry is normalized to the frame. Values are never clamped: a region may extend past
/// the frame edges, and degenerate sizes or zooms simply render nothing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Region {
    /// Whether the region contributes to the output at all.
    pub enabled: bool,
    /// Center of the area to magnify.
    pub source_center: Point,
    /// Extent of the area to magnify, relative to the frame height on both axes.
    pub source_size: Vec2,
    /// Center of the magnified copy once fully animated in.
    pub dest_center: Point,
    /// Magnification once fully animated in, in tenths (`0.2` is 2x).
    pub dest_zoom: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            enabled: false,
            source_center: Point::new(0.5, 0.5),
            source_size: Vec2::new(0.5, 0.5),
            dest_center: Point::new(0.5, 0.5),
            dest_zoom: 0.2,
        }
    }
}

/// The effect's tunable state.
///
/// The host mutates these between frames; the compositor only ever borrows them for the
/// duration of one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    /// Draw source/destination rectangles and center crosses for positioning.
    pub show_wireframe: bool,
    /// Draw the pointer, magnified image and outline.
    pub show_magnified: bool,
    /// Outline width around the magnified region, in 100 pixels at 1080p.
    pub outline_width: f64,
    /// Pointer line width, in 100 pixels at 1080p.
    pub pointer_width: f64,
    /// Pointer bubble outline width, in 100 pixels at 1080p.
    pub pointer_outline_width: f64,
    /// Fade in/out duration, in 10 time units.
    pub fade_duration: f64,
    /// Time after which the image is back to normal, in 1000 time units.
    pub end_time: f64,
    /// Lens regions, painted in index order.
    pub regions: [Region; NUM_REGIONS],
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            show_wireframe: true,
            show_magnified: true,
            outline_width: 0.03,
            pointer_width: 0.06,
            pointer_outline_width: 0.03,
            fade_duration: 0.1,
            end_time: 0.01,
            regions: [Region::default(); NUM_REGIONS],
        }
    }
}

impl EffectParameters {
    /// Parse a (possibly partial) JSON parameter set; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> LoupeResult<Self> {
        serde_json::from_str(s).map_err(|e| LoupeError::serde(format!("parse parameters: {e}")))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> LoupeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LoupeError::serde(format!("serialize parameters: {e}")))
    }

    /// Iterate over the enabled regions together with their index.
    pub fn enabled_regions(&self) -> impl Iterator<Item = (usize, &Region)> {
        self.regions.iter().enumerate().filter(|(_, r)| r.enabled)
    }

    /// Whether any region is enabled.
    pub fn any_enabled(&self) -> bool {
        self.regions.iter().any(|r| r.enabled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/model.rs"]
mod tests;
