use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::math::{lerp, pixel_round};
use crate::params::model::{EffectParameters, NUM_REGIONS, Region};

/// Integer pixel rectangle. Width and height may be zero or negative, in which case the
/// rectangle is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct IRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl IRect {
    /// Build a rectangle from its origin and extent.
    pub fn new(x0: i32, y0: i32, width: i32, height: i32) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Integer center, using truncating halving of the extent.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x0.saturating_add(self.width / 2),
            self.y0.saturating_add(self.height / 2),
        )
    }

    /// Center as a floating-point point.
    pub fn center_point(&self) -> Point {
        let (x, y) = self.center();
        Point::new(f64::from(x), f64::from(y))
    }

    /// The rectangle in continuous pixel space.
    pub fn to_rect(&self) -> Rect {
        let x0 = f64::from(self.x0);
        let y0 = f64::from(self.y0);
        Rect::new(
            x0,
            y0,
            x0 + f64::from(self.width),
            y0 + f64::from(self.height),
        )
    }
}

/// Geometry derived for one region at one instant. Never stored between frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RegionInfo {
    /// Area of the input frame being magnified.
    pub source: IRect,
    /// Interpolated magnification factor.
    pub zoom: f64,
    /// Area of the output frame receiving the magnified copy.
    pub dest: IRect,
}

/// Remap a normalized center onto a frame axis as `(2c - 0.5) * extent`.
///
/// `0.25` and `0.75` land on the frame edges, so the full `[0, 1]` range reaches half a frame
/// past either side. This mapping is part of the effect's established look and is kept as is.
fn remap_center(c: f64, extent: f64) -> f64 {
    (c * 2.0 - 0.5) * extent
}

/// Compute source and destination rectangles for `region` at the given fade level.
///
/// Sizes are scaled by the frame height on both axes, so a square source stays square on any
/// aspect ratio. At `fade == 0` the destination coincides with the source; at `fade == 1` it is
/// centered on `dest_center` and magnified by `dest_zoom * 10`.
pub fn compute_region_info(region: &Region, fade: f64, canvas: Canvas) -> RegionInfo {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);

    let src_w = pixel_round(region.source_size.x * h);
    let src_h = pixel_round(region.source_size.y * h);
    let src_x0 = pixel_round(remap_center(region.source_center.x, w) - f64::from(src_w / 2));
    let src_y0 = pixel_round(remap_center(region.source_center.y, h) - f64::from(src_h / 2));

    let zoom = lerp(fade, 1.0, region.dest_zoom * 10.0);
    let dst_w = pixel_round(f64::from(src_w) * zoom);
    let dst_h = pixel_round(f64::from(src_h) * zoom);
    let cx = lerp(fade, region.source_center.x, region.dest_center.x);
    let cy = lerp(fade, region.source_center.y, region.dest_center.y);
    let dst_x0 = pixel_round(remap_center(cx, w) - f64::from(dst_w / 2));
    let dst_y0 = pixel_round(remap_center(cy, h) - f64::from(dst_h / 2));

    RegionInfo {
        source: IRect::new(src_x0, src_y0, src_w, src_h),
        zoom,
        dest: IRect::new(dst_x0, dst_y0, dst_w, dst_h),
    }
}

/// Geometry for every region, enabled or not.
pub fn compute_frame_geometry(
    params: &EffectParameters,
    fade: f64,
    canvas: Canvas,
) -> [RegionInfo; NUM_REGIONS] {
    std::array::from_fn(|i| compute_region_info(&params.regions[i], fade, canvas))
}

/// Instantaneous stroke widths in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StrokeWidths {
    /// Pointer line width.
    pub pointer: f64,
    /// Ring width around the pointer bubble.
    pub bubble_outline: f64,
    /// Border around the magnified image.
    pub outline: f64,
}

impl StrokeWidths {
    /// Widths at the given fade level. The outline reaches full width at a third of the fade.
    pub fn at(params: &EffectParameters, fade: f64, canvas: Canvas) -> Self {
        let h = f64::from(canvas.height);
        let scaled = |v: f64| v * 100.0 * h / 1080.0;
        Self {
            pointer: lerp(fade, 0.0, scaled(params.pointer_width)),
            bubble_outline: lerp(fade, 0.0, scaled(params.pointer_outline_width)),
            outline: lerp(fade * 3.0, 0.0, scaled(params.outline_width)),
        }
    }

    /// Outer radius of the pointer bubble.
    pub fn bubble_radius(&self) -> f64 {
        self.pointer + self.bubble_outline / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/region.rs"]
mod tests;
