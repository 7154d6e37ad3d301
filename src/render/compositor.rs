use crate::animation::envelope::FadeEnvelope;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect};
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::geometry::region::{IRect, RegionInfo, StrokeWidths, compute_frame_geometry};
use crate::params::model::{EffectParameters, NUM_REGIONS};
use crate::pixels::frame::{FrameView, FrameViewMut};
use crate::render::composite::{CompositeOp, PixelSpan, composite_layer_in_place};
use crate::render::cpu::{BLACK, CpuRasterizer, LayerOp, Rgba8, WHITE};

/// Wireframe tint for source rectangles.
const WIREFRAME_SOURCE: Rgba8 = [255, 128, 128, 255];
/// Wireframe tint for destination rectangles.
const WIREFRAME_DEST: Rgba8 = [128, 255, 128, 255];
/// Wireframe stroke width in pixels.
const WIREFRAME_WIDTH: f64 = 3.0;
/// Half the extent of the wireframe center cross.
const CROSS_HALF: i32 = 10;

/// Everything derived from the parameters and the time value for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FramePlan {
    /// Host time value.
    pub time: f64,
    /// Eased master blend factor in `[0, 1]`.
    pub fade: f64,
    /// Instantaneous stroke widths.
    pub widths: StrokeWidths,
    /// Geometry of every region, enabled or not.
    pub regions: [RegionInfo; NUM_REGIONS],
}

impl FramePlan {
    /// Derive the plan for `time`.
    pub fn new(params: &EffectParameters, time: f64, canvas: Canvas) -> Self {
        let fade = FadeEnvelope::from_params(params).fade(time);
        Self {
            time,
            fade,
            widths: StrokeWidths::at(params, fade, canvas),
            regions: compute_frame_geometry(params, fade, canvas),
        }
    }
}

fn drawable(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

fn corners(frame: Rect) -> [Point; 4] {
    [
        Point::new(frame.x0, frame.y0),
        Point::new(frame.x1, frame.y0),
        Point::new(frame.x0, frame.y1),
        Point::new(frame.x1, frame.y1),
    ]
}

/// Nearest and farthest distance from `p` to any point of `frame`.
fn distance_range(p: Point, frame: Rect) -> (f64, f64) {
    let nearest = Point::new(p.x.clamp(frame.x0, frame.x1), p.y.clamp(frame.y0, frame.y1));
    let farthest = corners(frame)
        .into_iter()
        .map(|c| c.distance(p))
        .fold(0.0, f64::max);
    (nearest.distance(p), farthest)
}

fn cover_frame(frame: Rect, color: Rgba8) -> LayerOp {
    LayerOp::fill_rect(frame.inflate(1.0, 1.0), color)
}

/// Pointer line, with its width capped so the band still reaches past every frame corner.
///
/// Caps are butt, so narrowing the band beyond the frame leaves every frame pixel unchanged.
fn pointer_op(from: Point, to: Point, width: f64, frame: Rect) -> Option<LayerOp> {
    let dir = to - from;
    let len = dir.hypot();
    let reach = corners(frame)
        .into_iter()
        .map(|c| {
            if len > 0.0 {
                (c - from).cross(dir).abs() / len
            } else {
                c.distance(from)
            }
        })
        .fold(0.0, f64::max);
    let width = width.min(2.0 * (reach + 1.0));
    let op = LayerOp::line(from, to, width, BLACK);
    let visible = op.bounds().intersect(frame);
    (visible.width() > 0.0 && visible.height() > 0.0).then_some(op)
}

/// Filled bubble disc. A disc larger than the frame becomes a frame fill.
fn bubble_fill_op(center: Point, radius: f64, frame: Rect) -> Option<LayerOp> {
    let (near, far) = distance_range(center, frame);
    if radius <= near {
        None
    } else if radius >= far {
        Some(cover_frame(frame, BLACK))
    } else {
        Some(LayerOp::fill_circle(center, radius, BLACK))
    }
}

/// Bubble ring covering distances `[radius - width / 2, radius + width / 2]` from `center`.
///
/// The outer edge is pulled in to just past the farthest frame corner, so the flattened circle
/// stays frame-sized however wide the ring is.
fn bubble_ring_op(center: Point, radius: f64, width: f64, frame: Rect) -> Option<LayerOp> {
    let (near, far) = distance_range(center, frame);
    let inner = (radius - width / 2.0).max(0.0);
    let outer = radius + width / 2.0;
    if outer <= near || inner >= far {
        return None;
    }
    if inner <= near && outer >= far {
        return Some(cover_frame(frame, WHITE));
    }
    let outer = outer.min(far + 1.0);
    Some(LayerOp::stroke_circle(center, (inner + outer) / 2.0, outer - inner, WHITE))
}

/// Pointer, bubble, magnified image and outline for one region.
///
/// `frame` is the frame rectangle: elements that cannot reach it are dropped and oversized
/// ones are reduced to what is visible inside it.
fn lens_ops(info: &RegionInfo, widths: &StrokeWidths, frame: Rect, out: &mut Vec<LayerOp>) {
    let from = info.source.center_point();
    let to = info.dest.center_point();

    if drawable(widths.pointer) {
        out.extend(pointer_op(from, to, widths.pointer, frame));
    }
    let radius = widths.bubble_radius();
    if drawable(radius) {
        out.extend(bubble_fill_op(from, radius, frame));
        if drawable(widths.bubble_outline) {
            out.extend(bubble_ring_op(from, radius, widths.bubble_outline, frame));
        }
    }

    if info.dest.is_empty() {
        tracing::trace!(dest = ?info.dest, "empty destination, skipping image and outline");
        return;
    }

    if drawable(info.zoom) {
        let src = info.source;
        let dst = info.dest;
        let transform = Affine::translate((f64::from(dst.x0), f64::from(dst.y0)))
            * Affine::scale(info.zoom)
            * Affine::translate((-f64::from(src.x0), -f64::from(src.y0)));
        // Sample only the part of the source frame that exists and maps into the destination.
        let rect = transform
            .inverse()
            .transform_rect_bbox(dst.to_rect())
            .intersect(frame);
        if rect.width() > 0.0 && rect.height() > 0.0 {
            out.push(LayerOp::Image { transform, rect });
        }
    }

    let w = widths.outline;
    if drawable(w) {
        let d = info.dest.to_rect();
        out.push(LayerOp::stroke_rect(
            Rect::new(d.x0 - w / 2.0, d.y0 - w / 2.0, d.x1 + w / 2.0, d.y1 + w / 2.0),
            w,
            WHITE,
        ));
    }
}

/// Outline and center cross marking `rect`, as two separately composited strokes.
fn wireframe_ops(rect: &IRect, color: Rgba8) -> [LayerOp; 2] {
    let half = WIREFRAME_WIDTH / 2.0;
    let r = rect.to_rect();
    let frame = LayerOp::stroke_rect(
        Rect::new(r.x0 - half, r.y0 - half, r.x1 + half, r.y1 + half),
        WIREFRAME_WIDTH,
        color,
    );

    let (cx, cy) = rect.center();
    let p = |dx: i32, dy: i32| {
        Point::new(
            f64::from(cx.saturating_add(dx)),
            f64::from(cy.saturating_add(dy)),
        )
    };
    let mut cross = BezPath::new();
    cross.move_to(p(-CROSS_HALF, -CROSS_HALF));
    cross.line_to(p(CROSS_HALF, CROSS_HALF));
    cross.move_to(p(-CROSS_HALF, CROSS_HALF));
    cross.line_to(p(CROSS_HALF, -CROSS_HALF));
    let cross = LayerOp::Stroke {
        path: cross,
        width: WIREFRAME_WIDTH,
        color,
    };

    [frame, cross]
}

fn union_span(ops: &[LayerOp], canvas: Canvas) -> Option<PixelSpan> {
    let bounds = ops.iter().map(LayerOp::bounds).reduce(|a, b| a.union(b))?;
    PixelSpan::covering(bounds, canvas)
}

/// Stateless per-frame renderer of the loupe effect for one frame size.
#[derive(Clone, Copy, Debug)]
pub struct FrameCompositor {
    canvas: Canvas,
}

impl FrameCompositor {
    /// Compositor for frames of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Frame size this compositor renders.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render one frame into `dst`.
    ///
    /// `primary` is the image being magnified. `secondary` is accepted for the two-input mixer
    /// contract and checked for size, but never read. Every visible pixel of `dst` is
    /// overwritten. Fails only if a buffer does not match this compositor's frame size; no
    /// parameter value can make rendering fail.
    #[tracing::instrument(
        skip(self, params, dst, secondary, primary),
        fields(width = self.canvas.width, height = self.canvas.height)
    )]
    pub fn render(
        &self,
        time: f64,
        params: &EffectParameters,
        dst: &mut FrameViewMut<'_>,
        secondary: &FrameView<'_>,
        primary: &FrameView<'_>,
    ) -> LoupeResult<FramePlan> {
        if self.canvas.pixel_count() == 0 {
            return Err(LoupeError::validation(format!(
                "frame must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        for (name, canvas) in [
            ("output", dst.canvas()),
            ("secondary input", secondary.canvas()),
            ("primary input", primary.canvas()),
        ] {
            if canvas != self.canvas {
                return Err(LoupeError::validation(format!(
                    "{name} frame is {}x{}, effect expects {}x{}",
                    canvas.width, canvas.height, self.canvas.width, self.canvas.height
                )));
            }
        }

        let plan = FramePlan::new(params, time, self.canvas);
        tracing::debug!(fade = plan.fade, "frame plan");

        dst.copy_from(primary)?;

        if !params.any_enabled() || !(params.show_magnified || params.show_wireframe) {
            return Ok(plan);
        }

        let mut raster = CpuRasterizer::new(self.canvas)?;

        if params.show_magnified {
            raster.set_source(primary)?;
            let mut ops = Vec::new();
            for (i, _) in params.enabled_regions() {
                let info = &plan.regions[i];
                tracing::debug!(
                    region = i,
                    source = ?info.source,
                    dest = ?info.dest,
                    zoom = info.zoom,
                    "lens"
                );
                lens_ops(info, &plan.widths, self.canvas.bounds(), &mut ops);
            }
            if let Some(span) = union_span(&ops, self.canvas) {
                let layer = raster.rasterize(&ops, span)?;
                composite_layer_in_place(dst, layer.data_as_u8_slice(), CompositeOp::Over, span)?;
            }
        }

        if params.show_wireframe {
            for (i, _) in params.enabled_regions() {
                let info = &plan.regions[i];
                for (rect, color) in [
                    (&info.source, WIREFRAME_SOURCE),
                    (&info.dest, WIREFRAME_DEST),
                ] {
                    if rect.is_empty() {
                        tracing::trace!(region = i, ?rect, "empty rectangle, no wireframe");
                        continue;
                    }
                    for op in wireframe_ops(rect, color) {
                        let Some(span) = PixelSpan::covering(op.bounds(), self.canvas) else {
                            continue;
                        };
                        let layer = raster.rasterize(std::slice::from_ref(&op), span)?;
                        composite_layer_in_place(
                            dst,
                            layer.data_as_u8_slice(),
                            CompositeOp::Difference,
                            span,
                        )?;
                    }
                }
            }
        }

        Ok(plan)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
