use std::sync::Arc;

use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect};
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::pixels::frame::{FrameView, argb_to_rgba};
use crate::render::composite::PixelSpan;

/// Straight-alpha RGBA8 paint color.
pub(crate) type Rgba8 = [u8; 4];

pub(crate) const BLACK: Rgba8 = [0, 0, 0, 255];
pub(crate) const WHITE: Rgba8 = [255, 255, 255, 255];

/// Tolerance used when flattening circles into paths.
const PATH_TOLERANCE: f64 = 0.1;
/// Miter limit applied to every stroke.
const MITER_LIMIT: f64 = 10.0;

/// One drawing operation of a layer, in frame pixel coordinates.
#[derive(Clone, Debug)]
pub(crate) enum LayerOp {
    Fill {
        path: BezPath,
        color: Rgba8,
    },
    /// Butt-capped, miter-joined stroke centered on `path`.
    Stroke {
        path: BezPath,
        width: f64,
        color: Rgba8,
    },
    /// Fill `rect` (in source-image space) with the source frame mapped through `transform`.
    Image {
        transform: Affine,
        rect: Rect,
    },
}

impl LayerOp {
    pub(crate) fn line(from: Point, to: Point, width: f64, color: Rgba8) -> Self {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        Self::Stroke { path, width, color }
    }

    pub(crate) fn stroke_rect(rect: Rect, width: f64, color: Rgba8) -> Self {
        Self::Stroke {
            path: rect.to_path(PATH_TOLERANCE),
            width,
            color,
        }
    }

    pub(crate) fn fill_rect(rect: Rect, color: Rgba8) -> Self {
        Self::Fill {
            path: rect.to_path(PATH_TOLERANCE),
            color,
        }
    }

    pub(crate) fn fill_circle(center: Point, radius: f64, color: Rgba8) -> Self {
        Self::Fill {
            path: kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE),
            color,
        }
    }

    pub(crate) fn stroke_circle(center: Point, radius: f64, width: f64, color: Rgba8) -> Self {
        Self::Stroke {
            path: kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE),
            width,
            color,
        }
    }

    /// Conservative device-space bounds of everything the op can touch.
    pub(crate) fn bounds(&self) -> Rect {
        match self {
            Self::Fill { path, .. } => path.bounding_box().inflate(1.0, 1.0),
            Self::Stroke { path, width, .. } => {
                let pad = width.abs() + 2.0;
                path.bounding_box().inflate(pad, pad)
            }
            Self::Image { transform, rect } => {
                transform.transform_rect_bbox(*rect).inflate(1.0, 1.0)
            }
        }
    }
}

/// CPU rasteriser producing premultiplied RGBA8 layers covering a span of the frame.
pub(crate) struct CpuRasterizer {
    canvas: Canvas,
    width: u16,
    height: u16,
    source: Option<vello_cpu::Image>,
}

impl CpuRasterizer {
    pub(crate) fn new(canvas: Canvas) -> LoupeResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| LoupeError::render("frame width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| LoupeError::render("frame height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            source: None,
        })
    }

    /// Make `frame` available as the paint for [`LayerOp::Image`].
    pub(crate) fn set_source(&mut self, frame: &FrameView<'_>) -> LoupeResult<()> {
        if frame.canvas() != self.canvas {
            return Err(LoupeError::validation(
                "source frame does not match the rasteriser size",
            ));
        }
        let pixmap = frame_to_pixmap(frame, self.width, self.height);
        self.source = Some(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        Ok(())
    }

    /// Paint `ops` in order onto a transparent layer the size of `span`.
    ///
    /// Ops stay in frame coordinates; pixel `(0, 0)` of the layer is frame pixel
    /// `(span.x0, span.y0)`.
    pub(crate) fn rasterize(
        &self,
        ops: &[LayerOp],
        span: PixelSpan,
    ) -> LoupeResult<vello_cpu::Pixmap> {
        if span.x1 > self.canvas.width || span.y1 > self.canvas.height {
            return Err(LoupeError::render("layer span exceeds the frame"));
        }
        // Both fit in u16 because the span lies inside the frame.
        let width = span.width() as u16;
        let height = span.height() as u16;
        if width == 0 || height == 0 {
            return Err(LoupeError::render("layer span is empty"));
        }
        let origin = Affine::translate((-f64::from(span.x0), -f64::from(span.y0)));

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in ops {
            self.draw_op(&mut ctx, op, origin)?;
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap)
    }

    fn draw_op(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        op: &LayerOp,
        origin: Affine,
    ) -> LoupeResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(origin));

        match op {
            LayerOp::Fill { path, color } => {
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            LayerOp::Stroke { path, width, color } => {
                let stroke = vello_cpu::kurbo::Stroke::new(*width)
                    .with_caps(vello_cpu::kurbo::Cap::Butt)
                    .with_join(vello_cpu::kurbo::Join::Miter)
                    .with_miter_limit(MITER_LIMIT);
                ctx.set_stroke(stroke);
                ctx.set_paint(color_to_cpu(*color));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            LayerOp::Image { transform, rect } => {
                let image = self.source.clone().ok_or_else(|| {
                    LoupeError::render("image op requires a source frame to be set")
                })?;
                ctx.set_transform(affine_to_cpu(origin * *transform));
                ctx.set_paint(image);
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
        }
        Ok(())
    }
}

fn frame_to_pixmap(frame: &FrameView<'_>, width: u16, height: u16) -> vello_cpu::Pixmap {
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
    for row in frame.rows() {
        for &px in row {
            let [r, g, b, a] = argb_to_rgba(px);
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
        }
    }
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, may_have_opacities)
}

fn color_to_cpu([r, g, b, a]: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
