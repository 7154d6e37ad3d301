use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::foundation::math::mul_div255_u8;
use crate::pixels::frame::{FrameViewMut, PremulRgba8, argb_to_rgba, rgba_to_argb};

/// How a rasterised layer is combined with the frame beneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    /// Porter-Duff source-over.
    Over,
    /// Separable difference blend; keeps overlays visible over any background.
    Difference,
}

/// Porter-Duff source-over of premultiplied pixels: `s + d * (1 - sa)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    match sa {
        0 => return dst,
        255 => return src,
        _ => {}
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Premultiplied difference: `s + d - 2 * min(s * da, d * sa)` per color channel.
pub fn difference(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let da = u16::from(dst[3]);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = u16::from(src[i]);
        let dc = u16::from(dst[i]);
        let overlap = mul_div255_u8(sc, da).min(mul_div255_u8(dc, sa));
        let v = i32::from(sc) + i32::from(dc) - 2 * i32::from(overlap);
        out[i] = v.clamp(0, 255) as u8;
    }
    let a = i32::from(sa) + i32::from(da) - i32::from(mul_div255_u8(sa, da));
    out[3] = a.clamp(0, 255) as u8;
    out
}

/// Integer pixel span `[x0, x1) x [y0, y1)`, always inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelSpan {
    /// First column.
    pub x0: u32,
    /// First row.
    pub y0: u32,
    /// One past the last column.
    pub x1: u32,
    /// One past the last row.
    pub y1: u32,
}

impl PixelSpan {
    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Smallest span covering `rect`, clipped to the frame. `None` when nothing is visible.
    pub fn covering(rect: Rect, canvas: Canvas) -> Option<Self> {
        let clip = |v: f64, max: u32| -> u32 {
            if v.is_nan() {
                0
            } else {
                v.clamp(0.0, f64::from(max)) as u32
            }
        };
        let span = Self {
            x0: clip(rect.x0.floor(), canvas.width),
            y0: clip(rect.y0.floor(), canvas.height),
            x1: clip(rect.x1.ceil(), canvas.width),
            y1: clip(rect.y1.ceil(), canvas.height),
        };
        (span.x0 < span.x1 && span.y0 < span.y1).then_some(span)
    }
}

/// Combine a tightly packed premultiplied RGBA8 layer covering exactly `span` into the frame.
pub fn composite_layer_in_place(
    dst: &mut FrameViewMut<'_>,
    layer: &[u8],
    op: CompositeOp,
    span: PixelSpan,
) -> LoupeResult<()> {
    let canvas = dst.canvas();
    if span.x0 > span.x1 || span.y0 > span.y1 || span.x1 > canvas.width || span.y1 > canvas.height
    {
        return Err(LoupeError::render("composite span exceeds the frame"));
    }
    let width = span.width() as usize;
    if layer.len() != width * span.height() as usize * 4 {
        return Err(LoupeError::render(
            "composite_layer_in_place expects a layer matching the span size",
        ));
    }
    if width == 0 {
        return Ok(());
    }

    for (layer_row, y) in layer.chunks_exact(width * 4).zip(span.y0..span.y1) {
        let row = &mut dst.row_mut(y)[span.x0 as usize..span.x1 as usize];
        for (px, s) in row.iter_mut().zip(layer_row.chunks_exact(4)) {
            let src = [s[0], s[1], s[2], s[3]];
            if src[3] == 0 {
                continue;
            }
            let d = argb_to_rgba(*px);
            let out = match op {
                CompositeOp::Over => over(d, src),
                CompositeOp::Difference => difference(d, src),
            };
            *px = rgba_to_argb(out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
