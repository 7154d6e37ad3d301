use crate::foundation::core::Canvas;
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA8 pixel, the layout used by the rasteriser and the compositing operators.
pub type PremulRgba8 = [u8; 4];

/// Unpack a `0xAARRGGBB` word into premultiplied RGBA8.
#[inline]
pub fn argb_to_rgba(px: u32) -> PremulRgba8 {
    let [a, r, g, b] = px.to_be_bytes();
    [r, g, b, a]
}

/// Pack premultiplied RGBA8 into a `0xAARRGGBB` word.
#[inline]
pub fn rgba_to_argb(px: PremulRgba8) -> u32 {
    let [r, g, b, a] = px;
    u32::from_be_bytes([a, r, g, b])
}

fn check_shape(canvas: Canvas, stride: usize, len: usize) -> LoupeResult<()> {
    let width = canvas.width as usize;
    let Some(last_row) = (canvas.height as usize).checked_sub(1).filter(|_| width > 0) else {
        return Err(LoupeError::validation(format!(
            "frame must be non-empty, got {}x{}",
            canvas.width, canvas.height
        )));
    };
    if stride < width {
        return Err(LoupeError::validation(format!(
            "stride {stride} is smaller than width {width}"
        )));
    }
    let needed = stride
        .checked_mul(last_row)
        .and_then(|v| v.checked_add(width))
        .ok_or_else(|| LoupeError::validation("frame size overflow"))?;
    if len < needed {
        return Err(LoupeError::validation(format!(
            "frame buffer holds {len} pixels, {}x{} with stride {stride} needs {needed}",
            canvas.width, canvas.height
        )));
    }
    Ok(())
}

/// Borrowed, read-only ARGB32 frame.
///
/// Rows are `stride` pixels apart; padding words past `width` are never read.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    data: &'a [u32],
    canvas: Canvas,
    stride: usize,
}

impl<'a> FrameView<'a> {
    /// Wrap `data` as a `canvas`-sized frame with the given row stride (in pixels).
    pub fn new(data: &'a [u32], canvas: Canvas, stride: usize) -> LoupeResult<Self> {
        check_shape(canvas, stride, data.len())?;
        Ok(Self {
            data,
            canvas,
            stride,
        })
    }

    /// Wrap a tightly packed frame (`stride == width`).
    pub fn packed(data: &'a [u32], canvas: Canvas) -> LoupeResult<Self> {
        Self::new(data, canvas, canvas.width as usize)
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Row stride in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The visible pixels of row `y`.
    pub fn row(&self, y: u32) -> &'a [u32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.canvas.width as usize]
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.row(y)[x as usize]
    }

    /// Iterate over the visible rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u32]> + '_ {
        (0..self.canvas.height).map(|y| self.row(y))
    }
}

/// Borrowed, writable ARGB32 frame.
#[derive(Debug)]
pub struct FrameViewMut<'a> {
    data: &'a mut [u32],
    canvas: Canvas,
    stride: usize,
}

impl<'a> FrameViewMut<'a> {
    /// Wrap `data` as a `canvas`-sized frame with the given row stride (in pixels).
    pub fn new(data: &'a mut [u32], canvas: Canvas, stride: usize) -> LoupeResult<Self> {
        check_shape(canvas, stride, data.len())?;
        Ok(Self {
            data,
            canvas,
            stride,
        })
    }

    /// Wrap a tightly packed frame (`stride == width`).
    pub fn packed(data: &'a mut [u32], canvas: Canvas) -> LoupeResult<Self> {
        Self::new(data, canvas, canvas.width as usize)
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Row stride in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The visible pixels of row `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.canvas.width as usize]
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.stride + x as usize]
    }

    /// Overwrite every visible pixel with the corresponding pixel of `src`.
    pub fn copy_from(&mut self, src: &FrameView<'_>) -> LoupeResult<()> {
        if src.canvas() != self.canvas {
            return Err(LoupeError::validation(
                "copy_from expects frames of equal dimensions",
            ));
        }
        for y in 0..self.canvas.height {
            self.row_mut(y).copy_from_slice(src.row(y));
        }
        Ok(())
    }
}

/// Owned, tightly packed ARGB32 frame.
///
/// `data` always holds exactly `width * height` pixels, so views of it need no checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    canvas: Canvas,
    data: Vec<u32>,
}

impl FrameBuffer {
    /// A fully transparent frame.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0; canvas.pixel_count()],
        }
    }

    /// Build a frame from a per-pixel function.
    pub fn from_fn(canvas: Canvas, mut f: impl FnMut(u32, u32) -> u32) -> Self {
        let mut data = Vec::with_capacity(canvas.pixel_count());
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                data.push(f(x, y));
            }
        }
        Self { canvas, data }
    }

    /// Take ownership of `canvas`-sized, row-major `0xAARRGGBB` pixels.
    pub fn from_data(canvas: Canvas, data: Vec<u32>) -> LoupeResult<Self> {
        if data.len() != canvas.pixel_count() {
            return Err(LoupeError::validation(format!(
                "expected {} pixels for {}x{}, got {}",
                canvas.pixel_count(),
                canvas.width,
                canvas.height,
                data.len()
            )));
        }
        Ok(Self { canvas, data })
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// `width * height` pixels, row-major, `0xAARRGGBB` premultiplied.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable pixels; the length is fixed.
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Give the pixels back to the caller.
    pub fn into_data(self) -> Vec<u32> {
        self.data
    }

    /// Read-only view of the whole frame.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            data: &self.data,
            canvas: self.canvas,
            stride: self.canvas.width as usize,
        }
    }

    /// Writable view of the whole frame.
    pub fn view_mut(&mut self) -> FrameViewMut<'_> {
        FrameViewMut {
            data: &mut self.data,
            canvas: self.canvas,
            stride: self.canvas.width as usize,
        }
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.data[y as usize * self.canvas.width as usize + x as usize]
    }

    /// Convert straight (non-premultiplied) RGBA8 bytes, as decoded from PNG, into a frame.
    pub fn from_straight_rgba8(canvas: Canvas, rgba: &[u8]) -> LoupeResult<Self> {
        if rgba.len() != canvas.pixel_count() * 4 {
            return Err(LoupeError::validation(format!(
                "expected {} rgba8 bytes for {}x{}, got {}",
                canvas.pixel_count() * 4,
                canvas.width,
                canvas.height,
                rgba.len()
            )));
        }
        let data = rgba
            .chunks_exact(4)
            .map(|px| {
                let a = u16::from(px[3]);
                rgba_to_argb([
                    mul_div255_u8(u16::from(px[0]), a),
                    mul_div255_u8(u16::from(px[1]), a),
                    mul_div255_u8(u16::from(px[2]), a),
                    px[3],
                ])
            })
            .collect();
        Ok(Self { canvas, data })
    }

    /// Convert to straight RGBA8 bytes for encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for &px in &self.data {
            let [r, g, b, a] = argb_to_rgba(px);
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let unpremul = |c: u8| -> u8 {
                ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
            };
            out.extend_from_slice(&[unpremul(r), unpremul(g), unpremul(b), a]);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/frame.rs"]
mod tests;
