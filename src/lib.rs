//! Loupe is an animated magnifying-lens effect for packed ARGB32 video frames.
//!
//! Given a primary input frame and a time value, it paints up to three lens regions on top of
//! the frame: a pointer line and bubble at the magnified spot, the magnified image itself, and a
//! white outline. A wireframe overlay helps position the regions.
//!
//! # Frame pipeline
//!
//! 1. **Fade**: `time -> fade` through a trapezoidal envelope eased with a sine S-curve
//!    ([`FadeEnvelope`]).
//! 2. **Geometry**: `Region + fade -> RegionInfo` (integer source/destination rectangles and the
//!    interpolated zoom).
//! 3. **Composite**: copy the input, paint the lens layer with source-over, then the wireframe
//!    with difference blending ([`FrameCompositor`]).
//!
//! The key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Total rendering**: any parameter values render; degenerate geometry draws nothing.
//! - **Stateless frames**: output depends only on the parameters, time and primary input.
//! - **Premultiplied ARGB32** at the host boundary, premultiplied RGBA8 internally.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effect;
mod foundation;
mod geometry;
mod params;
mod pixels;
mod render;
mod sequence;

pub use animation::ease::ease_in_out_sine;
pub use animation::envelope::{END_TIME_UNIT, FADE_DURATION_UNIT, FadeEnvelope};
pub use effect::{ColorModel, Loupe, Mixer2, PLUGIN_INFO, PluginInfo, PluginType, construct};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Vec2};
pub use foundation::error::{LoupeError, LoupeResult};
pub use foundation::math::{lerp, pixel_round};
pub use geometry::region::{
    IRect, RegionInfo, StrokeWidths, compute_frame_geometry, compute_region_info,
};
pub use params::model::{EffectParameters, NUM_REGIONS, Region};
pub use params::registry::{
    PARAM_COUNT, ParamInfo, ParamKind, ParamValue, param_index, param_info, param_infos,
};
pub use pixels::frame::{
    FrameBuffer, FrameView, FrameViewMut, PremulRgba8, argb_to_rgba, rgba_to_argb,
};
pub use render::composite::{CompositeOp, PixelSpan, composite_layer_in_place, difference, over};
pub use render::compositor::{FrameCompositor, FramePlan};
pub use sequence::{SequenceThreading, render_sequence, sample_times};
