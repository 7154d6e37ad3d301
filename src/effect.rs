use crate::foundation::core::Canvas;
use crate::foundation::error::LoupeResult;
use crate::params::model::EffectParameters;
use crate::params::registry::{PARAM_COUNT, ParamInfo, ParamValue, param_info};
use crate::pixels::frame::{FrameView, FrameViewMut};
use crate::render::compositor::{FrameCompositor, FramePlan};

/// Kind of effect, as advertised to a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PluginType {
    /// Produces frames from nothing.
    Source,
    /// Transforms one input frame.
    Filter,
    /// Combines two input frames.
    Mixer2,
}

/// Pixel layout exchanged with the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ColorModel {
    /// Packed 32-bit `0xAARRGGBB`, premultiplied alpha.
    Packed32,
}

/// Identity of the effect for plugin discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PluginInfo {
    /// Registered name.
    pub name: &'static str,
    /// One-line description.
    pub explanation: &'static str,
    /// Author credit.
    pub author: &'static str,
    /// Major version.
    pub major_version: u32,
    /// Minor version.
    pub minor_version: u32,
    /// Kind of effect.
    pub plugin_type: PluginType,
    /// Pixel layout.
    pub color_model: ColorModel,
}

/// The loupe effect's registration record.
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: "Loupe",
    explanation: "Magnify individual regions",
    author: "Fabian Schuiki",
    major_version: 0,
    minor_version: 1,
    plugin_type: PluginType::Mixer2,
    color_model: ColorModel::Packed32,
};

/// A two-input effect driven by a host, one frame at a time.
///
/// Hosts never call `update` concurrently on one instance; the `&mut self` receiver makes that
/// a compile-time guarantee for Rust callers.
pub trait Mixer2 {
    /// Frame size fixed at construction.
    fn canvas(&self) -> Canvas;

    /// Render the frame at `time` into `out` from the two inputs.
    fn update(
        &mut self,
        time: f64,
        out: &mut FrameViewMut<'_>,
        in2: &FrameView<'_>,
        in1: &FrameView<'_>,
    ) -> LoupeResult<()>;
}

/// One instance of the loupe effect: a parameter store bound to a frame size.
#[derive(Clone, Debug)]
pub struct Loupe {
    params: EffectParameters,
    compositor: FrameCompositor,
}

impl Loupe {
    /// Create an instance for `width x height` frames with default parameters.
    pub fn new(width: u32, height: u32) -> LoupeResult<Self> {
        Ok(Self::with_params(
            Canvas::new(width, height)?,
            EffectParameters::default(),
        ))
    }

    /// Create an instance with an explicit parameter set.
    pub fn with_params(canvas: Canvas, params: EffectParameters) -> Self {
        Self {
            params,
            compositor: FrameCompositor::new(canvas),
        }
    }

    /// Current parameters.
    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    /// Mutable access for hosts that edit fields directly between frames.
    pub fn params_mut(&mut self) -> &mut EffectParameters {
        &mut self.params
    }

    /// Registration record.
    pub fn info(&self) -> PluginInfo {
        PLUGIN_INFO
    }

    /// Number of registered parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Description of the parameter registered at `index`.
    pub fn param_info(&self, index: usize) -> Option<ParamInfo> {
        param_info(index)
    }

    /// Read a registered parameter.
    pub fn get_param(&self, index: usize) -> LoupeResult<ParamValue> {
        self.params.get_param(index)
    }

    /// Write a registered parameter.
    pub fn set_param(&mut self, index: usize, value: ParamValue) -> LoupeResult<()> {
        self.params.set_param(index, value)
    }

    /// Geometry and fade the next `update` at `time` would use.
    pub fn plan(&self, time: f64) -> FramePlan {
        FramePlan::new(&self.params, time, self.compositor.canvas())
    }
}

impl Mixer2 for Loupe {
    fn canvas(&self) -> Canvas {
        self.compositor.canvas()
    }

    fn update(
        &mut self,
        time: f64,
        out: &mut FrameViewMut<'_>,
        in2: &FrameView<'_>,
        in1: &FrameView<'_>,
    ) -> LoupeResult<()> {
        self.compositor
            .render(time, &self.params, out, in2, in1)
            .map(|_| ())
    }
}

/// Factory used by plugin loaders: one boxed instance per call, each with its own parameters.
pub fn construct(width: u32, height: u32) -> LoupeResult<Box<dyn Mixer2 + Send>> {
    Ok(Box::new(Loupe::new(width, height)?))
}

#[cfg(test)]
#[path = "../tests/unit/effect/effect.rs"]
mod tests;
