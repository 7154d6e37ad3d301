use crate::animation::ease::ease_in_out_sine;
use crate::params::model::EffectParameters;

/// Multiplier turning the `fade_duration` parameter into time units.
pub const FADE_DURATION_UNIT: f64 = 10.0;
/// Multiplier turning the `end_time` parameter into time units.
pub const END_TIME_UNIT: f64 = 1000.0;

/// Trapezoidal fade-in/fade-out envelope, eased into an S-curve.
///
/// The raw envelope ramps from 0 to 1 over `fade_duration` time units, holds at 1, then ramps
/// back to 0 at `end_time`. It is 0 for any time outside `[0, end_time]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeEnvelope {
    /// Ramp length in time units.
    pub fade_duration: f64,
    /// Time at which the image is back to normal.
    pub end_time: f64,
}

impl FadeEnvelope {
    /// Build the envelope from the scaled `fade_duration`/`end_time` parameters.
    pub fn from_params(params: &EffectParameters) -> Self {
        Self {
            fade_duration: params.fade_duration * FADE_DURATION_UNIT,
            end_time: params.end_time * END_TIME_UNIT,
        }
    }

    /// Linear trapezoid value in `[0, 1]`.
    ///
    /// A zero-length ramp at the very edge of the envelope (`0 / 0`) is treated as not faded in.
    pub fn raw(&self, time: f64) -> f64 {
        let v = time.min(self.end_time - time) / self.fade_duration;
        if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
    }

    /// Eased master blend factor: 0 is the plain image, 1 is the fully active lens.
    pub fn fade(&self, time: f64) -> f64 {
        ease_in_out_sine(self.raw(time))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/envelope.rs"]
mod tests;
