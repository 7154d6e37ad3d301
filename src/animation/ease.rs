/// Sinusoidal ease-in-out of a progress value clamped to `[0, 1]`: slow at both ends, fastest at
/// the midpoint.
pub fn ease_in_out_sine(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    -((std::f64::consts::PI * t).cos() - 1.0) / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
