/// Linear interpolation from `a` (at `t = 0`) to `b` (at `t = 1`).
///
/// The blend factor is clamped to `[0, 1]`, so callers may pass scaled factors such as
/// `fade * 3` and get a value that saturates at `b`.
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    let t = if t > 1.0 {
        1.0
    } else if t < 0.0 {
        0.0
    } else {
        t
    };
    (1.0 - t) * a + t * b
}

/// Round a pixel coordinate by adding one half and truncating toward zero.
///
/// This matches how integer rectangle coordinates have always been derived for this effect:
/// positive values round half up, negative values bias toward zero (`-3.7 -> -3`). Non-finite
/// inputs map to `0` and out-of-range values saturate.
pub fn pixel_round(v: f64) -> i32 {
    (v + 0.5) as i32
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
