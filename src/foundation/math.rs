//! Shared numeric helpers.
//!
//! Every fractional pixel value in the crate goes through [`round_px`], which rounds half away
//! from zero (`f64::round`). Using one rule everywhere keeps boundary cases stable: `-311.5`
//! becomes `-312`, `174.5` becomes `175`.

/// Round a fractional pixel value half away from zero.
pub(crate) fn round_px(v: f64) -> i64 {
    v.round() as i64
}

/// Round a scaled dimension, clamped to at least one pixel.
pub(crate) fn round_dim(v: f64) -> u32 {
    let r = round_px(v).max(1);
    u32::try_from(r).unwrap_or(u32::MAX)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
