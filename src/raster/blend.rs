use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{CaptchaError, CaptchaResult},
    foundation::math::{clamp_u8, lerp_div255, mul_div255},
    raster::color::{Rgba8, hsb_to_rgb, rgb_to_hsb},
};

/// How an overlay buffer is combined into a destination buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    #[default]
    Draw,
    ApplyMask,
}

impl MixMode {
    pub fn apply(self, dst: &mut [u8], mix: &[u8]) -> CaptchaResult<()> {
        match self {
            Self::Draw => draw_in_place(dst, mix),
            Self::ApplyMask => apply_mask_in_place(dst, mix),
        }
    }
}

/// Blends one straight-alpha pixel over another.
pub fn draw(dst: [u8; 4], mix: [u8; 4]) -> [u8; 4] {
    let ma = mix[3];
    if ma == 0 {
        return dst;
    }
    let a = if dst[3] != 0 {
        lerp_div255(dst[3], 255, ma)
    } else {
        ma
    };
    [
        lerp_div255(dst[0], mix[0], ma),
        lerp_div255(dst[1], mix[1], ma),
        lerp_div255(dst[2], mix[2], ma),
        a,
    ]
}

/// Uses the mask alpha as a multiplier of the destination alpha.
pub fn apply_mask(dst: [u8; 4], mask: [u8; 4]) -> [u8; 4] {
    let a = match mask[3] {
        0 => 0,
        255 => dst[3],
        ma => mul_div255(dst[3], ma),
    };
    [dst[0], dst[1], dst[2], a]
}

fn check_pair(dst: &[u8], mix: &[u8], op: &str) -> CaptchaResult<()> {
    if dst.len() != mix.len() || !dst.len().is_multiple_of(4) {
        return Err(CaptchaError::render(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

pub fn draw_in_place(dst: &mut [u8], mix: &[u8]) -> CaptchaResult<()> {
    check_pair(dst, mix, "draw")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mix.chunks_exact(4)) {
        let out = draw([d[0], d[1], d[2], d[3]], [m[0], m[1], m[2], m[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn apply_mask_in_place(dst: &mut [u8], mask: &[u8]) -> CaptchaResult<()> {
    check_pair(dst, mask, "apply_mask")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        d[3] = apply_mask([d[0], d[1], d[2], d[3]], [m[0], m[1], m[2], m[3]])[3];
    }
    Ok(())
}

/// Adds a signed shift to each channel (R, G, B, A), clamping to a byte.
pub fn add_colors(dst: &mut [u8], shift: [i32; 4]) {
    if shift == [0; 4] {
        return;
    }
    for px in dst.chunks_exact_mut(4) {
        for (c, s) in px.iter_mut().zip(shift) {
            *c = clamp_u8(i32::from(*c) + s);
        }
    }
}

/// Replaces each enabled channel (R, G, B, A) with `255 - value`.
pub fn invert(dst: &mut [u8], channels: [bool; 4]) {
    if channels == [false; 4] {
        return;
    }
    for px in dst.chunks_exact_mut(4) {
        for (c, on) in px.iter_mut().zip(channels) {
            if on {
                *c = 255 - *c;
            }
        }
    }
}

/// Rotates every pixel's hue by `degrees`. Zero leaves the buffer untouched.
pub fn hue_shift(dst: &mut [u8], degrees: f64) {
    if degrees == 0.0 || !degrees.is_finite() {
        return;
    }
    for px in dst.chunks_exact_mut(4) {
        let (h, s, v) = rgb_to_hsb(px[0], px[1], px[2]);
        let (r, g, b) = hsb_to_rgb((h + degrees).rem_euclid(360.0), s, v);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}

pub fn set_pixels(dst: &mut [u8], color: Rgba8) {
    let px = color.to_array();
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
