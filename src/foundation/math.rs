/// FNV-1a, used for stable identities of font data.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// `round(x * y / 255)` for byte operands.
pub(crate) fn mul_div255(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// `round(from + (to - from) * t / 255)`, the linear step used by the draw blend.
pub(crate) fn lerp_div255(from: u8, to: u8, t: u8) -> u8 {
    let v = f64::from(from) + (f64::from(to) - f64::from(from)) * f64::from(t) / 255.0;
    clamp_u8(v.round() as i32)
}

pub(crate) fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Rounds `v` to `decimals` places and returns it as a scaled integer key.
pub(crate) fn quantize(v: f64, decimals: u32) -> i64 {
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() as i64
}

/// `v` rounded to `decimals` places, matching the key produced by [`quantize`].
pub(crate) fn round_to(v: f64, decimals: u32) -> f64 {
    quantize(v, decimals) as f64 / 10f64.powi(decimals as i32)
}
