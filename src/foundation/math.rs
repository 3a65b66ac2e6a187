pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Convert an opacity in `[0, 1]` to an 8-bit coverage value.
pub(crate) fn opacity_to_u8(opacity: f32) -> u16 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u16
}

/// Source-over composite of one premultiplied pixel onto `dst`, scaled by `coverage` (0..=255).
pub(crate) fn blend_over_premul(dst: &mut [u8], src: &[u8], coverage: u16) {
    let sa = mul_div255_u16(u16::from(src[3]), coverage);
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for c in 0..3 {
        let s = mul_div255_u16(u16::from(src[c]), coverage);
        let d = mul_div255_u16(u16::from(dst[c]), inv);
        dst[c] = (s + d).min(255) as u8;
    }
    dst[3] = (sa + mul_div255_u16(u16::from(dst[3]), inv)).min(255) as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
