use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::resize::Resizer;

/// Placement of a scaled image inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterboxGeometry {
    /// Left edge in canvas pixels.
    pub x: u32,
    /// Top edge in canvas pixels.
    pub y: u32,
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
}

/// Fit `src_w x src_h` inside `canvas` preserving aspect ratio, centered.
///
/// The result never exceeds the canvas on either axis; the remaining area is padding.
pub fn letterbox_geometry(src_w: u32, src_h: u32, canvas: Canvas) -> ReelResult<LetterboxGeometry> {
    if src_w == 0 || src_h == 0 {
        return Err(ReelError::invalid_input("image has zero width or height"));
    }
    let sx = f64::from(canvas.width) / f64::from(src_w);
    let sy = f64::from(canvas.height) / f64::from(src_h);
    let scale = sx.min(sy);

    let width = ((f64::from(src_w) * scale).round() as u32).clamp(1, canvas.width);
    let height = ((f64::from(src_h) * scale).round() as u32).clamp(1, canvas.height);
    Ok(LetterboxGeometry {
        x: (canvas.width - width) / 2,
        y: (canvas.height - height) / 2,
        width,
        height,
    })
}

/// Scale `image` into an opaque black canvas-sized frame.
pub fn letterbox(image: &FrameRGBA, canvas: Canvas, resizer: &dyn Resizer) -> ReelResult<FrameRGBA> {
    let g = letterbox_geometry(image.width, image.height, canvas)?;
    let scaled = resizer.resize(image, g.width, g.height)?;

    let mut out = FrameRGBA::solid(canvas.width, canvas.height, [0, 0, 0, 255]);
    let dst_stride = out.stride();
    let src_stride = scaled.stride();
    for row in 0..g.height as usize {
        let src = &scaled.data[row * src_stride..(row + 1) * src_stride];
        let off = (g.y as usize + row) * dst_stride + g.x as usize * 4;
        let dst = &mut out.data[off..off + src_stride];
        // Premultiplied over opaque black keeps color and saturates alpha.
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            d[0] = s[0];
            d[1] = s[1];
            d[2] = s[2];
            d[3] = 255;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/letterbox.rs"]
mod tests;
