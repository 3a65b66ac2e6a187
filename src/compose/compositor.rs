use crate::compose::timeline::Timeline;
use crate::foundation::core::{FrameIndex, FrameRGBA};
use crate::foundation::error::ReelResult;
use crate::foundation::math::{blend_over_premul, opacity_to_u8};
use crate::subtitle::layout::TextLayer;

/// Produces output frames from a [`Timeline`].
///
/// Frames are a pure function of the timeline and the frame index.
pub struct Compositor<'a> {
    timeline: &'a Timeline,
}

impl<'a> Compositor<'a> {
    /// Borrow a timeline for composition.
    pub fn new(timeline: &'a Timeline) -> Self {
        Self { timeline }
    }

    /// Number of frames in the visual stream.
    pub fn frame_count(&self) -> u64 {
        self.timeline.frame_count()
    }

    /// Compose frame `idx`: the active clip frame with every active subtitle layer on top.
    pub fn frame(&self, idx: FrameIndex) -> ReelResult<FrameRGBA> {
        let t = self.timeline.fps().frame_to_secs(idx);
        self.frame_at_time(t)
    }

    /// Compose the frame visible at absolute time `t`.
    pub fn frame_at_time(&self, t: f64) -> ReelResult<FrameRGBA> {
        let (clip, local) = self.timeline.clip_at(t);
        let mut frame = clip.frame_at(local, self.timeline.resizer())?;
        for layer in self.timeline.layers() {
            if !layer.is_active(t) {
                continue;
            }
            let opacity = layer.opacity_at(t);
            if opacity <= 0.0 {
                continue;
            }
            draw_layer(&mut frame, layer, opacity, layer.scale_at(t));
        }
        Ok(frame)
    }
}

/// Source-over `layer` onto `dst` at `opacity`, scaled about the layer center by `scale`.
pub(crate) fn draw_layer(dst: &mut FrameRGBA, layer: &TextLayer, opacity: f32, scale: f32) {
    let coverage = opacity_to_u8(opacity);
    if coverage == 0 {
        return;
    }
    let src = &layer.pixels;
    if (scale - 1.0).abs() < 1e-6 {
        blit(dst, src, layer.x, layer.y, coverage);
        return;
    }

    let cx = layer.x as f32 + src.width as f32 / 2.0;
    let cy = layer.y as f32 + src.height as f32 / 2.0;
    let half_w = src.width as f32 * scale / 2.0;
    let half_h = src.height as f32 * scale / 2.0;
    let x0 = ((cx - half_w).floor() as i64).max(0);
    let y0 = ((cy - half_h).floor() as i64).max(0);
    let x1 = ((cx + half_w).ceil() as i64).min(i64::from(dst.width));
    let y1 = ((cy + half_h).ceil() as i64).min(i64::from(dst.height));
    let stride = dst.stride();

    for y in y0..y1 {
        let sy = (y as f32 + 0.5 - (cy - half_h)) / scale - 0.5;
        for x in x0..x1 {
            let sx = (x as f32 + 0.5 - (cx - half_w)) / scale - 0.5;
            let Some(px) = sample_bilinear(src, sx, sy) else {
                continue;
            };
            let off = y as usize * stride + x as usize * 4;
            blend_over_premul(&mut dst.data[off..off + 4], &px, coverage);
        }
    }
}

fn blit(dst: &mut FrameRGBA, src: &FrameRGBA, x: i32, y: i32, coverage: u16) {
    let dst_stride = dst.stride();
    let src_stride = src.stride();
    for sy in 0..src.height as i64 {
        let dy = i64::from(y) + sy;
        if dy < 0 || dy >= i64::from(dst.height) {
            continue;
        }
        for sx in 0..src.width as i64 {
            let dx = i64::from(x) + sx;
            if dx < 0 || dx >= i64::from(dst.width) {
                continue;
            }
            let s = sy as usize * src_stride + sx as usize * 4;
            let d = dy as usize * dst_stride + dx as usize * 4;
            let px = [src.data[s], src.data[s + 1], src.data[s + 2], src.data[s + 3]];
            blend_over_premul(&mut dst.data[d..d + 4], &px, coverage);
        }
    }
}

/// Bilinear sample of premultiplied pixels; `None` outside the source.
fn sample_bilinear(src: &FrameRGBA, x: f32, y: f32) -> Option<[u8; 4]> {
    if x <= -1.0 || y <= -1.0 || x >= src.width as f32 || y >= src.height as f32 {
        return None;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let fetch = |xi: f32, yi: f32| -> [f32; 4] {
        if xi < 0.0 || yi < 0.0 || xi >= src.width as f32 || yi >= src.height as f32 {
            return [0.0; 4];
        }
        let p = src.pixel(xi as u32, yi as u32);
        [
            f32::from(p[0]),
            f32::from(p[1]),
            f32::from(p[2]),
            f32::from(p[3]),
        ]
    };
    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1.0, y0);
    let p01 = fetch(x0, y0 + 1.0);
    let p11 = fetch(x0 + 1.0, y0 + 1.0);
    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * fx;
        let bottom = p01[c] + (p11[c] - p01[c]) * fx;
        out[c] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
