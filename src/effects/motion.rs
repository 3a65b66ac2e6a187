//! Pure per-frame motion math. No pixels are touched here.

use crate::effects::kind::EffectKind;
use crate::foundation::core::Fps;

/// Scale added over a zoom.
pub const ZOOM_RANGE: f64 = 0.3;
/// Width multiplier of the pre-enlarged pan source.
pub const PAN_ENLARGE: f64 = 1.4;

/// Easing applied to clip progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Sine ease-out, `sin(t * pi / 2)`.
    OutSine,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
        }
    }
}

/// Number of frames precomputed for a clip: `max(1, floor(duration * fps))`.
pub fn frame_count(duration: f64, fps: Fps) -> usize {
    fps.secs_to_frames_floor(duration).max(1) as usize
}

/// Evenly spaced sample times over `[0, duration]`, both ends included.
pub fn sample_times(duration: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = duration / (n - 1) as f64;
            (0..n).map(|i| step * i as f64).collect()
        }
    }
}

/// Precomputed frame index for clip-local time `t`: `min(floor(t * fps), n - 1)`.
pub fn frame_lookup(t: f64, fps: Fps, n: usize) -> usize {
    let idx = if t.is_finite() && t > 0.0 {
        (t * fps.as_f64()).floor() as usize
    } else {
        0
    };
    idx.min(n.saturating_sub(1))
}

fn progress(t: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (t / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Zoom factor at clip-local time `t`. Non-zoom effects return 1.0.
pub fn zoom_scale(kind: EffectKind, t: f64, duration: f64) -> f64 {
    let p = Ease::Linear.apply(progress(t, duration));
    match kind {
        EffectKind::ZoomIn => 1.0 + ZOOM_RANGE * p,
        EffectKind::ZoomOut => 1.0 + ZOOM_RANGE - ZOOM_RANGE * p,
        _ => 1.0,
    }
}

/// Size of a frame scaled by `scale`, truncated and never smaller than `w x h`.
pub fn zoomed_size(w: u32, h: u32, scale: f64) -> (u32, u32) {
    let zw = ((f64::from(w) * scale).floor() as u32).max(w);
    let zh = ((f64::from(h) * scale).floor() as u32).max(h);
    (zw, zh)
}

/// Top-left corner of the centered `w x h` window inside a `zw x zh` frame.
pub fn center_crop_origin(zw: u32, zh: u32, w: u32, h: u32) -> (u32, u32) {
    (zw.saturating_sub(w) / 2, zh.saturating_sub(h) / 2)
}

/// Width of the pre-enlarged pan source.
pub fn pan_enlarged_width(w: u32) -> u32 {
    ((f64::from(w) * PAN_ENLARGE).floor() as u32).max(w)
}

/// Horizontal viewport offset at clip-local time `t` for a pan over an `enlarged_w` wide source.
///
/// `pan_right` moves from 0 towards the right edge; `pan_left` is its mirror image.
pub fn pan_offset(kind: EffectKind, t: f64, duration: f64, enlarged_w: u32, w: u32) -> u32 {
    let travel = f64::from(enlarged_w.saturating_sub(w));
    let ease = Ease::OutSine.apply(progress(t, duration));
    let x = match kind {
        EffectKind::PanRight => travel * ease,
        EffectKind::PanLeft => travel * (1.0 - ease),
        _ => 0.0,
    };
    (x.floor().max(0.0) as u32).min(enlarged_w.saturating_sub(w))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion.rs"]
mod tests;
