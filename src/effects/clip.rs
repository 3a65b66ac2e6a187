use std::sync::Arc;

use crate::compose::letterbox::letterbox;
use crate::effects::kind::EffectKind;
use crate::effects::motion;
use crate::foundation::core::{Canvas, Fps, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::resize::Resizer;

#[derive(Clone, Debug)]
enum ClipFrames {
    Still(Arc<FrameRGBA>),
    /// Zoomed size per precomputed frame index; pixels are produced on lookup.
    Zoom {
        source: Arc<FrameRGBA>,
        sizes: Vec<(u32, u32)>,
    },
    /// Viewport offset per precomputed frame index into the enlarged source.
    Pan {
        enlarged: Arc<FrameRGBA>,
        offsets: Vec<u32>,
    },
}

/// One image on the timeline with its motion effect.
///
/// Per-index parameters are fixed at construction, so frames are a pure function of time.
#[derive(Clone, Debug)]
pub struct EffectClip {
    index: usize,
    effect: EffectKind,
    duration: f64,
    fps: Fps,
    canvas: Canvas,
    frames: ClipFrames,
}

/// Letterbox `image` into `canvas` and precompute `effect` for `duration` seconds.
///
/// Failures are reported as render errors attributed to `index`.
pub fn build_effect_clip(
    index: usize,
    image: &FrameRGBA,
    effect: EffectKind,
    duration: f64,
    canvas: Canvas,
    fps: Fps,
    resizer: &dyn Resizer,
) -> ReelResult<EffectClip> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ReelError::render_clip(
            index,
            format!("clip duration must be finite and > 0, got {duration}"),
        ));
    }
    let base = letterbox(image, canvas, resizer).map_err(|e| attribute(index, e))?;
    let n = motion::frame_count(duration, fps);
    let times = motion::sample_times(duration, n);

    let frames = match effect {
        EffectKind::ZoomIn | EffectKind::ZoomOut => ClipFrames::Zoom {
            sizes: times
                .iter()
                .map(|&t| {
                    motion::zoomed_size(
                        canvas.width,
                        canvas.height,
                        motion::zoom_scale(effect, t, duration),
                    )
                })
                .collect(),
            source: Arc::new(base),
        },
        EffectKind::PanLeft | EffectKind::PanRight => {
            let ew = motion::pan_enlarged_width(canvas.width);
            let enlarged = resizer
                .resize(&base, ew, canvas.height)
                .map_err(|e| attribute(index, e))?;
            ClipFrames::Pan {
                offsets: times
                    .iter()
                    .map(|&t| motion::pan_offset(effect, t, duration, ew, canvas.width))
                    .collect(),
                enlarged: Arc::new(enlarged),
            }
        }
        EffectKind::None => ClipFrames::Still(Arc::new(base)),
    };

    tracing::debug!(clip = index, effect = %effect, duration, frames = n, "built effect clip");
    Ok(EffectClip {
        index,
        effect,
        duration,
        fps,
        canvas,
        frames,
    })
}

fn attribute(index: usize, err: ReelError) -> ReelError {
    match err {
        ReelError::Render { message, .. } => ReelError::render_clip(index, message),
        ReelError::Cancelled => ReelError::Cancelled,
        other => ReelError::render_clip(index, other.to_string()),
    }
}

impl EffectClip {
    /// Position of the source image in the request.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Motion effect.
    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of precomputed frame slots.
    pub fn frame_slots(&self) -> usize {
        match &self.frames {
            ClipFrames::Still(_) => motion::frame_count(self.duration, self.fps),
            ClipFrames::Zoom { sizes, .. } => sizes.len(),
            ClipFrames::Pan { offsets, .. } => offsets.len(),
        }
    }

    /// Canvas-sized frame at clip-local time `t`.
    ///
    /// Times outside `[0, duration]` clamp to the first or last frame.
    pub fn frame_at(&self, t: f64, resizer: &dyn Resizer) -> ReelResult<FrameRGBA> {
        let idx = motion::frame_lookup(t, self.fps, self.frame_slots());
        let (w, h) = (self.canvas.width, self.canvas.height);
        match &self.frames {
            ClipFrames::Still(f) => Ok(f.as_ref().clone()),
            ClipFrames::Zoom { source, sizes } => {
                let (zw, zh) = sizes[idx];
                if (zw, zh) == (w, h) {
                    return Ok(source.as_ref().clone());
                }
                let zoomed = resizer
                    .resize(source, zw, zh)
                    .map_err(|e| attribute(self.index, e))?;
                let (x, y) = motion::center_crop_origin(zw, zh, w, h);
                zoomed.crop(x, y, w, h).map_err(|e| attribute(self.index, e))
            }
            ClipFrames::Pan { enlarged, offsets } => enlarged
                .crop(offsets[idx], 0, w, h)
                .map_err(|e| attribute(self.index, e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/clip.rs"]
mod tests;
