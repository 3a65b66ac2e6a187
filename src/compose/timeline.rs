use std::sync::Arc;

use rayon::prelude::*;

use crate::effects::clip::{EffectClip, build_effect_clip};
use crate::effects::kind::EffectKind;
use crate::foundation::core::{Canvas, Fps, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cancel::CancelToken;
use crate::resize::Resizer;
use crate::subtitle::layout::TextLayer;

/// Ordered image clips plus subtitle layers, anchored to the narration duration.
pub struct Timeline {
    canvas: Canvas,
    fps: Fps,
    duration: f64,
    clip_duration: f64,
    clips: Vec<EffectClip>,
    layers: Vec<TextLayer>,
    resizer: Arc<dyn Resizer>,
}

impl Timeline {
    /// Build one clip per image, each `narration_duration / images.len()` long.
    ///
    /// Clips are built in parallel on `pool`; cancellation is checked before each clip.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        images: &[FrameRGBA],
        narration_duration: f64,
        layers: Vec<TextLayer>,
        canvas: Canvas,
        fps: Fps,
        resizer: Arc<dyn Resizer>,
        pool: &rayon::ThreadPool,
        cancel: &CancelToken,
    ) -> ReelResult<Self> {
        if images.is_empty() {
            return Err(ReelError::invalid_input("timeline needs at least one image"));
        }
        if !narration_duration.is_finite() || narration_duration <= 0.0 {
            return Err(ReelError::invalid_input(format!(
                "narration duration must be finite and > 0, got {narration_duration}"
            )));
        }
        let clip_duration = narration_duration / images.len() as f64;

        let clips = pool.install(|| {
            images
                .par_iter()
                .enumerate()
                .map(|(i, img)| {
                    cancel.check()?;
                    build_effect_clip(
                        i,
                        img,
                        EffectKind::for_image_index(i),
                        clip_duration,
                        canvas,
                        fps,
                        resizer.as_ref(),
                    )
                })
                .collect::<ReelResult<Vec<_>>>()
        })?;

        tracing::info!(
            clips = clips.len(),
            clip_duration,
            layers = layers.len(),
            duration = narration_duration,
            "timeline built"
        );
        Ok(Self {
            canvas,
            fps,
            duration: narration_duration,
            clip_duration,
            clips,
            layers,
            resizer,
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Total duration in seconds (the narration duration).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Length of every image clip.
    pub fn clip_duration(&self) -> f64 {
        self.clip_duration
    }

    /// Image clips in order.
    pub fn clips(&self) -> &[EffectClip] {
        &self.clips
    }

    /// Subtitle layers in timeline order.
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    /// Resizer used for frame sampling.
    pub fn resizer(&self) -> &dyn Resizer {
        self.resizer.as_ref()
    }

    /// Frames needed to cover the duration.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.duration)
    }

    /// Clip covering absolute time `t` and the clip-local time.
    ///
    /// The last clip also owns any time past its nominal end.
    pub fn clip_at(&self, t: f64) -> (&EffectClip, f64) {
        let last = self.clips.len() - 1;
        let i = if t > 0.0 {
            ((t / self.clip_duration).floor() as usize).min(last)
        } else {
            0
        };
        let local = (t - i as f64 * self.clip_duration).max(0.0);
        (&self.clips[i], local)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/timeline.rs"]
mod tests;
