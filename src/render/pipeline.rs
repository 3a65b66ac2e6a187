use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::media::AudioTrack;
use crate::audio::mix::write_mix_to_f32le_file;
use crate::compose::compositor::Compositor;
use crate::compose::timeline::Timeline;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cancel::CancelToken;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Threading and chunking controls for frame rendering.
pub struct RenderThreading {
    /// Chunk size in frames for batched scheduling.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Frames the timeline needs.
    pub frames_total: u64,
    /// Frames composed and handed to the sink.
    pub frames_rendered: u64,
}

/// Drives a [`Compositor`] over a whole timeline and streams frames into a [`FrameSink`].
///
/// Frames inside a chunk are composed in parallel on a private rayon pool and pushed to the sink
/// in index order. Cancellation is polled between chunks.
pub struct Renderer {
    pool: rayon::ThreadPool,
    chunk_size: u64,
}

impl Renderer {
    /// Build a renderer with its own worker pool.
    pub fn new(threading: &RenderThreading) -> ReelResult<Self> {
        Ok(Self {
            pool: build_thread_pool(threading.threads)?,
            chunk_size: normalized_chunk_size(threading.chunk_size),
        })
    }

    /// Worker pool, shared with timeline construction.
    pub fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }

    /// Render every frame of `timeline` into `sink`, muxing `audio` when given.
    ///
    /// On any error, including cancellation, the sink is aborted and the error returned; `end` is
    /// only called after the last frame was accepted.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = timeline.frame_count()))]
    pub fn render(
        &self,
        timeline: &Timeline,
        audio: Option<&AudioTrack>,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> ReelResult<RenderStats> {
        let mut audio_tmp = TempFileGuard(None);
        let result = self.render_inner(timeline, audio, sink, cancel, &mut audio_tmp);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "render failed, aborting sink");
            sink.abort();
        }
        drop(audio_tmp);
        result
    }

    fn render_inner(
        &self,
        timeline: &Timeline,
        audio: Option<&AudioTrack>,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
        audio_tmp: &mut TempFileGuard,
    ) -> ReelResult<RenderStats> {
        cancel.check()?;

        let audio_cfg = match audio {
            Some(track) => {
                let path = temp_audio_path();
                write_mix_to_f32le_file(&track.interleaved, &path)?;
                audio_tmp.0 = Some(path.clone());
                Some(AudioInputConfig {
                    path,
                    sample_rate: track.sample_rate,
                    channels: track.channels,
                })
            }
            None => None,
        };

        let canvas = timeline.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: timeline.fps(),
            audio: audio_cfg,
        })?;

        let compositor = Compositor::new(timeline);
        let total = compositor.frame_count();
        let mut stats = RenderStats {
            frames_total: total,
            frames_rendered: 0,
        };

        let mut chunk_start = 0u64;
        while chunk_start < total {
            cancel.check()?;
            let chunk_end = (chunk_start + self.chunk_size).min(total);
            let frames = self.render_chunk(&compositor, chunk_start, chunk_end)?;
            for (offset, frame) in frames.iter().enumerate() {
                sink.push_frame(FrameIndex(chunk_start + offset as u64), frame)?;
            }
            stats.frames_rendered += frames.len() as u64;
            tracing::debug!(
                done = stats.frames_rendered,
                total,
                "chunk rendered"
            );
            chunk_start = chunk_end;
        }

        cancel.check()?;
        sink.end()?;
        tracing::info!(frames = stats.frames_rendered, "render finished");
        Ok(stats)
    }

    fn render_chunk(
        &self,
        compositor: &Compositor<'_>,
        start: u64,
        end: u64,
    ) -> ReelResult<Vec<FrameRGBA>> {
        self.pool.install(|| {
            (start..end)
                .into_par_iter()
                .map(|f| compositor.frame(FrameIndex(f)))
                .collect::<ReelResult<Vec<_>>>()
        })
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::invalid_input(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn temp_audio_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "slidereel_audio_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
