//! End-to-end render job: resolve and decode assets, assemble the timeline, render, publish.

use std::path::{Path, PathBuf};

use crate::assets::decode::decode_image;
use crate::assets::media::{AudioTrack, decode_audio_f32_stereo};
use crate::assets::resolve::AssetResolver;
use crate::audio::mix::mix_tracks;
use crate::compose::timeline::Timeline;
use crate::config::RenderConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::FrameSink;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cancel::CancelToken;
use crate::render::pipeline::{RenderStats, Renderer};
use crate::request::{RenderRequest, Subtitle};
use crate::resize::resizer_from_config;
use crate::subtitle::chunk::plan_chunks;
use crate::subtitle::layout::{SubtitleLayoutEngine, TextLayer};

/// Result of a published render.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderOutput {
    /// Filesystem location of the final MP4.
    pub path: PathBuf,
    /// Public reference returned to callers.
    pub public_ref: String,
    /// Frame counters.
    pub stats: RenderStats,
}

/// Decoded request inputs.
#[derive(Clone, Debug)]
pub struct PreparedInputs {
    /// Decoded images in request order.
    pub images: Vec<FrameRGBA>,
    /// Decoded narration.
    pub narration: AudioTrack,
    /// Decoded background music, `None` when absent or unusable.
    pub music: Option<AudioTrack>,
    /// Subtitles from the request.
    pub subtitles: Vec<Subtitle>,
}

/// Resolve and decode every asset of `request`.
///
/// Missing or undecodable narration and images are fatal. Background music that cannot be
/// resolved or decoded is dropped with a warning and the render continues narration-only.
#[tracing::instrument(level = "debug", skip_all, fields(project = %request.project_id))]
pub fn prepare_inputs(
    request: &RenderRequest,
    resolver: &dyn AssetResolver,
    config: &RenderConfig,
) -> ReelResult<PreparedInputs> {
    request.validate()?;
    let sample_rate = config.audio.sample_rate;

    // Resolve everything required before decoding anything.
    let narration_bytes = resolver.resolve(&request.audio)?;
    let image_bytes = request
        .images
        .iter()
        .map(|reference| resolver.resolve(reference))
        .collect::<ReelResult<Vec<_>>>()?;

    let images = image_bytes
        .iter()
        .map(|bytes| decode_image(bytes))
        .collect::<ReelResult<Vec<_>>>()?;
    let narration = decode_audio_f32_stereo(&narration_bytes, sample_rate)?;

    let music = match request.background_music.as_deref() {
        Some(reference) => load_music(resolver, reference, sample_rate),
        None => None,
    };

    tracing::info!(
        images = images.len(),
        narration_secs = narration.duration_secs(),
        music = music.is_some(),
        subtitles = request.subtitles.len(),
        "inputs prepared"
    );
    Ok(PreparedInputs {
        images,
        narration,
        music,
        subtitles: request.subtitles.clone(),
    })
}

fn load_music(resolver: &dyn AssetResolver, reference: &str, sample_rate: u32) -> Option<AudioTrack> {
    let decoded = resolver
        .resolve(reference)
        .and_then(|bytes| decode_audio_f32_stereo(&bytes, sample_rate));
    match decoded {
        Ok(track) => Some(track),
        Err(err) => {
            tracing::warn!(reference, error = %err, "background music unavailable, rendering narration only");
            None
        }
    }
}

/// Lay out subtitle layers. A font that cannot be loaded disables subtitles with a warning.
pub fn build_subtitle_layers(
    subtitles: &[Subtitle],
    config: &RenderConfig,
    font_bytes: Option<Vec<u8>>,
) -> Vec<TextLayer> {
    if subtitles.is_empty() {
        return Vec::new();
    }
    let Some(font_bytes) = font_bytes else {
        tracing::warn!(count = subtitles.len(), "no subtitle font configured, skipping subtitles");
        return Vec::new();
    };
    let mut engine = match SubtitleLayoutEngine::new(font_bytes, config.subtitle.clone(), config.canvas) {
        Ok(engine) => engine,
        Err(err) => {
            tracing::warn!(error = %err, "subtitle font unusable, skipping subtitles");
            return Vec::new();
        }
    };
    let chunks = plan_chunks(subtitles);
    let layers = engine.layout_chunks(&chunks);
    tracing::debug!(chunks = chunks.len(), layers = layers.len(), "subtitle layers built");
    layers
}

/// Build the timeline for prepared inputs on the renderer's pool.
pub fn build_timeline(
    prepared: &PreparedInputs,
    config: &RenderConfig,
    font_bytes: Option<Vec<u8>>,
    renderer: &Renderer,
    cancel: &CancelToken,
) -> ReelResult<Timeline> {
    config.validate()?;
    let layers = build_subtitle_layers(&prepared.subtitles, config, font_bytes);
    Timeline::build(
        &prepared.images,
        prepared.narration.duration_secs(),
        layers,
        config.canvas,
        config.fps,
        resizer_from_config(&config.accel),
        renderer.pool(),
        cancel,
    )
}

/// Render prepared inputs into an arbitrary sink.
pub fn render_prepared(
    prepared: &PreparedInputs,
    config: &RenderConfig,
    font_bytes: Option<Vec<u8>>,
    sink: &mut dyn FrameSink,
    cancel: &CancelToken,
) -> ReelResult<RenderStats> {
    let renderer = Renderer::new(&config.threading)?;
    let timeline = match build_timeline(prepared, config, font_bytes, &renderer, cancel) {
        Ok(timeline) => timeline,
        Err(err) => {
            sink.abort();
            return Err(err);
        }
    };
    let mixed = match mix_tracks(&prepared.narration, prepared.music.as_ref(), &config.audio) {
        Ok(mixed) => mixed,
        Err(err) => {
            sink.abort();
            return Err(err);
        }
    };
    renderer.render(&timeline, Some(&mixed), sink, cancel)
}

/// Load the configured subtitle font, if any. Read failures are logged and treated as absent.
pub fn load_font(config: &RenderConfig) -> Option<Vec<u8>> {
    let path = config.font_path.as_ref()?;
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read subtitle font");
            None
        }
    }
}

/// Load the subtitle font `subtitles` need.
///
/// Subtitles with text require a configured, parseable font; otherwise this fails with
/// [`ReelError::InvalidInput`] before any asset is decoded. Blank subtitles need no font.
pub fn require_subtitle_font(
    subtitles: &[Subtitle],
    config: &RenderConfig,
) -> ReelResult<Option<Vec<u8>>> {
    if subtitles.iter().all(|s| s.text.trim().is_empty()) {
        return Ok(load_font(config));
    }
    let path = config.font_path.as_ref().ok_or_else(|| {
        ReelError::invalid_input("request has subtitles but no subtitle font_path is configured")
    })?;
    let bytes = std::fs::read(path).map_err(|e| unusable_font(path, e))?;
    SubtitleLayoutEngine::new(bytes.clone(), config.subtitle.clone(), config.canvas)
        .map_err(|e| unusable_font(path, e))?;
    Ok(Some(bytes))
}

fn unusable_font(path: &Path, err: impl std::fmt::Display) -> ReelError {
    ReelError::invalid_input(format!("subtitle font '{}': {err}", path.display()))
}

/// Render `request` to `<output_root>/outputs/<projectId>/video/<projectId>_final_video.mp4`.
///
/// The file only appears once encoding succeeded; failed or cancelled renders leave nothing
/// behind. A request with subtitles but no usable font is rejected up front.
#[tracing::instrument(level = "info", skip_all, fields(project = %request.project_id))]
pub fn render_request(
    request: &RenderRequest,
    resolver: &dyn AssetResolver,
    config: &RenderConfig,
    output_root: &Path,
    cancel: &CancelToken,
) -> ReelResult<RenderOutput> {
    config.validate()?;
    request.validate()?;
    let font = require_subtitle_font(&request.subtitles, config)?;
    let prepared = prepare_inputs(request, resolver, config)?;
    cancel.check()?;

    let path = request.output_path(output_root);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: path.clone(),
        overwrite: true,
        encode: config.encode.clone(),
    });
    let stats = render_prepared(&prepared, config, font, &mut sink, cancel)?;

    let public_ref = request.public_ref();
    tracing::info!(path = %path.display(), public_ref = %public_ref, frames = stats.frames_rendered, "video published");
    Ok(RenderOutput {
        path,
        public_ref,
        stats,
    })
}
