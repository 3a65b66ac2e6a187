//! slidereel turns a narrated slideshow request into a vertical 9:16 MP4.
//!
//! A render job runs these stages:
//!
//! - Resolve and decode images, narration and optional background music
//! - Build one [`EffectClip`] per image (zoom or pan motion) and lay out subtitle chunks as
//!   [`TextLayer`]s
//! - Compose frames with the [`Compositor`] and stream them into a [`FrameSink`], muxed with the
//!   mixed audio
//!
//! [`render_request`] is the single entry point for end-to-end renders; the stages are public
//! for callers that need finer control.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Asset resolution and decoding.
pub mod assets;
/// Audio mixing.
pub mod audio;
/// Timeline assembly and composition.
pub mod compose;
/// Render configuration.
pub mod config;
/// Per-image motion effects.
pub mod effects;
/// Encoding sinks.
pub mod encode;
/// End-to-end render job.
pub mod job;
/// Frame rendering and cancellation.
pub mod render;
/// Render request model.
pub mod request;
/// Image resizing backends.
pub mod resize;
/// Subtitle chunking and layout.
pub mod subtitle;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{decode_image, unpremultiply_rgba8};
pub use crate::assets::media::{AudioTrack, decode_audio_f32_stereo};
pub use crate::assets::resolve::{AssetResolver, FsResolver};
pub use crate::audio::mix::{mix_tracks, write_mix_to_f32le_file};
pub use crate::compose::compositor::Compositor;
pub use crate::compose::letterbox::{LetterboxGeometry, letterbox, letterbox_geometry};
pub use crate::compose::timeline::Timeline;
pub use crate::config::{AccelConfig, EncodeConfig, MixConfig, MusicFit, RenderConfig, SubtitleStyle};
pub use crate::effects::clip::{EffectClip, build_effect_clip};
pub use crate::effects::kind::EffectKind;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::job::{
    PreparedInputs, RenderOutput, build_subtitle_layers, build_timeline, load_font,
    prepare_inputs, render_prepared, render_request, require_subtitle_font,
};
pub use crate::render::cancel::CancelToken;
pub use crate::render::pipeline::{RenderStats, RenderThreading, Renderer};
pub use crate::request::{RenderRequest, Subtitle};
pub use crate::resize::{
    AcceleratedResizer, FallbackResizer, Resizer, SoftwareResizer, resizer_from_config,
};
pub use crate::subtitle::chunk::{Chunk, capitalize_words, chunk_subtitle, plan_chunks, split_subtitle};
pub use crate::subtitle::layout::{SubtitleLayoutEngine, TextLayer};
pub use crate::subtitle::timing::{LayerTiming, pop_scale, resolve_layer_timing};
