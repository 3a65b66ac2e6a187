//! Render configuration.
//!
//! Every field has a default, so an empty JSON object is a valid configuration. The library never
//! reads environment variables; callers load a [`RenderConfig`] explicitly.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::pipeline::RenderThreading;

/// Top-level configuration for one render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output canvas (9:16 by default).
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Subtitle styling profile.
    pub subtitle: SubtitleStyle,
    /// Font file used for subtitles. Required by requests whose subtitles carry text.
    pub font_path: Option<PathBuf>,
    /// Narration/music mixing.
    pub audio: MixConfig,
    /// Encoder parameters handed to `ffmpeg`.
    pub encode: EncodeConfig,
    /// Accelerated resize capability.
    pub accel: AccelConfig,
    /// Frame scheduling.
    pub threading: RenderThreading,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            subtitle: SubtitleStyle::default(),
            font_path: None,
            audio: MixConfig::default(),
            encode: EncodeConfig::default(),
            accel: AccelConfig::default(),
            threading: RenderThreading::default(),
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: RenderConfig = serde_json::from_str(&text).map_err(|e| {
            ReelError::invalid_input(format!("config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        self.subtitle.validate()?;
        self.audio.validate()?;
        if self.threading.chunk_size == 0 {
            return Err(ReelError::invalid_input("threading.chunk_size must be > 0"));
        }
        if self.threading.threads == Some(0) {
            return Err(ReelError::invalid_input("threading.threads must be > 0"));
        }
        Ok(())
    }
}

/// Visual and timing parameters for subtitle layers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    /// Font size before auto-fit, in pixels.
    pub base_font_size: f32,
    /// Outline width at `base_font_size`; scaled with the fitted size.
    pub base_stroke_width: f32,
    /// Text box width as a fraction of the canvas width.
    pub max_width_fraction: f32,
    /// Maximum block height as a fraction of the canvas height before the font is shrunk.
    pub fit_height_fraction: f32,
    /// Top of the text block as a fraction of the canvas height.
    pub vertical_anchor: f32,
    /// Number of stacked drop-shadow copies.
    pub shadow_copies: u32,
    /// Opacity of each shadow copy.
    pub shadow_opacity: f32,
    /// Downward shadow offset in pixels.
    pub shadow_offset_px: f32,
    /// Upper bound for the fade-in, seconds.
    pub fade_in_cap: f64,
    /// Upper bound for the fade-out, seconds.
    pub fade_out_cap: f64,
    /// Fade length as a fraction of the effective layer duration.
    pub fade_fraction: f64,
    /// Layers shorter than this get no fades.
    pub min_fade_duration: f64,
    /// Gap kept before the next chunk when a layer would overlap it.
    pub overlap_gap: f64,
    /// Enable the 0.8 -> 1.1 -> 1.0 pop-in scale animation.
    pub pop: bool,
    /// Fill color (straight RGBA8).
    pub fill_rgba: [u8; 4],
    /// Outline and shadow color (straight RGBA8).
    pub stroke_rgba: [u8; 4],
}

impl SubtitleStyle {
    /// Compact single-line captions with pop-in. This is the default profile.
    pub fn compact() -> Self {
        Self {
            base_font_size: 80.0,
            base_stroke_width: 3.0,
            max_width_fraction: 0.9,
            fit_height_fraction: 0.15,
            vertical_anchor: 0.85,
            shadow_copies: 2,
            shadow_opacity: 0.3,
            shadow_offset_px: 4.0,
            fade_in_cap: 0.1,
            fade_out_cap: 0.15,
            fade_fraction: 0.2,
            min_fade_duration: 0.2,
            overlap_gap: 0.05,
            pop: true,
            fill_rgba: [255, 255, 255, 255],
            stroke_rgba: [0, 0, 0, 255],
        }
    }

    /// Larger, slower captions with symmetric fades and no pop.
    pub fn classic() -> Self {
        Self {
            base_font_size: 70.0,
            base_stroke_width: 4.0,
            max_width_fraction: 0.85,
            fit_height_fraction: 0.2,
            vertical_anchor: 0.8,
            shadow_copies: 2,
            shadow_opacity: 0.4,
            shadow_offset_px: 4.0,
            fade_in_cap: 0.3,
            fade_out_cap: 0.3,
            fade_fraction: 0.25,
            min_fade_duration: 0.6,
            overlap_gap: 0.05,
            pop: false,
            fill_rgba: [255, 255, 255, 255],
            stroke_rgba: [0, 0, 0, 255],
        }
    }

    fn validate(&self) -> ReelResult<()> {
        let positive = [
            ("base_font_size", self.base_font_size),
            ("max_width_fraction", self.max_width_fraction),
            ("fit_height_fraction", self.fit_height_fraction),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::invalid_input(format!(
                    "subtitle.{name} must be finite and > 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.vertical_anchor) {
            return Err(ReelError::invalid_input(
                "subtitle.vertical_anchor must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.shadow_opacity) {
            return Err(ReelError::invalid_input(
                "subtitle.shadow_opacity must be in [0, 1]",
            ));
        }
        let non_negative = [
            ("fade_in_cap", self.fade_in_cap),
            ("fade_out_cap", self.fade_out_cap),
            ("fade_fraction", self.fade_fraction),
            ("min_fade_duration", self.min_fade_duration),
            ("overlap_gap", self.overlap_gap),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::invalid_input(format!(
                    "subtitle.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self::compact()
    }
}

/// How background music shorter than the narration is extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicFit {
    /// Silence after the music runs out.
    #[default]
    PadSilence,
    /// Repeat the music from the start.
    Loop,
}

/// Narration/music mixing parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MixConfig {
    /// Linear gain applied to background music.
    pub music_gain: f32,
    /// Strategy for music shorter than the narration.
    pub music_fit: MusicFit,
    /// Sample rate used when decoding audio assets.
    pub sample_rate: u32,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            music_gain: 0.2,
            music_fit: MusicFit::PadSilence,
            sample_rate: 48_000,
        }
    }
}

impl MixConfig {
    fn validate(&self) -> ReelResult<()> {
        if !self.music_gain.is_finite() || self.music_gain < 0.0 {
            return Err(ReelError::invalid_input(
                "audio.music_gain must be finite and >= 0",
            ));
        }
        if self.sample_rate == 0 {
            return Err(ReelError::invalid_input("audio.sample_rate must be > 0"));
        }
        Ok(())
    }
}

/// Encoder parameters passed to `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Video codec.
    pub video_codec: String,
    /// Audio codec.
    pub audio_codec: String,
    /// Output pixel format.
    pub pix_fmt: String,
    /// x264 preset, when set. Defaults to `faster`.
    pub preset: Option<String>,
    /// Constant rate factor, when set.
    pub crf: Option<u8>,
    /// Background color used to flatten alpha (straight RGBA8).
    pub bg_rgba: [u8; 4],
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            pix_fmt: "yuv420p".to_string(),
            preset: Some("faster".to_string()),
            crf: None,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Accelerated resize capability.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AccelConfig {
    /// Try the accelerated resizer first.
    pub enabled: bool,
    /// Largest output (in pixels) the accelerated path accepts; bigger requests fall back.
    pub max_pixels: u64,
    /// Worker threads for the accelerated path. `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pixels: 4096 * 4096,
            threads: None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
