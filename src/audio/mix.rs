use std::path::Path;

use crate::assets::media::AudioTrack;
use crate::config::{MixConfig, MusicFit};
use crate::foundation::error::{ReelError, ReelResult};

/// Mix narration with optional background music.
///
/// The result always has exactly the narration's length and format. Without music the narration
/// is returned unchanged. Music is cut or extended (per [`MusicFit`]) to the narration length,
/// scaled by `music_gain`, summed, and the sum is clamped to `[-1, 1]`.
pub fn mix_tracks(
    narration: &AudioTrack,
    music: Option<&AudioTrack>,
    cfg: &MixConfig,
) -> ReelResult<AudioTrack> {
    let Some(music) = music else {
        return Ok(narration.clone());
    };
    if music.sample_rate != narration.sample_rate || music.channels != narration.channels {
        return Err(ReelError::invalid_input(format!(
            "music format {} Hz x{} does not match narration {} Hz x{}",
            music.sample_rate, music.channels, narration.sample_rate, narration.channels
        )));
    }

    let mut out = narration.interleaved.clone();
    let src = &music.interleaved;
    if !src.is_empty() {
        let gain = cfg.music_gain;
        for (i, s) in out.iter_mut().enumerate() {
            let m = match cfg.music_fit {
                MusicFit::PadSilence => src.get(i).copied().unwrap_or(0.0),
                MusicFit::Loop => src[i % src.len()],
            };
            *s = (*s + m * gain).clamp(-1.0, 1.0);
        }
    }

    tracing::debug!(
        narration_secs = narration.duration_secs(),
        music_secs = music.duration_secs(),
        fit = ?cfg.music_fit,
        "mixed background music"
    );
    Ok(AudioTrack {
        sample_rate: narration.sample_rate,
        channels: narration.channels,
        interleaved: out,
    })
}

/// Write interleaved `f32` PCM samples to raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::encode(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
