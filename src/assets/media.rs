use std::io::{Read, Write};
use std::process::{Command, Stdio};

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded audio as interleaved `f32` PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples, `frames * channels` long.
    pub interleaved: Vec<f32>,
}

impl AudioTrack {
    /// Build a track, checking that the sample count is a whole number of frames.
    pub fn new(sample_rate: u32, channels: u16, interleaved: Vec<f32>) -> ReelResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(ReelError::invalid_input(
                "audio sample_rate and channels must be > 0",
            ));
        }
        if !interleaved.len().is_multiple_of(usize::from(channels)) {
            return Err(ReelError::invalid_input(
                "audio sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved,
        })
    }

    /// Silent track of `frames` sample frames.
    pub fn silence(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.interleaved.len() / usize::from(self.channels.max(1))
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// Decode encoded audio bytes to stereo interleaved `f32` PCM at `sample_rate` using `ffmpeg`.
///
/// Bytes are streamed to `ffmpeg` over stdin from a writer thread so large inputs cannot deadlock
/// against the stdout pipe.
pub fn decode_audio_f32_stereo(bytes: &[u8], sample_rate: u32) -> ReelResult<AudioTrack> {
    let mut child = Command::new("ffmpeg")
        .args(["-v", "error", "-i", "pipe:0"])
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
    let input = bytes.to_vec();
    let writer = std::thread::spawn(move || {
        // ffmpeg may stop reading early once it has probed enough; a broken pipe here is fine.
        let _ = stdin.write_all(&input);
    });

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        buf
    });

    let mut pcm_bytes = Vec::new();
    stdout
        .read_to_end(&mut pcm_bytes)
        .map_err(|e| ReelError::encode(format!("failed to read decoded audio: {e}")))?;
    let status = child
        .wait()
        .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg: {e}")))?;
    let _ = writer.join();
    let stderr_bytes = stderr_drain.join().unwrap_or_default();

    if !status.success() {
        return Err(undecodable(&stderr_bytes));
    }

    pcm_from_f32le(&pcm_bytes, sample_rate, 2)
}

/// `ffmpeg` could not be started.
fn spawn_error(err: std::io::Error) -> ReelError {
    ReelError::encode(format!(
        "failed to run ffmpeg for audio decode (is it installed and on PATH?): {err}"
    ))
}

/// `ffmpeg` ran but rejected the input bytes.
fn undecodable(stderr: &[u8]) -> ReelError {
    ReelError::invalid_input(format!(
        "audio asset could not be decoded: {}",
        String::from_utf8_lossy(stderr).trim()
    ))
}

/// Parse raw little-endian `f32` PCM.
pub(crate) fn pcm_from_f32le(bytes: &[u8], sample_rate: u32, channels: u16) -> ReelResult<AudioTrack> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::encode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    // Trailing partial frames are dropped rather than rejected.
    let whole = pcm.len() - pcm.len() % usize::from(channels);
    pcm.truncate(whole);
    AudioTrack::new(sample_rate, channels, pcm)
}
