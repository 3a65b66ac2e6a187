//! Encoding sinks.
//!
//! Sinks consume composed frames in timeline order and are driven by the
//! [`Renderer`](crate::Renderer).

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
