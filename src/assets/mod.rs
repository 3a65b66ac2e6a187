//! Asset resolution and decoding.

/// Image decoding to premultiplied RGBA8.
pub mod decode;
/// Audio decoding through the system `ffmpeg`.
pub mod media;
/// Reference-to-bytes resolvers.
pub mod resolve;
