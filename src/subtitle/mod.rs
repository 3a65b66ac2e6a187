//! Subtitle chunking, timing, and text layer layout.

/// Word chunking and display windows.
pub mod chunk;
/// Font fitting and text rasterization.
pub mod layout;
pub(crate) mod shaping;
/// Overlap trimming, fades, and pop scale.
pub mod timing;
