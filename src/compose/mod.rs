//! Timeline assembly and per-frame composition.

/// Per-frame compositing of clips and subtitle layers.
pub mod compositor;
/// Aspect-preserving placement on the output canvas.
pub mod letterbox;
/// Clip concatenation and timeline lookup.
pub mod timeline;
