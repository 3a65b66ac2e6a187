//! Ken Burns style motion applied to still images.

/// Per-image effect clips.
pub mod clip;
/// Effect kinds and their cycle.
pub mod kind;
/// Scale and offset curves.
pub mod motion;
