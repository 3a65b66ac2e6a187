/// Narration and background music mixing.
pub mod mix;
