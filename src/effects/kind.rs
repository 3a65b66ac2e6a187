use crate::foundation::error::{ReelError, ReelResult};

/// Motion applied to one still image over its clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Scale up from 1.0 to 1.3, center-cropped.
    ZoomIn,
    /// Scale down from 1.3 to 1.0, center-cropped.
    ZoomOut,
    /// Slide the viewport over a 1.4x wide copy, right to left.
    PanLeft,
    /// Slide the viewport over a 1.4x wide copy, left to right.
    PanRight,
    /// Hold the image still.
    None,
}

/// Assignment order for images by position.
pub const EFFECT_CYCLE: [EffectKind; 4] = [
    EffectKind::ZoomIn,
    EffectKind::PanRight,
    EffectKind::ZoomOut,
    EffectKind::PanLeft,
];

impl EffectKind {
    /// Effect for the image at position `index`.
    pub fn for_image_index(index: usize) -> Self {
        EFFECT_CYCLE[index % EFFECT_CYCLE.len()]
    }

    /// Parse the snake_case name.
    pub fn parse(name: &str) -> ReelResult<Self> {
        match name {
            "zoom_in" => Ok(Self::ZoomIn),
            "zoom_out" => Ok(Self::ZoomOut),
            "pan_left" => Ok(Self::PanLeft),
            "pan_right" => Ok(Self::PanRight),
            "none" => Ok(Self::None),
            other => Err(ReelError::invalid_input(format!(
                "unknown effect '{other}'"
            ))),
        }
    }

    /// Snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::PanLeft => "pan_left",
            Self::PanRight => "pan_right",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
