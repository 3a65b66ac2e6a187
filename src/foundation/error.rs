/// Result alias used throughout the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy for a render job.
///
/// `AssetMissing`, `Render`, `Encode` and `InvalidInput` are fatal for the job. `Layout` errors are
/// reported per subtitle chunk; callers log them and drop the chunk.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Request or configuration is malformed. Raised before any rendering work starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced asset could not be resolved or read.
    #[error("asset missing: '{reference}'")]
    AssetMissing {
        /// The reference as it appeared in the request.
        reference: String,
    },

    /// Text shaping or rasterization failed for one subtitle chunk.
    #[error("layout error: {0}")]
    Layout(String),

    /// Frame synthesis failed.
    #[error("render error{}: {message}", clip_suffix(.clip))]
    Render {
        /// Index of the image clip that failed, when known.
        clip: Option<usize>,
        /// Failure description.
        message: String,
    },

    /// Video/audio encoding or muxing failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The job was cancelled by the caller.
    #[error("render cancelled")]
    Cancelled,

    #[error(transparent)]
    /// Lower-level failure wrapped with context.
    Other(#[from] anyhow::Error),
}

fn clip_suffix(clip: &Option<usize>) -> String {
    match clip {
        Some(i) => format!(" in clip {i}"),
        None => String::new(),
    }
}

impl ReelError {
    /// Build an [`ReelError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build an [`ReelError::AssetMissing`].
    pub fn asset_missing(reference: impl Into<String>) -> Self {
        Self::AssetMissing {
            reference: reference.into(),
        }
    }

    /// Build a [`ReelError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`ReelError::Render`] without clip attribution.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            clip: None,
            message: msg.into(),
        }
    }

    /// Build a [`ReelError::Render`] attributed to image clip `clip`.
    pub fn render_clip(clip: usize, msg: impl Into<String>) -> Self {
        Self::Render {
            clip: Some(clip),
            message: msg.into(),
        }
    }

    /// Build an [`ReelError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for errors that must abort the whole job.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Layout(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
