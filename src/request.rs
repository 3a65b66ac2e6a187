//! Render request model.

use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// One timestamped subtitle as supplied by the caller.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Subtitle {
    /// Subtitle text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, must be greater than `start`.
    pub end: f64,
    /// Position in the caller's subtitle list.
    #[serde(default)]
    pub index: usize,
}

impl Subtitle {
    /// Build a subtitle; used mostly by tests and the CLI.
    pub fn new(text: impl Into<String>, start: f64, end: f64, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// `end - start`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A complete render request.
///
/// Asset fields are opaque references handed to an [`AssetResolver`](crate::AssetResolver).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Ordered image references; one clip per image.
    pub images: Vec<String>,
    /// Narration audio reference. Its duration defines the video duration.
    pub audio: String,
    /// Timestamped subtitles.
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
    /// Optional background music reference.
    #[serde(default)]
    pub background_music: Option<String>,
    /// Caller-chosen project identifier, used for output naming.
    pub project_id: String,
}

impl RenderRequest {
    /// Parse a request from JSON text and validate it.
    pub fn from_json(text: &str) -> ReelResult<Self> {
        let req: RenderRequest = serde_json::from_str(text)
            .map_err(|e| ReelError::invalid_input(format!("render request: {e}")))?;
        req.validate()?;
        Ok(req)
    }

    /// Reject malformed requests before any asset is touched.
    pub fn validate(&self) -> ReelResult<()> {
        if self.images.is_empty() {
            return Err(ReelError::invalid_input("request has no images"));
        }
        if self.images.iter().any(|r| r.trim().is_empty()) {
            return Err(ReelError::invalid_input("image references must be non-empty"));
        }
        if self.audio.trim().is_empty() {
            return Err(ReelError::invalid_input("narration reference must be non-empty"));
        }
        validate_project_id(&self.project_id)?;
        for (i, s) in self.subtitles.iter().enumerate() {
            if !s.start.is_finite() || !s.end.is_finite() {
                return Err(ReelError::invalid_input(format!(
                    "subtitle {i} has non-finite timing"
                )));
            }
            if s.start < 0.0 {
                return Err(ReelError::invalid_input(format!(
                    "subtitle {i} starts before 0"
                )));
            }
            if s.end <= s.start {
                return Err(ReelError::invalid_input(format!(
                    "subtitle {i} must end after it starts ({} <= {})",
                    s.end, s.start
                )));
            }
        }
        Ok(())
    }

    /// File name of the final video.
    pub fn output_file_name(&self) -> String {
        format!("{}_final_video.mp4", self.project_id)
    }

    /// Location of the final video under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root
            .join("outputs")
            .join(&self.project_id)
            .join("video")
            .join(self.output_file_name())
    }

    /// Public reference returned to the caller once the video is published.
    pub fn public_ref(&self) -> String {
        format!(
            "/outputs/{}/video/{}",
            self.project_id,
            self.output_file_name()
        )
    }
}

fn validate_project_id(id: &str) -> ReelResult<()> {
    if id.is_empty() {
        return Err(ReelError::invalid_input("projectId must be non-empty"));
    }
    let ok = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(ReelError::invalid_input(format!(
            "projectId '{id}' may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}
