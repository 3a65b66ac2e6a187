//! Image resize capability.
//!
//! Effect frames are produced through a [`Resizer`]. The accelerated implementation runs a
//! data-parallel Lanczos3 on a dedicated worker pool and reports failure instead of degrading;
//! [`FallbackResizer`] retries those failures on the software path, so callers only ever see a
//! resized frame or a hard error.

use std::sync::Arc;

use crate::config::AccelConfig;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};

pub(crate) mod lanczos;

/// Aspect-free resize of a premultiplied frame with Lanczos3 filtering.
pub trait Resizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Resize `src` to exactly `width x height`.
    fn resize(&self, src: &FrameRGBA, width: u32, height: u32) -> ReelResult<FrameRGBA>;
}

fn check_target(src: &FrameRGBA, width: u32, height: u32) -> ReelResult<()> {
    if width == 0 || height == 0 {
        return Err(ReelError::render(format!(
            "resize target {width}x{height} must be non-empty"
        )));
    }
    if src.width == 0 || src.height == 0 {
        return Err(ReelError::render("cannot resize an empty frame"));
    }
    if src.data.len() != src.width as usize * src.height as usize * 4 {
        return Err(ReelError::render("frame buffer size mismatch with width*height*4"));
    }
    Ok(())
}

/// Sequential Lanczos3 resize using the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareResizer;

impl Resizer for SoftwareResizer {
    fn name(&self) -> &'static str {
        "software"
    }

    fn resize(&self, src: &FrameRGBA, width: u32, height: u32) -> ReelResult<FrameRGBA> {
        check_target(src, width, height)?;
        if src.width == width && src.height == height {
            return Ok(src.clone());
        }
        let img = image::RgbaImage::from_raw(src.width, src.height, src.data.clone())
            .ok_or_else(|| ReelError::render("frame buffer does not match its dimensions"))?;
        let resized =
            image::imageops::resize(&img, width, height, image::imageops::FilterType::Lanczos3);
        let mut data = resized.into_raw();
        lanczos::clamp_premul(&mut data);
        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: src.premultiplied,
        })
    }
}

/// Data-parallel Lanczos3 resize on a dedicated rayon pool.
///
/// Requests larger than `max_pixels` (source or target) are refused with an error.
pub struct AcceleratedResizer {
    pool: rayon::ThreadPool,
    max_pixels: u64,
}

impl AcceleratedResizer {
    /// Build the worker pool.
    pub fn new(cfg: &AccelConfig) -> ReelResult<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("reel-resize-{i}"));
        if let Some(n) = cfg.threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| ReelError::render(format!("failed to build resize pool: {e}")))?;
        Ok(Self {
            pool,
            max_pixels: cfg.max_pixels,
        })
    }
}

impl Resizer for AcceleratedResizer {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn resize(&self, src: &FrameRGBA, width: u32, height: u32) -> ReelResult<FrameRGBA> {
        check_target(src, width, height)?;
        let src_px = u64::from(src.width) * u64::from(src.height);
        let dst_px = u64::from(width) * u64::from(height);
        if src_px.max(dst_px) > self.max_pixels {
            return Err(ReelError::render(format!(
                "accelerated resize budget exceeded: {} px > {} px",
                src_px.max(dst_px),
                self.max_pixels
            )));
        }
        if src.width == width && src.height == height {
            return Ok(src.clone());
        }

        let data = self.pool.install(|| {
            let tmp = lanczos::vertical_pass(&src.data, src.width, src.height, height);
            let mut data = lanczos::horizontal_pass(&tmp, src.width, height, width);
            lanczos::clamp_premul(&mut data);
            data
        });
        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: src.premultiplied,
        })
    }
}

/// Tries `primary`, and on any error logs it and retries with `fallback`.
pub struct FallbackResizer {
    primary: Box<dyn Resizer>,
    fallback: Box<dyn Resizer>,
}

impl FallbackResizer {
    /// Compose two resizers.
    pub fn new(primary: Box<dyn Resizer>, fallback: Box<dyn Resizer>) -> Self {
        Self { primary, fallback }
    }
}

impl Resizer for FallbackResizer {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn resize(&self, src: &FrameRGBA, width: u32, height: u32) -> ReelResult<FrameRGBA> {
        match self.primary.resize(src, width, height) {
            Ok(out) => Ok(out),
            Err(err) => {
                tracing::debug!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %err,
                    "resize falling back"
                );
                self.fallback.resize(src, width, height)
            }
        }
    }
}

/// Build the resizer described by `cfg`.
///
/// When acceleration is enabled but its pool cannot be built, the software path is used alone.
pub fn resizer_from_config(cfg: &AccelConfig) -> Arc<dyn Resizer> {
    if !cfg.enabled {
        return Arc::new(SoftwareResizer);
    }
    match AcceleratedResizer::new(cfg) {
        Ok(accel) => Arc::new(FallbackResizer::new(
            Box::new(accel),
            Box::new(SoftwareResizer),
        )),
        Err(err) => {
            tracing::warn!(error = %err, "accelerated resize unavailable, using software path");
            Arc::new(SoftwareResizer)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resize/resize.rs"]
mod tests;
