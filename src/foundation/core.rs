use crate::foundation::error::{ReelError, ReelResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::invalid_input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::invalid_input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Presentation time of frame `idx`, in seconds.
    pub fn frame_to_secs(self, idx: FrameIndex) -> f64 {
        (idx.0 as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Number of frames needed to cover `secs`.
    ///
    /// Products within `1e-6` of an integer are not rounded up, so `10s @ 24fps` is 240 frames.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        let exact = (secs * self.as_f64()).max(0.0);
        let nearest = exact.round();
        if (exact - nearest).abs() < 1e-6 {
            nearest as u64
        } else {
            exact.ceil() as u64
        }
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Full-HD vertical canvas.
    pub const VERTICAL_1080: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Validate that the canvas is non-empty and even-sized (yuv420p requirement).
    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::invalid_input("canvas width/height must be > 0"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::invalid_input(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::VERTICAL_1080
    }
}

/// A raster frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** unless `premultiplied` says otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Allocate a frame filled with one premultiplied color.
    pub fn solid(width: u32, height: u32, rgba_premul: [u8; 4]) -> Self {
        let px = width as usize * height as usize;
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&rgba_premul);
        }
        Self {
            width,
            height,
            data,
            premultiplied: true,
        }
    }

    /// Wrap premultiplied bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ReelError::invalid_input(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    /// Byte stride of one row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Borrow pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Copy out the `width x height` window whose top-left corner is `(x, y)`.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> ReelResult<FrameRGBA> {
        if x.saturating_add(width) > self.width || y.saturating_add(height) > self.height {
            return Err(ReelError::render(format!(
                "crop {width}x{height}+{x}+{y} exceeds {}x{} source",
                self.width, self.height
            )));
        }
        let src_stride = self.stride();
        let row_bytes = width as usize * 4;
        let mut data = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let off = (y as usize + row) * src_stride + x as usize * 4;
            data.extend_from_slice(&self.data[off..off + row_bytes]);
        }
        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: self.premultiplied,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
