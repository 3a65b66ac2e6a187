use crate::config::SubtitleStyle;

/// Resolved on-screen timing of one subtitle layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerTiming {
    /// Absolute start in seconds.
    pub start: f64,
    /// Effective duration after overlap trimming.
    pub duration: f64,
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
}

impl LayerTiming {
    /// Exclusive end time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Whether absolute time `t` falls in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }

    /// Fade opacity at absolute time `t`; 0 outside the window.
    pub fn opacity_at(&self, t: f64) -> f32 {
        if !self.contains(t) {
            return 0.0;
        }
        let local = t - self.start;
        let mut o = 1.0f64;
        if self.fade_in > 0.0 {
            o = o.min(local / self.fade_in);
        }
        if self.fade_out > 0.0 {
            o = o.min((self.duration - local) / self.fade_out);
        }
        o.clamp(0.0, 1.0) as f32
    }
}

/// Trim a layer so it ends before `next_start`, then size its fades.
///
/// When the next chunk starts before this one nominally ends, the layer ends `overlap_gap` before
/// it; if the gap leaves no time, the layer keeps half of the available interval instead.
pub fn resolve_layer_timing(
    start: f64,
    duration: f64,
    next_start: Option<f64>,
    style: &SubtitleStyle,
) -> LayerTiming {
    let mut effective = duration;
    if let Some(next) = next_start {
        let available = next - start;
        if available < duration {
            let trimmed = available - style.overlap_gap;
            effective = if trimmed > 0.0 {
                trimmed
            } else {
                (available / 2.0).max(0.0)
            };
        }
    }

    let (fade_in, fade_out) = if effective < style.min_fade_duration || effective <= 0.0 {
        (0.0, 0.0)
    } else {
        let base = effective * style.fade_fraction;
        (
            style.fade_in_cap.min(base).min(effective),
            style.fade_out_cap.min(base).min(effective),
        )
    };

    LayerTiming {
        start,
        duration: effective,
        fade_in,
        fade_out,
    }
}

/// Pop-in scale at layer-local time `local`: 0.8 to 1.1 over 0.15 s, back to 1.0 by 0.3 s.
pub fn pop_scale(local: f64) -> f32 {
    const GROW: f64 = 0.15;
    const SETTLE: f64 = 0.15;
    let s = if local <= 0.0 {
        0.8
    } else if local < GROW {
        0.8 + 0.3 * (local / GROW)
    } else if local < GROW + SETTLE {
        1.1 - 0.1 * ((local - GROW) / SETTLE)
    } else {
        1.0
    };
    s as f32
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/timing.rs"]
mod tests;
