use crate::config::SubtitleStyle;
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::subtitle::chunk::{Chunk, capitalize_words};
use crate::subtitle::shaping::{ShapedText, TextShaper};
use crate::subtitle::timing::{LayerTiming, pop_scale, resolve_layer_timing};

/// A rasterized subtitle chunk placed on the timeline.
#[derive(Clone, Debug)]
pub struct TextLayer {
    /// Displayed text after capitalization.
    pub text: String,
    /// Premultiplied pixels including outline and shadow.
    pub pixels: FrameRGBA,
    /// Left edge on the canvas (may be negative).
    pub x: i32,
    /// Top edge on the canvas (may be negative).
    pub y: i32,
    /// Font size after auto-fit.
    pub font_size: f32,
    /// On-screen window and fades.
    pub timing: LayerTiming,
    /// Whether the pop-in scale animation applies.
    pub pop: bool,
}

impl TextLayer {
    /// Whether the layer contributes to the frame at absolute time `t`.
    pub fn is_active(&self, t: f64) -> bool {
        self.timing.contains(t)
    }

    /// Fade opacity at absolute time `t`.
    pub fn opacity_at(&self, t: f64) -> f32 {
        self.timing.opacity_at(t)
    }

    /// Scale factor at absolute time `t`, 1.0 without pop.
    pub fn scale_at(&self, t: f64) -> f32 {
        if self.pop {
            pop_scale(t - self.timing.start)
        } else {
            1.0
        }
    }
}

/// Shapes, fits and rasterizes subtitle chunks for one canvas and style.
pub struct SubtitleLayoutEngine {
    shaper: TextShaper,
    style: SubtitleStyle,
    canvas: Canvas,
}

impl SubtitleLayoutEngine {
    /// Register the subtitle font. Fails with a layout error when the bytes hold no usable font.
    pub fn new(font_bytes: Vec<u8>, style: SubtitleStyle, canvas: Canvas) -> ReelResult<Self> {
        Ok(Self {
            shaper: TextShaper::new(font_bytes)?,
            style,
            canvas,
        })
    }

    fn box_width(&self) -> f32 {
        (self.canvas.width as f32 * self.style.max_width_fraction).floor().max(1.0)
    }

    /// Shape at the base size and, if the block is taller than the fit limit, re-shape once at
    /// the proportionally reduced size.
    fn fit(&mut self, text: &str) -> ReelResult<ShapedText> {
        let box_w = self.box_width();
        let base = self.style.base_font_size;
        let shaped = self.shaper.shape(text, base, box_w)?;
        let limit = self.canvas.height as f32 * self.style.fit_height_fraction;
        if shaped.height <= limit {
            return Ok(shaped);
        }
        let size = (base * (limit / shaped.height)).floor().max(1.0);
        tracing::debug!(text, base, size, height = shaped.height, limit, "shrinking subtitle");
        self.shaper.shape(text, size, box_w)
    }

    /// Outline width at `font_size`, scaled down from the base width and floored.
    fn stroke_width(&self, font_size: f32) -> f32 {
        ((font_size / self.style.base_font_size) * self.style.base_stroke_width)
            .floor()
            .max(0.0)
    }

    /// Lay out one chunk: capitalize, fit, rasterize, and resolve timing against `next_start`.
    pub fn layout_chunk(
        &mut self,
        words: &[String],
        start: f64,
        duration: f64,
        next_start: Option<f64>,
    ) -> ReelResult<TextLayer> {
        let text = capitalize_words(&words.join(" "));
        if text.is_empty() {
            return Err(ReelError::layout("chunk has no words"));
        }
        let shaped = self.fit(&text)?;
        let stroke = self.stroke_width(shaped.font_size);
        let box_w = self.box_width();
        let pixels = self.rasterize(&shaped, box_w, stroke)?;

        let pad = raster_pad(stroke) as i32;
        let x = (self.canvas.width as i32 - pixels.width as i32) / 2;
        let y = (self.canvas.height as f32 * self.style.vertical_anchor).floor() as i32 - pad;

        Ok(TextLayer {
            text,
            pixels,
            x,
            y,
            font_size: shaped.font_size,
            timing: resolve_layer_timing(start, duration, next_start, &self.style),
            pop: self.style.pop,
        })
    }

    /// Lay out every chunk, dropping empty chunks and logging the ones that fail.
    pub fn layout_chunks(&mut self, chunks: &[Chunk]) -> Vec<TextLayer> {
        let mut out = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if chunk.words.is_empty() {
                tracing::debug!(owner = chunk.owner_index, "skipping empty subtitle chunk");
                continue;
            }
            match self.layout_chunk(&chunk.words, chunk.start, chunk.duration, chunk.next_start) {
                Ok(layer) if layer.timing.duration > 0.0 => out.push(layer),
                Ok(_) => {
                    tracing::warn!(owner = chunk.owner_index, start = chunk.start, "dropping zero-length subtitle chunk");
                }
                Err(err) => {
                    tracing::warn!(
                        owner = chunk.owner_index,
                        text = %chunk.text(),
                        error = %err,
                        "dropping subtitle chunk"
                    );
                }
            }
        }
        out
    }

    fn rasterize(&self, shaped: &ShapedText, box_w: f32, stroke: f32) -> ReelResult<FrameRGBA> {
        let pad = raster_pad(stroke);
        let shadow_dy = self.style.shadow_offset_px.max(0.0);
        let w = (box_w + 2.0 * pad).ceil();
        let h = (shaped.height + 2.0 * pad + shadow_dy).ceil();
        let (w16, h16) = to_u16_dims(w, h)?;

        let advances = shaped.line_advances();
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        let stroke_color = self.style.stroke_rgba;
        let fill_color = self.style.fill_rgba;

        for _ in 0..self.style.shadow_copies {
            ctx.push_opacity_layer(self.style.shadow_opacity);
            self.draw_glyphs(&mut ctx, shaped, &advances, box_w, (pad, pad + shadow_dy), stroke_color);
            ctx.pop_layer();
        }

        if stroke > 0.0 {
            let r = stroke as i32;
            for dy in -r..=r {
                for dx in -r..=r {
                    if (dx, dy) == (0, 0) || dx * dx + dy * dy > r * r {
                        continue;
                    }
                    let origin = (pad + dx as f32, pad + dy as f32);
                    self.draw_glyphs(&mut ctx, shaped, &advances, box_w, origin, stroke_color);
                }
            }
        }
        self.draw_glyphs(&mut ctx, shaped, &advances, box_w, (pad, pad), fill_color);

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA::from_premul(u32::from(w16), u32::from(h16), pixmap.data_as_u8_slice().to_vec())
            .map_err(|e| ReelError::layout(format!("subtitle raster: {e}")))
    }

    /// Draw every glyph run with lines centered inside `box_w`, offset by `origin`.
    ///
    /// Glyph positions carry the run offset and line baseline, so `origin` is the top-left of the
    /// text block.
    fn draw_glyphs(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        shaped: &ShapedText,
        advances: &[f32],
        box_w: f32,
        origin: (f32, f32),
        rgba: [u8; 4],
    ) {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        for (line, advance) in shaped.layout.lines().zip(advances) {
            let dx = ((box_w - advance) / 2.0).max(0.0);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(origin.0 + dx),
                f64::from(origin.1),
            )));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(self.shaper.font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

/// Transparent margin around the text block, wide enough for the outline.
fn raster_pad(stroke: f32) -> f32 {
    stroke.ceil() + 2.0
}

fn to_u16_dims(w: f32, h: f32) -> ReelResult<(u16, u16)> {
    let conv = |v: f32| -> ReelResult<u16> {
        if !v.is_finite() || v < 1.0 || v > f32::from(u16::MAX) {
            return Err(ReelError::layout(format!("subtitle raster size {v} out of range")));
        }
        Ok(v as u16)
    };
    Ok((conv(w)?, conv(h)?))
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/layout.rs"]
mod tests;
