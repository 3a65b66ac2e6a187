use super::*;

fn font_bytes() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/fonts/DejaVuSans-Bold.ttf"
    ))
    .unwrap()
}

fn engine_with(style: SubtitleStyle, canvas: Canvas) -> SubtitleLayoutEngine {
    SubtitleLayoutEngine::new(font_bytes(), style, canvas).unwrap()
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn alpha(frame: &FrameRGBA, x: u32, y: u32) -> u8 {
    frame.data[((y * frame.width + x) * 4 + 3) as usize]
}

fn row_inked(frame: &FrameRGBA, y: u32) -> bool {
    (0..frame.width).any(|x| alpha(frame, x, y) > 0)
}

fn inked_rows(frame: &FrameRGBA) -> Vec<u32> {
    (0..frame.height).filter(|&y| row_inked(frame, y)).collect()
}

fn inked_cols(frame: &FrameRGBA) -> Vec<u32> {
    (0..frame.width)
        .filter(|&x| (0..frame.height).any(|y| alpha(frame, x, y) > 0))
        .collect()
}

/// Forces the single-shot shrink on a 1080x1920 canvas.
fn shrinking_style() -> SubtitleStyle {
    SubtitleStyle {
        fit_height_fraction: 0.03,
        ..SubtitleStyle::compact()
    }
}

#[test]
fn invalid_font_bytes_fail_as_layout_error() {
    let err = SubtitleLayoutEngine::new(
        b"not a font".to_vec(),
        SubtitleStyle::default(),
        Canvas::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, ReelError::Layout(_)));
    assert!(!err.is_fatal());
}

#[test]
fn raster_dimensions_are_bounded() {
    assert!(to_u16_dims(10.0, 10.0).is_ok());
    assert!(to_u16_dims(0.0, 10.0).is_err());
    assert!(to_u16_dims(70_000.0, 10.0).is_err());
}

#[test]
fn short_chunk_keeps_base_size() {
    let mut engine = engine_with(SubtitleStyle::compact(), Canvas::default());
    let layer = engine
        .layout_chunk(&words("the quick brown"), 0.0, 1.0, None)
        .unwrap();
    assert_eq!(layer.text, "The Quick Brown");
    assert_eq!(layer.font_size, 80.0);
    assert!(layer.pop);

    let limit = 1920.0 * 0.15;
    let shaped = engine.fit("The Quick Brown").unwrap();
    assert!(shaped.height <= limit);
}

#[test]
fn tall_block_is_shrunk_once_proportionally() {
    let mut engine = engine_with(shrinking_style(), Canvas::default());
    let limit = 1920.0 * 0.03;
    let box_w = engine.box_width();
    let base_height = engine
        .shaper
        .shape("The Quick Brown", 80.0, box_w)
        .unwrap()
        .height;
    assert!(base_height > limit);

    let fitted = engine.fit("The Quick Brown").unwrap();
    assert_eq!(fitted.font_size, (80.0 * (limit / base_height)).floor());
    // Line metrics are pixel-quantized.
    assert!(fitted.height <= limit + 1.0);
}

#[test]
fn stroke_scales_with_fitted_size() {
    let engine = engine_with(SubtitleStyle::compact(), Canvas::default());
    assert_eq!(engine.stroke_width(80.0), 3.0);
    assert_eq!(engine.stroke_width(45.0), 1.0);
    assert_eq!(engine.stroke_width(26.0), 0.0);

    let mut engine = engine_with(shrinking_style(), Canvas::default());
    let layer = engine
        .layout_chunk(&words("the quick brown"), 0.0, 1.0, None)
        .unwrap();
    assert!(layer.font_size < 80.0);
    let pad = raster_pad(engine.stroke_width(layer.font_size));
    assert_eq!(layer.pixels.width as f32, engine.box_width() + 2.0 * pad);
}

#[test]
fn layer_is_centered_at_the_vertical_anchor() {
    let mut engine = engine_with(SubtitleStyle::compact(), Canvas::default());
    let layer = engine
        .layout_chunk(&words("the quick brown"), 0.0, 1.0, None)
        .unwrap();
    let pad = raster_pad(3.0) as i32;
    assert_eq!(layer.x, (1080 - layer.pixels.width as i32) / 2);
    assert_eq!(layer.y, (1920.0f32 * 0.85).floor() as i32 - pad);

    let cols = inked_cols(&layer.pixels);
    let left = *cols.first().unwrap() as i32;
    let right = layer.pixels.width as i32 - 1 - *cols.last().unwrap() as i32;
    assert!((left - right).abs() <= 12, "left {left} right {right}");
}

#[test]
fn inked_rows_cover_the_shaped_block() {
    let mut engine = engine_with(SubtitleStyle::compact(), Canvas::default());
    let layer = engine
        .layout_chunk(&words("the quick brown"), 0.0, 1.0, None)
        .unwrap();
    let shaped = engine.fit("The Quick Brown").unwrap();
    let pad = raster_pad(3.0) as u32;

    let rows = inked_rows(&layer.pixels);
    let first = *rows.first().unwrap();
    let last = *rows.last().unwrap();
    assert!(first > 0, "glyph tops are clipped");
    assert!(rows.len() as f32 >= 0.6 * layer.font_size, "{} rows inked", rows.len());
    assert!(last as f32 >= pad as f32 + 0.6 * shaped.height);
    assert!(last < layer.pixels.height);
}

#[test]
fn shadows_extend_below_the_text() {
    let plain = SubtitleStyle {
        base_stroke_width: 0.0,
        shadow_copies: 0,
        shadow_offset_px: 6.0,
        ..SubtitleStyle::compact()
    };
    let shadowed = SubtitleStyle {
        shadow_copies: 2,
        ..plain.clone()
    };
    let text = words("hello world");

    let a = engine_with(plain, Canvas::default())
        .layout_chunk(&text, 0.0, 1.0, None)
        .unwrap();
    let b = engine_with(shadowed, Canvas::default())
        .layout_chunk(&text, 0.0, 1.0, None)
        .unwrap();
    assert_eq!((a.pixels.width, a.pixels.height), (b.pixels.width, b.pixels.height));

    let plain_last = *inked_rows(&a.pixels).last().unwrap();
    let shadow_last = *inked_rows(&b.pixels).last().unwrap();
    assert!(shadow_last >= plain_last + 4);

    // Rows below the text hold only translucent shadow.
    for y in plain_last + 1..=shadow_last {
        let max = (0..b.pixels.width).map(|x| alpha(&b.pixels, x, y)).max().unwrap();
        assert!(max < 200, "row {y} alpha {max}");
    }
}

#[test]
fn wrapped_lines_occupy_distinct_row_bands() {
    let style = SubtitleStyle {
        fit_height_fraction: 1.0,
        ..SubtitleStyle::compact()
    };
    let canvas = Canvas {
        width: 400,
        height: 1920,
    };
    let mut engine = engine_with(style, canvas);
    let layer = engine
        .layout_chunk(&words("the quick brown"), 0.0, 1.0, None)
        .unwrap();
    let shaped = engine.fit("The Quick Brown").unwrap();
    assert_eq!(layer.font_size, 80.0);
    assert!(shaped.layout.len() >= 2);

    let pad = raster_pad(3.0);
    let baselines: Vec<f32> = shaped.layout.lines().map(|l| l.metrics().baseline).collect();
    assert!(baselines.windows(2).all(|w| w[1] > w[0] + 0.5 * layer.font_size));
    for baseline in baselines {
        let row = (pad + baseline - 0.35 * layer.font_size) as u32;
        assert!(row_inked(&layer.pixels, row), "no ink near baseline {baseline}");
    }

    let rows = inked_rows(&layer.pixels);
    let span = rows.last().unwrap() - rows.first().unwrap();
    assert!(span as f32 >= 0.6 * shaped.height);
}

#[test]
fn layout_chunks_skips_empty_and_keeps_order() {
    let mut engine = engine_with(SubtitleStyle::compact(), Canvas::default());
    let chunks = crate::subtitle::chunk::plan_chunks(&[
        crate::request::Subtitle::new("", 0.0, 0.5, 0),
        crate::request::Subtitle::new("one two three four five", 1.0, 3.0, 1),
    ]);
    let layers = engine.layout_chunks(&chunks);
    let texts: Vec<&str> = layers.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["One Two Three", "Four Five"]);
    assert!(layers[0].timing.end() <= layers[1].timing.start);
}
