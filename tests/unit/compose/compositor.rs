use std::sync::Arc;

use super::*;
use crate::config::SubtitleStyle;
use crate::foundation::core::{Canvas, Fps};
use crate::render::cancel::CancelToken;
use crate::resize::SoftwareResizer;
use crate::subtitle::timing::resolve_layer_timing;

const CANVAS: Canvas = Canvas {
    width: 18,
    height: 32,
};
const FPS: Fps = Fps { num: 4, den: 1 };

fn white_layer(start: f64, duration: f64, pop: bool) -> TextLayer {
    let mut style = SubtitleStyle::compact();
    style.fade_in_cap = 0.0;
    style.fade_out_cap = 0.0;
    TextLayer {
        text: "Hi".to_string(),
        pixels: FrameRGBA::solid(4, 4, [255, 255, 255, 255]),
        x: 7,
        y: 14,
        font_size: 80.0,
        timing: resolve_layer_timing(start, duration, None, &style),
        pop,
    }
}

fn timeline(layers: Vec<TextLayer>) -> Timeline {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    Timeline::build(
        &[FrameRGBA::solid(18, 32, [0, 0, 80, 255])],
        4.0,
        layers,
        CANVAS,
        FPS,
        Arc::new(SoftwareResizer),
        &pool,
        &CancelToken::new(),
    )
    .unwrap()
}

#[test]
fn layers_only_draw_inside_their_window() {
    let tl = timeline(vec![white_layer(1.0, 1.0, false)]);
    let comp = Compositor::new(&tl);
    let before = comp.frame(FrameIndex(3)).unwrap();
    let during = comp.frame(FrameIndex(5)).unwrap();
    let after = comp.frame(FrameIndex(8)).unwrap();
    assert_eq!(before.pixel(8, 15), [0, 0, 80, 255]);
    assert_eq!(during.pixel(8, 15), [255, 255, 255, 255]);
    assert_eq!(after.pixel(8, 15), [0, 0, 80, 255]);
    assert_eq!(during.pixel(0, 0), [0, 0, 80, 255]);
}

#[test]
fn composition_is_deterministic() {
    let tl = timeline(vec![white_layer(0.0, 3.0, true)]);
    let comp = Compositor::new(&tl);
    for i in 0..comp.frame_count() {
        assert_eq!(comp.frame(FrameIndex(i)).unwrap(), comp.frame(FrameIndex(i)).unwrap());
    }
}

#[test]
fn frame_count_covers_the_narration() {
    let tl = timeline(Vec::new());
    assert_eq!(Compositor::new(&tl).frame_count(), 16);
}

#[test]
fn half_opacity_blends_with_background() {
    let mut dst = FrameRGBA::solid(4, 4, [0, 0, 0, 255]);
    let layer = TextLayer {
        x: 0,
        y: 0,
        ..white_layer(0.0, 1.0, false)
    };
    draw_layer(&mut dst, &layer, 0.5, 1.0);
    let p = dst.pixel(1, 1);
    assert!(p[0] > 120 && p[0] < 135);
    assert_eq!(p[3], 255);
}

#[test]
fn layers_are_clipped_to_the_canvas() {
    let mut dst = FrameRGBA::solid(4, 4, [0, 0, 0, 255]);
    let layer = TextLayer {
        x: 2,
        y: -2,
        ..white_layer(0.0, 1.0, false)
    };
    draw_layer(&mut dst, &layer, 1.0, 1.0);
    assert_eq!(dst.pixel(3, 0), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(3, 1), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(3, 2), [0, 0, 0, 255]);
    assert_eq!(dst.pixel(1, 0), [0, 0, 0, 255]);
}

#[test]
fn pop_scale_shrinks_the_footprint() {
    let mut full = FrameRGBA::solid(16, 16, [0, 0, 0, 255]);
    let mut small = full.clone();
    let layer = TextLayer {
        pixels: FrameRGBA::solid(8, 8, [255, 255, 255, 255]),
        x: 4,
        y: 4,
        ..white_layer(0.0, 1.0, true)
    };
    draw_layer(&mut full, &layer, 1.0, 1.0);
    draw_layer(&mut small, &layer, 1.0, 0.5);
    let lit = |f: &FrameRGBA| f.data.chunks_exact(4).filter(|p| p[0] > 0).count();
    assert_eq!(lit(&full), 64);
    assert!(lit(&small) < lit(&full));
    assert!(lit(&small) > 0);
    // Center stays covered.
    assert_eq!(small.pixel(8, 8)[0], 255);
}
