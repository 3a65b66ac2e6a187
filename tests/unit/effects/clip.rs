use super::*;
use crate::resize::SoftwareResizer;

const CANVAS: Canvas = Canvas {
    width: 18,
    height: 32,
};
const FPS: Fps = Fps { num: 4, den: 1 };

/// Left half red, right half blue, matching the canvas aspect.
fn split_image() -> FrameRGBA {
    let (w, h) = (CANVAS.width, CANVAS.height);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..h {
        for x in 0..w {
            if x < w / 2 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    FrameRGBA::from_premul(w, h, data).unwrap()
}

struct Broken;

impl Resizer for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn resize(&self, _src: &FrameRGBA, _w: u32, _h: u32) -> ReelResult<FrameRGBA> {
        Err(ReelError::render("no device"))
    }
}

#[test]
fn every_effect_yields_canvas_sized_frames() {
    let img = split_image();
    for effect in [
        EffectKind::ZoomIn,
        EffectKind::ZoomOut,
        EffectKind::PanLeft,
        EffectKind::PanRight,
        EffectKind::None,
    ] {
        let clip = build_effect_clip(0, &img, effect, 2.0, CANVAS, FPS, &SoftwareResizer).unwrap();
        assert_eq!(clip.frame_slots(), 8);
        for t in [0.0, 0.7, 1.99, 2.0, 5.0] {
            let f = clip.frame_at(t, &SoftwareResizer).unwrap();
            assert_eq!((f.width, f.height), (CANVAS.width, CANVAS.height), "{effect}");
        }
    }
}

#[test]
fn zoom_in_first_frame_is_the_source() {
    let img = split_image();
    let clip = build_effect_clip(0, &img, EffectKind::ZoomIn, 2.0, CANVAS, FPS, &SoftwareResizer)
        .unwrap();
    assert_eq!(clip.frame_at(0.0, &SoftwareResizer).unwrap(), img);
    assert_ne!(clip.frame_at(2.0, &SoftwareResizer).unwrap(), img);
}

#[test]
fn pan_right_ends_on_the_right_side() {
    let img = split_image();
    let clip = build_effect_clip(0, &img, EffectKind::PanRight, 2.0, CANVAS, FPS, &SoftwareResizer)
        .unwrap();
    let first = clip.frame_at(0.0, &SoftwareResizer).unwrap();
    let last = clip.frame_at(2.0, &SoftwareResizer).unwrap();
    // The window slides right, so the red share of the frame shrinks.
    let red = |f: &FrameRGBA| f.data.chunks_exact(4).filter(|p| p[0] > 128).count();
    assert!(red(&last) < red(&first));
}

#[test]
fn frames_are_deterministic() {
    let img = split_image();
    let clip = build_effect_clip(3, &img, EffectKind::ZoomOut, 2.0, CANVAS, FPS, &SoftwareResizer)
        .unwrap();
    assert_eq!(
        clip.frame_at(1.1, &SoftwareResizer).unwrap(),
        clip.frame_at(1.1, &SoftwareResizer).unwrap()
    );
}

#[test]
fn resize_failure_names_the_clip() {
    let img = FrameRGBA::solid(4, 4, [0, 0, 0, 255]);
    match build_effect_clip(7, &img, EffectKind::PanLeft, 1.0, CANVAS, FPS, &Broken) {
        Err(ReelError::Render { clip, .. }) => assert_eq!(clip, Some(7)),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn non_positive_duration_is_rejected() {
    let img = split_image();
    assert!(build_effect_clip(0, &img, EffectKind::None, 0.0, CANVAS, FPS, &SoftwareResizer).is_err());
}
