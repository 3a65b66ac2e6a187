use super::*;

#[test]
fn fps_validates_and_converts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(1.99), 47);
    assert!((fps.frame_to_secs(FrameIndex(12)) - 0.5).abs() < 1e-12);
}

#[test]
fn ceil_frames_does_not_round_up_exact_products() {
    let fps = Fps::default();
    assert_eq!(fps.secs_to_frames_ceil(10.0), 240);
    assert_eq!(fps.secs_to_frames_ceil(10.01), 241);
    assert_eq!(fps.secs_to_frames_ceil(0.1 + 0.2), 8);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
}

#[test]
fn canvas_requires_even_dimensions() {
    assert!(Canvas::default().validate().is_ok());
    assert!(Canvas { width: 101, height: 200 }.validate().is_err());
    assert!(Canvas { width: 0, height: 200 }.validate().is_err());
}

#[test]
fn crop_copies_the_window() {
    let mut f = FrameRGBA::solid(4, 3, [0, 0, 0, 255]);
    let i = (4 + 2) * 4;
    f.data[i] = 200;
    let c = f.crop(2, 1, 2, 2).unwrap();
    assert_eq!((c.width, c.height), (2, 2));
    assert_eq!(c.pixel(0, 0), [200, 0, 0, 255]);
    assert_eq!(c.pixel(1, 1), [0, 0, 0, 255]);
    assert!(f.crop(3, 0, 2, 1).is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 15]).is_err());
}
