use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let frame = decode_image(&buf).unwrap();
    assert_eq!((frame.width, frame.height), (1, 1));
    assert!(frame.premultiplied);
    assert_eq!(
        frame.data,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn unpremultiply_inverts_partial_alpha() {
    let premul = vec![10u8, 20, 30, 255, 0, 0, 0, 0, 64, 32, 0, 128];
    let straight = unpremultiply_rgba8(&premul);
    assert_eq!(&straight[..8], &premul[..8]);
    assert_eq!(straight[11], 128);
    assert!((i32::from(straight[8]) - 128).abs() <= 1);
    assert!((i32::from(straight[9]) - 64).abs() <= 1);
}
