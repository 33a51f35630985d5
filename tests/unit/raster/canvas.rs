use super::*;

fn size(w: u32, h: u32) -> CanvasSize {
    CanvasSize::new(w, h).unwrap()
}

fn gradient(w: u32, h: u32) -> Canvas {
    let mut c = Canvas::new(size(w, h));
    for y in 0..h {
        for x in 0..w {
            c.set_pixel(x, y, [(x * 10) as f32, (y * 10) as f32, 7.0]);
        }
    }
    c
}

#[test]
fn rgb8_round_trip_preserves_pixels() {
    let img = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8 * 40, y as u8 * 90, 200]));
    let canvas = Canvas::from_rgb8(&img);
    assert_eq!(canvas.pixel(2, 1), [80.0, 90.0, 200.0]);
    assert_eq!(canvas.to_rgb8(), img);
}

#[test]
fn to_rgb8_rounds_and_clamps() {
    let mut c = Canvas::new(size(2, 1));
    c.set_pixel(0, 0, [-4.0, 127.5, 300.0]);
    c.set_pixel(1, 0, [0.49, 254.6, 255.0]);
    let img = c.to_rgb8();
    assert_eq!(img.get_pixel(0, 0).0, [0, 128, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 255, 255]);
}

#[test]
fn from_raw_checks_length() {
    assert!(Canvas::from_raw(2, 2, vec![0.0; 12]).is_ok());
    assert!(matches!(
        Canvas::from_raw(2, 2, vec![0.0; 11]).unwrap_err(),
        FaceWarpError::SizeMismatch { .. }
    ));
}

#[test]
fn crop_copies_region_and_rejects_overflow() {
    let c = gradient(5, 4);
    let crop = c.crop(PixelRect::new(1, 2, 3, 2)).unwrap();
    assert_eq!(crop.size(), size(3, 2));
    assert_eq!(crop.pixel(0, 0), c.pixel(1, 2));
    assert_eq!(crop.pixel(2, 1), c.pixel(3, 3));
    assert!(c.crop(PixelRect::new(3, 0, 3, 1)).is_err());
    assert!(c.crop(PixelRect::new(-1, 0, 2, 1)).is_err());
}

#[test]
fn sample_exact_on_integer_positions() {
    let c = gradient(4, 4);
    for interp in [Interpolation::Nearest, Interpolation::Bilinear] {
        assert_eq!(c.sample(2.0, 3.0, interp), c.pixel(2, 3));
    }
}

#[test]
fn bilinear_blends_neighbours_and_clamps_outside() {
    let c = gradient(4, 4);
    let px = c.sample(1.5, 2.25, Interpolation::Bilinear);
    assert!((px[0] - 15.0).abs() < 1e-5);
    assert!((px[1] - 22.5).abs() < 1e-5);

    assert_eq!(c.sample(-5.0, 1.0, Interpolation::Bilinear), c.pixel(0, 1));
    assert_eq!(c.sample(9.0, 9.0, Interpolation::Bilinear), c.pixel(3, 3));
    assert_eq!(c.sample(1.4, 1.6, Interpolation::Nearest), c.pixel(1, 2));
}
