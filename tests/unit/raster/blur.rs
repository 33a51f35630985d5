use super::*;
use crate::foundation::core::CanvasSize;

#[test]
fn blur_radius_0_is_identity() {
    let src = Canvas::from_raw(1, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let out = gaussian_blur(&src, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let src = Canvas::filled(CanvasSize::new(4, 3).unwrap(), [10.0, 20.0, 30.0]);
    let out = gaussian_blur(&src, 3, 2.0).unwrap();
    for (a, b) in out.data().iter().zip(src.data()) {
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut src = Canvas::new(CanvasSize::new(5, 5).unwrap());
    src.set_pixel(2, 2, [255.0, 255.0, 255.0]);

    let out = gaussian_blur(&src, 2, 1.2).unwrap();

    let nonzero = out.data().chunks_exact(3).filter(|px| px[0] > 0.0).count();
    assert!(nonzero > 1);

    let sum: f32 = out.data().chunks_exact(3).map(|px| px[0]).sum();
    assert!((sum - 255.0).abs() < 0.5);
}

#[test]
fn blur_rejects_bad_sigma() {
    let src = Canvas::new(CanvasSize::new(2, 2).unwrap());
    assert!(gaussian_blur(&src, 1, 0.0).is_err());
    assert!(gaussian_blur(&src, 1, f32::NAN).is_err());
}
