use image::Rgb;

use super::*;
use crate::foundation::core::Point;

/// Reports the centred half of any image as the face.
struct CenterDetector;

impl FaceDetector for CenterDetector {
    fn detect(&self, image: &RgbImage) -> FaceWarpResult<Vec<FaceRect>> {
        let (w, h) = image.dimensions();
        Ok(vec![PixelRect::new(
            (w / 4) as i32,
            (h / 4) as i32,
            w / 2,
            h / 2,
        )])
    }
}

struct NoDetector;

impl FaceDetector for NoDetector {
    fn detect(&self, _image: &RgbImage) -> FaceWarpResult<Vec<FaceRect>> {
        Ok(Vec::new())
    }
}

/// Three landmarks on the face rectangle corners.
struct CornerLocator;

impl LandmarkLocator for CornerLocator {
    fn fit(&self, _image: &RgbImage, face: FaceRect) -> FaceWarpResult<LandmarkSet> {
        let x0 = f64::from(face.x);
        let y0 = f64::from(face.y);
        let x1 = x0 + f64::from(face.width);
        let y1 = y0 + f64::from(face.height);
        Ok(LandmarkSet::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
        ]))
    }
}

fn gray(w: u32, h: u32, v: u8) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([v, v, v]))
}

#[test]
fn locate_uses_first_face() {
    let img = gray(40, 40, 10);
    let set = locate_landmarks(&img, &CenterDetector, &CornerLocator).unwrap();
    assert_eq!(set.get(0), Some(Point::new(10.0, 10.0)));
    assert_eq!(set.get(2), Some(Point::new(30.0, 30.0)));
}

#[test]
fn empty_detection_is_no_face() {
    let img = gray(40, 40, 10);
    let err = locate_landmarks(&img, &NoDetector, &CornerLocator).unwrap_err();
    assert!(matches!(err, FaceWarpError::NoFace(_)));
}

#[test]
fn expand_face_grows_by_quarter_and_clamps() {
    let grown = expand_face(PixelRect::new(20, 20, 40, 40), 200, 200).unwrap();
    assert_eq!(grown, PixelRect::new(10, 10, 60, 60));

    let clamped = expand_face(PixelRect::new(0, 0, 40, 40), 50, 50).unwrap();
    assert_eq!(clamped, PixelRect::new(0, 0, 50, 50));

    assert!(expand_face(PixelRect::new(300, 300, 10, 10), 50, 50).is_none());
}

#[test]
fn crop_face_resizes_to_target() {
    let img = gray(120, 80, 77);
    let out = crop_face(&img, PixelRect::new(30, 20, 40, 40), CanvasSize::new(25, 30).unwrap())
        .unwrap();
    assert_eq!(out.dimensions(), (25, 30));
    assert_eq!(out.get_pixel(12, 15).0, [77, 77, 77]);
}

#[test]
fn prepare_face_detects_on_the_crop() {
    let img = gray(80, 80, 50);
    let size = CanvasSize::new(64, 64).unwrap();
    let face = prepare_face(&img, &CenterDetector, &CornerLocator, size).unwrap();
    assert_eq!(face.image.size(), size);
    // Second detection runs on the 64x64 crop.
    assert_eq!(face.landmarks.get(0), Some(Point::new(16.0, 16.0)));
}

#[test]
fn prepare_batch_collects_failures() {
    struct OnlyWide;
    impl FaceDetector for OnlyWide {
        fn detect(&self, image: &RgbImage) -> FaceWarpResult<Vec<FaceRect>> {
            if image.width() >= 40 {
                CenterDetector.detect(image)
            } else {
                Ok(Vec::new())
            }
        }
    }

    let images = vec![
        ("a".to_string(), gray(60, 60, 1)),
        ("tiny".to_string(), gray(10, 10, 1)),
        ("b".to_string(), gray(80, 80, 1)),
    ];
    let batch = prepare_batch(
        images,
        &OnlyWide,
        &CornerLocator,
        CanvasSize::new(48, 48).unwrap(),
    );
    let names: Vec<_> = batch.faces.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].0, "tiny");
    assert!(matches!(batch.failures[0].1, FaceWarpError::NoFace(_)));
}
