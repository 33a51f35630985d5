use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{CanvasSize, PixelRect};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::pipeline::FaceImage;
use crate::raster::canvas::Canvas;

/// Axis-aligned face rectangle in image pixels.
pub type FaceRect = PixelRect;

/// Finds face rectangles in an image.
pub trait FaceDetector: Send + Sync {
    /// Candidate faces, most confident first. An empty list means "no face".
    fn detect(&self, image: &RgbImage) -> FaceWarpResult<Vec<FaceRect>>;
}

/// Fits an ordered landmark set to a detected face.
pub trait LandmarkLocator: Send + Sync {
    /// Landmarks for `face`, in image coordinates.
    fn fit(&self, image: &RgbImage, face: FaceRect) -> FaceWarpResult<LandmarkSet>;
}

/// Landmarks of the first face `detector` reports.
pub fn locate_landmarks(
    image: &RgbImage,
    detector: &dyn FaceDetector,
    locator: &dyn LandmarkLocator,
) -> FaceWarpResult<LandmarkSet> {
    let face = first_face(image, detector)?;
    locator.fit(image, face)
}

fn first_face(image: &RgbImage, detector: &dyn FaceDetector) -> FaceWarpResult<FaceRect> {
    detector.detect(image)?.into_iter().next().ok_or_else(|| {
        FaceWarpError::no_face(format!(
            "detector found no face in {}x{} image",
            image.width(),
            image.height()
        ))
    })
}

/// Face rectangle grown by a quarter of its size on every side, clamped to the image.
pub fn expand_face(face: FaceRect, image_width: u32, image_height: u32) -> Option<PixelRect> {
    let dx = (face.width / 4) as i32;
    let dy = (face.height / 4) as i32;
    let grown = PixelRect::new(
        face.x.saturating_sub(dx),
        face.y.saturating_sub(dy),
        face.width.saturating_add(face.width / 2),
        face.height.saturating_add(face.height / 2),
    );
    grown.intersect(PixelRect::new(0, 0, image_width, image_height))
}

/// Crop around `face` (see [`expand_face`]) and resize the crop to `size`.
pub fn crop_face(image: &RgbImage, face: FaceRect, size: CanvasSize) -> FaceWarpResult<RgbImage> {
    let region = expand_face(face, image.width(), image.height()).ok_or_else(|| {
        FaceWarpError::no_face(format!(
            "face rectangle {face:?} lies outside the {}x{} image",
            image.width(),
            image.height()
        ))
    })?;
    let crop = imageops::crop_imm(
        image,
        region.x as u32,
        region.y as u32,
        region.width,
        region.height,
    )
    .to_image();
    Ok(imageops::resize(
        &crop,
        size.width,
        size.height,
        FilterType::Triangle,
    ))
}

/// Detect, crop to `size`, detect again on the crop, fit landmarks.
pub fn prepare_face(
    image: &RgbImage,
    detector: &dyn FaceDetector,
    locator: &dyn LandmarkLocator,
    size: CanvasSize,
) -> FaceWarpResult<FaceImage> {
    let face = first_face(image, detector)?;
    let cropped = crop_face(image, face, size)?;
    let landmarks = locate_landmarks(&cropped, detector, locator)?;
    Ok(FaceImage {
        image: Canvas::from_rgb8(&cropped),
        landmarks,
    })
}

/// Outcome of preparing a named batch of images.
#[derive(Debug, Default)]
pub struct PreparedBatch {
    /// Successfully prepared faces, in input order, with their names.
    pub faces: Vec<(String, FaceImage)>,
    /// Images that could not be prepared, with the reason.
    pub failures: Vec<(String, FaceWarpError)>,
}

/// Prepare every image; a failing image is recorded and the batch continues.
#[tracing::instrument(skip(images, detector, locator), fields(images = images.len()))]
pub fn prepare_batch(
    images: Vec<(String, RgbImage)>,
    detector: &dyn FaceDetector,
    locator: &dyn LandmarkLocator,
    size: CanvasSize,
) -> PreparedBatch {
    let mut batch = PreparedBatch::default();
    for (name, image) in images {
        match prepare_face(&image, detector, locator, size) {
            Ok(face) => batch.faces.push((name, face)),
            Err(err) => {
                tracing::warn!(image = %name, error = %err, "skipping image");
                batch.failures.push((name, err));
            }
        }
    }
    tracing::debug!(
        prepared = batch.faces.len(),
        failed = batch.failures.len(),
        "batch prepared"
    );
    batch
}

#[cfg(test)]
#[path = "../../tests/unit/face/detect.rs"]
mod tests;
