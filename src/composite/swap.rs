use image::GrayImage;

use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::foundation::math::bounding_rect;
use crate::geometry::hull::convex_hull;
use crate::raster::blur::gaussian_blur;
use crate::raster::canvas::Canvas;
use crate::raster::mask::{MASK_ON, fill_convex_mask};

/// Merges a warped face into a destination image under a mask.
///
/// Implementations may use `center` as the anchor of a gradient-domain clone.
pub trait SeamBlender: Send + Sync {
    /// Produce the merged image; all images share one size.
    fn blend(
        &self,
        warped: &Canvas,
        destination: &Canvas,
        mask: &GrayImage,
        center: Point,
    ) -> FaceWarpResult<Canvas>;
}

/// Hard masked copy: warped pixels under the mask, destination elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskBlend;

impl SeamBlender for MaskBlend {
    fn blend(
        &self,
        warped: &Canvas,
        destination: &Canvas,
        mask: &GrayImage,
        _center: Point,
    ) -> FaceWarpResult<Canvas> {
        let mut out = destination.clone();
        for (x, y, m) in mask.enumerate_pixels() {
            if m.0[0] == MASK_ON {
                out.set_pixel(x, y, warped.pixel(x, y));
            }
        }
        Ok(out)
    }
}

/// Optional Gaussian pass over the merged image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Smoothing {
    /// Kernel radius in pixels.
    pub radius: u32,
    /// Gaussian sigma in pixels.
    pub sigma: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            radius: 2,
            sigma: 1.0,
        }
    }
}

impl Smoothing {
    /// Smooth `image`.
    pub fn apply(&self, image: &Canvas) -> FaceWarpResult<Canvas> {
        gaussian_blur(image, self.radius, self.sigma)
    }
}

/// Hull polygon, filled mask and clone anchor derived from destination landmarks.
#[derive(Clone, Debug)]
pub struct SwapRegion {
    /// Counter-clockwise convex hull of the landmarks.
    pub hull: Vec<Point>,
    /// Filled hull.
    pub mask: GrayImage,
    /// Centre of the hull's pixel bounding box.
    pub center: Point,
}

/// Build the swap region for `landmarks` on a canvas shaped like `destination`.
pub fn swap_region(destination: &Canvas, landmarks: &LandmarkSet) -> FaceWarpResult<SwapRegion> {
    let hull = convex_hull(landmarks.points());
    if hull.len() < 3 {
        return Err(FaceWarpError::insufficient_geometry(
            "destination landmarks do not enclose an area",
        ));
    }
    let bounds = bounding_rect(&hull)
        .ok_or_else(|| FaceWarpError::insufficient_geometry("empty landmark hull"))?;
    Ok(SwapRegion {
        mask: fill_convex_mask(destination.size(), &hull),
        center: PixelRect::covering(bounds).center(),
        hull,
    })
}

/// Blend `warped` into `destination` inside the hull of `destination_landmarks`.
pub fn compose_swap(
    warped: &Canvas,
    destination: &Canvas,
    destination_landmarks: &LandmarkSet,
    blender: &dyn SeamBlender,
) -> FaceWarpResult<Canvas> {
    if warped.size() != destination.size() {
        return Err(FaceWarpError::size_mismatch(
            "swap image pixels",
            destination.size().pixel_count(),
            warped.size().pixel_count(),
        ));
    }
    let region = swap_region(destination, destination_landmarks)?;
    blender.blend(warped, destination, &region.mask, region.center)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/swap.rs"]
mod tests;
