//! facewarp warps and blends faces with a piecewise-affine mesh built over facial landmarks.
//!
//! # Pipeline overview
//!
//! 1. **Triangulate**: a reference landmark set becomes a Delaunay mesh of index triples.
//! 2. **Correspond**: each mesh triangle is paired with the same-index triangle of another set.
//! 3. **Warp**: pixels of every source triangle are resampled into its destination triangle.
//! 4. **Composite**: warped images are averaged (equal weights) or blended into a
//!    destination under a landmark hull mask.
//!
//! Face detection and landmark fitting are pluggable ([`FaceDetector`], [`LandmarkLocator`]);
//! this crate ships no detector.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: parallel averaging accumulates in input order and matches the
//!   sequential result exactly.
//! - **f32 pixels**: images are converted to [`Canvas`] on entry and back to RGB8 on exit.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod face;
mod foundation;
mod geometry;
mod pipeline;
mod raster;
mod warp;

pub use composite::average::{Accumulator, compose_average};
pub use composite::swap::{MaskBlend, SeamBlender, Smoothing, SwapRegion, compose_swap, swap_region};
pub use face::detect::{
    FaceDetector, FaceRect, LandmarkLocator, PreparedBatch, crop_face, expand_face,
    locate_landmarks, prepare_batch, prepare_face,
};
pub use face::landmarks::{LandmarkSet, average_landmarks, boundary_anchors};
pub use foundation::core::{
    Affine, CanvasSize, Interpolation, PixelRect, Point, Rect, Triangle, Vec2, Warp,
};
pub use foundation::error::{FaceWarpError, FaceWarpResult};
pub use geometry::correspond::{map_warps, map_warps_by_coordinates, resolve_vertex};
pub use geometry::hull::{convex_contains, convex_hull, polygon_area};
pub use geometry::triangulate::{BOUND_MARGIN, Triangulation, triangulate};
pub use pipeline::{
    AverageOutput, AverageSettings, AverageStats, FaceImage, SwapSettings, Threading,
    average_faces, swap_face,
};
pub use raster::blur::gaussian_blur;
pub use raster::canvas::{CHANNELS, Canvas, Rgb32};
pub use raster::mask::{MASK_ON, fill_convex_mask};
pub use warp::affine::{MIN_TRIANGLE_AREA, solve_affine};
pub use warp::triangle::{WarpOutcome, WarpStats, apply_warps, warp_triangle};
