//! Piecewise-affine warping, one triangle at a time.

use image::{GrayImage, Luma};

use crate::foundation::core::{CanvasSize, Interpolation, PixelRect, Point, Warp};
use crate::foundation::error::FaceWarpResult;
use crate::raster::canvas::Canvas;
use crate::raster::mask::MASK_ON;
use crate::warp::affine::solve_affine;

/// What a single [`warp_triangle`] call did to the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarpOutcome {
    /// Pixels inside the destination triangle were replaced.
    Written {
        /// Number of destination pixels written.
        pixels: usize,
    },
    /// The source or destination triangle lies entirely outside its image.
    Clipped,
}

/// Per-image warp counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct WarpStats {
    /// Warps that wrote into the canvas.
    pub written: usize,
    /// Warps entirely outside the source or destination.
    pub clipped: usize,
    /// Degenerate triangles that were skipped.
    pub skipped: usize,
}

/// Warp the source triangle of `warp` onto its destination triangle inside `dest`.
///
/// Pixels of `dest` outside the destination triangle keep their previous value.
/// A degenerate source or destination triangle yields
/// [`FaceWarpError::InsufficientGeometry`](crate::FaceWarpError::InsufficientGeometry)
/// and leaves `dest` untouched.
pub fn warp_triangle(
    source: &Canvas,
    warp: &Warp,
    dest: &mut Canvas,
    interp: Interpolation,
) -> FaceWarpResult<WarpOutcome> {
    let src_rect = PixelRect::covering(warp.source.bounds());
    let dst_rect = PixelRect::covering(warp.destination.bounds());

    let src_local = warp.source.relative_to(src_rect.origin());
    let dst_local = warp.destination.relative_to(dst_rect.origin());
    let inverse = solve_affine(&src_local, &dst_local)?.inverse();

    let (Some(r1), Some(r2)) = (
        src_rect.intersect(source.size().rect()),
        dst_rect.intersect(dest.size().rect()),
    ) else {
        return Ok(WarpOutcome::Clipped);
    };

    let cropped = source.crop(r1)?;
    let crop_shift = r1.origin() - src_rect.origin();
    let dst_shift = r2.origin() - dst_rect.origin();

    let patch_size = CanvasSize {
        width: r2.width,
        height: r2.height,
    };
    let mut patch = Canvas::new(patch_size);
    let mut mask = GrayImage::new(r2.width, r2.height);

    for y in 0..r2.height {
        for x in 0..r2.width {
            let local = Point::new(f64::from(x), f64::from(y)) + dst_shift;
            if !dst_local.contains(local) {
                continue;
            }
            let s = inverse * local - crop_shift;
            patch.set_pixel(x, y, cropped.sample(s.x, s.y, interp));
            mask.put_pixel(x, y, Luma([MASK_ON]));
        }
    }

    let pixels = composite_masked(dest, r2, &patch, &mask);
    Ok(WarpOutcome::Written { pixels })
}

/// Clear `dest` under the mask inside `region`, then add the masked patch.
///
/// Returns the number of pixels under the mask.
fn composite_masked(
    dest: &mut Canvas,
    region: PixelRect,
    patch: &Canvas,
    mask: &GrayImage,
) -> usize {
    let mut written = 0;
    for (x, y, m) in mask.enumerate_pixels() {
        if m.0[0] != MASK_ON {
            continue;
        }
        // Zero under the mask plus the patch value: a masked replace.
        dest.set_pixel(region.x as u32 + x, region.y as u32 + y, patch.pixel(x, y));
        written += 1;
    }
    written
}

/// Warp every triangle of `warps` from `source` into a fresh zeroed canvas of `size`.
///
/// Degenerate triangles are logged and skipped; any other error aborts.
pub fn apply_warps(
    source: &Canvas,
    warps: &[Warp],
    size: CanvasSize,
    interp: Interpolation,
) -> FaceWarpResult<(Canvas, WarpStats)> {
    let mut canvas = Canvas::new(size);
    let mut stats = WarpStats::default();

    for warp in warps {
        match warp_triangle(source, warp, &mut canvas, interp) {
            Ok(WarpOutcome::Written { .. }) => stats.written += 1,
            Ok(WarpOutcome::Clipped) => stats.clipped += 1,
            Err(err) if err.is_local_geometry() => {
                tracing::warn!(indices = ?warp.indices, %err, "skipping degenerate triangle");
                stats.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok((canvas, stats))
}

#[cfg(test)]
#[path = "../../tests/unit/warp/triangle.rs"]
mod tests;
