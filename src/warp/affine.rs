//! Three-point affine solve.

use crate::foundation::core::{Affine, Triangle};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};

/// Triangles with less area than this (in square pixels) are treated as degenerate.
pub const MIN_TRIANGLE_AREA: f64 = 1e-3;

/// Affine map sending `(0,0)`, `(1,0)`, `(0,1)` onto the corners of `t`.
fn corner_basis(t: &Triangle) -> Affine {
    Affine::new([
        t.b.x - t.a.x,
        t.b.y - t.a.y,
        t.c.x - t.a.x,
        t.c.y - t.a.y,
        t.a.x,
        t.a.y,
    ])
}

/// The unique affine map taking `src` corner-by-corner onto `dst`.
///
/// Fails with [`FaceWarpError::InsufficientGeometry`] when either triangle is
/// (nearly) collinear.
pub fn solve_affine(src: &Triangle, dst: &Triangle) -> FaceWarpResult<Affine> {
    for (name, t) in [("source", src), ("destination", dst)] {
        let area = t.area();
        if !area.is_finite() || area < MIN_TRIANGLE_AREA {
            return Err(FaceWarpError::insufficient_geometry(format!(
                "{name} triangle is degenerate (area {area:.3e})"
            )));
        }
    }
    Ok(corner_basis(dst) * corner_basis(src).inverse())
}

#[cfg(test)]
#[path = "../../tests/unit/warp/affine.rs"]
mod tests;
