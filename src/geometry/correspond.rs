use crate::face::landmarks::LandmarkSet;
use crate::foundation::core::{Point, Triangle, Warp};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::geometry::triangulate::Triangulation;

/// Two candidates closer together than this (in distance) are considered tied.
const TIE_EPS: f64 = 1e-9;

/// Pair every triangle of `triangulation` with the source triangle on the same indices.
///
/// `triangulation` must have been computed over `destination`; its index triples are
/// used directly, so no coordinate matching takes place.
pub fn map_warps(
    triangulation: &Triangulation,
    source: &LandmarkSet,
    destination: &LandmarkSet,
) -> FaceWarpResult<Vec<Warp>> {
    destination.ensure_same_len(source)?;
    if triangulation.points().len() != destination.len() {
        return Err(FaceWarpError::size_mismatch(
            "triangulation reference set",
            destination.len(),
            triangulation.points().len(),
        ));
    }
    if triangulation.points() != destination.points() {
        return Err(FaceWarpError::validation(
            "triangulation was computed over a different destination landmark set",
        ));
    }

    triangulation
        .triangles()
        .iter()
        .map(|&indices| {
            Ok(Warp {
                indices,
                source: source.triangle(indices)?,
                destination: destination.triangle(indices)?,
            })
        })
        .collect()
}

/// Coordinate-matching variant for triangles that only carry coordinates.
///
/// Each destination vertex resolves through [`resolve_vertex`]; the destination
/// triangle is emitted exactly as given.
pub fn map_warps_by_coordinates(
    triangles: &[Triangle],
    source: &LandmarkSet,
    destination: &LandmarkSet,
    epsilon: f64,
) -> FaceWarpResult<Vec<Warp>> {
    destination.ensure_same_len(source)?;

    let mut warps = Vec::with_capacity(triangles.len());
    for t in triangles {
        let indices = [
            resolve_vertex(destination.points(), t.a, epsilon)?,
            resolve_vertex(destination.points(), t.b, epsilon)?,
            resolve_vertex(destination.points(), t.c, epsilon)?,
        ];
        warps.push(Warp {
            indices,
            source: source.triangle(indices)?,
            destination: *t,
        });
    }
    Ok(warps)
}

/// Index of the landmark nearest to `vertex` within `epsilon`.
///
/// Fails with [`FaceWarpError::CorrespondenceAmbiguous`] when no landmark lies within
/// `epsilon` or when the two nearest are equally close, and with
/// [`FaceWarpError::Validation`] when `epsilon` is negative or not finite.
pub fn resolve_vertex(points: &[Point], vertex: Point, epsilon: f64) -> FaceWarpResult<usize> {
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(FaceWarpError::validation(format!(
            "match epsilon must be finite and >= 0, got {epsilon}"
        )));
    }
    let mut best: Option<(usize, f64)> = None;
    let mut tied = 1usize;

    for (i, p) in points.iter().enumerate() {
        let d = p.distance(vertex);
        if d > epsilon {
            continue;
        }
        match best {
            None => best = Some((i, d)),
            Some((_, bd)) if (d - bd).abs() <= TIE_EPS => tied += 1,
            Some((_, bd)) if d < bd => {
                best = Some((i, d));
                tied = 1;
            }
            Some(_) => {}
        }
    }

    match best {
        Some((i, _)) if tied == 1 => Ok(i),
        Some(_) => Err(FaceWarpError::CorrespondenceAmbiguous {
            x: vertex.x,
            y: vertex.y,
            candidates: tied,
        }),
        None => Err(FaceWarpError::CorrespondenceAmbiguous {
            x: vertex.x,
            y: vertex.y,
            candidates: 0,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/correspond.rs"]
mod tests;
