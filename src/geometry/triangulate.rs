//! Delaunay triangulation over an ordered landmark set.
//!
//! Triangles are reported as index triples into the input slice, so callers never
//! have to match coordinates back to landmarks.

use std::collections::HashMap;

use crate::foundation::core::{Point, Rect, Triangle};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::foundation::math::{bounding_rect, incircle, is_finite_point, orient2d};

/// Margin added on every side of the landmark bounds.
pub const BOUND_MARGIN: f64 = 10.0;

/// Stand-in index for the vertex at infinity that closes every hull edge.
const GHOST: usize = usize::MAX;

/// Delaunay triangulation of a reference point set.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangulation {
    points: Vec<Point>,
    triangles: Vec<[usize; 3]>,
    bound: Rect,
    duplicates: Vec<(usize, usize)>,
}

impl Triangulation {
    /// Reference points the triangulation was built over.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Counter-clockwise index triples into [`Triangulation::points`].
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Landmark bounds inflated by [`BOUND_MARGIN`].
    pub fn bound(&self) -> Rect {
        self.bound
    }

    /// `(dropped, kept)` index pairs for exactly coincident input points.
    pub fn duplicates(&self) -> &[(usize, usize)] {
        &self.duplicates
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// `true` when no triangle survived.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangle `i` with its coordinates resolved.
    pub fn triangle(&self, i: usize) -> Option<Triangle> {
        let [a, b, c] = *self.triangles.get(i)?;
        Some(Triangle::new(self.points[a], self.points[b], self.points[c]))
    }

    /// All triangles with coordinates resolved, in index order.
    pub fn coordinate_triangles(&self) -> Vec<Triangle> {
        self.triangles
            .iter()
            .map(|&[a, b, c]| Triangle::new(self.points[a], self.points[b], self.points[c]))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    v: [usize; 3],
}

impl Cell {
    fn is_ghost(&self) -> bool {
        self.v.contains(&GHOST)
    }
}

/// Compute the Delaunay triangulation of `points`.
///
/// Hull edges are closed by a symbolic vertex at infinity, so the triangles always
/// tile the convex hull of the input. Fewer than three distinct points, or a
/// collinear point set, yields [`FaceWarpError::InsufficientGeometry`].
pub fn triangulate(points: &[Point]) -> FaceWarpResult<Triangulation> {
    if points.len() < 3 {
        return Err(FaceWarpError::insufficient_geometry(format!(
            "triangulation needs at least 3 points, got {}",
            points.len()
        )));
    }
    if let Some(i) = points.iter().position(|p| !is_finite_point(*p)) {
        return Err(FaceWarpError::validation(format!(
            "landmark {i} has a non-finite coordinate"
        )));
    }

    let bound = bounding_rect(points)
        .ok_or_else(|| FaceWarpError::insufficient_geometry("empty point set"))?
        .inflate(BOUND_MARGIN, BOUND_MARGIN);

    let n = points.len();
    let mut seen = HashMap::<(u64, u64), usize>::with_capacity(n);
    let mut duplicates = Vec::new();
    let mut unique = Vec::with_capacity(n);
    for (i, p) in points.iter().enumerate() {
        // `+ 0.0` folds -0.0 into 0.0.
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if let Some(&kept) = seen.get(&key) {
            duplicates.push((i, kept));
            continue;
        }
        seen.insert(key, i);
        unique.push(i);
    }

    let Some(([a, b, c], rest)) = seed_triangle(points, &unique) else {
        return Err(FaceWarpError::insufficient_geometry(
            "point set is collinear; no triangle can be formed",
        ));
    };
    // One real triangle plus a ghost cell behind each of its edges.
    let mut cells = vec![
        Cell { v: [a, b, c] },
        Cell { v: [b, a, GHOST] },
        Cell { v: [c, b, GHOST] },
        Cell { v: [a, c, GHOST] },
    ];
    for i in rest {
        insert_point(&mut cells, points, i);
    }

    let triangles: Vec<[usize; 3]> = cells
        .iter()
        .filter(|c| !c.is_ghost())
        .map(|c| c.v)
        .collect();

    tracing::debug!(
        points = n,
        triangles = triangles.len(),
        duplicates = duplicates.len(),
        "triangulated landmark set"
    );

    Ok(Triangulation {
        points: points.to_vec(),
        triangles,
        bound,
        duplicates,
    })
}

/// First counter-clockwise triangle in index order and the indices left to insert.
fn seed_triangle(points: &[Point], unique: &[usize]) -> Option<([usize; 3], Vec<usize>)> {
    let (&i0, tail) = unique.split_first()?;
    let (&i1, tail) = tail.split_first()?;
    let pos = tail
        .iter()
        .position(|&k| orient2d(points[i0], points[i1], points[k]) != 0.0)?;
    let k = tail[pos];
    let seed = if orient2d(points[i0], points[i1], points[k]) > 0.0 {
        [i0, i1, k]
    } else {
        [i0, k, i1]
    };
    let rest = tail
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != pos)
        .map(|(_, &i)| i)
        .collect();
    Some((seed, rest))
}

/// `true` when `p` lies strictly inside the circumcircle of `cell`.
///
/// A ghost cell's circle is the open half-plane beyond its hull edge plus the
/// open edge itself.
fn conflicts(cell: &Cell, verts: &[Point], p: Point) -> bool {
    let [a, b, c] = cell.v;
    let (u, v) = if a == GHOST {
        (b, c)
    } else if b == GHOST {
        (c, a)
    } else if c == GHOST {
        (a, b)
    } else {
        return incircle(verts[a], verts[b], verts[c], p) > 0.0;
    };
    let (u, v) = (verts[u], verts[v]);
    let o = orient2d(u, v, p);
    o > 0.0 || (o == 0.0 && (p - u).dot(v - u) > 0.0 && (p - v).dot(u - v) > 0.0)
}

fn insert_point(cells: &mut Vec<Cell>, verts: &[Point], pi: usize) {
    let p = verts[pi];

    let (bad, mut keep): (Vec<Cell>, Vec<Cell>) =
        cells.drain(..).partition(|cell| conflicts(cell, verts, p));

    // Cavity boundary: edges of bad cells that no other bad cell shares.
    let mut edge_count = HashMap::<(usize, usize), usize>::new();
    for cell in &bad {
        for (u, v) in cell_edges(cell) {
            *edge_count.entry(undirected(u, v)).or_insert(0) += 1;
        }
    }

    for cell in &bad {
        for (u, v) in cell_edges(cell) {
            // Directed as in the counter-clockwise bad cell, so `(u, v, p)` keeps the winding.
            if edge_count.get(&undirected(u, v)).copied() == Some(1) {
                keep.push(Cell { v: [u, v, pi] });
            }
        }
    }

    *cells = keep;
}

fn cell_edges(cell: &Cell) -> [(usize, usize); 3] {
    let [a, b, c] = cell.v;
    [(a, b), (b, c), (c, a)]
}

fn undirected(u: usize, v: usize) -> (usize, usize) {
    if u < v { (u, v) } else { (v, u) }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/triangulate.rs"]
mod tests;
