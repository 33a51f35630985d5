use crate::foundation::core::Point;
use crate::foundation::math::orient2d;

/// Convex hull of `points` (monotone chain), counter-clockwise, collinear points dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && orient2d(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && orient2d(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Area enclosed by a simple polygon (shoelace).
pub fn polygon_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    0.5 * twice.abs()
}

/// Inclusive containment test for a counter-clockwise convex polygon.
pub fn convex_contains(polygon: &[Point], p: Point) -> bool {
    const EDGE_EPS: f64 = 1e-9;
    match polygon.len() {
        0 => false,
        1 => polygon[0] == p,
        _ => (0..polygon.len())
            .all(|i| orient2d(polygon[i], polygon[(i + 1) % polygon.len()], p) >= -EDGE_EPS),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hull.rs"]
mod tests;
