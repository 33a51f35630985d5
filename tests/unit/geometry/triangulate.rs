use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::geometry::hull::{convex_contains, convex_hull, polygon_area};

fn pts(v: &[(f64, f64)]) -> Vec<Point> {
    v.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn square_with_center() -> Vec<Point> {
    pts(&[
        (0.0, 0.0),
        (100.0, 0.0),
        (100.0, 100.0),
        (0.0, 100.0),
        (50.0, 50.0),
    ])
}

fn total_area(t: &Triangulation) -> f64 {
    t.coordinate_triangles().iter().map(Triangle::area).sum()
}

fn interior_owner_count(t: &Triangulation, p: Point) -> usize {
    t.coordinate_triangles()
        .iter()
        .filter(|tri| tri.contains(p))
        .count()
}

#[test]
fn square_with_center_yields_four_quadrant_triangles() {
    let t = triangulate(&square_with_center()).unwrap();
    assert_eq!(t.len(), 4);
    for tri in t.triangles() {
        assert!(tri.contains(&4), "every triangle fans out of the center");
    }
    assert!((total_area(&t) - 10_000.0).abs() < 1e-9);

    for probe in [(50.0, 20.0), (80.0, 50.0), (50.0, 80.0), (20.0, 50.0)] {
        assert_eq!(interior_owner_count(&t, Point::new(probe.0, probe.1)), 1);
    }
}

#[test]
fn triangles_are_counter_clockwise_index_triples() {
    let input = square_with_center();
    let t = triangulate(&input).unwrap();
    assert_eq!(t.points(), input.as_slice());
    for i in 0..t.len() {
        let tri = t.triangle(i).unwrap();
        assert!(tri.signed_area() > 0.0);
        for p in tri.points() {
            assert!(input.contains(&p));
        }
    }
}

#[test]
fn bound_is_inflated_by_margin() {
    let t = triangulate(&square_with_center()).unwrap();
    assert_eq!(t.bound(), Rect::new(-10.0, -10.0, 110.0, 110.0));
}

#[test]
fn grid_with_collinear_hull_points_is_fully_covered() {
    let mut input = Vec::new();
    for y in [0.0, 50.0, 100.0] {
        for x in [0.0, 50.0, 100.0] {
            input.push(Point::new(x, y));
        }
    }
    let t = triangulate(&input).unwrap();
    assert_eq!(t.len(), 8);
    assert!((total_area(&t) - 10_000.0).abs() < 1e-9);
}

#[test]
fn triangles_tile_the_convex_hull_without_overlap() {
    let mut input = Vec::new();
    for k in 0..8 {
        let a = f64::from(k) * std::f64::consts::FRAC_PI_4 + 0.1;
        input.push(Point::new(250.0 + 120.0 * a.cos(), 250.0 + 120.0 * a.sin()));
    }
    input.extend(pts(&[
        (250.0, 250.0),
        (210.0, 230.0),
        (300.0, 220.0),
        (260.0, 310.0),
        (190.0, 290.0),
        (320.0, 280.0),
    ]));

    let t = triangulate(&input).unwrap();
    let hull = convex_hull(&input);
    assert!((total_area(&t) - polygon_area(&hull)).abs() < 1e-6);

    let mut probes = 0;
    for i in 0..40 {
        for j in 0..40 {
            let p = Point::new(131.37 + f64::from(i) * 6.11, 129.73 + f64::from(j) * 6.07);
            if !convex_contains(&hull, p) {
                continue;
            }
            probes += 1;
            assert_eq!(interior_owner_count(&t, p), 1, "probe {p:?}");
        }
    }
    assert!(probes > 100);
}

#[test]
fn random_sets_without_anchors_cover_their_hull() {
    for seed in 0..400u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = rng.random_range(3..48);
        let input: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.random_range(0.0..400.0), rng.random_range(0.0..300.0)))
            .collect();

        let t = triangulate(&input).unwrap();
        let hull_area = polygon_area(&convex_hull(&input));
        assert!(
            (total_area(&t) - hull_area).abs() < 1e-6 * hull_area.max(1.0),
            "seed {seed} n {n}: area {} hull {hull_area}",
            total_area(&t)
        );
        for i in 0..t.len() {
            assert!(t.triangle(i).unwrap().signed_area() > 0.0, "seed {seed}");
        }
    }
}

#[test]
fn points_outside_the_seed_triangle_extend_the_hull() {
    // Far points arrive after a tiny seed triangle; hull slivers must survive.
    let input = pts(&[
        (100.0, 100.0),
        (101.0, 100.0),
        (100.0, 101.0),
        (0.0, 0.0),
        (400.0, 3.0),
        (398.0, 290.0),
        (5.0, 300.0),
        (200.0, 1.0),
    ]);
    let t = triangulate(&input).unwrap();
    let hull = convex_hull(&input);
    assert!((total_area(&t) - polygon_area(&hull)).abs() < 1e-6);
}

#[test]
fn too_few_points_is_insufficient_geometry() {
    let err = triangulate(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap_err();
    assert!(matches!(err, FaceWarpError::InsufficientGeometry(_)));
}

#[test]
fn collinear_points_are_insufficient_geometry() {
    let err = triangulate(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (5.0, 5.0)])).unwrap_err();
    assert!(matches!(err, FaceWarpError::InsufficientGeometry(_)));
}

#[test]
fn non_finite_points_are_rejected() {
    let err = triangulate(&pts(&[(0.0, 0.0), (1.0, f64::NAN), (2.0, 0.0)])).unwrap_err();
    assert!(matches!(err, FaceWarpError::Validation(_)));
}

#[test]
fn duplicates_keep_first_index() {
    let mut input = square_with_center();
    input.push(Point::new(100.0, 0.0));
    let t = triangulate(&input).unwrap();
    assert_eq!(t.duplicates(), &[(5, 1)]);
    assert_eq!(t.len(), 4);
    assert!(t.triangles().iter().all(|tri| !tri.contains(&5)));
}

#[test]
fn result_is_deterministic() {
    let input = square_with_center();
    assert_eq!(triangulate(&input).unwrap(), triangulate(&input).unwrap());
}
