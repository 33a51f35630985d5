use super::*;

#[test]
fn fills_square_inclusive() {
    let size = CanvasSize::new(8, 8).unwrap();
    let square = [
        Point::new(2.0, 2.0),
        Point::new(5.0, 2.0),
        Point::new(5.0, 5.0),
        Point::new(2.0, 5.0),
    ];
    let mask = fill_convex_mask(size, &square);
    let on = mask.pixels().filter(|p| p.0[0] == MASK_ON).count();
    assert_eq!(on, 16);
    assert_eq!(mask.get_pixel(2, 2).0[0], MASK_ON);
    assert_eq!(mask.get_pixel(5, 5).0[0], MASK_ON);
    assert_eq!(mask.get_pixel(6, 5).0[0], 0);
    assert_eq!(mask.get_pixel(1, 3).0[0], 0);
}

#[test]
fn polygon_partly_off_canvas_is_clipped() {
    let size = CanvasSize::new(4, 4).unwrap();
    let tri = [
        Point::new(-10.0, -10.0),
        Point::new(20.0, -10.0),
        Point::new(-10.0, 20.0),
    ];
    let mask = fill_convex_mask(size, &tri);
    assert_eq!(mask.get_pixel(0, 0).0[0], MASK_ON);
    assert_eq!(mask.get_pixel(3, 3).0[0], MASK_ON);
}

#[test]
fn empty_polygon_gives_empty_mask() {
    let mask = fill_convex_mask(CanvasSize::new(3, 3).unwrap(), &[]);
    assert!(mask.pixels().all(|p| p.0[0] == 0));
}
