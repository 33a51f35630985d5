use image::{GrayImage, Luma};

use crate::foundation::core::{CanvasSize, Point, Rect};
use crate::foundation::math::bounding_rect;
use crate::geometry::hull::convex_contains;

/// Mask value for pixels inside the polygon.
pub const MASK_ON: u8 = 255;

/// Fill a counter-clockwise convex polygon into a `size` mask (boundary inclusive).
pub fn fill_convex_mask(size: CanvasSize, polygon: &[Point]) -> GrayImage {
    let mut mask = GrayImage::new(size.width, size.height);
    let Some(bounds) = bounding_rect(polygon) else {
        return mask;
    };
    let Some((x0, y0, x1, y1)) = clip_to_size(bounds, size) else {
        return mask;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            if convex_contains(polygon, Point::new(f64::from(x), f64::from(y))) {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
    }
    mask
}

/// Integer pixel range covered by `r`, clipped to the canvas.
fn clip_to_size(r: Rect, size: CanvasSize) -> Option<(u32, u32, u32, u32)> {
    let x0 = r.x0.ceil().max(0.0);
    let y0 = r.y0.ceil().max(0.0);
    let x1 = (r.x1.floor() + 1.0).min(f64::from(size.width));
    let y1 = (r.y1.floor() + 1.0).min(f64::from(size.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
