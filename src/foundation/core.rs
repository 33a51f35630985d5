use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::foundation::math::{bounding_rect, orient2d};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Build a size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> FaceWarpResult<Self> {
        if width == 0 || height == 0 {
            return Err(FaceWarpError::validation("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Full-canvas pixel rectangle.
    pub fn rect(self) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// Integer, axis-aligned pixel rectangle (`x..x+width`, `y..y+height`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Build a rectangle from its origin and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest pixel rectangle containing every pixel touched by `r`.
    ///
    /// Matches the usual "bounding rect of float points" convention: the right and
    /// bottom edges are `floor(max) + 1`.
    pub fn covering(r: Rect) -> Self {
        let x0 = r.x0.floor();
        let y0 = r.y0.floor();
        let x1 = r.x1.floor() + 1.0;
        let y1 = r.y1.floor() + 1.0;
        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0.0) as u32,
            height: (y1 - y0).max(0.0) as u32,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// `true` if the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlap of two rectangles, `None` when they do not share a pixel.
    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Top-left corner as a point.
    pub fn origin(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }

    /// Integer centre (`x + width / 2`, `y + height / 2`).
    pub fn center(self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width / 2),
            f64::from(self.y) + f64::from(self.height / 2),
        )
    }
}

/// Three points with a fixed slot order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    /// First corner.
    pub a: Point,
    /// Second corner.
    pub b: Point,
    /// Third corner.
    pub c: Point,
}

impl Triangle {
    /// Build a triangle from its corners.
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    /// Corners in slot order.
    pub fn points(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// Signed area; positive for counter-clockwise corners in a y-up frame.
    pub fn signed_area(&self) -> f64 {
        0.5 * orient2d(self.a, self.b, self.c)
    }

    /// Absolute area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Tight float bounding box.
    pub fn bounds(&self) -> Rect {
        // A triangle always has three points, so the bounding rect exists.
        bounding_rect(&self.points()).unwrap_or(Rect::ZERO)
    }

    /// Same triangle shifted by `-origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        let d = origin.to_vec2();
        Self::new(self.a - d, self.b - d, self.c - d)
    }

    /// Inclusive point-in-triangle test (boundary counts as inside).
    pub fn contains(&self, p: Point) -> bool {
        const EDGE_EPS: f64 = 1e-9;
        let d0 = orient2d(self.a, self.b, p);
        let d1 = orient2d(self.b, self.c, p);
        let d2 = orient2d(self.c, self.a, p);
        let has_neg = d0 < -EDGE_EPS || d1 < -EDGE_EPS || d2 < -EDGE_EPS;
        let has_pos = d0 > EDGE_EPS || d1 > EDGE_EPS || d2 > EDGE_EPS;
        !(has_neg && has_pos)
    }
}

/// One source-to-destination triangle pair sharing a landmark index triple.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Warp {
    /// Landmark indices of the three corners, in slot order.
    pub indices: [usize; 3],
    /// Triangle in the source image.
    pub source: Triangle,
    /// Triangle in the destination layout.
    pub destination: Triangle,
}

/// Resampling filter used when pulling source pixels through an affine map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear blend of the four surrounding pixels.
    #[default]
    Bilinear,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
