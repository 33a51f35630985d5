use crate::foundation::core::{CanvasSize, Point, Triangle};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};

/// Ordered landmark points; index `i` names the same location in every set of a run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Point>);

impl LandmarkSet {
    /// Wrap an ordered point list.
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Number of landmarks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the set holds no landmark.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Landmarks in index order.
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Landmark at `index`.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.0.get(index).copied()
    }

    /// First `n` landmarks (the whole set when it is shorter).
    pub fn truncated(&self, n: usize) -> Self {
        Self(self.0.iter().take(n).copied().collect())
    }

    /// Copy of this set with `anchors` appended after the last landmark.
    pub fn with_anchors(&self, anchors: &[Point]) -> Self {
        let mut points = Vec::with_capacity(self.0.len() + anchors.len());
        points.extend_from_slice(&self.0);
        points.extend_from_slice(anchors);
        Self(points)
    }

    /// Triangle built from three landmark indices.
    pub fn triangle(&self, indices: [usize; 3]) -> FaceWarpResult<Triangle> {
        let pick = |i: usize| {
            self.get(i).ok_or_else(|| {
                FaceWarpError::validation(format!(
                    "landmark index {i} out of range for set of {}",
                    self.len()
                ))
            })
        };
        Ok(Triangle::new(
            pick(indices[0])?,
            pick(indices[1])?,
            pick(indices[2])?,
        ))
    }

    /// Fails with [`FaceWarpError::SizeMismatch`] unless `other` has the same length.
    pub fn ensure_same_len(&self, other: &LandmarkSet) -> FaceWarpResult<()> {
        if self.len() != other.len() {
            return Err(FaceWarpError::size_mismatch(
                "landmark set",
                self.len(),
                other.len(),
            ));
        }
        Ok(())
    }
}

impl From<Vec<Point>> for LandmarkSet {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Synthetic anchors pinning the canvas border, inset by one pixel.
///
/// Order: top-left, middle-left, bottom-left, top-right, bottom-middle,
/// middle-right, bottom-right, top-middle.
pub fn boundary_anchors(size: CanvasSize) -> Vec<Point> {
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let (half_w, half_h) = (f64::from(size.width / 2), f64::from(size.height / 2));
    vec![
        Point::new(1.0, 1.0),
        Point::new(1.0, half_h),
        Point::new(1.0, h - 1.0),
        Point::new(w - 1.0, 1.0),
        Point::new(half_w, h - 1.0),
        Point::new(w - 1.0, half_h),
        Point::new(w - 1.0, h - 1.0),
        Point::new(half_w, 1.0),
    ]
}

/// Per-index arithmetic mean of equally sized landmark sets.
pub fn average_landmarks(sets: &[LandmarkSet]) -> FaceWarpResult<LandmarkSet> {
    let Some(first) = sets.first() else {
        return Err(FaceWarpError::validation(
            "cannot average an empty list of landmark sets",
        ));
    };
    for set in &sets[1..] {
        first.ensure_same_len(set)?;
    }

    let n = sets.len() as f64;
    let mut sums = vec![(0.0f64, 0.0f64); first.len()];
    for set in sets {
        for (acc, p) in sums.iter_mut().zip(set.points()) {
            acc.0 += p.x;
            acc.1 += p.y;
        }
    }
    Ok(LandmarkSet(
        sums.into_iter()
            .map(|(x, y)| Point::new(x / n, y / n))
            .collect(),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/face/landmarks.rs"]
mod tests;
