use crate::foundation::core::CanvasSize;
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::raster::canvas::Canvas;

/// Running weighted sum of equally sized canvases.
#[derive(Clone, Debug)]
pub struct Accumulator {
    canvas: Canvas,
    weight_sum: f64,
    count: usize,
}

impl Accumulator {
    /// Zeroed accumulator of `size`.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            canvas: Canvas::new(size),
            weight_sum: 0.0,
            count: 0,
        }
    }

    /// `accumulator += image * weight`.
    pub fn add(&mut self, image: &Canvas, weight: f32) -> FaceWarpResult<()> {
        if !weight.is_finite() {
            return Err(FaceWarpError::validation("accumulator weight must be finite"));
        }
        if image.size() != self.canvas.size() {
            return Err(FaceWarpError::size_mismatch(
                "accumulated image pixels",
                self.canvas.size().pixel_count(),
                image.size().pixel_count(),
            ));
        }
        for (acc, v) in self.canvas.data_mut().iter_mut().zip(image.data()) {
            *acc += v * weight;
        }
        self.weight_sum += f64::from(weight);
        self.count += 1;
        Ok(())
    }

    /// Sum of all weights added so far.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Number of images added so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Accumulated canvas.
    pub fn finish(self) -> Canvas {
        self.canvas
    }
}

/// Per-pixel mean of `warped`, each weighted `1/N`.
pub fn compose_average(warped: &[Canvas]) -> FaceWarpResult<Canvas> {
    let Some(first) = warped.first() else {
        return Err(FaceWarpError::validation("cannot average zero images"));
    };
    let weight = 1.0 / warped.len() as f32;
    let mut acc = Accumulator::new(first.size());
    for image in warped {
        acc.add(image, weight)?;
    }
    Ok(acc.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/average.rs"]
mod tests;
