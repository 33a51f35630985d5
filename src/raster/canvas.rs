use image::{Rgb, RgbImage};

use crate::foundation::core::{CanvasSize, Interpolation, PixelRect};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};

/// Samples per pixel.
pub const CHANNELS: usize = 3;

/// RGB pixel as three `f32` samples in `0.0..=255.0`.
pub type Rgb32 = [f32; CHANNELS];

/// Row-major RGB pixel buffer with floating-point samples.
///
/// Samples stay unclamped while compositing so weighted sums never saturate;
/// [`Canvas::to_rgb8`] rounds and clamps on the way out.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Canvas {
    /// All-zero canvas.
    pub fn new(size: CanvasSize) -> Self {
        Self::filled(size, [0.0; CHANNELS])
    }

    /// Canvas with every pixel set to `color`.
    pub fn filled(size: CanvasSize, color: Rgb32) -> Self {
        let mut data = Vec::with_capacity(size.pixel_count() * CHANNELS);
        for _ in 0..size.pixel_count() {
            data.extend_from_slice(&color);
        }
        Self {
            width: size.width,
            height: size.height,
            data,
        }
    }

    /// Wrap raw samples; `data.len()` must equal `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> FaceWarpResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| FaceWarpError::validation("canvas buffer size overflow"))?;
        if data.len() != expected {
            return Err(FaceWarpError::size_mismatch(
                "canvas buffer",
                expected,
                data.len(),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert an 8-bit RGB image.
    pub fn from_rgb8(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.as_raw().iter().map(|&v| f32::from(v)).collect(),
        }
    }

    /// Round and clamp back to an 8-bit RGB image.
    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixel(x, y);
            Rgb(px.map(|v| v.round().clamp(0.0, 255.0) as u8))
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions.
    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw samples, row-major, three per pixel.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw samples.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }

    /// Pixel at `(x, y)`; panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb32 {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Overwrite the pixel at `(x, y)`; panics when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgb32) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
    }

    /// Copy of the pixels inside `rect`, which must lie within the canvas.
    pub fn crop(&self, rect: PixelRect) -> FaceWarpResult<Canvas> {
        if rect.x < 0
            || rect.y < 0
            || rect.right() > i64::from(self.width)
            || rect.bottom() > i64::from(self.height)
        {
            return Err(FaceWarpError::validation(format!(
                "crop {rect:?} exceeds {}x{} canvas",
                self.width, self.height
            )));
        }

        let mut data = Vec::with_capacity((rect.width as usize) * (rect.height as usize) * CHANNELS);
        for y in 0..rect.height {
            let start = self.offset(rect.x as u32, rect.y as u32 + y);
            data.extend_from_slice(&self.data[start..start + (rect.width as usize) * CHANNELS]);
        }
        Ok(Canvas {
            width: rect.width,
            height: rect.height,
            data,
        })
    }

    /// Sample at a fractional position; coordinates outside the canvas clamp to the edge.
    pub fn sample(&self, x: f64, y: f64, interp: Interpolation) -> Rgb32 {
        if self.width == 0 || self.height == 0 {
            return [0.0; CHANNELS];
        }
        let max_x = f64::from(self.width.saturating_sub(1));
        let max_y = f64::from(self.height.saturating_sub(1));
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        match interp {
            Interpolation::Nearest => self.pixel(x.round() as u32, y.round() as u32),
            Interpolation::Bilinear => {
                let x0 = x.floor();
                let y0 = y.floor();
                let fx = (x - x0) as f32;
                let fy = (y - y0) as f32;
                let (x0, y0) = (x0 as u32, y0 as u32);
                let x1 = (x0 + 1).min(self.width - 1);
                let y1 = (y0 + 1).min(self.height - 1);

                let p00 = self.pixel(x0, y0);
                let p10 = self.pixel(x1, y0);
                let p01 = self.pixel(x0, y1);
                let p11 = self.pixel(x1, y1);
                let mut out = [0.0f32; CHANNELS];
                for c in 0..CHANNELS {
                    let top = p00[c] + (p10[c] - p00[c]) * fx;
                    let bottom = p01[c] + (p11[c] - p01[c]) * fx;
                    out[c] = top + (bottom - top) * fy;
                }
                out
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
