use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::raster::canvas::{CHANNELS, Canvas};

/// Separable Gaussian smoothing with clamp-to-edge borders.
pub fn gaussian_blur(src: &Canvas, radius: u32, sigma: f32) -> FaceWarpResult<Canvas> {
    if radius == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel(radius, sigma)?;
    let (w, h) = (src.width(), src.height());
    let mut tmp = vec![0.0f32; src.data().len()];
    let mut out = vec![0.0f32; src.data().len()];

    horizontal_pass(src.data(), &mut tmp, w, h, &kernel);
    vertical_pass(&tmp, &mut out, w, h, &kernel);
    Canvas::from_raw(w, h, out)
}

fn gaussian_kernel(radius: u32, sigma: f32) -> FaceWarpResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FaceWarpError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(FaceWarpError::validation("gaussian kernel sum is zero"));
    }
    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

fn horizontal_pass(src: &[f32], dst: &mut [f32], width: u32, height: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..i64::from(height) {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i64 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += kw * src[idx + c];
                }
            }
            let out_idx = ((y * w + x) as usize) * CHANNELS;
            dst[out_idx..out_idx + CHANNELS].copy_from_slice(&acc);
        }
    }
}

fn vertical_pass(src: &[f32], dst: &mut [f32], width: u32, height: u32, k: &[f32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; CHANNELS];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i64 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += kw * src[idx + c];
                }
            }
            let out_idx = ((y * w + x) as usize) * CHANNELS;
            dst[out_idx..out_idx + CHANNELS].copy_from_slice(&acc);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blur.rs"]
mod tests;
