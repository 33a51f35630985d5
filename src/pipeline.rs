use rayon::prelude::*;

use crate::composite::average::Accumulator;
use crate::composite::swap::{SeamBlender, Smoothing, compose_swap};
use crate::face::landmarks::{LandmarkSet, average_landmarks, boundary_anchors};
use crate::foundation::core::{CanvasSize, Interpolation};
use crate::foundation::error::{FaceWarpError, FaceWarpResult};
use crate::geometry::correspond::map_warps;
use crate::geometry::triangulate::triangulate;
use crate::raster::canvas::Canvas;
use crate::warp::triangle::{WarpStats, apply_warps};

/// An image together with the landmarks located on it.
#[derive(Clone, Debug)]
pub struct FaceImage {
    /// Pixels.
    pub image: Canvas,
    /// Landmarks in `image` coordinates.
    pub landmarks: LandmarkSet,
}

/// Worker controls for per-image warping.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Threading {
    /// Warp images on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Settings for [`average_faces`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AverageSettings {
    /// Output size; every input image must already have it.
    pub size: CanvasSize,
    /// Append [`boundary_anchors`] to every landmark set.
    pub boundary_anchors: bool,
    /// Resampling filter.
    pub interpolation: Interpolation,
    /// Per-image parallelism.
    pub threading: Threading,
}

impl Default for AverageSettings {
    fn default() -> Self {
        Self {
            size: CanvasSize::default(),
            boundary_anchors: true,
            interpolation: Interpolation::default(),
            threading: Threading::default(),
        }
    }
}

/// Settings for [`swap_face`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SwapSettings {
    /// Use only the first `n` landmarks of both sets.
    pub landmark_limit: Option<usize>,
    /// Resampling filter.
    pub interpolation: Interpolation,
    /// Blur over the merged image; `None` keeps the hard blend.
    pub smoothing: Option<Smoothing>,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            landmark_limit: Some(60),
            interpolation: Interpolation::default(),
            smoothing: Some(Smoothing::default()),
        }
    }
}

/// Counters for one averaging run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AverageStats {
    /// Images averaged.
    pub images: usize,
    /// Triangles in the shared triangulation.
    pub triangles: usize,
    /// Triangle warps that wrote pixels, over all images.
    pub warps_written: usize,
    /// Degenerate triangles skipped, over all images.
    pub triangles_skipped: usize,
}

/// Result of [`average_faces`].
#[derive(Clone, Debug)]
pub struct AverageOutput {
    /// Blended average face.
    pub image: Canvas,
    /// Average landmark set (anchors included when enabled).
    pub average_landmarks: LandmarkSet,
    /// Run counters.
    pub stats: AverageStats,
}

/// Warp every face onto the average landmark geometry and blend them with equal weights.
#[tracing::instrument(skip(faces, settings), fields(faces = faces.len()))]
pub fn average_faces(
    faces: &[FaceImage],
    settings: &AverageSettings,
) -> FaceWarpResult<AverageOutput> {
    if faces.is_empty() {
        return Err(FaceWarpError::validation("cannot average an empty batch"));
    }
    let size = settings.size;
    for face in faces {
        ensure_size(&face.image, size)?;
    }

    let anchors = if settings.boundary_anchors {
        boundary_anchors(size)
    } else {
        Vec::new()
    };
    let sets: Vec<LandmarkSet> = faces
        .iter()
        .map(|f| f.landmarks.with_anchors(&anchors))
        .collect();
    let average = average_landmarks(&sets)?;
    let triangulation = triangulate(average.points())?;

    let warp_one = |(face, set): (&FaceImage, &LandmarkSet)| -> FaceWarpResult<(Canvas, WarpStats)> {
        let warps = map_warps(&triangulation, set, &average)?;
        apply_warps(&face.image, &warps, size, settings.interpolation)
    };
    let warped: Vec<(Canvas, WarpStats)> = if settings.threading.parallel {
        let pool = build_thread_pool(settings.threading.threads)?;
        pool.install(|| {
            faces
                .par_iter()
                .zip(sets.par_iter())
                .map(&warp_one)
                .collect::<FaceWarpResult<Vec<_>>>()
        })?
    } else {
        faces
            .iter()
            .zip(&sets)
            .map(&warp_one)
            .collect::<FaceWarpResult<Vec<_>>>()?
    };

    // Sequential accumulation keeps the float summation order fixed.
    let weight = 1.0 / faces.len() as f32;
    let mut acc = Accumulator::new(size);
    let mut stats = AverageStats {
        images: faces.len(),
        triangles: triangulation.len(),
        ..AverageStats::default()
    };
    for (canvas, warp_stats) in &warped {
        acc.add(canvas, weight)?;
        stats.warps_written += warp_stats.written;
        stats.triangles_skipped += warp_stats.skipped;
    }

    tracing::debug!(?stats, "average complete");
    Ok(AverageOutput {
        image: acc.finish(),
        average_landmarks: average,
        stats,
    })
}

/// Warp `source`'s face onto `destination`'s landmark geometry and blend it in.
#[tracing::instrument(skip(source, destination, settings, blender))]
pub fn swap_face(
    source: &FaceImage,
    destination: &FaceImage,
    settings: &SwapSettings,
    blender: &dyn SeamBlender,
) -> FaceWarpResult<Canvas> {
    let (src, dst) = match settings.landmark_limit {
        Some(n) => (
            source.landmarks.truncated(n),
            destination.landmarks.truncated(n),
        ),
        None => (source.landmarks.clone(), destination.landmarks.clone()),
    };
    dst.ensure_same_len(&src)?;

    let triangulation = triangulate(dst.points())?;
    let warps = map_warps(&triangulation, &src, &dst)?;
    let (warped, stats) = apply_warps(
        &source.image,
        &warps,
        destination.image.size(),
        settings.interpolation,
    )?;
    tracing::debug!(
        landmarks = dst.len(),
        triangles = triangulation.len(),
        written = stats.written,
        skipped = stats.skipped,
        "source warped"
    );

    let merged = compose_swap(&warped, &destination.image, &dst, blender)?;
    match settings.smoothing {
        Some(smoothing) => smoothing.apply(&merged),
        None => Ok(merged),
    }
}

fn ensure_size(image: &Canvas, size: CanvasSize) -> FaceWarpResult<()> {
    if image.width() != size.width {
        return Err(FaceWarpError::size_mismatch(
            "face image width",
            size.width as usize,
            image.width() as usize,
        ));
    }
    if image.height() != size.height {
        return Err(FaceWarpError::size_mismatch(
            "face image height",
            size.height as usize,
            image.height() as usize,
        ));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> FaceWarpResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FaceWarpError::validation(
            "threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
