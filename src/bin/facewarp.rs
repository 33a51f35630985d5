use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use facewarp::{
    AverageSettings, Canvas, CanvasSize, FaceImage, LandmarkSet, MaskBlend, Point, Smoothing,
    SwapSettings,
};
use image::{RgbImage, imageops};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "facewarp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blend a batch of faces into their average.
    Average(AverageArgs),
    /// Move the face of one image onto another.
    Swap(SwapArgs),
}

#[derive(Parser, Debug)]
struct AverageArgs {
    /// Manifest JSON listing images and their landmarks.
    #[arg(long)]
    manifest: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional settings JSON (`AverageSettings`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Warp images in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Do not pin the canvas border with boundary anchors.
    #[arg(long)]
    no_anchors: bool,
}

#[derive(Parser, Debug)]
struct SwapArgs {
    /// Image providing the face.
    #[arg(long)]
    source: PathBuf,

    /// Landmarks JSON for `--source`.
    #[arg(long)]
    source_landmarks: PathBuf,

    /// Image receiving the face.
    #[arg(long)]
    dest: PathBuf,

    /// Landmarks JSON for `--dest`.
    #[arg(long)]
    dest_landmarks: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional settings JSON (`SwapSettings`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use only the first N landmarks of both sets.
    #[arg(long)]
    limit: Option<usize>,

    /// Gaussian smoothing radius for the result (0 disables smoothing).
    #[arg(long)]
    smooth_radius: Option<u32>,
}

#[derive(serde::Deserialize, Debug)]
struct Manifest {
    faces: Vec<ManifestFace>,
}

#[derive(serde::Deserialize, Debug)]
struct ManifestFace {
    image: PathBuf,
    landmarks: LandmarkSet,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Average(args) => cmd_average(args),
        Command::Swap(args) => cmd_swap(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn read_rgb(path: &Path) -> anyhow::Result<RgbImage> {
    Ok(image::open(path)
        .with_context(|| format!("read image '{}'", path.display()))?
        .to_rgb8())
}

/// Resize `image` to `size`, scaling its landmarks along.
fn fit_to_canvas(image: RgbImage, landmarks: LandmarkSet, size: CanvasSize) -> FaceImage {
    if image.dimensions() == (size.width, size.height) {
        return FaceImage {
            image: Canvas::from_rgb8(&image),
            landmarks,
        };
    }
    let sx = f64::from(size.width) / f64::from(image.width());
    let sy = f64::from(size.height) / f64::from(image.height());
    let resized = imageops::resize(
        &image,
        size.width,
        size.height,
        imageops::FilterType::Triangle,
    );
    let scaled = landmarks
        .points()
        .iter()
        .map(|p| Point::new(p.x * sx, p.y * sy))
        .collect::<Vec<_>>();
    FaceImage {
        image: Canvas::from_rgb8(&resized),
        landmarks: LandmarkSet::new(scaled),
    }
}

fn write_png(canvas: &Canvas, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    canvas
        .to_rgb8()
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_average(args: AverageArgs) -> anyhow::Result<()> {
    let mut settings: AverageSettings = match &args.config {
        Some(path) => read_json(path, "average settings")?,
        None => AverageSettings::default(),
    };
    if args.parallel {
        settings.threading.parallel = true;
    }
    if args.threads.is_some() {
        settings.threading.threads = args.threads;
    }
    if args.no_anchors {
        settings.boundary_anchors = false;
    }

    let manifest: Manifest = read_json(&args.manifest, "manifest")?;
    anyhow::ensure!(!manifest.faces.is_empty(), "manifest lists no faces");
    let root = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let faces = manifest
        .faces
        .into_iter()
        .map(|entry| -> anyhow::Result<FaceImage> {
            let image = read_rgb(&root.join(&entry.image))?;
            Ok(fit_to_canvas(image, entry.landmarks, settings.size))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let out = facewarp::average_faces(&faces, &settings)?;
    tracing::info!(
        images = out.stats.images,
        triangles = out.stats.triangles,
        skipped = out.stats.triangles_skipped,
        "averaged faces"
    );
    write_png(&out.image, &args.out)
}

fn cmd_swap(args: SwapArgs) -> anyhow::Result<()> {
    let mut settings: SwapSettings = match &args.config {
        Some(path) => read_json(path, "swap settings")?,
        None => SwapSettings::default(),
    };
    if args.limit.is_some() {
        settings.landmark_limit = args.limit;
    }
    if let Some(radius) = args.smooth_radius {
        let base = settings.smoothing.unwrap_or_default();
        settings.smoothing = Some(Smoothing { radius, ..base });
    }

    let source = FaceImage {
        image: Canvas::from_rgb8(&read_rgb(&args.source)?),
        landmarks: read_json(&args.source_landmarks, "source landmarks")?,
    };
    let destination = FaceImage {
        image: Canvas::from_rgb8(&read_rgb(&args.dest)?),
        landmarks: read_json(&args.dest_landmarks, "destination landmarks")?,
    };

    let merged = facewarp::swap_face(&source, &destination, &settings, &MaskBlend)?;
    write_png(&merged, &args.out)
}
