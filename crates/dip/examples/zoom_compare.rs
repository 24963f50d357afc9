//! Example: nearest-neighbour vs bilinear zoom, plus a rotation round trip.
//!
//! Loads an image as 8-bit grey, zooms it at each requested scale with both
//! methods and records timing and how far the two results disagree. Then rotates
//! by `--degrees` and back, measuring the error inside the central disc where no
//! pixel was pushed outside the frame.
//!
//! Results are written to a JSON file next to the input image.
//!
//! Run from the workspace root:
//!   cargo run -p dip --example zoom_compare -- --help
//!   cargo run -p dip --example zoom_compare -- --input data/lena.png --scales 0.5,2,3.5

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dip::{Image, bilinear_zoom, nearest_zoom, rotate};
use image::ImageReader;
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Compare nearest and bilinear zoom on one image")]
struct Args {
    #[arg(long, required = true)]
    input: PathBuf,

    /// Zoom factors to try.
    #[arg(long, value_delimiter = ',', default_values_t = [0.5, 2.0, 3.0])]
    scales: Vec<f64>,

    /// Rotation angle for the round-trip check.
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    degrees: f64,

    /// Output JSON path (default: <input stem>_zoom.json next to input)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct ZoomResult {
    scale: f64,
    width: usize,
    height: usize,
    nearest_ms: f64,
    bilinear_ms: f64,
    mean_abs_diff: f64,
}

#[derive(Serialize)]
struct RotationResult {
    degrees: f64,
    elapsed_ms: f64,
    disc_radius: f64,
    mean_abs_error: f64,
    max_abs_error: u8,
}

#[derive(Serialize)]
struct Report {
    input: PathBuf,
    width: usize,
    height: usize,
    zoom: Vec<ZoomResult>,
    rotation: RotationResult,
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let t0 = Instant::now();
    let out = f();
    (out, t0.elapsed().as_secs_f64() * 1e3)
}

fn mean_abs_diff(a: &Image, b: &Image) -> Result<f64> {
    let a = a.view::<u8>()?.to_vec();
    let b = b.view::<u8>()?.to_vec();
    if a.len() != b.len() {
        bail!("cannot compare {} samples with {}", a.len(), b.len());
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: u64 = a.iter().zip(&b).map(|(&p, &q)| u64::from(p.abs_diff(q))).sum();
    Ok(sum as f64 / a.len() as f64)
}

fn rotation_round_trip(img: &Image, degrees: f64) -> Result<RotationResult> {
    let theta = degrees.to_radians();
    let (back, elapsed_ms) = timed(|| rotate(img, theta).and_then(|r| rotate(&r, -theta)));
    let back = back.context("rotating")?;

    let cx = img.width() as f64 / 2.0;
    let cy = img.height() as f64 / 2.0;
    let radius = cx.min(cy) - 2.0;

    let (mut sum, mut count, mut max) = (0u64, 0u64, 0u8);
    for (x, y) in img.pixels() {
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        if dx.hypot(dy) > radius {
            continue;
        }
        let d = img.pixel::<u8>(x, y, 0)?.abs_diff(back.pixel::<u8>(x, y, 0)?);
        sum += u64::from(d);
        count += 1;
        max = max.max(d);
    }

    Ok(RotationResult {
        degrees,
        elapsed_ms,
        disc_radius: radius.max(0.0),
        mean_abs_error: if count == 0 { 0.0 } else { sum as f64 / count as f64 },
        max_abs_error: max,
    })
}

fn default_out(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = input.parent().unwrap_or(Path::new("."));
    dir.join(format!("{stem}_zoom.json"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let gray = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .decode()
        .with_context(|| format!("decoding {}", args.input.display()))?
        .into_luma8();
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let img = Image::from_vec(w, h, 1, gray.into_raw()).context("building dip image")?;
    info!("loaded {}: {img}", args.input.display());

    let mut zoom = Vec::with_capacity(args.scales.len());
    for &scale in &args.scales {
        let (nearest, nearest_ms) = timed(|| nearest_zoom(&img, scale));
        let (bilinear, bilinear_ms) = timed(|| bilinear_zoom(&img, scale));
        let nearest = nearest.with_context(|| format!("nearest zoom x{scale}"))?;
        let bilinear = bilinear.with_context(|| format!("bilinear zoom x{scale}"))?;

        let diff = mean_abs_diff(&nearest, &bilinear)?;
        println!(
            "  x{scale}: {} nearest {nearest_ms:.2} ms, bilinear {bilinear_ms:.2} ms, mean |diff| {diff:.3}",
            nearest.size()
        );
        zoom.push(ZoomResult {
            scale,
            width: nearest.width(),
            height: nearest.height(),
            nearest_ms,
            bilinear_ms,
            mean_abs_diff: diff,
        });
    }

    let rotation = rotation_round_trip(&img, args.degrees)?;
    println!(
        "rotate {}° and back: mean error {:.3}, max {} inside r={:.1}",
        rotation.degrees, rotation.mean_abs_error, rotation.max_abs_error, rotation.disc_radius
    );

    let out_path = args.out.clone().unwrap_or_else(|| default_out(&args.input));
    let report = Report {
        input: args.input,
        width: w,
        height: h,
        zoom,
        rotation,
    };
    let out_file = std::fs::File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    serde_json::to_writer_pretty(out_file, &report)
        .with_context(|| format!("writing JSON to {}", out_path.display()))?;

    println!("results written to {}", out_path.display());
    Ok(())
}
