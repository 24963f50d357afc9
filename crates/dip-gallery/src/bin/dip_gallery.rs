use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dip_core::Image;
use dip_gallery::io;
use dip_gallery::pipeline::{PipelineConfig, REPORT_FILE, run_pipeline};
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "dip_gallery")]
#[command(about = "Run dip image operations on files and record what they did")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print size and channel count of an image file.
    #[command(name = "info")]
    Info(InfoArgs),
    #[command(name = "zoom")]
    Zoom(ZoomArgs),
    /// Zoom with both methods and report how far they disagree.
    #[command(name = "compare-zoom")]
    CompareZoom(CompareZoomArgs),
    #[command(name = "rotate")]
    Rotate(RotateArgs),
    #[command(name = "quantize")]
    Quantize(QuantizeArgs),
    #[command(name = "invert")]
    Invert(InvertArgs),
    #[command(name = "complement")]
    Complement(ComplementArgs),
    #[command(name = "downsample")]
    Downsample(DownsampleArgs),
    /// Least-squares fit of comma-separated samples.
    #[command(name = "fit")]
    Fit(FitArgs),
    /// Execute a JSON pipeline file.
    #[command(name = "run")]
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Decode with this many channels (1-4); 0 keeps the file's own.
    #[arg(long, default_value_t = 0)]
    channels: usize,
}

#[derive(Args, Debug, Clone)]
struct InfoArgs {
    #[arg(long, required = true)]
    input: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ZoomMethod {
    Nearest,
    Bilinear,
}

#[derive(Args, Debug, Clone)]
struct ZoomArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 2.0)]
    scale: f64,
    #[arg(long, value_enum, default_value_t = ZoomMethod::Bilinear)]
    method: ZoomMethod,
}

#[derive(Args, Debug, Clone)]
struct CompareZoomArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 2.0)]
    scale: f64,
}

#[derive(Args, Debug, Clone)]
struct RotateArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    degrees: f64,
}

#[derive(Args, Debug, Clone)]
struct QuantizeArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 8)]
    levels: u32,
}

#[derive(Args, Debug, Clone)]
struct InvertArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 255)]
    max_gray: i32,
}

#[derive(Args, Debug, Clone)]
struct ComplementArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 255)]
    k: i32,
}

#[derive(Args, Debug, Clone)]
struct DownsampleArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 2)]
    factor: usize,
}

#[derive(Args, Debug, Clone)]
struct FitArgs {
    #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
    x: Vec<f64>,
    #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
    y: Vec<f64>,
    #[arg(long, default_value_t = 1)]
    degree: usize,
    /// Also write the result here as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    #[arg(long, required = true)]
    config: PathBuf,
}

#[derive(Serialize)]
struct Dims {
    width: usize,
    height: usize,
    channels: usize,
}

impl From<&Image> for Dims {
    fn from(img: &Image) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: img.channels(),
        }
    }
}

#[derive(Serialize)]
struct MetaOp<P: Serialize> {
    operation: &'static str,
    params: P,
    input: Dims,
    output: Dims,
}

#[derive(Serialize)]
struct ZoomParams {
    scale: f64,
    method: &'static str,
}

#[derive(Serialize)]
struct MetaCompareZoom {
    scale: f64,
    input: Dims,
    output: Dims,
    mean_abs_diff: f64,
    max_abs_diff: u8,
    differing_samples: usize,
}

#[derive(Serialize)]
struct RotateParams {
    degrees: f64,
    radians: f64,
    center: [f64; 2],
}

#[derive(Serialize)]
struct FitReport {
    degree: usize,
    points: usize,
    /// Constant term first.
    coefficients: Vec<f64>,
    r_squared: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Info(args) => run_info(args),
        Command::Zoom(args) => run_zoom(args),
        Command::CompareZoom(args) => run_compare_zoom(args),
        Command::Rotate(args) => run_rotate(args),
        Command::Quantize(args) => run_quantize(args),
        Command::Invert(args) => run_invert(args),
        Command::Complement(args) => run_complement(args),
        Command::Downsample(args) => run_downsample(args),
        Command::Fit(args) => run_fit(args),
        Command::Run(args) => run_config(args),
    }
}

fn run_info(args: InfoArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    if !io::is_supported_format(&args.input) {
        bail!("unrecognised image extension: {}", args.input.display());
    }
    let info = io::probe(&args.input)
        .with_context(|| format!("reading header of {}", args.input.display()))?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn run_zoom(args: ZoomArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "zoom")?;
    let (zoomed, method) = match args.method {
        ZoomMethod::Nearest => (dip_resample::nearest_zoom(&img, args.scale)?, "nearest"),
        ZoomMethod::Bilinear => (dip_resample::bilinear_zoom(&img, args.scale)?, "bilinear"),
    };
    save_image(&case_dir.join(format!("{method}.png")), &zoomed)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaOp {
            operation: "zoom",
            params: ZoomParams {
                scale: args.scale,
                method,
            },
            input: Dims::from(&img),
            output: Dims::from(&zoomed),
        },
    )
}

fn run_compare_zoom(args: CompareZoomArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "compare_zoom")?;
    let nearest = dip_resample::nearest_zoom(&img, args.scale)?;
    let bilinear = dip_resample::bilinear_zoom(&img, args.scale)?;
    if nearest.size() != bilinear.size() {
        bail!(
            "zoom methods disagree on output size: {} vs {}",
            nearest.size(),
            bilinear.size()
        );
    }

    save_image(&case_dir.join("nearest.png"), &nearest)?;
    save_image(&case_dir.join("bilinear.png"), &bilinear)?;

    let a = nearest.view::<u8>()?.to_vec();
    let b = bilinear.view::<u8>()?.to_vec();
    let diffs: Vec<u8> = a.iter().zip(&b).map(|(&p, &q)| p.abs_diff(q)).collect();
    let diff = Image::from_vec(nearest.width(), nearest.height(), nearest.channels(), diffs)?;
    save_image(&case_dir.join("abs_diff.png"), &diff)?;

    let samples = diff.as_bytes();
    let sum: u64 = samples.iter().map(|&d| u64::from(d)).sum();
    let meta = MetaCompareZoom {
        scale: args.scale,
        input: Dims::from(&img),
        output: Dims::from(&nearest),
        mean_abs_diff: if samples.is_empty() {
            0.0
        } else {
            sum as f64 / samples.len() as f64
        },
        max_abs_diff: samples.iter().copied().max().unwrap_or(0),
        differing_samples: samples.iter().filter(|&&d| d != 0).count(),
    };
    info!(
        "nearest vs bilinear at x{}: mean |diff| {:.3}, max {}",
        meta.scale, meta.mean_abs_diff, meta.max_abs_diff
    );
    write_json(case_dir.join("meta.json"), &meta)
}

fn run_rotate(args: RotateArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "rotate")?;
    let radians = args.degrees.to_radians();
    let rotated = dip_resample::rotate(&img, radians)?;
    save_image(&case_dir.join("rotated.png"), &rotated)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaOp {
            operation: "rotate",
            params: RotateParams {
                degrees: args.degrees,
                radians,
                center: [img.width() as f64 / 2.0, img.height() as f64 / 2.0],
            },
            input: Dims::from(&img),
            output: Dims::from(&rotated),
        },
    )
}

fn run_quantize(args: QuantizeArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "quantize")?;
    let out = dip_ops::quantize(&img, args.levels)?;
    save_point_op(&case_dir, "quantize", serde_json::json!({ "levels": args.levels }), &img, &out)
}

fn run_invert(args: InvertArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "invert")?;
    let out = dip_ops::invert_image(&img, args.max_gray)?;
    save_point_op(&case_dir, "invert", serde_json::json!({ "max_gray": args.max_gray }), &img, &out)
}

fn run_complement(args: ComplementArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "complement")?;
    let out = dip_ops::set_complement(&img, args.k)?;
    save_point_op(&case_dir, "complement", serde_json::json!({ "k": args.k }), &img, &out)
}

fn run_downsample(args: DownsampleArgs) -> Result<()> {
    let (case_dir, img) = prepare_case(&args.common, "downsample")?;
    let out = dip_ops::downsample(&img, args.factor)?;
    save_point_op(&case_dir, "downsample", serde_json::json!({ "factor": args.factor }), &img, &out)
}

fn run_fit(args: FitArgs) -> Result<()> {
    if args.x.len() != args.y.len() {
        bail!(
            "--x has {} values but --y has {}.",
            args.x.len(),
            args.y.len()
        );
    }

    let report = if args.degree == 1 {
        let line = dip_fit::linear_fit(&args.x, &args.y).context("fitting line")?;
        FitReport {
            degree: 1,
            points: args.x.len(),
            coefficients: vec![line.intercept, line.slope],
            r_squared: line.r_squared,
        }
    } else {
        let coeffs = dip_fit::polynomial_fit(&args.x, &args.y, args.degree)
            .with_context(|| format!("fitting degree {} polynomial", args.degree))?;
        let pred: Vec<f64> = args.x.iter().map(|&x| dip_fit::predict(x, &coeffs)).collect();
        FitReport {
            degree: args.degree,
            points: args.x.len(),
            r_squared: dip_fit::r_squared(&args.y, &pred),
            coefficients: coeffs,
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(path) = args.out {
        write_json(path, &report)?;
    }
    Ok(())
}

fn run_config(args: RunArgs) -> Result<()> {
    ensure_file_exists(&args.config, "config")?;
    let config = PipelineConfig::from_file(&args.config)
        .with_context(|| format!("parsing pipeline config {}", args.config.display()))?;
    ensure_file_exists(&config.input, "input")?;

    let report = run_pipeline(&config)
        .with_context(|| format!("running pipeline {}", args.config.display()))?;
    info!(
        "{} stages written, summary in {}",
        report.stages.len(),
        config.output_dir.join(REPORT_FILE).display()
    );
    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<(PathBuf, Image)> {
    ensure_file_exists(&common.input, "input")?;

    let img = io::load(&common.input, common.channels)
        .with_context(|| format!("opening input image {}", common.input.display()))?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;
    save_image(&case_dir.join("input.png"), &img)?;

    info!("{case_name}: {} from {}", img, common.input.display());
    Ok((case_dir, img))
}

fn save_point_op(
    case_dir: &Path,
    operation: &'static str,
    params: serde_json::Value,
    input: &Image,
    output: &Image,
) -> Result<()> {
    save_image(&case_dir.join(format!("{operation}.png")), output)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaOp {
            operation,
            params,
            input: Dims::from(input),
            output: Dims::from(output),
        },
    )
}

fn save_image(path: &Path, img: &Image) -> Result<()> {
    io::save(img, path).with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
