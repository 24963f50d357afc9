//! JSON-configured chains of image operations.
//!
//! ```json
//! {
//!   "input": "lena.png",
//!   "output_dir": "out/lena",
//!   "channels": 1,
//!   "steps": [
//!     { "op": "bilinear_zoom", "scale": 2.0 },
//!     { "op": "rotate", "degrees": 15.0 },
//!     { "op": "quantize", "levels": 8 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use dip_core::{Error, Image, Size};
use log::info;
use serde::{Deserialize, Serialize};

use crate::io::{self, IoError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    NearestZoom {
        scale: f64,
    },
    BilinearZoom {
        scale: f64,
    },
    /// Counter-clockwise on screen for positive angles.
    Rotate {
        degrees: f64,
    },
    Quantize {
        levels: u32,
    },
    Invert {
        #[serde(default = "default_max_gray")]
        max_gray: i32,
    },
    Complement {
        k: i32,
    },
    Downsample {
        factor: usize,
    },
    FlipHorizontal,
    FlipVertical,
    Rotate90 {
        #[serde(default = "default_clockwise")]
        clockwise: bool,
    },
    Resize {
        width: usize,
        height: usize,
    },
}

fn default_max_gray() -> i32 {
    255
}

fn default_clockwise() -> bool {
    true
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::NearestZoom { .. } => "nearest_zoom",
            Step::BilinearZoom { .. } => "bilinear_zoom",
            Step::Rotate { .. } => "rotate",
            Step::Quantize { .. } => "quantize",
            Step::Invert { .. } => "invert",
            Step::Complement { .. } => "complement",
            Step::Downsample { .. } => "downsample",
            Step::FlipHorizontal => "flip_horizontal",
            Step::FlipVertical => "flip_vertical",
            Step::Rotate90 { .. } => "rotate90",
            Step::Resize { .. } => "resize",
        }
    }

    pub fn apply(&self, img: &Image) -> Result<Image, Error> {
        match *self {
            Step::NearestZoom { scale } => dip_resample::nearest_zoom(img, scale),
            Step::BilinearZoom { scale } => dip_resample::bilinear_zoom(img, scale),
            Step::Rotate { degrees } => dip_resample::rotate(img, degrees.to_radians()),
            Step::Quantize { levels } => dip_ops::quantize(img, levels),
            Step::Invert { max_gray } => dip_ops::invert_image(img, max_gray),
            Step::Complement { k } => dip_ops::set_complement(img, k),
            Step::Downsample { factor } => dip_ops::downsample(img, factor),
            Step::FlipHorizontal => dip_resample::flip_horizontal(img),
            Step::FlipVertical => dip_resample::flip_vertical(img),
            Step::Rotate90 { clockwise } => dip_resample::rotate90(img, clockwise),
            Step::Resize { width, height } => {
                dip_resample::resize_nearest(img, Size::new(width, height))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Channel count to decode the input with; native when absent.
    #[serde(default)]
    pub channels: Option<usize>,
    pub steps: Vec<Step>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl PipelineConfig {
    /// Reads a config file. Relative `input` and `output_dir` paths stay as written
    /// and resolve against the working directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("step {index} ({op}) failed: {source}")]
    Step {
        index: usize,
        op: &'static str,
        #[source]
        source: Error,
    },
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(IoError::Io(e))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub index: usize,
    pub op: &'static str,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub input: PathBuf,
    pub stages: Vec<StageReport>,
}

pub const REPORT_FILE: &str = "pipeline.json";

/// Runs every step in order, saving `00_input.png` and one PNG per step into
/// `output_dir`, then writes [`REPORT_FILE`] next to them.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
    let mut img = io::load(&config.input, config.channels.unwrap_or(0))?;
    fs::create_dir_all(&config.output_dir)?;

    let mut stages = Vec::with_capacity(config.steps.len() + 1);
    stages.push(save_stage(config, 0, "input", &img)?);

    for (i, step) in config.steps.iter().enumerate() {
        let index = i + 1;
        img = step.apply(&img).map_err(|source| PipelineError::Step {
            index,
            op: step.name(),
            source,
        })?;
        info!("step {index} {}: {}", step.name(), img);
        stages.push(save_stage(config, index, step.name(), &img)?);
    }

    let report = PipelineReport {
        input: config.input.clone(),
        stages,
    };
    fs::write(
        config.output_dir.join(REPORT_FILE),
        serde_json::to_vec_pretty(&report)?,
    )?;
    Ok(report)
}

fn save_stage(
    config: &PipelineConfig,
    index: usize,
    op: &'static str,
    img: &Image,
) -> Result<StageReport, PipelineError> {
    let output = config.output_dir.join(format!("{index:02}_{op}.png"));
    io::save(img, &output)?;
    Ok(StageReport {
        index,
        op,
        width: img.width(),
        height: img.height(),
        channels: img.channels(),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::{PipelineConfig, PipelineError, REPORT_FILE, Step, run_pipeline};
    use crate::io;
    use dip_core::{Error, Image};

    #[test]
    fn steps_parse_from_tagged_json() {
        let json = r#"{
            "input": "in.png",
            "steps": [
                { "op": "nearest_zoom", "scale": 2.0 },
                { "op": "invert" },
                { "op": "rotate90" },
                { "op": "flip_vertical" },
                { "op": "resize", "width": 4, "height": 3 }
            ]
        }"#;
        let cfg: PipelineConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(cfg.output_dir, std::path::PathBuf::from("out"));
        assert_eq!(cfg.channels, None);
        assert_eq!(
            cfg.steps,
            vec![
                Step::NearestZoom { scale: 2.0 },
                Step::Invert { max_gray: 255 },
                Step::Rotate90 { clockwise: true },
                Step::FlipVertical,
                Step::Resize {
                    width: 4,
                    height: 3
                },
            ]
        );

        let bad = r#"{ "input": "a.png", "steps": [ { "op": "blur" } ] }"#;
        assert!(serde_json::from_str::<PipelineConfig>(bad).is_err());
    }

    #[test]
    fn apply_dispatches_to_operations() {
        let img = Image::from_vec(2, 2, 1, vec![0u8, 10, 20, 30]).expect("valid");

        let zoomed = Step::BilinearZoom { scale: 2.0 }.apply(&img).expect("zoom");
        assert_eq!((zoomed.width(), zoomed.height()), (4, 4));

        let inv = Step::Invert { max_gray: 255 }.apply(&img).expect("invert");
        assert_eq!(inv.view::<u8>().expect("u8").to_vec(), vec![255, 245, 235, 225]);

        let flipped = Step::FlipHorizontal.apply(&img).expect("flip");
        assert_eq!(flipped.view::<u8>().expect("u8").to_vec(), vec![10, 0, 30, 20]);

        assert!(matches!(
            Step::Quantize { levels: 0 }.apply(&img),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn run_saves_every_stage_and_a_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.png");
        let data: Vec<u8> = (0..48).map(|v| (v * 5) as u8).collect();
        io::save(&Image::from_vec(8, 6, 1, data).expect("valid"), &input).expect("save");

        let cfg = PipelineConfig {
            input: input.clone(),
            output_dir: dir.path().join("out"),
            channels: Some(1),
            steps: vec![
                Step::Downsample { factor: 2 },
                Step::NearestZoom { scale: 3.0 },
                Step::Quantize { levels: 4 },
            ],
        };
        let report = run_pipeline(&cfg).expect("run");

        let dims: Vec<_> = report.stages.iter().map(|s| (s.width, s.height)).collect();
        assert_eq!(dims, vec![(8, 6), (4, 3), (12, 9), (12, 9)]);
        for stage in &report.stages {
            assert!(stage.output.is_file(), "{}", stage.output.display());
        }
        let last = io::load(&report.stages[3].output, 0).expect("load");
        assert!(last.view::<u8>().expect("u8").to_vec().iter().all(|v| v % 64 == 32));

        let json = std::fs::read_to_string(cfg.output_dir.join(REPORT_FILE)).expect("report");
        assert!(json.contains("\"op\": \"quantize\""));
    }

    #[test]
    fn failing_step_reports_its_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.png");
        io::save(&Image::from_vec(2, 2, 1, vec![1u8; 4]).expect("valid"), &input).expect("save");

        let cfg = PipelineConfig {
            input,
            output_dir: dir.path().join("out"),
            channels: None,
            steps: vec![Step::FlipVertical, Step::NearestZoom { scale: -1.0 }],
        };
        match run_pipeline(&cfg) {
            Err(PipelineError::Step { index, op, .. }) => {
                assert_eq!((index, op), (2, "nearest_zoom"));
            }
            other => panic!("expected step failure, got {other:?}"),
        }
    }
}
