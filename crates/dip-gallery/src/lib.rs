//! File I/O and scripted runs for the dip toolkit.
//!
//! [`io`] converts between files and [`dip_core::Image`] through the `image` crate.
//! [`pipeline`] applies a JSON-described chain of operations and saves every stage.
//! The `dip_gallery` binary wraps both behind a command line.

pub mod io;
pub mod pipeline;

pub use io::{ImageInfo, IoError, is_supported_format, load, load_from_memory, probe, save, save_pnm};
pub use pipeline::{PipelineConfig, PipelineError, PipelineReport, StageReport, Step, run_pipeline};
