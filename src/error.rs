use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not sample frames from {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("frame sets differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error(
        "frame pair {index} differs in size: {left_width}x{left_height} vs {right_width}x{right_height}"
    )]
    DimensionMismatch {
        index: usize,
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
    #[error("nothing to compare: zero pixels aggregated")]
    EmptyInput,
    #[error("could not encode diff video {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
    #[error("{what} did not finish within {secs}s")]
    CollaboratorTimeout { what: String, secs: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
