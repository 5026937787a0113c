mod ffmpeg;

pub use ffmpeg::FfmpegEncoder;

use crate::error::PipelineError;
use std::path::Path;

/// Capability seam over the external video encode collaborator: turn an
/// ordered diff-image sequence into a single video artifact that keeps
/// per-pixel transparency.
pub trait VideoEncoder: Sync {
    /// Encodes `frame_count` diff images from `frames_dir` (numbered in
    /// capture order) into `output` at `fps`.
    fn encode(
        &self,
        frames_dir: &Path,
        frame_count: usize,
        fps: u32,
        output: &Path,
    ) -> Result<(), PipelineError>;
}
